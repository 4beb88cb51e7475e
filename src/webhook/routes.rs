use ntex::web;

/// Configures the WhatsApp webhook routes.
///
/// These routes are public endpoints called by the messaging platform.
///
/// # Routes
/// - `GET /webhook` - WhatsApp webhook verification
/// - `POST /webhook` - WhatsApp webhook receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service((super::whatsapp::verify, super::whatsapp::receive));
}

/// Configures the manual send route.
///
/// # Routes
/// - `GET /send-test` - Sends a message to `phone` (or the target number)
pub fn send_test(cfg: &mut web::ServiceConfig) {
    cfg.service(super::whatsapp::send_test);
}
