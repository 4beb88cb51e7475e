//! Application configuration.
//!
//! All values come from environment variables and are read once at startup.
//! The resulting [`AppConfig`] is moved into the shared application state, so
//! handlers receive it explicitly instead of through a global.
//!
//! # Security Notes
//! - Sensitive fields are marked and must never be logged
//! - `AppConfig` does not implement `Debug`

use envconfig::Envconfig;

/// Environment driven configuration of the relay.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Base URL of the WhatsApp messaging API (NON-SENSITIVE)
    /// Example: "https://waba-v2.360dialog.io"
    pub whatsapp_api_base_url: String,

    /// 🔒 SENSITIVE: API key sent on every outbound request
    pub whatsapp_token: String,

    /// WhatsApp sender phone ID (SEMI-SENSITIVE)
    /// Reserved: read at startup but not part of the outbound payload.
    #[allow(dead_code)]
    pub whatsapp_phone_id: Option<String>,

    /// 🔒 SENSITIVE: token expected in the webhook verification handshake
    pub webhook_verify_token: String,

    /// Phone number whose "hello" triggers the automated reply (SEMI-SENSITIVE)
    /// Format: bare digits without "+", e.g. "5213311296199"
    pub target_phone_number: Option<String>,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "10000")]
    pub port: u16,
}

impl AppConfig {
    /// Target phone number, ignoring an empty value.
    ///
    /// The value is compared verbatim with inbound senders, it is not trimmed.
    pub fn target_phone(&self) -> Option<&str> {
        self.target_phone_number
            .as_deref()
            .filter(|phone| !phone.is_empty())
    }

    /// Endpoint used to send messages
    pub fn send_msg_endpoint(&self) -> String {
        format!(
            "{base}/messages",
            base = self.whatsapp_api_base_url.trim_end_matches('/')
        )
    }
}
