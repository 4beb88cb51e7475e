//! Webhook handlers for the WhatsApp messaging API
//!
//! ## Modules
//!
//! - [`whatsapp`] - WhatsApp webhook handlers and API client
//! - [`routes`] - Route configuration

pub mod routes;
pub mod whatsapp;

use crate::config::AppConfig;

/// State shared by every handler of a worker
pub struct AppState {
    pub config: AppConfig,
    pub sender: whatsapp::client::ImplMessageSender,
}
