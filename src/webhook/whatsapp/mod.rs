//! WhatsApp webhook integration module
//!
//! ## Submodules
//!
//! - [`handler`] - Verification and relay decision logic
//! - [`routes`] - HTTP endpoint handlers
//! - [`schemas`] - Incoming webhook payloads
//! - [`outgoing_schemas`] - Outgoing message payloads
//! - [`client`] - WhatsApp API client for sending messages

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;

pub use routes::{receive, send_test, verify};
