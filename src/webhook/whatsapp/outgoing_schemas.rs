//! # WhatsApp Outgoing Message Schemas
//!
//! Payloads sent to the messaging API and the response it returns.

use serde::{Deserialize, Serialize};

/// Text message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient phone number in E.164 format (leading "+")
    pub to: String,
    /// Message type
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Text content
    pub text: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message
    ///
    /// `recipient` is the bare phone number, the "+" prefix is always added.
    pub fn new(recipient: &str, body: &str) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to: format!("+{recipient}"),
            msg_type: "text".to_string(),
            text: OutgoingTextContent {
                body: body.to_string(),
            },
        }
    }
}

/// Text content for outgoing messages
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextContent {
    /// Message body text
    pub body: String,
}

/// Response from the send endpoint
///
/// Only `messages` is typed, the remaining fields are kept as returned so the
/// payload can be handed back verbatim.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WhatsAppMessageResponse {
    #[serde(default)]
    pub messages: Vec<SentMessage>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Identifier of an accepted message
#[derive(Debug, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WhatsAppMessageResponse {
    /// Id of the first accepted message, if any
    pub fn first_message_id(&self) -> Option<&str> {
        self.messages.first().map(|message| message.id.as_str())
    }
}
