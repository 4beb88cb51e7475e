//! # WhatsApp Webhook Schemas
//!
//! Data structures for the JSON payload WhatsApp posts to the webhook.
//!
//! Every level of the envelope is optional. A level that is missing, `null`,
//! or of an unexpected JSON type deserializes to `None`, and sequence elements
//! with an unexpected shape are dropped, so a malformed payload reads as
//! "nothing to do" instead of failing the whole request.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

/// Root webhook payload from WhatsApp
#[derive(Debug, Default, Deserialize)]
pub struct WebhookEnvelope {
    /// Array of entry objects containing the actual data
    #[serde(default, deserialize_with = "lenient_seq")]
    pub entry: Option<Vec<Entry>>,
}

/// Entry object containing changes
#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub changes: Option<Vec<Change>>,
}

/// Change object containing the actual webhook data
#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<ChangeValue>,
}

/// Value object containing the received messages
#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub messages: Option<Vec<InboundMessage>>,
}

/// Message object
#[derive(Debug, Default, Deserialize)]
pub struct InboundMessage {
    /// Sender's WhatsApp ID (phone number)
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<String>,
    /// Text message content (if type is "text")
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<TextMessage>,
}

/// Text message content
#[derive(Debug, Default, Deserialize)]
pub struct TextMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
}

impl WebhookEnvelope {
    /// Entries of the payload, `None` when there is nothing to process.
    pub fn entries(&self) -> Option<&[Entry]> {
        self.entry.as_deref().filter(|entries| !entries.is_empty())
    }
}

impl Entry {
    pub fn changes(&self) -> Option<&[Change]> {
        self.changes.as_deref().filter(|changes| !changes.is_empty())
    }
}

impl ChangeValue {
    pub fn messages(&self) -> Option<&[InboundMessage]> {
        self.messages
            .as_deref()
            .filter(|messages| !messages.is_empty())
    }
}

impl InboundMessage {
    /// Text body trimmed and lower-cased, `None` for non text messages.
    pub fn normalized_text(&self) -> Option<String> {
        self.text
            .as_ref()
            .and_then(|text| text.body.as_deref())
            .map(|body| body.trim().to_lowercase())
    }
}

/// Deserializes a field as `T`, falling back to `None` on any shape mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Deserializes a JSON array keeping only the elements that fit `T`.
///
/// Anything other than an array yields `None`.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}
