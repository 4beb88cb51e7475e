//! # WhatsApp Webhook Handler
//!
//! Decision logic behind the webhook endpoints: the verification handshake
//! and the relay that answers the trigger message.

use super::{
    client::MessageSender,
    schemas::{InboundMessage, WebhookEnvelope},
};
use crate::consts;

/// Checks the subscription handshake.
///
/// Returns the challenge to echo back when `mode` is "subscribe" and the token
/// matches, `None` otherwise. A missing challenge echoes as an empty string.
pub fn verify_subscription<'a>(
    mode: Option<&str>,
    verify_token: Option<&str>,
    challenge: Option<&'a str>,
    expected_token: &str,
) -> Option<&'a str> {
    let subscribed = mode == Some(consts::VERIFY_MODE_SUBSCRIBE);
    let token_matches = verify_token == Some(expected_token);

    (subscribed && token_matches).then(|| challenge.unwrap_or_default())
}

/// What to do with a single inbound message
#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    /// Trigger message from the target, answer it
    Reply,
    /// Target sender but other content
    NotTrigger,
    /// Message from somebody else
    OtherSender,
}

/// Decides whether a message is the trigger.
///
/// Only the text is normalized (trimmed and lower-cased), the sender must
/// match the target exactly. Without a target nothing ever matches.
pub fn decide(message: &InboundMessage, target_phone: Option<&str>) -> Decision {
    let from_target = matches!(
        (message.from.as_deref(), target_phone),
        (Some(from), Some(target)) if from == target
    );

    if !from_target {
        return Decision::OtherSender;
    }

    match message.normalized_text() {
        Some(text) if text == consts::TRIGGER_TEXT => Decision::Reply,
        _ => Decision::NotTrigger,
    }
}

/// Summary of one webhook delivery
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub replies_sent: usize,
    pub replies_failed: usize,
}

/// Walks the webhook payload and answers the trigger message.
///
/// A reply ends the processing of the `messages` array it was found in, the
/// remaining changes and entries are still visited. Send failures are already
/// logged by the sender and only counted here.
pub async fn process_webhook(
    envelope: &WebhookEnvelope,
    sender: &dyn MessageSender,
    target_phone: Option<&str>,
) -> RelayReport {
    let mut report = RelayReport::default();

    let Some(entries) = envelope.entries() else {
        logfire::info!("No entries found in webhook");
        return report;
    };

    for entry in entries {
        let Some(changes) = entry.changes() else {
            logfire::info!("No changes found in entry");
            continue;
        };

        for change in changes {
            let Some(value) = &change.value else {
                logfire::info!("No value found in change");
                continue;
            };

            let Some(messages) = value.messages() else {
                continue;
            };

            logfire::info!(
                "Processing {count} message(s)",
                count = messages.len() as i64
            );

            for message in messages {
                let from = message.from.clone().unwrap_or_default();
                tracing::debug!(
                    from = %from,
                    text = ?message.normalized_text(),
                    "inbound message"
                );

                match decide(message, target_phone) {
                    Decision::Reply => {
                        logfire::info!(
                            "Trigger received from {from}, sending reply",
                            from = from.clone()
                        );

                        match sender.send_text(&from, consts::REPLY_TEXT).await {
                            Ok(_) => report.replies_sent += 1,
                            Err(_) => report.replies_failed += 1,
                        }
                        break;
                    }
                    Decision::NotTrigger => {
                        logfire::info!(
                            "Message from {from} is not the trigger, ignoring",
                            from = from
                        );
                    }
                    Decision::OtherSender => {
                        logfire::info!(
                            "Message from {from} is not from the target number, ignoring",
                            from = from
                        );
                    }
                }
            }
        }
    }

    report
}
