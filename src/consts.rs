use std::time::Duration;

pub const TRIGGER_TEXT: &str = "hello";
pub const REPLY_TEXT: &str = "Hi There!";
pub const TEST_MESSAGE_TEXT: &str = "Hi There! (Test)";

pub const VERIFY_MODE_SUBSCRIBE: &str = "subscribe";
pub const API_KEY_HEADER: &str = "D360-API-KEY";

pub const SEND_TIMEOUT: Duration = Duration::from_secs(35);

/// Upper bound for a webhook body, larger payloads are acknowledged unprocessed
pub const WEBHOOK_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
