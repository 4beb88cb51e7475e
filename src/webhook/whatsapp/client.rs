//! # WhatsApp API Client
//!
//! Sends text messages through the messaging API. Every failure is reduced to a
//! tagged [`SendError`] and logged here, callers only pattern-match on it.

use super::outgoing_schemas::{OutgoingTextMessage, WhatsAppMessageResponse};
use crate::{config::AppConfig, consts};
use async_trait::async_trait;
use derive_more::{Display, Error};
use std::time::Duration;

/// Outcome of a send attempt
pub type SendResult = Result<WhatsAppMessageResponse, SendError>;

/// Why a message could not be sent
#[derive(Debug, Display, Error)]
pub enum SendError {
    /// The request did not complete before the client timeout
    #[display("request timed out")]
    Timeout,
    /// The API answered with a non success status
    #[display("API returned error status {status}: {body}")]
    Http {
        status: u16,
        body: String,
    },
    /// Connection, request or response decoding failure
    #[display("{message}")]
    Network {
        message: String,
        code: Option<String>,
    },
}

impl SendError {
    /// Classifies a transport level error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.to_string().to_lowercase().contains("timeout") {
            return SendError::Timeout;
        }

        let code = if err.is_connect() {
            Some("connect")
        } else if err.is_decode() {
            Some("decode")
        } else if err.is_body() {
            Some("body")
        } else if err.is_request() {
            Some("request")
        } else {
            None
        };

        SendError::Network {
            message: err.to_string(),
            code: code.map(str::to_string),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SendError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Anything able to deliver a text message to a phone number
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender {
    /// Sends `body` to `recipient` (bare phone number, without "+")
    async fn send_text(&self, recipient: &str, body: &str) -> SendResult;
}

pub type ImplMessageSender = Box<dyn MessageSender + Send + Sync>;

/// WhatsApp API client for sending messages
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Messaging API endpoint for sending messages
    endpoint: String,
    /// 🔒 API key
    api_key: String,
}

impl WhatsAppClient {
    /// Creates a new client using the default send timeout
    pub fn new(app_config: &AppConfig) -> anyhow::Result<Self> {
        Self::with_timeout(app_config, consts::SEND_TIMEOUT)
    }

    pub fn with_timeout(app_config: &AppConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: app_config.send_msg_endpoint(),
            api_key: app_config.whatsapp_token.clone(),
        })
    }

    async fn send_message(&self, message: &OutgoingTextMessage) -> SendResult {
        let response = self
            .client
            .post(&self.endpoint)
            .header(consts::API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await
            .map_err(SendError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            return Err(SendError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<WhatsAppMessageResponse>()
            .await
            .map_err(SendError::from_reqwest)
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, recipient: &str, body: &str) -> SendResult {
        logfire::info!(
            "Sending message to {recipient}",
            recipient = recipient.to_string()
        );

        let message = OutgoingTextMessage::new(recipient, body);
        let result = self.send_message(&message).await;

        match &result {
            Ok(response) => {
                logfire::info!(
                    "Message sent to {recipient}, message id: {message_id}",
                    recipient = recipient.to_string(),
                    message_id = response.first_message_id().unwrap_or("N/A").to_string()
                );
            }
            Err(SendError::Timeout) => {
                logfire::error!(
                    "Timed out sending message to {recipient}",
                    recipient = recipient.to_string()
                );
            }
            Err(err) => {
                let (code, response_body) = match err {
                    SendError::Network { code, .. } => (code.clone(), None),
                    SendError::Http { body, .. } => (None, Some(body.clone())),
                    SendError::Timeout => (None, None),
                };

                logfire::error!(
                    "Error sending message to {recipient}: {message} (code: {code}, status: {status}, response: {response_body})",
                    recipient = recipient.to_string(),
                    message = err.to_string(),
                    code = code.unwrap_or_else(|| "N/A".to_string()),
                    status = err
                        .status()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    response_body = response_body.unwrap_or_else(|| "N/A".to_string())
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server_uri: &str, timeout: Duration) -> WhatsAppClient {
        let mut config = test_config(None);
        config.whatsapp_api_base_url = server_uri.to_string();

        WhatsAppClient::with_timeout(&config, timeout).unwrap()
    }

    #[tokio::test]
    async fn test_send_text_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header(consts::API_KEY_HEADER, "api-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "messaging_product": "whatsapp",
                "to": "+5213311296199",
                "type": "text",
                "text": { "body": "Hi There!" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messaging_product": "whatsapp",
                "messages": [{ "id": "wamid.1" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Duration::from_secs(5));
        let response = client
            .send_text("5213311296199", "Hi There!")
            .await
            .unwrap();

        assert_eq!(response.first_message_id(), Some("wamid.1"));
    }

    #[tokio::test]
    async fn test_send_text_success_without_message_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "meta": {} })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Duration::from_secs(5));
        let response = client.send_text("1", "hi").await.unwrap();

        assert!(response.first_message_id().is_none());
    }

    #[tokio::test]
    async fn test_send_text_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Duration::from_secs(5));
        let result = client.send_text("1", "hi").await;

        match result {
            Err(SendError::Http { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_text_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "messages": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Duration::from_millis(100));
        let result = client.send_text("1", "hi").await;

        assert!(matches!(result, Err(SendError::Timeout)));
    }

    #[tokio::test]
    async fn test_send_text_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"), Duration::from_secs(5));
        let result = client.send_text("1", "hi").await;

        assert!(matches!(result, Err(SendError::Network { .. })));
    }

    #[tokio::test]
    async fn test_send_text_invalid_json_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri(), Duration::from_secs(5));
        let result = client.send_text("1", "hi").await;

        match result {
            Err(SendError::Network { code, .. }) => assert_eq!(code.as_deref(), Some("decode")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
