//! WhatsApp webhook endpoint handlers
//!
//! Verification endpoint (GET), webhook receiver (POST) and the manual
//! test-send endpoint.

use super::{handler, schemas};
use crate::{consts, errors::ApiError, webhook::AppState};
use ntex::{
    util::{Bytes, BytesMut},
    web,
};
use serde::Deserialize;
use tracing::Instrument;

/// Query parameters for webhook verification
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Query parameters for the manual send
#[derive(Debug, Deserialize)]
pub struct SendTestQuery {
    pub phone: Option<String>,
    pub msg: Option<String>,
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with the challenge as plain text if verification succeeds
/// - 403 if verification fails
#[web::get("/webhook")]
pub async fn verify(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    // Malformed queries (e.g. a repeated `hub.mode`) are a failed handshake
    let query = match web::types::Query::<VerifyQuery>::from_query(req.query_string()) {
        Ok(query) => query.into_inner(),
        Err(e) => {
            logfire::error!(
                "Webhook verification failed: malformed query: {error}",
                error = e.to_string()
            );
            return Err(ApiError::VerificationFailed.into());
        }
    };

    logfire::info!(
        "Received webhook verification request: mode={mode}",
        mode = query.mode.clone().unwrap_or_default()
    );

    let Some(challenge) = handler::verify_subscription(
        query.mode.as_deref(),
        query.verify_token.as_deref(),
        query.challenge.as_deref(),
        &app_state.config.webhook_verify_token,
    ) else {
        logfire::error!("Webhook verification failed: invalid mode or token");
        return Err(ApiError::VerificationFailed.into());
    };

    logfire::info!("Webhook verification successful");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge.to_string()))
}

/// Webhook receiver endpoint (POST)
///
/// Always answers 200 "OK": a payload that cannot be read or parsed counts
/// as an empty one and send failures never reach the response.
///
/// The body is read from the raw payload so the extractor size limit does not
/// turn a large webhook into a 400.
#[web::post("/webhook")]
pub async fn receive(
    mut payload: web::types::Payload,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let envelope = match read_payload(&mut payload, consts::WEBHOOK_MAX_BODY_BYTES).await {
        Ok(body) => parse_envelope(&body),
        Err(e) => {
            logfire::warn!(
                "Failed to read webhook payload: {error}",
                error = e.to_string()
            );
            schemas::WebhookEnvelope::default()
        }
    };

    let report = handler::process_webhook(
        &envelope,
        app_state.sender.as_ref(),
        app_state.config.target_phone(),
    )
    .instrument(logfire::span!("whatsapp_webhook"))
    .await;

    logfire::info!(
        "Webhook processed: {sent} replies sent, {failed} failed",
        sent = report.replies_sent as i64,
        failed = report.replies_failed as i64
    );

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body("OK"))
}

/// Manual send endpoint (GET)
///
/// `phone` defaults to the configured target and `msg` to a fixed text.
///
/// # Returns
/// - 200 with the API payload when the message was accepted
/// - 400 when no phone number can be resolved
/// - 500 when the send failed
#[web::get("/send-test")]
pub async fn send_test(
    query: web::types::Query<SendTestQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let phone = non_empty(query.phone.as_deref()).or(app_state.config.target_phone());
    let Some(phone) = phone else {
        return Err(ApiError::MissingPhone.into());
    };
    let msg = non_empty(query.msg.as_deref()).unwrap_or(consts::TEST_MESSAGE_TEXT);

    let response = match app_state.sender.send_text(phone, msg).await {
        Ok(response) => response,
        Err(_) => return Err(ApiError::SendFailed.into()),
    };

    let data = serde_json::to_value(&response).map_err(|e| {
        logfire::error!("Error in /send-test: {error}", error = e.to_string());
        ApiError::Internal(e.to_string())
    })?;

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "success": true,
        "message": "Message sent successfully.",
        "data": data
    })))
}

/// Collects the request body, failing once it grows past `limit` bytes.
async fn read_payload(payload: &mut web::types::Payload, limit: usize) -> anyhow::Result<Bytes> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.recv().await {
        let chunk = chunk.map_err(|e| anyhow::anyhow!("payload read error: {e}"))?;
        if body.len() + chunk.len() > limit {
            anyhow::bail!("payload exceeds {limit} bytes");
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

fn parse_envelope(body: &[u8]) -> schemas::WebhookEnvelope {
    tracing::debug!(payload = %String::from_utf8_lossy(body), "webhook received");

    serde_json::from_slice(body).unwrap_or_else(|e| {
        logfire::warn!(
            "Failed to parse webhook payload: {error}",
            error = e.to_string()
        );
        schemas::WebhookEnvelope::default()
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
