use derive_more::{Display, Error};
use ntex::{http, web};

#[derive(Debug, Display, Error)]
pub enum ApiError {
    VerificationFailed,
    MissingPhone,
    SendFailed,
    /// Failure after the message was accepted, e.g. building the response payload
    Internal(#[error(not(source))] String),
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::error!("Request failed: {error}", error = format!("{:?}", self));

        match self {
            ApiError::VerificationFailed => web::HttpResponse::build(self.status_code())
                .content_type("text/plain; charset=utf-8")
                .body("Invalid verification token."),
            ApiError::MissingPhone => {
                web::HttpResponse::build(self.status_code()).json(&serde_json::json!({
                    "error": "Query parameter \"phone\" is required."
                }))
            }
            ApiError::SendFailed => {
                web::HttpResponse::build(self.status_code()).json(&serde_json::json!({
                    "success": false,
                    "message": "Failed to send the message."
                }))
            }
            ApiError::Internal(msg) => {
                web::HttpResponse::build(self.status_code()).json(&serde_json::json!({
                    "success": false,
                    "message": "Internal error while sending the message.",
                    "error": msg
                }))
            }
        }
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ApiError::VerificationFailed => http::StatusCode::FORBIDDEN,
            ApiError::MissingPhone => http::StatusCode::BAD_REQUEST,
            ApiError::SendFailed | ApiError::Internal(_) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
