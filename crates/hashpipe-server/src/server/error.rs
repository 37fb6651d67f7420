//! HTTP error responses.
//!
//! [`ApiError`] wraps every failure a handler can return and converts it to a
//! response with an appropriate status code and a plain-text message.
//!
//! ## Status mapping
//! - `InvalidLength` / malformed id / unreadable form: `400 Bad Request`
//! - `NotFound`: `404 Not Found`
//! - `AdmissionRejected`: `429 Too Many Requests`
//! - `ShuttingDown`: `503 Service Unavailable`
//! - anything else: `500 Internal Server Error`

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error reported by the pipeline.
    #[error(transparent)]
    Pipeline(#[from] hashpipe::Error),

    /// The path id is not an unsigned 64-bit integer.
    #[error("Invalid id {id:?}: {reason}")]
    InvalidId { id: String, reason: String },

    /// The request body is not a readable form.
    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId { .. } | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::Pipeline(err) => match err {
                hashpipe::Error::InvalidLength { .. } => StatusCode::BAD_REQUEST,
                hashpipe::Error::NotFound { .. } => StatusCode::NOT_FOUND,
                hashpipe::Error::AdmissionRejected => StatusCode::TOO_MANY_REQUESTS,
                hashpipe::Error::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {self}");
        }
        (status, self.to_string()).into_response()
    }
}
