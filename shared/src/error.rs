use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::transport::TransportError;

/// Semantic error codes surfaced by the achievement repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Timeout,
    NetworkError,
    Cancelled,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    HttpError,
}

impl ApiErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorKind::Timeout => "TIMEOUT",
            ApiErrorKind::NetworkError => "NETWORK_ERROR",
            ApiErrorKind::Cancelled => "CANCELLED",
            ApiErrorKind::BadRequest => "BAD_REQUEST",
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Forbidden => "FORBIDDEN",
            ApiErrorKind::NotFound => "NOT_FOUND",
            ApiErrorKind::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ApiErrorKind::TooManyRequests => "TOO_MANY_REQUESTS",
            ApiErrorKind::InternalServerError => "INTERNAL_SERVER_ERROR",
            ApiErrorKind::BadGateway => "BAD_GATEWAY",
            ApiErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ApiErrorKind::HttpError => "HTTP_ERROR",
        }
    }

    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            422 => ApiErrorKind::UnprocessableEntity,
            429 => ApiErrorKind::TooManyRequests,
            500 => ApiErrorKind::InternalServerError,
            502 => ApiErrorKind::BadGateway,
            503 => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::HttpError,
        }
    }

    /// True for failures where no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::Timeout | ApiErrorKind::NetworkError | ApiErrorKind::Cancelled
        )
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

fn status_message(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Resource not found".to_string(),
        422 => "Unprocessable entity".to_string(),
        429 => "Too many requests, please try again later".to_string(),
        500 => "Server error, please try again".to_string(),
        502 => "Bad gateway, please try again".to_string(),
        503 => "Service unavailable".to_string(),
        _ => format!("HTTP error {}", status),
    }
}

/// A failed backend call, normalized for display and diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub method: Option<String>,
    pub url: Option<String>,
    pub details: Option<Value>,
}

impl ApiError {
    fn bare(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            method: None,
            url: None,
            details: None,
        }
    }

    pub fn timeout() -> Self {
        Self::bare(ApiErrorKind::Timeout, "Request timed out, please try again")
    }

    pub fn network() -> Self {
        Self::bare(
            ApiErrorKind::NetworkError,
            "Network error or server not responding",
        )
    }

    pub fn cancelled() -> Self {
        Self::bare(ApiErrorKind::Cancelled, "Request was canceled")
    }

    /// Error for a non-2xx response. A JSON body is kept as structured
    /// details, any other non-empty body as a string.
    pub fn from_status(status: u16, method: &str, url: &str, body: &str) -> Self {
        let details = if body.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
        };

        Self {
            kind: ApiErrorKind::from_status(status),
            message: status_message(status),
            status: Some(status),
            method: Some(method.to_string()),
            url: Some(url.to_string()),
            details,
        }
    }

    /// A 2xx response whose body is not what was expected.
    pub fn unexpected_body(status: u16, method: &str, url: &str, reason: &str) -> Self {
        Self {
            kind: ApiErrorKind::HttpError,
            message: "Unexpected response from server".to_string(),
            status: Some(status),
            method: Some(method.to_string()),
            url: Some(url.to_string()),
            details: Some(Value::String(reason.to_string())),
        }
    }

    pub fn with_request(mut self, method: &str, url: &str) -> Self {
        self.method = Some(method.to_string());
        self.url = Some(url.to_string());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => ApiError::timeout(),
            TransportError::Cancelled => ApiError::cancelled(),
            TransportError::Network(reason) => {
                let mut api_error = ApiError::network();
                api_error.details = Some(Value::String(reason));
                api_error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_map_to_kinds() {
        let cases = [
            (400, "BAD_REQUEST"),
            (401, "UNAUTHORIZED"),
            (403, "FORBIDDEN"),
            (404, "NOT_FOUND"),
            (422, "UNPROCESSABLE_ENTITY"),
            (429, "TOO_MANY_REQUESTS"),
            (500, "INTERNAL_SERVER_ERROR"),
            (502, "BAD_GATEWAY"),
            (503, "SERVICE_UNAVAILABLE"),
            (418, "HTTP_ERROR"),
        ];
        for (status, code) in cases {
            assert_eq!(ApiErrorKind::from_status(status).code(), code);
        }
    }

    #[test]
    fn test_from_status_keeps_diagnostics() {
        let error = ApiError::from_status(
            404,
            "GET",
            "/api/achievements/x",
            r#"{"error":"not_found","message":"Achievement not found"}"#,
        );
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Resource not found");
        assert_eq!(error.status, Some(404));
        assert_eq!(error.method.as_deref(), Some("GET"));
        assert_eq!(error.details.unwrap()["error"], "not_found");
    }

    #[test]
    fn test_unmapped_status_message() {
        let error = ApiError::from_status(418, "GET", "/", "");
        assert_eq!(error.message, "HTTP error 418");
        assert!(error.details.is_none());
    }

    #[test]
    fn test_transport_errors() {
        assert_eq!(ApiError::from(TransportError::Timeout).kind, ApiErrorKind::Timeout);
        assert_eq!(ApiError::from(TransportError::Cancelled).kind, ApiErrorKind::Cancelled);
        let network = ApiError::from(TransportError::Network("refused".to_string()));
        assert_eq!(network.code(), "NETWORK_ERROR");
        assert!(network.kind.is_transport());
        assert!(!ApiErrorKind::NotFound.is_transport());
    }
}
