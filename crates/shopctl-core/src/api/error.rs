use std::fmt;

use serde_json::Value;

/// Categories of API errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection-level failure (DNS, refused, TLS, ...)
    Transport,
    /// Request exceeded the client-side timeout
    Timeout,
    /// Non-401 HTTP status error (4xx, 5xx)
    Status,
    /// HTTP 401 — the session has been purged by the client
    Unauthorized,
    /// Failed to parse a response body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the backend API with kind and details.
///
/// `message` is what callers show to the user. When the backend body carried
/// a `message` or `error` field it is surfaced verbatim; otherwise callers
/// substitute an operation-specific fallback via [`ApiError::or_generic`].
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
    /// True when `message` was extracted from the backend's error body
    from_backend: bool,
}

impl ApiError {
    /// Creates a new API error with a client-generated message.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            from_backend: false,
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Creates an HTTP status error, extracting the backend message verbatim
    /// when the body carries a `message` or `error` string field.
    ///
    /// A 401 becomes [`ApiErrorKind::Unauthorized`]; every other status maps
    /// to [`ApiErrorKind::Status`].
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Status
        };

        if let Some(msg) = extract_backend_message(body) {
            return Self {
                kind,
                message: msg,
                details: Some(body.to_string()),
                from_backend: true,
            };
        }

        Self {
            kind,
            message: format!("HTTP {status}"),
            details: (!body.is_empty()).then(|| body.to_string()),
            from_backend: false,
        }
    }

    /// Creates an error that carries a backend-reported message verbatim.
    pub fn backend_message(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Status,
            message: message.into(),
            details: None,
            from_backend: true,
        }
    }

    /// Replaces the message with an operation-specific fallback unless the
    /// current message came verbatim from the backend.
    pub fn or_generic(mut self, fallback: &str) -> Self {
        if !self.from_backend {
            self.message = fallback.to_string();
        }
        self
    }

    /// Returns true if this error is a 401 session termination.
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

/// Pulls a displayable message out of a JSON error body.
///
/// The backend is inconsistent: some endpoints report `{message: ...}`,
/// others `{error: ...}`. Both are surfaced verbatim.
fn extract_backend_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = json.get(key).and_then(|v| v.as_str())
            && !msg.is_empty()
        {
            return Some(msg.to_string());
        }
    }
    None
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: backend `error` field is surfaced verbatim.
    #[test]
    fn test_http_status_extracts_error_field() {
        let err = ApiError::http_status(400, r#"{"error":"Invalid credentials"}"#);
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.kind, ApiErrorKind::Status);
        assert_eq!(err.or_generic("Login failed").message, "Invalid credentials");
    }

    /// Test: backend `message` field wins over the generic fallback.
    #[test]
    fn test_http_status_extracts_message_field() {
        let err = ApiError::http_status(422, r#"{"success":false,"message":"Email taken"}"#);
        assert_eq!(err.or_generic("Registration failed").message, "Email taken");
    }

    /// Test: unextractable bodies fall back to the operation message.
    #[test]
    fn test_or_generic_replaces_transport_message() {
        let err = ApiError::http_status(500, "<html>oops</html>");
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.or_generic("Login failed").message, "Login failed");

        let err = ApiError::timeout("request timed out");
        assert_eq!(err.or_generic("Login failed").message, "Login failed");
    }

    /// Test: 401 maps to the unauthorized kind, message still verbatim.
    #[test]
    fn test_unauthorized_kind() {
        let err = ApiError::http_status(401, r#"{"error":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Invalid credentials");

        let bare = ApiError::http_status(401, "");
        assert!(bare.is_unauthorized());
        assert_eq!(bare.message, "HTTP 401");
    }
}
