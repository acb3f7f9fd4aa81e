//! Error types for graphport operations.
//!
//! Every failure coming back from the hosted graph carries enough structure
//! (HTTP status, body, response length) for callers to decide between
//! retrying, counting the failure, or ignoring it.

use thiserror::Error;

/// Result type alias for graphport operations.
pub type ZepResult<T> = Result<T, ZepError>;

/// HTTP statuses that indicate a transient condition on the remote side.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Error text left behind by the upstream proxy when it answers with an empty
/// 34-byte body instead of forwarding the real response.
pub const PROXY_EMPTY_BODY_MARKER: &str = "content-length': '34'";

/// Length of the proxy's empty-body response.
const PROXY_EMPTY_BODY_LENGTH: u64 = 34;

/// Main error type for all graphport operations.
#[derive(Error, Debug)]
pub enum ZepError {
    /// The remote service answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api {
        status: u16,
        body: String,
        code: ErrorCode,
        /// Value of the response `content-length` header, if any.
        content_length: Option<u64>,
    },

    /// The request never produced a response.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A response body could not be decoded.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// A transient failure persisted through every allowed attempt.
    #[error("Failed after {attempts} retries: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ZepError>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (AUTH_xxx)
    AuthInvalidKey,

    // Validation (VAL_xxx)
    ValInvalidInput,

    // User (USR_xxx)
    UserNotFound,
    UserAlreadyExists,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Remote service (API_xxx)
    ApiServerError,
    ApiRequestFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::UserNotFound => "USR_001",
            ErrorCode::UserAlreadyExists => "USR_002",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::ApiServerError => "API_001",
            ErrorCode::ApiRequestFailed => "API_002",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl ZepError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Convert from an HTTP status and response body.
    pub fn from_http_status(status: u16, body: impl Into<String>, content_length: Option<u64>) -> Self {
        let body = body.into();
        let code = match status {
            400 if mentions_existing(&body) => ErrorCode::UserAlreadyExists,
            400 | 422 => ErrorCode::ValInvalidInput,
            401 | 403 => ErrorCode::AuthInvalidKey,
            404 => ErrorCode::UserNotFound,
            409 => ErrorCode::UserAlreadyExists,
            429 => ErrorCode::RateLimitExceeded,
            500..=599 => ErrorCode::ApiServerError,
            _ => ErrorCode::ApiRequestFailed,
        };
        Self::Api {
            status,
            body,
            code,
            content_length,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::RetriesExhausted { last, .. } => last.code(),
            _ => ErrorCode::Internal,
        }
    }

    /// HTTP status of the failed call, when the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of the failed call, when there was one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the same call may succeed if repeated after a pause.
    pub fn is_retryable(&self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        match self.status() {
            Some(status) if RETRYABLE_STATUSES.contains(&status) => true,
            _ => self.is_proxy_empty_body(),
        }
    }

    /// Recognizes the upstream proxy's empty 34-byte response.
    ///
    /// This is a heuristic: the proxy gives no status we can trust, so the
    /// response length and the marker text are the only signal available.
    pub fn is_proxy_empty_body(&self) -> bool {
        if let Self::Api {
            content_length: Some(PROXY_EMPTY_BODY_LENGTH),
            ..
        } = self
        {
            return true;
        }
        self.to_string().contains(PROXY_EMPTY_BODY_MARKER)
    }

    /// The user being created is already present.
    pub fn is_already_exists(&self) -> bool {
        self.code() == ErrorCode::UserAlreadyExists && !self.is_exhausted()
    }

    /// The addressed user or resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether this error ended a retry loop.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        if let Self::Configuration(message) = self {
            return message
                .contains("ZEP_API_KEY")
                .then_some("Set ZEP_API_KEY in the environment or .env");
        }
        match self.code() {
            ErrorCode::AuthInvalidKey => Some("Please check ZEP_API_KEY"),
            ErrorCode::RateLimitExceeded => Some("Increase --delay or resume later"),
            _ => None,
        }
    }
}

fn mentions_existing(body: &str) -> bool {
    body.to_ascii_lowercase().contains("already exists")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status in RETRYABLE_STATUSES {
            let err = ZepError::from_http_status(status, "busy", None);
            assert!(err.is_retryable(), "status {} should retry", status);
        }
    }

    #[test]
    fn test_client_errors_are_permanent() {
        for status in [400, 401, 403, 404, 409, 422] {
            let err = ZepError::from_http_status(status, "nope", Some(4));
            assert!(!err.is_retryable(), "status {} should not retry", status);
        }
    }

    #[test]
    fn test_proxy_empty_body_by_length() {
        let err = ZepError::from_http_status(400, "", Some(34));
        assert!(err.is_proxy_empty_body());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_proxy_empty_body_by_marker() {
        let err = ZepError::network("headers: {'content-length': '34', 'server': 'envoy'}");
        assert!(err.status().is_none());
        assert!(err.is_retryable());

        let other = ZepError::network("connection reset");
        assert!(!other.is_retryable());
    }

    #[test]
    fn test_already_exists_detection() {
        assert!(ZepError::from_http_status(409, "conflict", None).is_already_exists());
        assert!(ZepError::from_http_status(400, "User already exists", None).is_already_exists());
        assert!(!ZepError::from_http_status(400, "bad request", None).is_already_exists());
        assert!(!ZepError::from_http_status(401, "unauthorized", None).is_already_exists());
    }

    #[test]
    fn test_exhausted_wraps_last_error() {
        let err = ZepError::RetriesExhausted {
            attempts: 5,
            last: Box::new(ZepError::from_http_status(503, "unavailable", None)),
        };
        assert!(err.is_exhausted());
        assert!(!err.is_retryable());
        assert_eq!(err.code(), ErrorCode::ApiServerError);
        assert!(err.to_string().starts_with("Failed after 5 retries"));
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(
            ZepError::configuration("ZEP_API_KEY required").suggestion(),
            Some("Set ZEP_API_KEY in the environment or .env")
        );
        assert!(ZepError::configuration("invalid base URL").suggestion().is_none());
        assert_eq!(
            ZepError::from_http_status(401, "unauthorized", None).suggestion(),
            Some("Please check ZEP_API_KEY")
        );
        let exhausted = ZepError::RetriesExhausted {
            attempts: 5,
            last: Box::new(ZepError::from_http_status(429, "slow down", None)),
        };
        assert_eq!(exhausted.suggestion(), Some("Increase --delay or resume later"));
        assert!(ZepError::from_http_status(400, "bad", None).suggestion().is_none());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AuthInvalidKey.as_str(), "AUTH_001");
        assert_eq!(ErrorCode::UserAlreadyExists.as_str(), "USR_002");
        assert_eq!(
            ZepError::from_http_status(429, "slow down", None).code().as_str(),
            "RATE_001"
        );
    }
}
