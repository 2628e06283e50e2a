//! Error types for CloudWatch Logs operations.
//!
//! Every façade call fails with exactly one of four kinds: a local
//! validation failure (no request was sent), a transport failure surfaced
//! unchanged from the HTTP layer, a decode failure (the body did not match
//! the expected shape), or a service failure (a non-2xx status carrying an
//! AWS fault document).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type for all CloudWatch Logs operations.
#[derive(Debug, Error)]
pub enum CloudWatchLogsError {
    /// A precondition on the request failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A 2xx body did not decode into the expected result shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The service rejected the request.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The action exists on the wire but has no client binding yet.
    #[error("{action} is not implemented by this client")]
    NotImplemented { action: &'static str },
}

impl CloudWatchLogsError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// The service failure, if this is one.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status of a service failure.
    pub fn status_code(&self) -> Option<u16> {
        self.as_service().map(|e| e.status_code)
    }
}

/// A violated request precondition.
///
/// The `Display` output of each variant is a fixed message; callers may
/// match on either the variant or the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("No LogGroupName supplied")]
    MissingLogGroupName,
    #[error("No LogStreamName supplied")]
    MissingLogStreamName,
    #[error("No FilterName supplied")]
    MissingFilterName,
    #[error("No FilterPattern supplied")]
    MissingFilterPattern,
    #[error("No MetricTransformations supplied")]
    MissingMetricTransformations,
    #[error("RetentionInDays is not a valid value")]
    InvalidRetentionInDays,
}

/// Failure raised by a [`QueryTransport`](crate::transport::QueryTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether the HTTP layer considers the failure transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// The response body did not match the expected XML shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed XML: {0}")]
    Malformed(String),
    #[error("missing required element <{0}>")]
    MissingElement(String),
    #[error("invalid value {value:?} for <{element}>: expected {expected}")]
    InvalidValue {
        element: String,
        value: String,
        expected: &'static str,
    },
}

impl From<quick_xml::Error> for DecodeError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// A fault returned by CloudWatch Logs for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    /// The HTTP status code of the response.
    pub status_code: u16,
    /// The AWS error code (e.g., "ResourceNotFoundException").
    pub code: String,
    /// "Sender" or "Receiver", when the fault states it.
    pub fault_type: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// AWS request ID for tracing.
    pub request_id: Option<String>,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CloudWatch Logs error [{}]: {} (HTTP {})",
            self.code, self.message, self.status_code
        )?;
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    pub fn new(status_code: u16, code: &str, message: &str) -> Self {
        Self {
            status_code,
            code: code.to_string(),
            fault_type: None,
            message: message.to_string(),
            request_id: None,
        }
    }

    /// With request ID.
    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Determine if the fault is retryable per the AWS SDK retry policy.
    pub fn is_retryable(&self) -> bool {
        if matches!(self.status_code, 429 | 500 | 502 | 503 | 504) {
            return true;
        }
        matches!(
            self.code.as_str(),
            "Throttling"
                | "ThrottlingException"
                | "RequestLimitExceeded"
                | "LimitExceededException"
                | "ServiceUnavailable"
                | "ServiceUnavailableException"
                | "OperationAbortedException"
                | "InternalFailure"
                | "RequestTimeout"
                | "RequestTimeoutException"
        )
    }
}

/// Convenience result type for CloudWatch Logs operations.
pub type CloudWatchLogsResult<T> = Result<T, CloudWatchLogsError>;
