//! Fault classification for failed backend calls.
//!
//! Every failure a cache operation can surface is one of three kinds, a
//! plain sum type rather than an exception hierarchy. Classification happens
//! in exactly one place so no operation can leak an unclassified error.

use machina_protocol::{FaultKind, FaultSchema};
use thiserror::Error;

/// Result type for all client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classified failure of a backend call.
///
/// `status` is the HTTP status the transport reported, preserved verbatim.
/// A status of `0` marks failures that never reached the server (payload
/// encoding, response decoding).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Unclassified or server-side fault.
    #[error("service fault ({status}): {msg}")]
    Service { status: u16, msg: String },

    /// The requested `uid` does not exist server-side.
    #[error("entity not found ({status}): {msg}")]
    NotFound { status: u16, msg: String },

    /// The request was rejected by server-side business rules.
    #[error("entity invariant violated ({status}): {msg}")]
    InvariantViolation { status: u16, msg: String },
}

impl ApiError {
    /// HTTP status carried by the fault.
    pub fn status(&self) -> u16 {
        match self {
            Self::Service { status, .. }
            | Self::NotFound { status, .. }
            | Self::InvariantViolation { status, .. } => *status,
        }
    }

    /// Human-readable message carried by the fault.
    pub fn msg(&self) -> &str {
        match self {
            Self::Service { msg, .. }
            | Self::NotFound { msg, .. }
            | Self::InvariantViolation { msg, .. } => msg,
        }
    }

    /// Classify a non-2xx response from its status and raw body.
    ///
    /// A fault body with a recognized discriminator decides the kind; any
    /// other body defaults to [`ApiError::Service`] with the transport
    /// status and message preserved.
    pub fn classify(status: u16, body: &str) -> Self {
        match serde_json::from_str::<FaultSchema>(body) {
            Ok(fault) => Self::from_fault(status, fault),
            Err(_) => Self::Service {
                status,
                msg: body.trim().to_owned(),
            },
        }
    }

    /// Classify a decoded fault body, falling back to the transport status
    /// when the body does not carry one.
    pub fn from_fault(transport_status: u16, fault: FaultSchema) -> Self {
        let status = if fault.status != 0 {
            fault.status
        } else {
            transport_status
        };
        match fault.kind {
            FaultKind::NotFound => Self::NotFound {
                status,
                msg: fault.msg,
            },
            FaultKind::InvariantViolation => Self::InvariantViolation {
                status,
                msg: fault.msg,
            },
            FaultKind::Generic => Self::Service {
                status,
                msg: fault.msg,
            },
        }
    }

    /// A transport-level failure that produced no response body.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let status = err.status().map_or(502, |s| s.as_u16());
        Self::Service {
            status,
            msg: err.to_string(),
        }
    }

    /// A successful response whose body did not match the expected shape.
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Service {
            status: 0,
            msg: format!("unexpected response shape: {err}"),
        }
    }

    /// A request payload that could not be serialized.
    pub(crate) fn encode(err: serde_json::Error) -> Self {
        Self::Service {
            status: 0,
            msg: format!("unencodable request payload: {err}"),
        }
    }
}
