use std::fmt;
use std::time::Duration;

use super::vendor::VendorId;

/// Fatal setup failures: unknown vendors and invalid request fields. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown vendor '{0}'")]
    UnknownVendor(String),
    #[error("no backend registered for vendor '{0}'")]
    BackendNotRegistered(VendorId),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// The vendor check could not be completed or its reply could not be interpreted.
///
/// The message keeps the vendor's own failure text verbatim so callers can match on it.
#[derive(Debug)]
pub struct VendorError {
    vendor: VendorId,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl VendorError {
    pub fn new(vendor: VendorId, message: impl Into<String>) -> Self {
        Self {
            vendor,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(vendor: VendorId, context: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            vendor,
            message: format!("{context}: {source}"),
            source: Some(Box::new(source)),
        }
    }

    pub fn timed_out(vendor: VendorId, limit: Duration) -> Self {
        Self::new(
            vendor,
            format!("vendor request timed out after {}ms", limit.as_millis()),
        )
    }

    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for VendorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} verification error: {}", self.vendor, self.message)
    }
}

impl std::error::Error for VendorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}
