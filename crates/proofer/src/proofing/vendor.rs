use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::applicant::Applicant;
use super::error::{ConfigurationError, VendorError};
use super::response::RawVerdict;
use super::state_id::StateIdSubmission;

/// Vendors an agent can be configured to dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorId {
    Aamva,
    Mock,
}

impl VendorId {
    pub const fn label(self) -> &'static str {
        match self {
            VendorId::Aamva => "aamva",
            VendorId::Mock => "mock",
        }
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VendorId {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "aamva" => Ok(VendorId::Aamva),
            "mock" => Ok(VendorId::Mock),
            _ => Err(ConfigurationError::UnknownVendor(value.to_string())),
        }
    }
}

/// Performs the state-ID check against one vendor.
///
/// Implementations return a [`RawVerdict`] for every *completed* check, including ones
/// where attributes failed to match. A [`VendorError`] is reserved for checks that could
/// not be completed or interpreted (transport failure, malformed reply, authentication,
/// unexpected status, timeout); a backend must never guess a partial verdict instead.
#[async_trait]
pub trait VendorBackend: Send + Sync {
    fn vendor(&self) -> VendorId;

    async fn check(
        &self,
        applicant: &Applicant,
        submission: &StateIdSubmission,
    ) -> Result<RawVerdict, VendorError>;
}

/// Lookup table from vendor identifier to a shared backend instance.
#[derive(Clone, Default)]
pub struct VendorRegistry {
    backends: HashMap<VendorId, Arc<dyn VendorBackend>>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under the vendor it reports, replacing any previous entry.
    pub fn register(&mut self, backend: Arc<dyn VendorBackend>) {
        self.backends.insert(backend.vendor(), backend);
    }

    pub fn with_backend(mut self, backend: Arc<dyn VendorBackend>) -> Self {
        self.register(backend);
        self
    }

    pub fn resolve(&self, vendor: VendorId) -> Result<Arc<dyn VendorBackend>, ConfigurationError> {
        self.backends
            .get(&vendor)
            .cloned()
            .ok_or(ConfigurationError::BackendNotRegistered(vendor))
    }

    pub fn vendors(&self) -> Vec<VendorId> {
        let mut vendors: Vec<_> = self.backends.keys().copied().collect();
        vendors.sort_by_key(|vendor| vendor.label());
        vendors
    }
}

impl fmt::Debug for VendorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorRegistry")
            .field("vendors", &self.vendors())
            .finish()
    }
}
