use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::applicant::Applicant;
use super::attribute::Attribute;
use super::error::{ConfigurationError, VendorError};
use super::response::{MismatchReason, RawVerdict, VerificationResponse};
use super::state_id::StateIdSubmission;
use super::vendor::{VendorBackend, VendorId, VendorRegistry};
use crate::config::VendorConfig;

/// Routes a state-ID check for one applicant to the configured vendor backend and
/// normalizes the verdict.
///
/// The agent keeps no per-request state: repeated submissions with the same inputs and
/// backend behavior produce the same response, and separate agents may run concurrently
/// against a shared registry.
#[derive(Clone)]
pub struct Agent {
    vendor: VendorId,
    backend: Arc<dyn VendorBackend>,
    applicant: Applicant,
}

impl Agent {
    /// Resolve `vendor` by name. Unknown names and unregistered vendors fail here, before
    /// any vendor call is made.
    pub fn new(
        vendor: &str,
        applicant: Applicant,
        registry: &VendorRegistry,
    ) -> Result<Self, ConfigurationError> {
        let vendor = vendor.parse::<VendorId>()?;
        Self::with_vendor(vendor, applicant, registry)
    }

    pub fn with_vendor(
        vendor: VendorId,
        applicant: Applicant,
        registry: &VendorRegistry,
    ) -> Result<Self, ConfigurationError> {
        let backend = registry.resolve(vendor)?;
        Ok(Self {
            vendor,
            backend,
            applicant,
        })
    }

    pub fn from_config(
        config: &VendorConfig,
        applicant: Applicant,
        registry: &VendorRegistry,
    ) -> Result<Self, ConfigurationError> {
        Self::with_vendor(config.vendor, applicant, registry)
    }

    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    pub fn applicant(&self) -> &Applicant {
        &self.applicant
    }

    /// Submit the document details for the bound applicant.
    ///
    /// A [`VendorError`] from the backend is returned unchanged; attribute mismatches are
    /// reported inside the [`VerificationResponse`], never as an error.
    pub async fn submit_state_id(
        &self,
        submission: &StateIdSubmission,
    ) -> Result<VerificationResponse, VendorError> {
        let uuid = self.applicant.uuid();
        info!(%uuid, vendor = %self.vendor, "submitting state id for verification");

        let verdict = match self.backend.check(&self.applicant, submission).await {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(%uuid, vendor = %self.vendor, %error, "vendor could not complete state id check");
                return Err(error);
            }
        };

        let response = normalize(self.vendor, verdict)?;
        info!(
            %uuid,
            vendor = %self.vendor,
            success = response.success(),
            unverified = response.errors().len(),
            "state id verification completed"
        );
        Ok(response)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("vendor", &self.vendor)
            .field("applicant", &self.applicant.uuid())
            .finish()
    }
}

/// Map a raw verdict onto the closed attribute set.
///
/// Keys outside [`Attribute`] are logged and dropped instead of failing the request, so
/// one backend quirk cannot break every caller. A verdict left with no recognized
/// attribute says nothing about the applicant and is treated as a malformed reply.
fn normalize(vendor: VendorId, verdict: RawVerdict) -> Result<VerificationResponse, VendorError> {
    let mut checked = BTreeSet::new();
    let mut errors = BTreeMap::new();

    for (key, attribute_verdict) in verdict.iter() {
        let attribute = match key.parse::<Attribute>() {
            Ok(attribute) => attribute,
            Err(_) => {
                warn!(vendor = %vendor, key, "dropping unknown attribute from vendor verdict");
                continue;
            }
        };

        if !checked.insert(attribute) {
            // A mismatch under either spelling still stands; a match never clears it.
            debug!(vendor = %vendor, key, %attribute, "duplicate attribute in vendor verdict");
        }
        if attribute_verdict.matched {
            continue;
        }

        debug!(vendor = %vendor, %attribute, "attribute did not verify");
        errors
            .entry(attribute)
            .or_insert_with(|| MismatchReason::from(attribute_verdict.reason.clone()));
    }

    if checked.is_empty() {
        return Err(VendorError::new(
            vendor,
            "malformed vendor reply: verdict contained no verifiable attributes",
        ));
    }

    Ok(VerificationResponse::from_errors(errors))
}
