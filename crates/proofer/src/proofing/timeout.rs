use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::applicant::Applicant;
use super::error::VendorError;
use super::response::RawVerdict;
use super::state_id::StateIdSubmission;
use super::vendor::{VendorBackend, VendorId};
use crate::config::VendorConfig;

/// Bounds a backend's check with a deadline; an elapsed deadline is a [`VendorError`].
#[derive(Debug)]
pub struct TimeoutBackend<B> {
    inner: B,
    limit: Duration,
}

impl<B> TimeoutBackend<B>
where
    B: VendorBackend,
{
    pub fn new(inner: B, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn from_config(inner: B, config: &VendorConfig) -> Self {
        Self::new(inner, config.timeout)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B> VendorBackend for TimeoutBackend<B>
where
    B: VendorBackend,
{
    fn vendor(&self) -> VendorId {
        self.inner.vendor()
    }

    async fn check(
        &self,
        applicant: &Applicant,
        submission: &StateIdSubmission,
    ) -> Result<RawVerdict, VendorError> {
        match tokio::time::timeout(self.limit, self.inner.check(applicant, submission)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    uuid = %applicant.uuid(),
                    vendor = %self.inner.vendor(),
                    limit = ?self.limit,
                    "vendor check timed out"
                );
                Err(VendorError::timed_out(self.inner.vendor(), self.limit))
            }
        }
    }
}
