use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

pub(crate) const DEFAULT_MISMATCH_REASON: &str = "did not match vendor record";

/// Vendor-reported outcome for a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeVerdict {
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AttributeVerdict {
    pub fn matched() -> Self {
        Self {
            matched: true,
            reason: None,
        }
    }

    pub fn mismatched(reason: impl Into<String>) -> Self {
        Self {
            matched: false,
            reason: Some(reason.into()),
        }
    }
}

/// Unnormalized per-attribute result of a completed vendor check.
///
/// Keys are the vendor's attribute names; the agent maps them onto [`Attribute`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerdict {
    attributes: BTreeMap<String, AttributeVerdict>,
}

impl RawVerdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, verdict: AttributeVerdict) {
        self.attributes.insert(key.into(), verdict);
    }

    pub fn with(mut self, key: impl Into<String>, verdict: AttributeVerdict) -> Self {
        self.record(key, verdict);
        self
    }

    /// Convenience for backends that already speak in [`Attribute`] terms.
    pub fn record_attribute(&mut self, attribute: Attribute, matched: bool, reason: &str) {
        let verdict = if matched {
            AttributeVerdict::matched()
        } else {
            AttributeVerdict::mismatched(reason)
        };
        self.record(attribute.as_str(), verdict);
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeVerdict)> {
        self.attributes.iter().map(|(key, verdict)| (key.as_str(), verdict))
    }
}

/// Why a single attribute failed to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchReason {
    pub reason: String,
}

impl MismatchReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<Option<String>> for MismatchReason {
    fn from(value: Option<String>) -> Self {
        let reason = value
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| DEFAULT_MISMATCH_REASON.to_string());
        Self { reason }
    }
}

/// Normalized outcome of a completed verification.
///
/// `success` is derived from the error map at construction, so it is true exactly when no
/// attribute failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResponse {
    success: bool,
    errors: BTreeMap<Attribute, MismatchReason>,
}

impl VerificationResponse {
    pub fn verified() -> Self {
        Self::from_errors(BTreeMap::new())
    }

    pub fn from_errors(errors: BTreeMap<Attribute, MismatchReason>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &BTreeMap<Attribute, MismatchReason> {
        &self.errors
    }

    pub fn unverified_attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.errors.keys().copied()
    }
}
