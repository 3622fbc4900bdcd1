use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::applicant::Applicant;
use super::attribute::Attribute;
use super::error::VendorError;
use super::response::RawVerdict;
use super::state_id::{StateIdSubmission, StateIdType};
use super::vendor::{VendorBackend, VendorId};

/// Identity on file with the mock vendor for one document number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceIdentity {
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub jurisdiction: String,
    pub id_type: StateIdType,
}

#[derive(Debug, Clone)]
enum MockRecord {
    Identity(Box<ReferenceIdentity>),
    Fault(String),
}

/// In-memory vendor that verifies against a fixed reference table.
///
/// Faults are scripted per document number or for the whole backend and surface as
/// [`VendorError`]s carrying the scripted text.
#[derive(Debug, Default)]
pub struct MockBackend {
    records: HashMap<String, MockRecord>,
    outage: Option<String>,
    calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, document_number: &str, identity: ReferenceIdentity) -> Self {
        self.records.insert(
            normalize(document_number),
            MockRecord::Identity(Box::new(identity)),
        );
        self
    }

    pub fn with_fault(mut self, document_number: &str, message: impl Into<String>) -> Self {
        self.records
            .insert(normalize(document_number), MockRecord::Fault(message.into()));
        self
    }

    /// Fail every check, as if the vendor were unreachable.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            outage: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of checks attempted against this backend.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl VendorBackend for MockBackend {
    fn vendor(&self) -> VendorId {
        VendorId::Mock
    }

    async fn check(
        &self,
        applicant: &Applicant,
        submission: &StateIdSubmission,
    ) -> Result<RawVerdict, VendorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = &self.outage {
            return Err(VendorError::new(VendorId::Mock, message.clone()));
        }

        let identity = match self.records.get(&normalize(submission.number())) {
            Some(MockRecord::Identity(identity)) => identity,
            Some(MockRecord::Fault(message)) => {
                return Err(VendorError::new(VendorId::Mock, message.clone()));
            }
            None => {
                debug!(uuid = %applicant.uuid(), "mock vendor has no record for document");
                let mut verdict = RawVerdict::new();
                verdict.record_attribute(
                    Attribute::DocumentNumber,
                    false,
                    "no record found for document number",
                );
                return Ok(verdict);
            }
        };

        Ok(compare(identity, applicant, submission))
    }
}

fn compare(
    identity: &ReferenceIdentity,
    applicant: &Applicant,
    submission: &StateIdSubmission,
) -> RawVerdict {
    let mut verdict = RawVerdict::new();
    let mut field = |attribute: Attribute, expected: &str, actual: &str| {
        let matched = normalize(expected) == normalize(actual);
        let reason = format!("{attribute} does not match vendor record");
        verdict.record_attribute(attribute, matched, &reason);
    };

    field(Attribute::FirstName, identity.first_name.as_str(), applicant.first_name());
    field(Attribute::LastName, identity.last_name.as_str(), applicant.last_name());
    field(
        Attribute::Address1,
        identity.address1.as_str(),
        applicant.address1(),
    );
    field(
        Attribute::Address2,
        identity.address2.as_deref().unwrap_or_default(),
        applicant.address2().unwrap_or_default(),
    );
    field(Attribute::City, identity.city.as_str(), applicant.city());
    field(Attribute::State, identity.state.as_str(), applicant.state());
    field(Attribute::Zipcode, identity.zipcode.as_str(), applicant.zipcode());
    field(
        Attribute::Jurisdiction,
        identity.jurisdiction.as_str(),
        submission.jurisdiction(),
    );

    verdict.record_attribute(
        Attribute::Dob,
        identity.dob == applicant.dob(),
        "dob does not match vendor record",
    );
    verdict.record_attribute(Attribute::DocumentNumber, true, "");

    let id_type = submission.id_type();
    if id_type.is_recognized() {
        verdict.record_attribute(
            Attribute::Category,
            *id_type == identity.id_type,
            "category does not match vendor record",
        );
    } else {
        verdict.record_attribute(Attribute::Category, false, &id_type.to_string());
    }

    verdict
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proofing::applicant::ApplicantInput;

    fn identity() -> ReferenceIdentity {
        ReferenceIdentity {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
            address1: "123 Main St".to_string(),
            address2: None,
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zipcode: "22201".to_string(),
            jurisdiction: "VA".to_string(),
            id_type: StateIdType::DriversLicense,
        }
    }

    fn applicant(first_name: &str) -> Applicant {
        Applicant::new(ApplicantInput {
            uuid: None,
            first_name: first_name.to_string(),
            last_name: "DOE".to_string(),
            dob: "19900101".to_string(),
            address1: "123  Main St".to_string(),
            address2: None,
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zipcode: "22201".to_string(),
        })
        .expect("valid applicant")
    }

    fn mismatches(verdict: &RawVerdict) -> Vec<&str> {
        verdict
            .iter()
            .filter(|(_, attribute)| !attribute.matched)
            .map(|(key, _)| key)
            .collect()
    }

    #[tokio::test]
    async fn matching_identity_verifies_every_attribute() {
        let backend = MockBackend::new().with_identity("D123", identity());
        let submission = StateIdSubmission::new("d123", "VA", StateIdType::DriversLicense)
            .expect("valid submission");

        let verdict = backend
            .check(&applicant("jane"), &submission)
            .await
            .expect("check completes");

        assert_eq!(verdict.iter().count(), Attribute::ALL.len());
        assert!(mismatches(&verdict).is_empty());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn reports_each_mismatched_field() {
        let backend = MockBackend::new().with_identity("D123", identity());
        let submission = StateIdSubmission::new("D123", "MD", StateIdType::DriversPermit)
            .expect("valid submission");

        let verdict = backend
            .check(&applicant("Janet"), &submission)
            .await
            .expect("check completes");

        assert_eq!(
            mismatches(&verdict),
            vec!["category", "first_name", "jurisdiction"]
        );
    }

    #[tokio::test]
    async fn unrecognized_category_is_never_matched() {
        let backend = MockBackend::new().with_identity("D123", identity());
        let submission =
            StateIdSubmission::new("D123", "VA", StateIdType::from_category_code("9"))
                .expect("valid submission");

        let verdict = backend
            .check(&applicant("Jane"), &submission)
            .await
            .expect("check completes");

        let (_, category) = verdict
            .iter()
            .find(|(key, _)| *key == "category")
            .expect("category checked");
        assert!(!category.matched);
        assert_eq!(
            category.reason.as_deref(),
            Some("unrecognized category '9'")
        );
    }

    #[tokio::test]
    async fn unknown_document_flags_document_number_only() {
        let backend = MockBackend::new();
        let submission = StateIdSubmission::new("X999", "VA", StateIdType::StateIdCard)
            .expect("valid submission");

        let verdict = backend
            .check(&applicant("Jane"), &submission)
            .await
            .expect("check completes");

        assert_eq!(mismatches(&verdict), vec!["document_number"]);
        assert_eq!(verdict.iter().count(), 1);
    }

    #[tokio::test]
    async fn scripted_faults_raise_vendor_errors() {
        let submission = StateIdSubmission::new("F500", "VA", StateIdType::DriversLicense)
            .expect("valid submission");

        let backend = MockBackend::new().with_fault("F500", "ExceptionId: 0047, DLDV timeout");
        let error = backend
            .check(&applicant("Jane"), &submission)
            .await
            .expect_err("fault");
        assert_eq!(error.message(), "ExceptionId: 0047, DLDV timeout");

        let backend = MockBackend::unreachable("connection refused");
        let error = backend
            .check(&applicant("Jane"), &submission)
            .await
            .expect_err("outage");
        assert_eq!(error.message(), "connection refused");
        assert_eq!(backend.calls(), 1);
    }
}
