//! Fixture-driven conformance harness.
//!
//! Replays a table of applicant/document rows against an [`Agent`] and checks that each
//! row lands in the expected class: verified, unverified with a given attribute set, or a
//! vendor error containing a given message.

mod fixture;

pub use fixture::{ExpectedOutcome, FixtureRow};

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::proofing::{
    Agent, Applicant, ConfigurationError, StateIdSubmission, VendorId, VendorRegistry,
};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read conformance fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid conformance CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown result type '{value}'")]
    UnknownResult { row: String, value: String },
    #[error("row {row}: address '{value}' is not street@street2@city@state@zip")]
    MalformedAddress { row: String, value: String },
    #[error("row {row}: {reason}")]
    InvalidRow { row: String, reason: &'static str },
}

pub fn parse_fixture<R: Read>(reader: R) -> Result<Vec<FixtureRow>, FixtureError> {
    fixture::parse_rows(reader)
}

pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<Vec<FixtureRow>, FixtureError> {
    let file = std::fs::File::open(path)?;
    parse_fixture(file)
}

/// What the agent actually produced for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActualOutcome {
    Verified,
    Unverified(BTreeSet<String>),
    Error(String),
    /// The row never reached the vendor because its inputs were rejected.
    Rejected(ConfigurationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowResult {
    pub id: String,
    pub expected: ExpectedOutcome,
    pub actual: ActualOutcome,
}

impl RowResult {
    pub fn passed(&self) -> bool {
        match (&self.expected, &self.actual) {
            (ExpectedOutcome::Verified, ActualOutcome::Verified) => true,
            (ExpectedOutcome::Unverified(expected), ActualOutcome::Unverified(actual)) => {
                expected == actual
            }
            (ExpectedOutcome::Error(needle), ActualOutcome::Error(message)) => {
                message.contains(needle.as_str())
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    pub rows: Vec<RowResult>,
}

impl ConformanceReport {
    pub fn failures(&self) -> Vec<&RowResult> {
        self.rows.iter().filter(|row| !row.passed()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.rows.iter().all(RowResult::passed)
    }
}

/// Runs fixture rows through agents for one vendor.
pub struct ConformanceHarness {
    vendor: VendorId,
    registry: VendorRegistry,
}

impl ConformanceHarness {
    pub fn new(vendor: VendorId, registry: VendorRegistry) -> Self {
        Self { vendor, registry }
    }

    pub async fn replay(&self, rows: &[FixtureRow]) -> ConformanceReport {
        let mut results = Vec::with_capacity(rows.len());

        for row in rows {
            let actual = self.run_row(row).await;
            let result = RowResult {
                id: row.id.clone(),
                expected: row.expected.clone(),
                actual,
            };

            if result.passed() {
                info!(row = %result.id, "conformance row passed");
            } else {
                warn!(row = %result.id, expected = ?result.expected, actual = ?result.actual, "conformance row failed");
            }
            results.push(result);
        }

        ConformanceReport { rows: results }
    }

    async fn run_row(&self, row: &FixtureRow) -> ActualOutcome {
        let prepared = Applicant::new(row.applicant.clone()).and_then(|applicant| {
            let submission = StateIdSubmission::new(
                row.document_number.as_str(),
                row.jurisdiction.as_str(),
                row.id_type.clone(),
            )?;
            let agent = Agent::with_vendor(self.vendor, applicant, &self.registry)?;
            Ok((agent, submission))
        });

        let (agent, submission) = match prepared {
            Ok(prepared) => prepared,
            Err(error) => return ActualOutcome::Rejected(error),
        };

        match agent.submit_state_id(&submission).await {
            Ok(response) if response.success() => ActualOutcome::Verified,
            Ok(response) => ActualOutcome::Unverified(
                response
                    .unverified_attributes()
                    .map(|attribute| attribute.as_str().to_string())
                    .collect(),
            ),
            Err(error) => ActualOutcome::Error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(expected: ExpectedOutcome, actual: ActualOutcome) -> RowResult {
        RowResult {
            id: "1".to_string(),
            expected,
            actual,
        }
    }

    fn attrs(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn unverified_rows_compare_attribute_sets() {
        assert!(result(
            ExpectedOutcome::Unverified(attrs(&["dob", "city"])),
            ActualOutcome::Unverified(attrs(&["city", "dob"])),
        )
        .passed());
        assert!(!result(
            ExpectedOutcome::Unverified(attrs(&["dob"])),
            ActualOutcome::Unverified(attrs(&["dob", "city"])),
        )
        .passed());
    }

    #[test]
    fn error_rows_match_on_substring() {
        assert!(result(
            ExpectedOutcome::Error("DLDV timeout".to_string()),
            ActualOutcome::Error("mock verification error: ExceptionId 47, DLDV timeout".to_string()),
        )
        .passed());
    }

    #[test]
    fn outcome_classes_never_cross() {
        assert!(!result(
            ExpectedOutcome::Error("timeout".to_string()),
            ActualOutcome::Unverified(attrs(&["document_number"])),
        )
        .passed());
        assert!(!result(
            ExpectedOutcome::Verified,
            ActualOutcome::Rejected(ConfigurationError::MissingField("city")),
        )
        .passed());
    }
}
