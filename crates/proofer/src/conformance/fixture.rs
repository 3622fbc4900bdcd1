use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::FixtureError;
use crate::proofing::{ApplicantInput, StateIdType};

const ADDRESS_DELIMITER: char = '@';

/// Classification a fixture row expects from the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedOutcome {
    Verified,
    Unverified(BTreeSet<String>),
    /// The vendor error message must contain this text.
    Error(String),
}

/// One parsed conformance case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRow {
    pub id: String,
    pub applicant: ApplicantInput,
    pub document_number: String,
    pub jurisdiction: String,
    pub id_type: StateIdType,
    pub expected: ExpectedOutcome,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<FixtureRow>, FixtureError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<FixtureCsvRow>() {
        rows.push(record?.into_row()?);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct FixtureCsvRow {
    #[serde(rename = "#")]
    id: String,
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Last Name", default)]
    last_name: String,
    #[serde(rename = "DOB (YYYYMMDD)", default)]
    dob: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Document #", default)]
    document_number: String,
    #[serde(rename = "Document Type", default)]
    document_type: String,
    #[serde(rename = "Result")]
    result: String,
    #[serde(
        rename = "Unverified Attrs",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    unverified_attrs: Option<String>,
    #[serde(
        rename = "Error Message",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    error_message: Option<String>,
}

impl FixtureCsvRow {
    fn into_row(self) -> Result<FixtureRow, FixtureError> {
        let expected = self.expected_outcome()?;
        let address = split_address(&self.id, &self.address)?;

        Ok(FixtureRow {
            applicant: ApplicantInput {
                uuid: None,
                first_name: self.first_name,
                last_name: self.last_name,
                dob: self.dob,
                address1: address.address1,
                address2: address.address2,
                city: address.city,
                state: address.state.clone(),
                zipcode: address.zipcode,
            },
            document_number: self.document_number,
            jurisdiction: address.state,
            id_type: StateIdType::from_category_code(&self.document_type),
            expected,
            id: self.id,
        })
    }

    fn expected_outcome(&self) -> Result<ExpectedOutcome, FixtureError> {
        match self.result.to_ascii_uppercase().as_str() {
            "VERIFIED" => Ok(ExpectedOutcome::Verified),
            "UNVERIFIED" => {
                let attributes: BTreeSet<String> = self
                    .unverified_attrs
                    .as_deref()
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|attribute| !attribute.is_empty())
                    .map(str::to_string)
                    .collect();
                if attributes.is_empty() {
                    return Err(FixtureError::InvalidRow {
                        row: self.id.clone(),
                        reason: "UNVERIFIED rows must list unverified attributes",
                    });
                }
                Ok(ExpectedOutcome::Unverified(attributes))
            }
            "ERROR" => self
                .error_message
                .clone()
                .map(ExpectedOutcome::Error)
                .ok_or_else(|| FixtureError::InvalidRow {
                    row: self.id.clone(),
                    reason: "ERROR rows must carry an error message",
                }),
            _ => Err(FixtureError::UnknownResult {
                row: self.id.clone(),
                value: self.result.clone(),
            }),
        }
    }
}

struct FixtureAddress {
    address1: String,
    address2: Option<String>,
    city: String,
    state: String,
    zipcode: String,
}

/// Split `street@street2@city@state@zip`; the second line may be empty.
fn split_address(row: &str, value: &str) -> Result<FixtureAddress, FixtureError> {
    let parts: Vec<&str> = value.split(ADDRESS_DELIMITER).map(str::trim).collect();
    let [address1, address2, city, state, zipcode] = parts.as_slice() else {
        return Err(FixtureError::MalformedAddress {
            row: row.to_string(),
            value: value.to_string(),
        });
    };

    Ok(FixtureAddress {
        address1: address1.to_string(),
        address2: Some(address2.to_string()).filter(|line| !line.is_empty()),
        city: city.to_string(),
        state: state.to_string(),
        zipcode: zipcode.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
