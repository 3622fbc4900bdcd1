use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ConfigurationError;

/// Raw applicant fields as captured by the caller, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantInput {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    /// `YYYYMMDD` or `YYYY-MM-DD`.
    pub dob: String,
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Validated, immutable identity record bound to one verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applicant {
    uuid: Uuid,
    first_name: String,
    last_name: String,
    dob: NaiveDate,
    address1: String,
    address2: Option<String>,
    city: String,
    state: String,
    zipcode: String,
}

impl Applicant {
    pub fn new(input: ApplicantInput) -> Result<Self, ConfigurationError> {
        let first_name = required("first_name", input.first_name)?;
        let last_name = required("last_name", input.last_name)?;
        let dob = parse_dob(&required("dob", input.dob)?)?;
        let address1 = required("address1", input.address1)?;
        let city = required("city", input.city)?;
        let state = required("state", input.state)?.to_ascii_uppercase();
        let zipcode = required("zipcode", input.zipcode)?;
        let address2 = input
            .address2
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            uuid: input.uuid.unwrap_or_else(Uuid::new_v4),
            first_name,
            last_name,
            dob,
            address1,
            address2,
            city,
            state,
            zipcode,
        })
    }

    /// Correlation id for logs and vendor requests.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn dob(&self) -> NaiveDate {
        self.dob
    }

    pub fn address1(&self) -> &str {
        &self.address1
    }

    pub fn address2(&self) -> Option<&str> {
        self.address2.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn zipcode(&self) -> &str {
        &self.zipcode
    }
}

fn required(field: &'static str, value: String) -> Result<String, ConfigurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_dob(raw: &str) -> Result<NaiveDate, ConfigurationError> {
    let invalid = |reason| ConfigurationError::InvalidField {
        field: "dob",
        value: raw.to_string(),
        reason,
    };

    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| invalid("expected YYYY-MM-DD or YYYYMMDD"));
    }

    if raw.len() != 8 || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid("expected YYYY-MM-DD or YYYYMMDD"));
    }

    // All-ASCII digits, so byte slicing stays on char boundaries.
    let year: i32 = raw[0..4].parse().map_err(|_| invalid("invalid year"))?;
    let month: u32 = raw[4..6].parse().map_err(|_| invalid("invalid month"))?;
    let day: u32 = raw[6..8].parse().map_err(|_| invalid("invalid day"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("not a calendar date"))
}
