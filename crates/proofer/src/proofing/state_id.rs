use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Document category of a state-issued identity document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateIdType {
    DriversLicense,
    DriversPermit,
    StateIdCard,
    /// A category code with no known mapping. Carried explicitly so it is never
    /// mistaken for one of the real categories.
    Unrecognized(String),
}

impl StateIdType {
    /// Map a numeric category code ("1", "2", "3") onto a document category.
    pub fn from_category_code(code: &str) -> Self {
        match code.trim() {
            "1" => StateIdType::DriversLicense,
            "2" => StateIdType::DriversPermit,
            "3" => StateIdType::StateIdCard,
            other => StateIdType::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StateIdType::DriversLicense => "drivers_license",
            StateIdType::DriversPermit => "drivers_permit",
            StateIdType::StateIdCard => "state_id_card",
            StateIdType::Unrecognized(code) => code,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, StateIdType::Unrecognized(_))
    }
}

impl fmt::Display for StateIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateIdType::Unrecognized(code) => write!(f, "unrecognized category '{code}'"),
            recognized => f.write_str(recognized.label()),
        }
    }
}

/// The document details submitted alongside an applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateIdSubmission {
    number: String,
    jurisdiction: String,
    id_type: StateIdType,
}

impl StateIdSubmission {
    pub fn new(
        number: impl Into<String>,
        jurisdiction: impl Into<String>,
        id_type: StateIdType,
    ) -> Result<Self, ConfigurationError> {
        let number = number.into().trim().to_string();
        if number.is_empty() {
            return Err(ConfigurationError::MissingField("state_id_number"));
        }

        let raw_jurisdiction = jurisdiction.into();
        let jurisdiction = raw_jurisdiction.trim().to_ascii_uppercase();
        if jurisdiction.is_empty() {
            return Err(ConfigurationError::MissingField("state_id_jurisdiction"));
        }
        if jurisdiction.len() != 2 || !jurisdiction.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ConfigurationError::InvalidField {
                field: "state_id_jurisdiction",
                value: raw_jurisdiction,
                reason: "expected a two-letter region code",
            });
        }

        Ok(Self {
            number,
            jurisdiction,
            id_type,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn id_type(&self) -> &StateIdType {
        &self.id_type
    }
}
