use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity fields a vendor can independently match or mismatch.
///
/// The set is closed: a vendor reporting anything else is a backend defect, not a new outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    FirstName,
    LastName,
    Dob,
    Address1,
    Address2,
    City,
    State,
    Zipcode,
    DocumentNumber,
    Jurisdiction,
    Category,
}

impl Attribute {
    pub const ALL: [Attribute; 11] = [
        Attribute::FirstName,
        Attribute::LastName,
        Attribute::Dob,
        Attribute::Address1,
        Attribute::Address2,
        Attribute::City,
        Attribute::State,
        Attribute::Zipcode,
        Attribute::DocumentNumber,
        Attribute::Jurisdiction,
        Attribute::Category,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::FirstName => "first_name",
            Attribute::LastName => "last_name",
            Attribute::Dob => "dob",
            Attribute::Address1 => "address1",
            Attribute::Address2 => "address2",
            Attribute::City => "city",
            Attribute::State => "state",
            Attribute::Zipcode => "zipcode",
            Attribute::DocumentNumber => "document_number",
            Attribute::Jurisdiction => "jurisdiction",
            Attribute::Category => "category",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verification attribute '{0}'")]
pub struct UnknownAttribute(pub String);

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim();
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str() == key)
            .ok_or_else(|| UnknownAttribute(key.to_string()))
    }
}
