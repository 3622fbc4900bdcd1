#![allow(dead_code)]

use chrono::NaiveDate;
use proofer::proofing::ReferenceIdentity;
use proofer::{Applicant, ApplicantInput, MockBackend, StateIdType};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn jane_doe_identity() -> ReferenceIdentity {
    ReferenceIdentity {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        dob: date(1990, 1, 1),
        address1: "123 Main St".to_string(),
        address2: None,
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        zipcode: "22201".to_string(),
        jurisdiction: "VA".to_string(),
        id_type: StateIdType::DriversLicense,
    }
}

/// Reference table backing the CSV fixture.
pub fn mock_vendor() -> MockBackend {
    MockBackend::new()
        .with_identity("D1001", jane_doe_identity())
        .with_identity(
            "D1002",
            ReferenceIdentity {
                first_name: "John".to_string(),
                last_name: "Smith".to_string(),
                dob: date(1985, 6, 15),
                address1: "500 Oak Ave".to_string(),
                address2: Some("Apt 4".to_string()),
                city: "Richmond".to_string(),
                state: "VA".to_string(),
                zipcode: "23220".to_string(),
                jurisdiction: "VA".to_string(),
                id_type: StateIdType::StateIdCard,
            },
        )
        .with_identity(
            "P2001",
            ReferenceIdentity {
                first_name: "Alex".to_string(),
                last_name: "Rivera".to_string(),
                dob: date(2006, 3, 9),
                address1: "77 Elm Rd".to_string(),
                address2: None,
                city: "Baltimore".to_string(),
                state: "MD".to_string(),
                zipcode: "21201".to_string(),
                jurisdiction: "MD".to_string(),
                id_type: StateIdType::DriversPermit,
            },
        )
        .with_fault(
            "F5000",
            "ExceptionId: 0047, ExceptionText: MVA system unavailable",
        )
        .with_fault("F5001", "DLDV gateway returned HTTP 503")
}

pub fn jane_doe() -> Applicant {
    Applicant::new(ApplicantInput {
        uuid: None,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        dob: "1990-01-01".to_string(),
        address1: "123 Main St".to_string(),
        address2: None,
        city: "Arlington".to_string(),
        state: "VA".to_string(),
        zipcode: "22201".to_string(),
    })
    .expect("valid applicant")
}
