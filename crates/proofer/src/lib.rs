//! State-ID proofing: submit applicant and government ID data to a vendor and
//! classify the result as verified, unverified, or a vendor failure.

pub mod config;
pub mod conformance;
pub mod proofing;
pub mod telemetry;

pub use proofing::{
    Agent, Applicant, ApplicantInput, Attribute, ConfigurationError, MismatchReason, MockBackend,
    RawVerdict, StateIdSubmission, StateIdType, TimeoutBackend, VendorBackend, VendorError,
    VendorId, VendorRegistry, VerificationResponse,
};
