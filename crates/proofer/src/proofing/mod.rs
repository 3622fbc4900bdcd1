//! Agent-level contract for state-ID proofing.
//!
//! A caller binds an [`Applicant`] to an [`Agent`] for a configured vendor and submits a
//! [`StateIdSubmission`]. The agent returns a [`VerificationResponse`] when the vendor
//! completed its check (matched or not) and a [`VendorError`] when it could not.

pub mod agent;
pub mod applicant;
pub mod attribute;
pub mod error;
pub mod mock;
pub mod response;
pub mod state_id;
pub mod timeout;
pub mod vendor;

pub use agent::Agent;
pub use applicant::{Applicant, ApplicantInput};
pub use attribute::Attribute;
pub use error::{ConfigurationError, VendorError};
pub use mock::{MockBackend, ReferenceIdentity};
pub use response::{AttributeVerdict, MismatchReason, RawVerdict, VerificationResponse};
pub use state_id::{StateIdSubmission, StateIdType};
pub use timeout::TimeoutBackend;
pub use vendor::{VendorBackend, VendorId, VendorRegistry};
