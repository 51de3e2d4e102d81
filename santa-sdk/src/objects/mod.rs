pub mod admin;
pub mod error;
pub mod event;
pub mod participant;

pub use error::{ErrorKind, ErrorResponse};
pub use event::{EventOverviewResponse, EventPhase};
pub use participant::{RegisterRequest, RegistrationResponse, RevealRequest, RevealResponse};
