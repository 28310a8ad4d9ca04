//! Client-side roster state kept in sync with the team-management backend.

pub mod controller;
pub mod endpoint;
pub mod error;
pub mod forms;
pub mod scope;
pub mod speech;
pub mod store;
pub mod transcription;
pub mod transport;

pub use controller::{AssumeYes, Confirm, DeleteOutcome, RosterController};
pub use endpoint::ApiEndpoint;
pub use error::{OperationKind, RosterError};
pub use forms::{MemberForm, NoteForm};
pub use scope::ViewScope;
pub use speech::WhisperClient;
pub use store::{RosterAction, RosterState};
pub use transcription::{SubmitterState, TranscriptionSubmitter};
pub use transport::{HttpRosterApi, RosterApi};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
