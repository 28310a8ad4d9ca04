use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid api address '{address}': {reason}")]
    Config { address: String, reason: String },
    #[error("failed to read audio file '{}': {source}", path.display())]
    AudioFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("operation cancelled before its response was applied")]
    Cancelled,
}

impl RosterError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// User-initiated operations, used to pick the message shown on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Load,
    AddMember,
    AddNote,
    DeleteMember,
    ProcessTranscription,
    TranscribeAudio,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::AddMember => "add_member",
            Self::AddNote => "add_note",
            Self::DeleteMember => "delete_member",
            Self::ProcessTranscription => "process_transcription",
            Self::TranscribeAudio => "transcribe_audio",
        }
    }

    /// The single retry-style message shown for any failure of this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load team members. Please try again later.",
            Self::AddMember => "Failed to add team member. Please try again.",
            Self::AddNote => "Failed to add note. Please try again.",
            Self::DeleteMember => "Failed to delete team member. Please try again.",
            Self::ProcessTranscription => "Failed to process transcription. Please try again.",
            Self::TranscribeAudio => "Failed to transcribe audio. Please try again.",
        }
    }
}
