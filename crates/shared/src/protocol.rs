use serde::{Deserialize, Serialize};

/// Body of `POST /process-transcription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    pub transcription: String,
}

pub fn team_members_route() -> &'static str {
    "team-members"
}

pub fn member_notes_route() -> &'static str {
    "notes"
}

pub fn process_transcription_route() -> &'static str {
    "process-transcription"
}
