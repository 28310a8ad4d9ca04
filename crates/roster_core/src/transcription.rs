use std::{path::Path, sync::Arc};

use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    controller::RosterController,
    error::{OperationKind, RosterError},
    scope::until_cancelled,
    speech::WhisperClient,
    transport::RosterApi,
};

pub const EMPTY_TRANSCRIPTION_MESSAGE: &str = "Please enter a meeting transcription";
const ALREADY_PROCESSING_MESSAGE: &str = "A transcription is already being processed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitterState {
    pub transcription: String,
    pub processing: bool,
    pub error: Option<String>,
}

/// Sends meeting transcripts for processing and reloads the roster afterwards.
pub struct TranscriptionSubmitter {
    api: Arc<dyn RosterApi>,
    roster: Arc<RosterController>,
    state: Mutex<SubmitterState>,
}

impl TranscriptionSubmitter {
    pub fn new(roster: Arc<RosterController>) -> Self {
        Self {
            api: roster.api(),
            roster,
            state: Mutex::new(SubmitterState::default()),
        }
    }

    pub async fn snapshot(&self) -> SubmitterState {
        self.state.lock().await.clone()
    }

    pub async fn set_transcription(&self, transcription: impl Into<String>) {
        self.state.lock().await.transcription = transcription.into();
    }

    /// Transcribes a recorded meeting and makes the text the current transcript.
    ///
    /// Nothing is sent to the roster backend; call [`Self::submit`] afterwards.
    /// On failure the previous transcript is left in place.
    pub async fn transcribe_audio(
        &self,
        speech: &WhisperClient,
        path: &Path,
        token: &CancellationToken,
    ) -> Result<String, RosterError> {
        {
            let mut state = self.state.lock().await;
            if state.processing {
                return Err(RosterError::Validation(ALREADY_PROCESSING_MESSAGE.to_string()));
            }
            state.processing = true;
            state.error = None;
        }

        let result = speech.transcribe_file(path, token).await;

        let mut state = self.state.lock().await;
        state.processing = false;
        match result {
            Ok(_) if token.is_cancelled() => Err(RosterError::Cancelled),
            Ok(text) => {
                state.transcription = text.clone();
                Ok(text)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                warn!(
                    operation = OperationKind::TranscribeAudio.as_str(),
                    error = %err,
                    "roster operation failed"
                );
                state.error = Some(OperationKind::TranscribeAudio.failure_message().to_string());
                Err(err)
            }
        }
    }

    /// Submits the current transcript.
    ///
    /// The backend's result is returned as-is; the roster only learns about
    /// its effects through a full reload.
    pub async fn submit(&self, token: &CancellationToken) -> Result<Value, RosterError> {
        let transcription = {
            let mut state = self.state.lock().await;
            if state.processing {
                return Err(RosterError::Validation(ALREADY_PROCESSING_MESSAGE.to_string()));
            }
            if state.transcription.trim().is_empty() {
                state.error = Some(EMPTY_TRANSCRIPTION_MESSAGE.to_string());
                return Err(RosterError::Validation(
                    EMPTY_TRANSCRIPTION_MESSAGE.to_string(),
                ));
            }
            state.processing = true;
            state.error = None;
            state.transcription.clone()
        };

        let result = until_cancelled(token, self.api.process_transcription(&transcription)).await;

        {
            let mut state = self.state.lock().await;
            state.processing = false;
            match &result {
                Ok(_) if !token.is_cancelled() => state.transcription.clear(),
                Ok(_) => {}
                Err(err) if err.is_cancelled() => {}
                Err(err) => {
                    warn!(
                        operation = OperationKind::ProcessTranscription.as_str(),
                        error = %err,
                        "roster operation failed"
                    );
                    state.error = Some(
                        OperationKind::ProcessTranscription
                            .failure_message()
                            .to_string(),
                    );
                }
            }
        }

        let result = result?;
        if token.is_cancelled() {
            debug!("transcription result discarded; view scope closed");
            return Err(RosterError::Cancelled);
        }

        info!(chars = transcription.len(), "transcription processed");
        if let Err(err) = self.roster.on_transcription_processed(token).await {
            debug!(error = %err, "roster reload after transcription did not apply");
        }
        Ok(result)
    }
}
