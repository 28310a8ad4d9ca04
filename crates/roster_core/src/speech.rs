//! Speech-to-text for recorded meetings through an OpenAI-compatible
//! `audio/transcriptions` endpoint.

use std::path::Path;

use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::{error::RosterError, scope::until_cancelled, transport::decode_json};

pub const DEFAULT_WHISPER_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";
const FALLBACK_FILE_NAME: &str = "audio.m4a";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

pub struct WhisperClient {
    http: Client,
    url: Url,
    api_key: String,
    model: String,
}

impl WhisperClient {
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self, RosterError> {
        Self::with_client(Client::new(), url, api_key)
    }

    pub fn with_client(
        http: Client,
        url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, RosterError> {
        let url = url.trim();
        let parsed = Url::parse(url).map_err(|err| RosterError::Config {
            address: url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RosterError::Config {
                address: url.to_string(),
                reason: "expected an http or https url".to_string(),
            });
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RosterError::Validation(
                "an API key is required for audio transcription".to_string(),
            ));
        }

        Ok(Self {
            http,
            url: parsed,
            api_key,
            model: DEFAULT_WHISPER_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Uploads the audio file at `path` and returns the recognised text.
    ///
    /// The text is returned untouched; it may be empty when the recording
    /// held no speech.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        token: &CancellationToken,
    ) -> Result<String, RosterError> {
        let audio = tokio::fs::read(path)
            .await
            .map_err(|source| RosterError::AudioFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();
        debug!(bytes = audio.len(), file = %file_name, url = %self.url, "uploading audio");

        let form = Form::new()
            .part("file", Part::bytes(audio).file_name(file_name))
            .text("model", self.model.clone());
        let request = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send();

        let response = until_cancelled(token, async {
            let res = request.await?;
            decode_json::<TranscriptionResponse>(res).await
        })
        .await?;

        info!(chars = response.text.len(), "audio transcribed");
        Ok(response.text)
    }
}
