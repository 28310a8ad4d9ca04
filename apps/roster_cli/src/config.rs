use std::{fs, path::Path};

use anyhow::{bail, Context};
use roster_core::{
    endpoint::{DEFAULT_API_HOST, DEFAULT_API_PORT, DEFAULT_API_PREFIX},
    speech::{DEFAULT_WHISPER_MODEL, DEFAULT_WHISPER_URL},
    ApiEndpoint, RosterError, WhisperClient,
};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_host: String,
    pub api_port: u16,
    pub api_prefix: String,
    /// Full base url; wins over host/port/prefix when set.
    pub api_url: Option<String>,
    /// Only needed for `process-transcript --audio`.
    pub openai_api_key: Option<String>,
    pub whisper_url: String,
    pub whisper_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.into(),
            api_port: DEFAULT_API_PORT,
            api_prefix: DEFAULT_API_PREFIX.into(),
            api_url: None,
            openai_api_key: None,
            whisper_url: DEFAULT_WHISPER_URL.into(),
            whisper_model: DEFAULT_WHISPER_MODEL.into(),
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> Result<ApiEndpoint, RosterError> {
        match &self.api_url {
            Some(url) => ApiEndpoint::parse(url),
            None => ApiEndpoint::from_parts(&self.api_host, self.api_port, &self.api_prefix),
        }
    }

    pub fn whisper_client(&self) -> anyhow::Result<WhisperClient> {
        let Some(api_key) = self.openai_api_key.as_deref().filter(|key| !key.trim().is_empty())
        else {
            bail!("audio transcription needs an API key; set OPENAI_API_KEY or openai_api_key in {DEFAULT_CONFIG_FILE}");
        };
        Ok(WhisperClient::new(&self.whisper_url, api_key)?.with_model(self.whisper_model.clone()))
    }
}

/// Defaults, then the config file, then environment variables.
///
/// An explicitly named config file must exist; the default `roster.toml` is
/// optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match config_path {
        Some(path) => read_settings_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_settings_file(path)?
            } else {
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__API_HOST") {
        settings.api_host = v;
    }

    if let Some(v) = lookup("APP__API_PORT") {
        match v.parse::<u16>() {
            Ok(port) => settings.api_port = port,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__API_PORT"),
        }
    }

    if let Some(v) = lookup("APP__API_PREFIX") {
        settings.api_prefix = v;
    }

    if let Some(v) = lookup("ROSTER_API_URL") {
        settings.api_url = Some(v);
    }
    if let Some(v) = lookup("APP__API_URL") {
        settings.api_url = Some(v);
    }

    if let Some(v) = lookup("OPENAI_API_KEY") {
        settings.openai_api_key = Some(v);
    }
    if let Some(v) = lookup("APP__OPENAI_API_KEY") {
        settings.openai_api_key = Some(v);
    }
    if let Some(v) = lookup("APP__WHISPER_URL") {
        settings.whisper_url = v;
    }
    if let Some(v) = lookup("APP__WHISPER_MODEL") {
        settings.whisper_model = v;
    }
}
