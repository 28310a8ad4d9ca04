use std::{
    io::{self, Read, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roster_core::{
    AssumeYes, Confirm, DeleteOutcome, HttpRosterApi, MemberForm, NoteForm, RosterController,
    TranscriptionSubmitter, ViewScope,
};
use shared::domain::MemberId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings};
use render::render_roster;

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Team roster and performance notes")]
struct Cli {
    /// Base url of the roster api, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file; defaults to ./roster.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    AddMember {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        email: String,
    },
    AddNote {
        member_id: String,
        text: String,
    },
    Delete {
        member_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Send a meeting transcript for processing; reads stdin when no text, file or audio is given
    ProcessTranscript {
        #[arg(long, conflicts_with_all = ["text", "audio"])]
        file: Option<PathBuf>,
        /// Recorded meeting to transcribe first (needs an OpenAI API key)
        #[arg(long, conflicts_with = "text")]
        audio: Option<PathBuf>,
        text: Option<String>,
    },
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        settings.api_url = Some(url);
    }
    let endpoint = settings.endpoint()?;
    info!(%endpoint, "using roster api");

    let roster = RosterController::new(Arc::new(HttpRosterApi::new(endpoint)));
    let scope = ViewScope::new();

    if roster.load(&scope.token()).await.is_err() {
        return fail_with_roster_error(&roster).await;
    }

    let succeeded = run_command(cli.command, &settings, &roster, &scope).await?;
    let state = roster.snapshot().await;
    print!("{}", render_roster(&state));

    if !succeeded {
        return fail_with_roster_error(&roster).await;
    }
    Ok(())
}

/// Returns `Ok(false)` when the roster recorded a user-facing failure.
async fn run_command(
    command: Command,
    settings: &Settings,
    roster: &Arc<RosterController>,
    scope: &ViewScope,
) -> Result<bool> {
    match command {
        Command::List => Ok(true),
        Command::AddMember { name, role, email } => {
            let mut form = MemberForm::default();
            form.open();
            form.set_name(name);
            form.set_role(role);
            form.set_email(email);
            Ok(form.submit(roster, &scope.token()).await.is_ok())
        }
        Command::AddNote { member_id, text } => {
            let mut form = NoteForm::new(MemberId::from(member_id));
            form.open();
            form.set_text(text);
            match form.submit(roster, &scope.token()).await {
                Some(result) => Ok(result.is_ok()),
                None => bail!("note text is empty"),
            }
        }
        Command::Delete { member_id, yes } => {
            let confirmer: &dyn Confirm = if yes { &AssumeYes } else { &StdinConfirm };
            match roster
                .delete_member(&MemberId::from(member_id), confirmer, &scope.token())
                .await
            {
                Ok(DeleteOutcome::Removed) => Ok(true),
                Ok(DeleteOutcome::Declined) => {
                    eprintln!("Deletion cancelled.");
                    Ok(true)
                }
                Err(_) => Ok(false),
            }
        }
        Command::ProcessTranscript { file, audio, text } => {
            let submitter = TranscriptionSubmitter::new(Arc::clone(roster));
            match audio {
                Some(path) => {
                    let whisper = settings.whisper_client()?;
                    match submitter
                        .transcribe_audio(&whisper, &path, &scope.token())
                        .await
                    {
                        Ok(text) => eprintln!("Transcript:\n{text}"),
                        Err(err) => {
                            let message = submitter
                                .snapshot()
                                .await
                                .error
                                .unwrap_or_else(|| err.to_string());
                            bail!("{message} ({err})");
                        }
                    }
                }
                None => {
                    submitter
                        .set_transcription(read_transcription(file, text)?)
                        .await;
                }
            }
            match submitter.submit(&scope.token()).await {
                Ok(result) => {
                    eprintln!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(roster.snapshot().await.last_error.is_none())
                }
                Err(err) => {
                    let message = submitter
                        .snapshot()
                        .await
                        .error
                        .unwrap_or_else(|| err.to_string());
                    bail!(message)
                }
            }
        }
    }
}

fn read_transcription(file: Option<PathBuf>, text: Option<String>) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read transcript '{}'", path.display()));
    }
    if let Some(text) = text {
        return Ok(text);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read transcript from stdin")?;
    Ok(buf)
}

async fn fail_with_roster_error(roster: &RosterController) -> Result<()> {
    match roster.snapshot().await.last_error {
        Some(message) => bail!(message),
        None => bail!("operation failed"),
    }
}
