//! The roster controller: user intents in, backend calls out, state transitions applied.

use std::sync::Arc;

use shared::domain::{Member, MemberDraft, MemberId, Note};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::{OperationKind, RosterError},
    scope::until_cancelled,
    store::{reduce, RosterAction, RosterState},
    transport::RosterApi,
};

pub const DELETE_MEMBER_PROMPT: &str = "Are you sure you want to delete this team member?";
pub const INCOMPLETE_MEMBER_MESSAGE: &str = "Please fill in all fields";

/// Blocking yes/no prompt shown before destructive operations.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms every prompt; for non-interactive callers that already asked.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    Declined,
}

pub struct RosterController {
    api: Arc<dyn RosterApi>,
    state: RwLock<RosterState>,
    events: broadcast::Sender<RosterAction>,
}

impl RosterController {
    pub fn new(api: Arc<dyn RosterApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            state: RwLock::new(RosterState::default()),
            events,
        })
    }

    pub fn api(&self) -> Arc<dyn RosterApi> {
        Arc::clone(&self.api)
    }

    pub async fn snapshot(&self) -> RosterState {
        self.state.read().await.clone()
    }

    /// Every applied transition, in application order.
    pub fn subscribe(&self) -> broadcast::Receiver<RosterAction> {
        self.events.subscribe()
    }

    pub async fn clear_error(&self) {
        self.dispatch(RosterAction::ErrorCleared).await;
    }

    /// Fetches the full roster, replacing the cached members on success.
    ///
    /// Every load ends in exactly one of succeeded, failed or cancelled, so
    /// `loading` stays set until the last overlapping load has finished.
    pub async fn load(&self, token: &CancellationToken) -> Result<(), RosterError> {
        self.dispatch(RosterAction::LoadStarted).await;

        let outcome = match until_cancelled(token, self.api.list_members()).await {
            Ok(members) => {
                info!(count = members.len(), "loaded team roster");
                self.commit(token, RosterAction::LoadSucceeded(members))
                    .await
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                warn!(operation = OperationKind::Load.as_str(), error = %err, "roster operation failed");
                let failed =
                    RosterAction::LoadFailed(OperationKind::Load.failure_message().to_string());
                self.commit(token, failed).await.and(Err(err))
            }
        };

        if matches!(outcome, Err(RosterError::Cancelled)) {
            debug!("roster load discarded; view scope closed");
            self.dispatch(RosterAction::LoadCancelled).await;
        }
        outcome
    }

    /// Validates `draft`, creates the member and appends the server's record.
    pub async fn add_member(
        &self,
        draft: MemberDraft,
        token: &CancellationToken,
    ) -> Result<Member, RosterError> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            debug!(?missing, "rejected incomplete member draft");
            self.dispatch(RosterAction::OperationFailed(
                INCOMPLETE_MEMBER_MESSAGE.to_string(),
            ))
            .await;
            return Err(RosterError::Validation(INCOMPLETE_MEMBER_MESSAGE.to_string()));
        }
        self.dispatch(RosterAction::ErrorCleared).await;

        let request = draft.into_member(MemberId::generate());
        debug!(optimistic_id = %request.id, "creating team member");

        match until_cancelled(token, self.api.create_member(&request)).await {
            Ok(member) => {
                info!(optimistic_id = %request.id, member_id = %member.id, "team member added");
                self.commit(token, RosterAction::MemberAdded(member.clone()))
                    .await?;
                Ok(member)
            }
            Err(err) => Err(self.fail(OperationKind::AddMember, token, err).await),
        }
    }

    /// Adds a note and replaces the member with the server's full record.
    ///
    /// Blank text is the form's concern; it is refused here without touching
    /// state or the network.
    pub async fn add_note(
        &self,
        member_id: &MemberId,
        text: &str,
        token: &CancellationToken,
    ) -> Result<Member, RosterError> {
        if text.trim().is_empty() {
            return Err(RosterError::Validation("note text is empty".to_string()));
        }
        self.dispatch(RosterAction::ErrorCleared).await;

        let note = Note::new(text);
        match until_cancelled(token, self.api.add_note(member_id, &note)).await {
            Ok(member) => {
                info!(%member_id, note_id = %note.id, notes = member.notes.len(), "note added");
                self.commit(
                    token,
                    RosterAction::NoteAdded {
                        member_id: member_id.clone(),
                        member: member.clone(),
                    },
                )
                .await?;
                Ok(member)
            }
            Err(err) => Err(self.fail(OperationKind::AddNote, token, err).await),
        }
    }

    /// Deletes a member once `confirmer` agrees; declining sends nothing.
    pub async fn delete_member(
        &self,
        member_id: &MemberId,
        confirmer: &dyn Confirm,
        token: &CancellationToken,
    ) -> Result<DeleteOutcome, RosterError> {
        if !confirmer.confirm(DELETE_MEMBER_PROMPT) {
            debug!(%member_id, "member deletion declined");
            return Ok(DeleteOutcome::Declined);
        }
        self.dispatch(RosterAction::ErrorCleared).await;

        match until_cancelled(token, self.api.delete_member(member_id)).await {
            Ok(()) => {
                info!(%member_id, "team member deleted");
                self.commit(token, RosterAction::MemberRemoved(member_id.clone()))
                    .await?;
                Ok(DeleteOutcome::Removed)
            }
            Err(err) => Err(self.fail(OperationKind::DeleteMember, token, err).await),
        }
    }

    /// Transcript processing may have touched any member, so reload everything.
    pub async fn on_transcription_processed(
        &self,
        token: &CancellationToken,
    ) -> Result<(), RosterError> {
        debug!("transcription processed; reloading roster");
        self.load(token).await
    }

    async fn dispatch(&self, action: RosterAction) {
        let mut state = self.state.write().await;
        self.apply(&mut state, action);
    }

    // Applies a response-derived transition unless its view has gone away.
    async fn commit(
        &self,
        token: &CancellationToken,
        action: RosterAction,
    ) -> Result<(), RosterError> {
        let mut state = self.state.write().await;
        if token.is_cancelled() {
            return Err(RosterError::Cancelled);
        }
        self.apply(&mut state, action);
        Ok(())
    }

    fn apply(&self, state: &mut RosterState, action: RosterAction) {
        reduce(state, action.clone());
        let _ = self.events.send(action);
    }

    async fn fail(
        &self,
        operation: OperationKind,
        token: &CancellationToken,
        err: RosterError,
    ) -> RosterError {
        if err.is_cancelled() {
            debug!(operation = operation.as_str(), "response discarded; view scope closed");
            return err;
        }

        warn!(operation = operation.as_str(), error = %err, "roster operation failed");
        match self
            .commit(
                token,
                RosterAction::OperationFailed(operation.failure_message().to_string()),
            )
            .await
        {
            Ok(()) => err,
            Err(cancelled) => cancelled,
        }
    }
}
