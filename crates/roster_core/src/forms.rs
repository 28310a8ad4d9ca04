//! Input collection for the add-member and add-note forms.

use shared::domain::{Member, MemberDraft, MemberId};
use tokio_util::sync::CancellationToken;

use crate::{controller::RosterController, error::RosterError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberForm {
    visible: bool,
    draft: MemberDraft,
}

impl MemberForm {
    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn draft(&self) -> &MemberDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.draft.role = role.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
    }

    /// Hands the draft to the roster; the form is reset and closed only on success.
    pub async fn submit(
        &mut self,
        roster: &RosterController,
        token: &CancellationToken,
    ) -> Result<Member, RosterError> {
        let member = roster.add_member(self.draft.clone(), token).await?;
        self.reset();
        Ok(member)
    }

    pub async fn cancel(&mut self, roster: &RosterController) {
        self.reset();
        roster.clear_error().await;
    }

    fn reset(&mut self) {
        self.visible = false;
        self.draft = MemberDraft::default();
    }
}

/// Note input on one member card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    member_id: MemberId,
    visible: bool,
    text: String,
}

impl NoteForm {
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            visible: false,
            text: String::new(),
        }
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Blank input is ignored. Otherwise the text goes out as typed and the
    /// form resets whether or not the roster accepted it.
    pub async fn submit(
        &mut self,
        roster: &RosterController,
        token: &CancellationToken,
    ) -> Option<Result<Member, RosterError>> {
        if self.text.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.text);
        self.visible = false;
        Some(roster.add_note(&self.member_id, &text, token).await)
    }

    pub fn cancel(&mut self) {
        self.visible = false;
        self.text.clear();
    }
}
