//! Plain-text rendering of the roster for the terminal.

use std::fmt::Write as _;

use chrono::Local;
use roster_core::RosterState;
use shared::domain::Member;

const INVALID_DATE: &str = "Invalid Date";

pub fn render_roster(state: &RosterState) -> String {
    let mut out = String::new();
    if state.loading {
        out.push_str("Loading team members...\n");
        return out;
    }
    if state.members.is_empty() {
        out.push_str("No team members yet. Add one with `roster add-member`.\n");
        return out;
    }
    for member in &state.members {
        render_member(&mut out, member);
    }
    out
}

fn render_member(out: &mut String, member: &Member) {
    let _ = writeln!(out, "{} <{}> - {}", member.name, member.email, member.role);
    let _ = writeln!(out, "  id: {}", member.id);
    if member.notes.is_empty() {
        out.push_str("  No notes yet\n");
        return;
    }
    for note in &member.notes {
        let when = match note.timestamp.parse() {
            Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => INVALID_DATE.to_string(),
        };
        let _ = writeln!(out, "  [{when}] {}", note.text);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;
    use shared::domain::{MemberDraft, MemberId, Note, NoteId, NoteTimestamp};

    use super::*;

    #[test]
    fn empty_roster_prompts_to_add() {
        let rendered = render_roster(&RosterState::default());
        assert!(rendered.starts_with("No team members yet"));
    }

    #[test]
    fn lists_members_with_their_notes() {
        let mut ada = MemberDraft::new("Ada", "Engineer", "ada@example.com")
            .into_member(MemberId::from("1"));
        ada.notes.push(Note {
            id: NoteId::from("n1"),
            text: "good sprint".into(),
            timestamp: NoteTimestamp::from("2024-01-02T12:00:00Z"),
            extra: Map::new(),
        });
        let grace =
            MemberDraft::new("Grace", "Lead", "grace@example.com").into_member(MemberId::from("2"));
        let mut state = RosterState::default();
        state.members = vec![ada, grace];

        let rendered = render_roster(&state);
        assert!(rendered.contains("Ada <ada@example.com> - Engineer"));
        assert!(rendered.contains("] good sprint"));
        assert!(rendered.contains("Grace <grace@example.com> - Lead\n  id: 2\n  No notes yet"));
    }

    #[test]
    fn unparseable_note_stamp_renders_as_invalid_date() {
        let mut ada = MemberDraft::new("Ada", "Engineer", "ada@example.com")
            .into_member(MemberId::from("1"));
        ada.notes.push(Note {
            id: NoteId::from("n1"),
            text: "from the old importer".into(),
            timestamp: NoteTimestamp::from(""),
            extra: Map::new(),
        });
        let mut state = RosterState::default();
        state.members = vec![ada];

        let rendered = render_roster(&state);
        assert!(rendered.contains("  [Invalid Date] from the old importer"));
    }
}
