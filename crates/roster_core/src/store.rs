//! Roster state container and its transitions.

use shared::domain::{Member, MemberId};

/// Client-side cache of the backend roster.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterState {
    pub members: Vec<Member>,
    /// True while at least one load is in flight.
    pub loading: bool,
    pub last_error: Option<String>,
    pending_loads: usize,
}

impl RosterState {
    pub fn member(&self, member_id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == member_id)
    }

    fn finish_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        self.loading = self.pending_loads > 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RosterAction {
    LoadStarted,
    LoadSucceeded(Vec<Member>),
    LoadFailed(String),
    /// The view that asked for the load went away; only its in-flight
    /// count is released.
    LoadCancelled,
    MemberAdded(Member),
    NoteAdded {
        member_id: MemberId,
        member: Member,
    },
    MemberRemoved(MemberId),
    OperationFailed(String),
    ErrorCleared,
}

pub fn reduce(state: &mut RosterState, action: RosterAction) {
    match action {
        RosterAction::LoadStarted => {
            state.pending_loads += 1;
            state.loading = true;
            state.last_error = None;
        }
        RosterAction::LoadSucceeded(members) => {
            state.members = members;
            state.finish_load();
        }
        RosterAction::LoadFailed(message) => {
            state.finish_load();
            state.last_error = Some(message);
        }
        RosterAction::LoadCancelled => state.finish_load(),
        RosterAction::MemberAdded(member) => {
            state.members.push(member);
        }
        RosterAction::NoteAdded { member_id, member } => {
            // Server wins: the returned record replaces the local one wholesale.
            for existing in state.members.iter_mut().filter(|m| m.id == member_id) {
                *existing = member.clone();
            }
        }
        RosterAction::MemberRemoved(member_id) => {
            state.members.retain(|member| member.id != member_id);
        }
        RosterAction::OperationFailed(message) => {
            state.last_error = Some(message);
        }
        RosterAction::ErrorCleared => {
            state.last_error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;
    use shared::domain::{MemberDraft, Note, NoteId, NoteTimestamp};

    use super::*;

    fn member(id: &str, notes: &[&str]) -> Member {
        let mut member = MemberDraft::new(format!("member {id}"), "Engineer", "m@example.com")
            .into_member(MemberId::from(id));
        member.notes = notes
            .iter()
            .map(|text| Note {
                id: NoteId::from(*text),
                text: (*text).to_string(),
                timestamp: NoteTimestamp::from("2024-01-01T00:00:00Z"),
                extra: Map::new(),
            })
            .collect();
        member
    }

    fn state_with(members: Vec<Member>) -> RosterState {
        RosterState {
            members,
            ..RosterState::default()
        }
    }

    #[test]
    fn load_cycle_toggles_loading_and_replaces_members() {
        let mut state = state_with(vec![member("old", &[])]);
        state.last_error = Some("stale".into());

        reduce(&mut state, RosterAction::LoadStarted);
        assert!(state.loading);
        assert_eq!(state.last_error, None);

        reduce(&mut state, RosterAction::LoadSucceeded(vec![member("1", &[])]));
        assert!(!state.loading);
        assert_eq!(state.members, vec![member("1", &[])]);
    }

    #[test]
    fn load_failure_keeps_last_known_members() {
        let mut state = state_with(vec![member("1", &["a"])]);
        reduce(&mut state, RosterAction::LoadStarted);
        reduce(&mut state, RosterAction::LoadFailed("boom".into()));
        assert!(!state.loading);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
        assert_eq!(state.members, vec![member("1", &["a"])]);
    }

    #[test]
    fn cancelled_load_only_resets_flag() {
        let mut state = state_with(vec![member("1", &[])]);
        reduce(&mut state, RosterAction::LoadStarted);
        reduce(&mut state, RosterAction::LoadCancelled);
        assert!(!state.loading);
        assert_eq!(state.members, vec![member("1", &[])]);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn cancelled_load_keeps_flag_while_another_is_pending() {
        let mut state = RosterState::default();
        reduce(&mut state, RosterAction::LoadStarted);
        reduce(&mut state, RosterAction::LoadStarted);

        reduce(&mut state, RosterAction::LoadCancelled);
        assert!(state.loading);

        reduce(&mut state, RosterAction::LoadSucceeded(vec![member("1", &[])]));
        assert!(!state.loading);
        assert_eq!(state.members, vec![member("1", &[])]);
    }

    #[test]
    fn stray_load_completion_does_not_underflow() {
        let mut state = RosterState::default();
        reduce(&mut state, RosterAction::LoadCancelled);
        assert!(!state.loading);
        reduce(&mut state, RosterAction::LoadStarted);
        assert!(state.loading);
    }

    #[test]
    fn member_added_appends_at_end() {
        let mut state = state_with(vec![member("1", &[])]);
        reduce(&mut state, RosterAction::MemberAdded(member("2", &[])));
        let ids: Vec<_> = state.members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn note_added_replaces_whole_member() {
        let mut state = state_with(vec![member("1", &["local-a", "local-b"]), member("2", &["x"])]);
        reduce(
            &mut state,
            RosterAction::NoteAdded {
                member_id: MemberId::from("1"),
                member: member("1", &["server"]),
            },
        );
        assert_eq!(state.members[0], member("1", &["server"]));
        assert_eq!(state.members[1], member("2", &["x"]));
    }

    #[test]
    fn note_added_for_unknown_member_changes_nothing() {
        let mut state = state_with(vec![member("1", &["a"])]);
        let before = state.clone();
        reduce(
            &mut state,
            RosterAction::NoteAdded {
                member_id: MemberId::from("9"),
                member: member("9", &["b"]),
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn member_removed_keeps_others_in_order() {
        let mut state = state_with(vec![
            member("1", &["a"]),
            member("2", &["b"]),
            member("3", &["c", "d"]),
        ]);
        reduce(&mut state, RosterAction::MemberRemoved(MemberId::from("2")));
        assert_eq!(state.members, vec![member("1", &["a"]), member("3", &["c", "d"])]);
    }

    #[test]
    fn new_error_replaces_previous_one() {
        let mut state = RosterState::default();
        reduce(&mut state, RosterAction::OperationFailed("first".into()));
        reduce(&mut state, RosterAction::OperationFailed("second".into()));
        assert_eq!(state.last_error.as_deref(), Some("second"));
        reduce(&mut state, RosterAction::ErrorCleared);
        assert_eq!(state.last_error, None);
    }
}
