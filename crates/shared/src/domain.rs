use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Random v4 identifier for a record the server has not seen yet.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(MemberId);
id_newtype!(NoteId);

/// When a note was written, exactly as the backend sent it.
///
/// The raw text is kept so a record re-serializes unchanged (offset and
/// precision included) and so a stamp that is not RFC 3339 does not make the
/// whole roster undecodable. Use [`NoteTimestamp::parse`] for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteTimestamp(String);

impl NoteTimestamp {
    /// Current UTC time with millisecond precision and a `Z` suffix.
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` when the stamp is not RFC 3339.
    pub fn parse(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.0.trim()).ok()
    }
}

impl fmt::Display for NoteTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteTimestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A free-text performance note attached to a member.
///
/// Like [`Member`], fields this client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: NoteTimestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Note {
    /// Builds a note stamped with a fresh id and the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NoteId::generate(),
            text: text.into(),
            timestamp: NoteTimestamp::now(),
            extra: Map::new(),
        }
    }
}

/// A team member as the backend represents it.
///
/// `notes` is always present after deserialization: the backend may omit the
/// field or send `null` for a member without notes. Fields this client does
/// not model are kept in `extra` so a stored record re-serializes to the
/// same JSON object the server returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<Note>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input collected by the add-member form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub role: String,
    pub email: String,
}

impl MemberDraft {
    pub fn new(name: impl Into<String>, role: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            email: email.into(),
        }
    }

    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("role", &self.role),
            ("email", &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Creation payload labelled with `id`.
    ///
    /// The id is only a correlation token: the member the server sends back
    /// replaces this one and may carry a different id.
    pub fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            notes: Vec::new(),
            extra: Map::new(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn member_without_notes_field_gets_empty_notes() {
        let member: Member = serde_json::from_value(json!({
            "id": "1",
            "name": "Ada",
            "role": "Engineer",
            "email": "ada@example.com"
        }))
        .expect("member");
        assert!(member.notes.is_empty());
    }

    #[test]
    fn member_with_null_notes_gets_empty_notes() {
        let member: Member = serde_json::from_value(json!({
            "id": "1",
            "name": "Ada",
            "role": "Engineer",
            "email": "ada@example.com",
            "notes": null
        }))
        .expect("member");
        assert!(member.notes.is_empty());
    }

    #[test]
    fn unknown_member_fields_survive_reserialization() {
        let raw = json!({
            "id": "srv-9",
            "name": "Grace",
            "role": "Lead",
            "email": "grace@example.com",
            "notes": [],
            "team": "platform"
        });
        let member: Member = serde_json::from_value(raw.clone()).expect("member");
        assert_eq!(member.extra.get("team"), Some(&json!("platform")));
        assert_eq!(serde_json::to_value(&member).expect("serialize"), raw);
    }

    #[test]
    fn note_keeps_offset_timestamp_and_unknown_fields() {
        let raw = json!({
            "id": "meeting-1",
            "text": "Shipped the release",
            "timestamp": "2024-03-01T09:30:00+02:00",
            "source": "meeting"
        });
        let note: Note = serde_json::from_value(raw.clone()).expect("note");
        assert_eq!(note.extra.get("source"), Some(&json!("meeting")));
        assert_eq!(
            note.timestamp.parse().map(|at| at.with_timezone(&Utc).to_rfc3339()),
            Some("2024-03-01T07:30:00+00:00".to_string())
        );

        let member: Member = serde_json::from_value(json!({
            "id": "1",
            "name": "Ada",
            "role": "Engineer",
            "email": "ada@example.com",
            "notes": [raw.clone()]
        }))
        .expect("member");
        let back = serde_json::to_value(&member).expect("serialize");
        assert_eq!(back["notes"][0], raw);
    }

    #[test]
    fn malformed_or_missing_timestamp_still_decodes() {
        let notes: Vec<Note> = serde_json::from_value(json!([
            { "id": "a", "text": "blank stamp", "timestamp": "" },
            { "id": "b", "text": "odd stamp", "timestamp": "last tuesday" },
            { "id": "c", "text": "no stamp" }
        ]))
        .expect("notes");
        assert!(notes.iter().all(|note| note.timestamp.parse().is_none()));
        assert_eq!(notes[1].timestamp.as_str(), "last tuesday");
    }

    #[test]
    fn fresh_note_stamp_is_utc_rfc3339() {
        let note = Note::new("hello");
        assert!(note.timestamp.as_str().ends_with('Z'));
        assert!(note.timestamp.parse().is_some());
        assert!(note.extra.is_empty());
    }

    #[test]
    fn draft_reports_blank_fields() {
        let draft = MemberDraft::new("Ada", "  ", "");
        assert_eq!(draft.missing_fields(), vec!["role", "email"]);
        assert!(!draft.is_complete());
        assert!(MemberDraft::new("Ada", "Engineer", "ada@example.com").is_complete());
    }

    #[test]
    fn draft_member_starts_with_no_notes() {
        let id = MemberId::generate();
        let member = MemberDraft::new("Ada", "Engineer", "ada@example.com").into_member(id.clone());
        assert_eq!(member.id, id);
        assert!(member.notes.is_empty());
        let body = serde_json::to_value(&member).expect("serialize");
        assert_eq!(body["notes"], json!([]));
        assert_eq!(body["id"], json!(id.as_str()));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(NoteId::generate(), NoteId::generate());
    }
}
