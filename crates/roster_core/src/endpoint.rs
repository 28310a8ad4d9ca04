use std::fmt;

use shared::{
    domain::MemberId,
    protocol::{member_notes_route, process_transcription_route, team_members_route},
};
use url::Url;

use crate::error::RosterError;

pub const DEFAULT_API_HOST: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Base address of the roster REST API, e.g. `http://localhost:8080/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    base: Url,
}

impl ApiEndpoint {
    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        let raw = raw.trim();
        let base = Url::parse(raw).map_err(|err| RosterError::Config {
            address: raw.to_string(),
            reason: err.to_string(),
        })?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(RosterError::Config {
                address: raw.to_string(),
                reason: "expected an http or https url".to_string(),
            });
        }

        Ok(Self { base })
    }

    pub fn from_parts(host: &str, port: u16, prefix: &str) -> Result<Self, RosterError> {
        let prefix = prefix.trim().trim_matches('/');
        if prefix.is_empty() {
            Self::parse(&format!("http://{host}:{port}"))
        } else {
            Self::parse(&format!("http://{host}:{port}/{prefix}"))
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn team_members(&self) -> Url {
        self.url_for(&[team_members_route()])
    }

    pub fn member(&self, member_id: &MemberId) -> Url {
        self.url_for(&[team_members_route(), member_id.as_str()])
    }

    pub fn member_notes(&self, member_id: &MemberId) -> Url {
        self.url_for(&[
            team_members_route(),
            member_id.as_str(),
            member_notes_route(),
        ])
    }

    pub fn process_transcription(&self) -> Url {
        self.url_for(&[process_transcription_route()])
    }

    // Segments are percent-encoded, so ids containing '/' stay one segment.
    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parts_point_at_local_backend() {
        let endpoint =
            ApiEndpoint::from_parts(DEFAULT_API_HOST, DEFAULT_API_PORT, DEFAULT_API_PREFIX)
                .expect("parts");
        assert_eq!(
            endpoint.team_members().as_str(),
            "http://localhost:8080/api/team-members"
        );
        assert_eq!(endpoint.to_string(), "http://localhost:8080/api");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let endpoint = ApiEndpoint::parse("http://roster.internal:9000/api/").expect("parse");
        assert_eq!(
            endpoint.process_transcription().as_str(),
            "http://roster.internal:9000/api/process-transcription"
        );
    }

    #[test]
    fn member_routes_encode_ids_as_single_segments() {
        let endpoint = ApiEndpoint::parse("http://127.0.0.1:8080/api").expect("parse");
        let id = MemberId::from("a/b c");
        assert_eq!(
            endpoint.member(&id).as_str(),
            "http://127.0.0.1:8080/api/team-members/a%2Fb%20c"
        );
        assert_eq!(
            endpoint.member_notes(&MemberId::from("7")).as_str(),
            "http://127.0.0.1:8080/api/team-members/7/notes"
        );
    }

    #[test]
    fn empty_prefix_roots_routes_at_host() {
        let endpoint = ApiEndpoint::from_parts("localhost", 3001, "/").expect("parts");
        assert_eq!(
            endpoint.team_members().as_str(),
            "http://localhost:3001/team-members"
        );
    }

    #[test]
    fn rejects_non_http_addresses() {
        assert!(matches!(
            ApiEndpoint::parse("ftp://example.com/api"),
            Err(RosterError::Config { .. })
        ));
        assert!(matches!(
            ApiEndpoint::parse("not a url"),
            Err(RosterError::Config { .. })
        ));
    }
}
