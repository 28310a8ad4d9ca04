//! HTTP access to the roster backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Member, MemberId, Note},
    error::ApiErrorBody,
    protocol::TranscriptionRequest,
};
use tracing::debug;

use crate::{endpoint::ApiEndpoint, error::RosterError};

/// The backend operations the roster depends on.
///
/// Every call is a single request with no retry; any non-2xx status is an
/// error regardless of the body.
#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn list_members(&self) -> Result<Vec<Member>, RosterError>;
    async fn create_member(&self, member: &Member) -> Result<Member, RosterError>;
    async fn add_note(&self, member_id: &MemberId, note: &Note) -> Result<Member, RosterError>;
    async fn delete_member(&self, member_id: &MemberId) -> Result<(), RosterError>;
    async fn process_transcription(&self, transcription: &str) -> Result<Value, RosterError>;
}

pub struct HttpRosterApi {
    http: Client,
    endpoint: ApiEndpoint,
}

impl HttpRosterApi {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: ApiEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn list_members(&self) -> Result<Vec<Member>, RosterError> {
        let res = self.http.get(self.endpoint.team_members()).send().await?;
        decode_json(res).await
    }

    async fn create_member(&self, member: &Member) -> Result<Member, RosterError> {
        let res = self
            .http
            .post(self.endpoint.team_members())
            .json(member)
            .send()
            .await?;
        decode_json(res).await
    }

    async fn add_note(&self, member_id: &MemberId, note: &Note) -> Result<Member, RosterError> {
        let res = self
            .http
            .put(self.endpoint.member_notes(member_id))
            .json(note)
            .send()
            .await?;
        decode_json(res).await
    }

    async fn delete_member(&self, member_id: &MemberId) -> Result<(), RosterError> {
        let res = self
            .http
            .delete(self.endpoint.member(member_id))
            .send()
            .await?;
        ensure_success(res).await?;
        Ok(())
    }

    async fn process_transcription(&self, transcription: &str) -> Result<Value, RosterError> {
        let res = self
            .http
            .post(self.endpoint.process_transcription())
            .json(&TranscriptionRequest {
                transcription: transcription.to_string(),
            })
            .send()
            .await?;
        let body = ensure_success(res).await?.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn ensure_success(res: Response) -> Result<Response, RosterError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "roster backend rejected request");
    Err(RosterError::Status {
        status: status.as_u16(),
        message: ApiErrorBody::message_from(&body),
    })
}

pub(crate) async fn decode_json<T: DeserializeOwned>(res: Response) -> Result<T, RosterError> {
    let body = ensure_success(res).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
