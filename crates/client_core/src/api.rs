//! reqwest-backed gateway to the adoption REST backend. Implements the
//! fetch and submission seams the controllers are injected with.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AnimalSummary, CreatedAccount, FileRecord, OngSummary, RegistrationDto, UserId},
    error::{ApiError, ErrorCode},
    page::{Page, Query},
};
use url::Url;

use crate::{
    collection::PageFetcher,
    error::ClientError,
    forms::PictureAsset,
    wizard::RegistrationBackend,
};

/// One fixed request timeout for every call, configured at construction.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000".into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authenticated-session handle, read-only from this core's perspective.
/// Passed in explicitly instead of living in ambient shared state.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
}

pub struct AdoptionApi {
    http: Client,
    base_url: String,
    session: Option<Session>,
}

impl AdoptionApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|_| ClientError::BaseUrl(config.api_url.clone()))?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Some(session) => builder.bearer_auth(&session.token),
            None => builder,
        }
    }

    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<Page<T>, ClientError> {
        let response = self
            .authorized(self.http.get(format!("{}{path}", self.base_url)))
            .query(&query.query_pairs())
            .send()
            .await?;
        decode_json(check_status(response).await?).await
    }

    pub async fn list_animals(&self, query: &Query) -> Result<Page<AnimalSummary>, ClientError> {
        self.fetch_listing("/animals", query).await
    }

    pub async fn list_ongs(&self, query: &Query) -> Result<Page<OngSummary>, ClientError> {
        self.fetch_listing("/users/ongs", query).await
    }

    pub async fn create_account(
        &self,
        dto: &RegistrationDto,
    ) -> Result<CreatedAccount, ClientError> {
        let response = self
            .authorized(self.http.post(format!("{}/users", self.base_url)))
            .json(dto)
            .send()
            .await?;
        decode_json(check_status(response).await?).await
    }

    /// Uploads a profile picture for `owner`. An asset without a binary
    /// payload means "nothing to upload" and resolves to `Ok(None)`.
    pub async fn upload_picture(
        &self,
        owner: UserId,
        asset: &PictureAsset,
    ) -> Result<Option<FileRecord>, ClientError> {
        let Some(bytes) = asset.bytes.clone() else {
            return Ok(None);
        };

        let mut part = multipart::Part::bytes(bytes).file_name(asset.filename.clone());
        if let Some(mime) = &asset.mime_type {
            part = part.mime_str(mime)?;
        }
        let form = multipart::Form::new().part("file", part);

        let response = self
            .authorized(
                self.http
                    .post(format!("{}/users/{}/image", self.base_url, owner.0)),
            )
            .multipart(form)
            .send()
            .await?;
        let record: FileRecord = decode_json(check_status(response).await?).await?;
        Ok(Some(record))
    }
}

/// Maps non-2xx responses to [`ClientError::Api`], decoding the backend's
/// error body when it sends one.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ApiError>(&text)
        .unwrap_or_else(|_| ApiError::new(ErrorCode::Internal, text));
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ClientError::Decode(err.to_string()))
}

#[async_trait]
impl PageFetcher<AnimalSummary> for AdoptionApi {
    async fn fetch_page(&self, query: &Query) -> Result<Page<AnimalSummary>, ClientError> {
        self.list_animals(query).await
    }
}

#[async_trait]
impl PageFetcher<OngSummary> for AdoptionApi {
    async fn fetch_page(&self, query: &Query) -> Result<Page<OngSummary>, ClientError> {
        self.list_ongs(query).await
    }
}

#[async_trait]
impl RegistrationBackend for AdoptionApi {
    async fn create_account(&self, dto: &RegistrationDto) -> Result<CreatedAccount, ClientError> {
        AdoptionApi::create_account(self, dto).await
    }

    async fn upload_picture(
        &self,
        owner: UserId,
        asset: &PictureAsset,
    ) -> Result<Option<FileRecord>, ClientError> {
        AdoptionApi::upload_picture(self, owner, asset).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
