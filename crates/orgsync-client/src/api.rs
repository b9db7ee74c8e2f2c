//! Backend seams and their HTTP implementation.
//!
//! [`OrganizationApi`] covers the REST calls and [`EventTransport`] opens the
//! push stream. The loader, subscriber, and orchestrator are generic over them
//! so tests can substitute in-memory backends.

use std::future::Future;
use std::time::Duration;

use futures_util::StreamExt as _;
use futures_util::stream::BoxStream;
use orgsync_config::{ApiConfig, OrgsyncConfig};
use orgsync_core::Id;
use orgsync_core::drafts::{AddressDraft, CoordinatesDraft, NewOrganization, OrganizationPatch};
use orgsync_core::entities::{Address, Coordinates, OrganizationEnvelope};
use orgsync_core::enums::OrganizationType;
use orgsync_core::responses::CreatedId;
use reqwest::Method;
use reqwest::header::{ACCEPT, CACHE_CONTROL};

use crate::endpoints;
use crate::error::ClientError;
use crate::http::{check_response, expect_created, read_json};

/// Raw byte chunks of the event stream.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ClientError>>;

// ── Seams ──────────────────────────────────────────────────────────

/// REST operations against the organization backend.
///
/// Creation calls succeed only on 201; a 401 is reported as
/// [`ClientError::Unauthorized`] everywhere.
pub trait OrganizationApi: Send + Sync {
    fn list_organizations(
        &self,
    ) -> impl Future<Output = Result<Vec<OrganizationEnvelope>, ClientError>> + Send;

    fn list_addresses(&self) -> impl Future<Output = Result<Vec<Address>, ClientError>> + Send;

    fn list_coordinates(
        &self,
    ) -> impl Future<Output = Result<Vec<Coordinates>, ClientError>> + Send;

    /// Returns the id of the new record.
    fn create_coordinates(
        &self,
        draft: &CoordinatesDraft,
    ) -> impl Future<Output = Result<Id, ClientError>> + Send;

    /// Returns the id of the new record.
    fn create_address(
        &self,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Id, ClientError>> + Send;

    fn create_organization(
        &self,
        body: &NewOrganization,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn update_organization(
        &self,
        id: Id,
        patch: &OrganizationPatch,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Returns the ids the backend deleted.
    fn delete_organization(
        &self,
        id: Id,
    ) -> impl Future<Output = Result<Vec<Id>, ClientError>> + Send;

    /// Returns the ids the backend deleted.
    fn delete_by_type(
        &self,
        kind: OrganizationType,
    ) -> impl Future<Output = Result<Vec<Id>, ClientError>> + Send;
}

/// Opens the server-push connection.
pub trait EventTransport: Send + Sync {
    /// Connect and return the body as a stream of byte chunks. Dropping the
    /// stream closes the connection.
    fn connect(&self) -> impl Future<Output = Result<ByteStream, ClientError>> + Send;
}

// ── HTTP implementation ────────────────────────────────────────────

/// reqwest-backed implementation of both seams.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    api: ApiConfig,
    stream_url: String,
}

impl HttpApi {
    /// Build a client from configuration.
    ///
    /// No client-wide timeout is set: it would cut the event stream. REST calls
    /// get `api.request_timeout_secs` per request when configured.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the configuration does not validate,
    /// or [`ClientError::Http`] if the underlying `reqwest::Client` fails to
    /// build.
    pub fn new(config: &OrgsyncConfig) -> Result<Self, ClientError> {
        config
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.as_str())
            .build()?;
        Ok(Self {
            http,
            api: config.api.clone(),
            stream_url: config.stream_url(),
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.api.url(path));
        match self.api.request_timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let resp = check_response(self.request(Method::GET, path).send().await?).await?;
        read_json(resp).await
    }
}

impl OrganizationApi for HttpApi {
    async fn list_organizations(&self) -> Result<Vec<OrganizationEnvelope>, ClientError> {
        self.get_json(endpoints::ORGANIZATIONS).await
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, ClientError> {
        self.get_json(endpoints::ADDRESSES).await
    }

    async fn list_coordinates(&self) -> Result<Vec<Coordinates>, ClientError> {
        self.get_json(endpoints::COORDINATES).await
    }

    async fn create_coordinates(&self, draft: &CoordinatesDraft) -> Result<Id, ClientError> {
        let resp = self
            .request(Method::POST, endpoints::CREATE_COORDINATES)
            .json(draft)
            .send()
            .await?;
        let created: CreatedId = read_json(expect_created(resp).await?).await?;
        Ok(created.id)
    }

    async fn create_address(&self, draft: &AddressDraft) -> Result<Id, ClientError> {
        let resp = self
            .request(Method::POST, endpoints::CREATE_ADDRESS)
            .json(draft)
            .send()
            .await?;
        let created: CreatedId = read_json(expect_created(resp).await?).await?;
        Ok(created.id)
    }

    async fn create_organization(&self, body: &NewOrganization) -> Result<(), ClientError> {
        let resp = self
            .request(Method::POST, endpoints::CREATE_ORGANIZATION)
            .json(body)
            .send()
            .await?;
        expect_created(resp).await?;
        Ok(())
    }

    async fn update_organization(
        &self,
        id: Id,
        patch: &OrganizationPatch,
    ) -> Result<(), ClientError> {
        let resp = self
            .request(Method::PATCH, &endpoints::update_organization(id))
            .json(patch)
            .send()
            .await?;
        check_response(resp).await?;
        Ok(())
    }

    async fn delete_organization(&self, id: Id) -> Result<Vec<Id>, ClientError> {
        let resp = self
            .request(Method::DELETE, &endpoints::delete_organization(id))
            .send()
            .await?;
        read_json(check_response(resp).await?).await
    }

    async fn delete_by_type(&self, kind: OrganizationType) -> Result<Vec<Id>, ClientError> {
        let resp = self
            .request(Method::DELETE, endpoints::DELETE_BY_TYPE)
            .json(&kind)
            .send()
            .await?;
        read_json(check_response(resp).await?).await
    }
}

impl EventTransport for HttpApi {
    async fn connect(&self) -> Result<ByteStream, ClientError> {
        let resp = self
            .http
            .get(&self.stream_url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let resp = check_response(resp).await?;
        tracing::debug!(url = %self.stream_url, status = %resp.status(), "event stream opened");

        Ok(resp
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ClientError::from))
            .boxed())
    }
}
