use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::errors::Error;
use crate::token::{CredentialPair, TokenStore};
use crate::types::{RefreshRequest, RefreshResponse};

use super::{ApiResponse, BeforeSend, PendingRequest};

pub const DEFAULT_USER_AGENT: &str = concat!("healthy-route-client/", env!("CARGO_PKG_VERSION"));

/// Sends single requests against the API base URL. Never retries and never
/// interprets status codes beyond success/failure.
pub struct RequestDispatcher {
    http_client: Client,
    base_url: String,
    store: TokenStore,
    user_agent: String,
}

impl RequestDispatcher {
    pub fn new(http_client: Client, base_url: &reqwest::Url, store: TokenStore) -> Self {
        Self {
            http_client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            store,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn from_config(config: &Config, store: TokenStore) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("could not build HTTP client: {e}")))?;
        let mut dispatcher = Self::new(http_client, &base_url, store);
        if let Some(agent) = config.user_agent.as_ref() {
            dispatcher.user_agent = agent.clone();
        }
        Ok(dispatcher)
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn send(&self, request: PendingRequest) -> Result<ApiResponse, Error> {
        let request = self.before_send(request);
        let url = self.url_for(request.path());

        let mut builder = self
            .http_client
            .request(request.method().clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent.as_str());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|err| {
            if err.is_builder() {
                return Error::Config(format!("invalid request for {url}: {err}"));
            }
            warn!(
                request_id = %request.id(),
                method = %request.method(),
                path = request.path(),
                timeout = err.is_timeout(),
                error = %err,
                "request.network_error"
            );
            Error::Network(err)
        })?;

        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            debug!(
                request_id = %request.id(),
                method = %request.method(),
                path = request.path(),
                status = status.as_u16(),
                "request.ok"
            );
            return Ok(ApiResponse { status, body });
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(
                request_id = %request.id(),
                method = %request.method(),
                path = request.path(),
                status = status.as_u16(),
                retried = request.retried(),
                "request.unauthorized"
            );
        } else {
            warn!(
                request_id = %request.id(),
                method = %request.method(),
                path = request.path(),
                status = status.as_u16(),
                "request.failed"
            );
        }
        Err(Error::server(status, body))
    }

    /// Exchanges a refresh token for a new pair. Sent without a bearer header and
    /// never intercepted.
    pub async fn refresh_exchange(&self, refresh_token: &str) -> Result<CredentialPair, Error> {
        let url = self.url_for("/auth/refresh");
        let resp = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent.as_str())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), "refresh.exchange_rejected");
            return Err(Error::server(status, body));
        }
        let RefreshResponse {
            token,
            refresh_token,
        } = serde_json::from_str(&body)?;
        Ok(CredentialPair::new(token, refresh_token))
    }
}

impl BeforeSend for RequestDispatcher {
    /// Attaches the stored access token unless the request already carries one.
    fn before_send(&self, request: PendingRequest) -> PendingRequest {
        if request.header_value(AUTHORIZATION.as_str()).is_some() {
            return request;
        }
        match self.store.access_token() {
            Ok(Some(token)) => request.with_bearer(&token),
            Ok(None) => request,
            Err(err) => {
                warn!(error = %err, credentials = false, "token_store.read_failed");
                request
            }
        }
    }
}
