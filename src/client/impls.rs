use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::{
    AuthenticatedClient,
    config::Config,
    dispatch::{ApiResponse, BeforeSend, OnError, Outcome, PendingRequest, RequestDispatcher},
    errors::Error,
    refresh::{RefreshCoordinator, RefreshState},
    token::{CredentialPair, FileStorage, TokenStore},
    types::{LoginRequest, LoginResponse},
};

impl AuthenticatedClient {
    /// Create a client from configuration.
    ///
    /// Credentials persist in a file scoped to the API origin when
    /// `config.storage_dir` is set, in memory otherwise.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let store = match config.storage_dir.as_ref() {
            Some(dir) => TokenStore::new(Arc::new(FileStorage::for_origin(
                dir,
                &config.base_url()?,
            )?)),
            None => TokenStore::in_memory(),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: &Config, store: TokenStore) -> Result<Self, Error> {
        Ok(Self::from_dispatcher(RequestDispatcher::from_config(
            config, store,
        )?))
    }

    pub fn from_dispatcher(dispatcher: RequestDispatcher) -> Self {
        let store = dispatcher.token_store().clone();
        let dispatcher = Arc::new(dispatcher);
        let coordinator = Arc::new(RefreshCoordinator::new(Arc::clone(&dispatcher)));
        Self {
            dispatcher,
            coordinator,
            store,
        }
    }

    /// Send `request`; a first 401 is resolved through one refresh and one retry.
    ///
    /// Every failure, the retry's included, goes through [`OnError`], which
    /// decides whether the request may be refreshed again.
    pub async fn request(&self, request: PendingRequest) -> Result<ApiResponse, Error> {
        let mut request = self.dispatcher.before_send(request);
        let stale_token = request.bearer_token().map(str::to_string);
        loop {
            let sent = if request.retried() {
                self.coordinator
                    .authorize(request.clone(), stale_token.as_deref())
                    .await
            } else {
                self.dispatcher.send(request.clone()).await
            };
            match sent {
                Ok(resp) => return Ok(resp),
                Err(err) => match self.on_error(err, request) {
                    Outcome::Refresh(next) => request = next,
                    Outcome::Propagate(err) => return Err(err),
                },
            }
        }
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: PendingRequest,
    ) -> Result<T, Error> {
        self.request(request).await?.json()
    }

    /// Exchange email and password for a credential pair and store it.
    ///
    /// Not routed through refresh: a 401 here means bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, Error> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self
            .dispatcher
            .send(PendingRequest::post("/auth/login").json(&body)?)
            .await?
            .json()?;

        match (resp.token.as_ref(), resp.refresh_token.as_ref()) {
            (Some(token), Some(refresh)) => {
                // a refresh still running for the previous session must not touch the new pair
                self.coordinator.invalidate();
                self.store.set(&CredentialPair::new(token, refresh))?;
                info!(email, "login.success");
            }
            (Some(_), None) => {
                // a lone access token is never persisted
                self.coordinator.invalidate();
                self.store.clear()?;
                warn!(email, stored = false, "login.missing_refresh_token");
            }
            _ => warn!(email, "login.no_token"),
        }
        Ok(resp)
    }

    /// Clears stored credentials. Safe to call repeatedly.
    pub fn logout(&self) -> Result<(), Error> {
        self.coordinator.invalidate();
        self.store.clear()?;
        info!("session.logout");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn current_token(&self) -> Result<Option<String>, Error> {
        self.store.access_token()
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.coordinator.state()
    }

    pub fn refresh_count(&self) -> u64 {
        self.coordinator.exchange_count()
    }
}

impl OnError for AuthenticatedClient {
    fn on_error(&self, error: Error, request: PendingRequest) -> Outcome {
        if !error.is_unauthorized() {
            return Outcome::Propagate(error);
        }
        if request.retried() {
            warn!(
                request_id = %request.id(),
                path = request.path(),
                status = 401,
                "request.unauthorized_after_refresh"
            );
            return Outcome::Propagate(error);
        }
        Outcome::Refresh(request.mark_retried())
    }
}
