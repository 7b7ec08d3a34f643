use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use tokio::sync::oneshot;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::dispatch::{ApiResponse, PendingRequest, RequestDispatcher};
use crate::errors::Error;
use crate::telemetry::refresh::{RefreshOutcome, RefreshTelemetry};
use crate::token::{CredentialPair, TokenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// What a waiter is released with: the new access token, or the reason the session ended.
type Release = Result<String, String>;

struct Waiter {
    request_id: Uuid,
    tx: oneshot::Sender<Release>,
}

struct Inner {
    state: RefreshState,
    waiters: VecDeque<Waiter>,
    telemetry: Option<RefreshTelemetry>,
    // bumped by login and logout; an exchange started under an older epoch must not touch the store
    epoch: u64,
    exchanges: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    dispatcher: Arc<RequestDispatcher>,
    store: TokenStore,
}

enum Admission {
    /// The stored token was already rotated past the one that failed.
    Current(String),
    Wait(oneshot::Receiver<Release>),
}

/// Guarantees at most one refresh exchange in flight and fans its outcome out to
/// every request that needs it.
///
/// State and the waiter queue sit behind one lock that is never held across an
/// await, so the Idle check and the transition to Refreshing cannot interleave
/// with another caller. The exchange runs on its own task: a caller that goes
/// away mid-refresh cannot leave the others waiting.
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
}

impl RefreshCoordinator {
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        let store = dispatcher.token_store().clone();
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: RefreshState::Idle,
                    waiters: VecDeque::new(),
                    telemetry: None,
                    epoch: 0,
                    exchanges: 0,
                }),
                dispatcher,
                store,
            }),
        }
    }

    pub fn state(&self) -> RefreshState {
        self.shared.lock().state
    }

    /// Number of refresh exchanges started by this coordinator.
    pub fn exchange_count(&self) -> u64 {
        self.shared.lock().exchanges
    }

    /// Detaches any exchange still in flight from the store: its waiters get
    /// `AuthExpired` and whatever it returns is neither stored nor cleared.
    pub fn invalidate(&self) {
        let mut inner = self.shared.lock();
        inner.epoch += 1;
        debug!(epoch = inner.epoch, state = ?inner.state, "refresh.invalidated");
    }

    /// Obtains a usable access token (refreshing or waiting on the refresh in
    /// flight) and re-sends `request` with it exactly once.
    ///
    /// `stale_token` is the token the request originally failed with.
    pub async fn authorize(
        &self,
        request: PendingRequest,
        stale_token: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let token = self.acquire(request.id(), stale_token).await?;
        debug!(request_id = %request.id(), path = request.path(), "refresh.retrying_request");
        self.shared
            .dispatcher
            .send(request.with_bearer(&token))
            .await
    }

    async fn acquire(&self, request_id: Uuid, stale_token: Option<&str>) -> Result<String, Error> {
        let (admission, start_epoch) = self.admit(request_id, stale_token)?;
        let rx = match admission {
            Admission::Current(token) => return Ok(token),
            Admission::Wait(rx) => rx,
        };

        if let Some(epoch) = start_epoch {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move { shared.run_exchange(epoch).await });
        }

        match rx.await {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(reason)) => Err(Error::AuthExpired(reason)),
            Err(_) => Err(Error::AuthExpired(
                "refresh exchange was abandoned before completing".into(),
            )),
        }
    }

    // check-then-set; must not contain an await
    fn admit(
        &self,
        request_id: Uuid,
        stale_token: Option<&str>,
    ) -> Result<(Admission, Option<u64>), Error> {
        let mut inner = self.shared.lock();
        let mut start_epoch = None;
        if inner.state == RefreshState::Idle {
            if let Some(current) = self.shared.store.access_token()?
                && Some(current.as_str()) != stale_token
            {
                debug!(request_id = %request_id, reason = "token_rotated", "refresh.skipped");
                return Ok((Admission::Current(current), None));
            }
            inner.state = RefreshState::Refreshing;
            inner.exchanges += 1;
            inner.telemetry = Some(RefreshTelemetry::new("auth.refresh"));
            start_epoch = Some(inner.epoch);
        }

        let (tx, rx) = oneshot::channel();
        inner.waiters.push_back(Waiter { request_id, tx });
        let position = inner.waiters.len();
        if let Some(telemetry) = inner.telemetry.as_ref() {
            telemetry.emit_enqueued(request_id, position);
        }
        Ok((Admission::Wait(rx), start_epoch))
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Inner stays consistent across a panic elsewhere; recover it
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn run_exchange(&self, epoch: u64) {
        let telemetry = self
            .lock()
            .telemetry
            .clone()
            .unwrap_or_else(|| RefreshTelemetry::new("auth.refresh"));
        telemetry.emit_start(SystemTime::now());

        let exchanged = self.exchange().await;
        let (waiters, result) = self.finish(epoch, exchanged);

        match &result {
            Ok(_) => telemetry.emit_success(RefreshOutcome::Success, waiters.len(), SystemTime::now()),
            Err(err) => telemetry.emit_failure(err, waiters.len(), SystemTime::now()),
        }

        let release: Release = result.map_err(|err| match err {
            Error::AuthExpired(reason) => reason,
            other => other.to_string(),
        });
        for (index, waiter) in waiters.into_iter().enumerate() {
            // receiver gone means the caller stopped caring; nothing to do
            if waiter.tx.send(release.clone()).is_err() {
                telemetry.emit_release_dropped(waiter.request_id);
            } else {
                telemetry.emit_released(waiter.request_id, index + 1);
            }
        }
    }

    async fn exchange(&self) -> Result<CredentialPair, Error> {
        let pair = self
            .store
            .get()?
            .ok_or_else(|| Error::AuthExpired("no refresh token available".into()))?;
        self.dispatcher.refresh_exchange(&pair.refresh_token).await
    }

    /// Stores or clears credentials, returns to Idle and hands back the drained queue.
    ///
    /// An exchange from a session that has since been ended or replaced leaves
    /// the store alone.
    fn finish(
        &self,
        epoch: u64,
        exchanged: Result<CredentialPair, Error>,
    ) -> (VecDeque<Waiter>, Result<String, Error>) {
        let mut inner = self.lock();
        let result = if inner.epoch != epoch {
            debug!(started = epoch, current = inner.epoch, "refresh.result_discarded");
            Err(Error::AuthExpired(
                "session changed while the refresh was in flight".into(),
            ))
        } else {
            let stored =
                exchanged.and_then(|pair| self.store.set(&pair).map(|()| pair.access_token));
            if let Err(err) = &stored {
                if let Err(clear_err) = self.store.clear() {
                    error!(error = %clear_err, "refresh.clear_failed");
                }
                info!(reason = %err, "refresh.credentials_cleared");
            }
            stored
        };
        inner.state = RefreshState::Idle;
        inner.telemetry = None;
        (std::mem::take(&mut inner.waiters), result)
    }
}
