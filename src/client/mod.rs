use std::sync::Arc;

use crate::dispatch::RequestDispatcher;
use crate::refresh::RefreshCoordinator;
use crate::token::TokenStore;

mod api;
mod impls;

/// Public entry point: sends requests with the stored credential and recovers
/// from access-token expiry transparently.
///
/// Clones share one coordinator; separately constructed clients never
/// coordinate with each other.
#[derive(Clone)]
pub struct AuthenticatedClient {
    dispatcher: Arc<RequestDispatcher>,
    coordinator: Arc<RefreshCoordinator>,
    store: TokenStore,
}
