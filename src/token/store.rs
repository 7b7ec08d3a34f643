use std::sync::Arc;

use tracing::warn;

use crate::errors::Error;
use crate::types::HealthProfile;

use super::{CredentialPair, MemoryStorage, Storage};

pub const ACCESS_TOKEN_KEY: &str = "jwtToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const PROFILE_KEY: &str = "userProfile";

/// Persists the current credential pair. Holds no refresh logic of its own.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Current pair, or `None` when either half is missing.
    pub fn get(&self) -> Result<Option<CredentialPair>, Error> {
        let access = self.storage.get_item(ACCESS_TOKEN_KEY)?;
        let refresh = self.storage.get_item(REFRESH_TOKEN_KEY)?;
        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(Some(CredentialPair::new(access, refresh))),
            (None, None) => Ok(None),
            (access, _) => {
                warn!(
                    has_access = access.is_some(),
                    treated_as = "signed_out",
                    "token_store.partial_pair"
                );
                Ok(None)
            }
        }
    }

    pub fn set(&self, pair: &CredentialPair) -> Result<(), Error> {
        self.storage.set_items(&[
            (ACCESS_TOKEN_KEY, pair.access_token.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
        ])
    }

    /// Removes the pair and the cached profile. Idempotent.
    pub fn clear(&self) -> Result<(), Error> {
        self.storage
            .remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, PROFILE_KEY])
    }

    pub fn access_token(&self) -> Result<Option<String>, Error> {
        Ok(self.get()?.map(|pair| pair.access_token))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }

    pub fn cache_profile(&self, profile: &HealthProfile) -> Result<(), Error> {
        let raw = serde_json::to_string(profile)?;
        self.storage.set_items(&[(PROFILE_KEY, raw.as_str())])
    }

    pub fn cached_profile(&self) -> Result<Option<HealthProfile>, Error> {
        match self.storage.get_item(PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
