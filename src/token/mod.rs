mod pair;
mod storage;
mod store;

pub use pair::CredentialPair;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{ACCESS_TOKEN_KEY, PROFILE_KEY, REFRESH_TOKEN_KEY, TokenStore};
