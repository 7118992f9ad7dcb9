//! Token persistence behind an injectable store interface.
//!
//! The session token lives in the OS keyring under a fixed service/account
//! pair. Everything above this module talks to the [`TokenStore`] trait so
//! tests can swap in an in-memory store.

use keyring::Entry;
use std::error::Error;
use std::fmt;

const KEYRING_SERVICE: &str = "moodline";
const KEYRING_ACCOUNT: &str = "access-token";

/// Failure while reading or writing the credential backend.
#[derive(Debug)]
pub struct TokenStoreError(keyring::Error);

impl fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential storage error: {}", self.0)
    }
}

impl Error for TokenStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<keyring::Error> for TokenStoreError {
    fn from(err: keyring::Error) -> Self {
        Self(err)
    }
}

/// Persistent storage for the one opaque session token.
pub trait TokenStore {
    /// Read the persisted token. A missing entry is `Ok(None)`, not an error.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    fn store(&mut self, token: &str) -> Result<(), TokenStoreError>;

    /// Delete the persisted token. Deleting an absent entry is fine.
    fn clear(&mut self) -> Result<(), TokenStoreError>;
}

/// OS-keyring-backed store used by the real application.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry, TokenStoreError> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?)
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&mut self, token: &str) -> Result<(), TokenStoreError> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), TokenStoreError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Volatile store for tests and keyring-less environments.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.clone())
    }

    fn store(&mut self, token: &str) -> Result<(), TokenStoreError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), TokenStoreError> {
        self.token = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_a_token() {
        let mut store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.store("tok123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok123"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clearing_an_absent_token_is_not_an_error() {
        let mut store = MemoryTokenStore::new();
        assert!(store.clear().is_ok());
        assert!(store.clear().is_ok());
    }
}
