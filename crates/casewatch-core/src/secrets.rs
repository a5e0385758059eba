//! Secret storage port.
//!
//! Credentials live in the platform credential store (Secret Service on
//! Linux, Keychain on macOS, Credential Manager on Windows) under the
//! `case-monitor` service name. A missing entry is a configuration
//! error and aborts the run before any network or file activity.

use std::collections::HashMap;
use tracing::debug;

/// Service name used for keyring entries.
pub const SERVICE_NAME: &str = "case-monitor";

/// Keyring key for the recipient address.
pub const RECIPIENT_KEY: &str = "email-address";

/// Keyring key for the sender address.
pub const SENDER_KEY: &str = "gmail-address";

/// Keyring key for the sender password.
pub const PASSWORD_KEY: &str = "gmail-password";

/// Error type for secret-store operations.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Failed to access the platform keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// A required secret is not configured.
    #[error("Secret '{0}' not found in the platform credential store")]
    Missing(&'static str),
}

/// Result type for secret-store operations.
pub type SecretResult<T> = std::result::Result<T, SecretError>;

/// Read-only access to named secrets.
pub trait SecretStore {
    /// Looks up a secret by key. `Ok(None)` means the key is not
    /// configured; errors are reserved for store failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be accessed.
    fn get(&self, key: &str) -> SecretResult<Option<String>>;
}

/// Platform keyring-backed secret store.
#[derive(Debug, Clone, Default)]
pub struct KeyringStore;

impl KeyringStore {
    /// Creates a keyring store under the fixed service name.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, key: &str) -> SecretResult<Option<String>> {
        let entry = keyring::Entry::new(SERVICE_NAME, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!(key, "no keyring entry");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory secret store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    entries: HashMap<String, String>,
}

impl MemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> SecretResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}

/// The three secrets a run needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Recipient address for notification emails.
    pub recipient: String,
    /// Sender address, also the SMTP username.
    pub sender: String,
    /// SMTP password for the sender account.
    pub password: String,
}

impl Credentials {
    /// Loads all three secrets, failing on the first missing one.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Missing`] naming the absent key, or a
    /// store error.
    pub fn load(store: &impl SecretStore) -> SecretResult<Self> {
        let fetch = |key: &'static str| {
            store.get(key)?.ok_or(SecretError::Missing(key))
        };

        Ok(Self {
            recipient: fetch(RECIPIENT_KEY)?,
            sender: fetch(SENDER_KEY)?,
            password: fetch(PASSWORD_KEY)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn full_store() -> MemorySecretStore {
        let mut store = MemorySecretStore::new();
        store.insert(RECIPIENT_KEY, "dest@example.com");
        store.insert(SENDER_KEY, "sender@gmail.com");
        store.insert(PASSWORD_KEY, "app-password");
        store
    }

    #[test]
    fn loads_all_three_secrets() {
        let creds = Credentials::load(&full_store()).unwrap();
        assert_eq!(creds.recipient, "dest@example.com");
        assert_eq!(creds.sender, "sender@gmail.com");
        assert_eq!(creds.password, "app-password");
    }

    #[test]
    fn missing_recipient_names_the_key() {
        let mut store = full_store();
        store.entries.remove(RECIPIENT_KEY);

        let err = Credentials::load(&store).unwrap_err();
        assert!(matches!(err, SecretError::Missing(RECIPIENT_KEY)));
    }

    #[test]
    fn missing_password_names_the_key() {
        let mut store = full_store();
        store.entries.remove(PASSWORD_KEY);

        let err = Credentials::load(&store).unwrap_err();
        assert!(matches!(err, SecretError::Missing(PASSWORD_KEY)));
    }
}
