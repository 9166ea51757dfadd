//! Durable client-side credential storage.
//!
//! The original client keeps two string values (token and login) in browser
//! cookies, read at startup and rewritten on every authentication change.
//! `TokenStorage` captures exactly that get/set contract; the host supplies
//! whatever durable backing it has.

/// The persisted authentication record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub login: String,
}

/// Two string-valued durable entries: token and login.
pub trait TokenStorage {
    /// Read the stored credentials, if any.
    fn load(&self) -> Option<Credentials>;

    /// Persist the credentials, replacing any previous record.
    fn save(&mut self, credentials: &Credentials);

    /// Remove the stored credentials.
    fn clear(&mut self);
}

/// Non-durable storage for tests and hosts without a persistence mechanism.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    credentials: Option<Credentials>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a stored record, as if a previous session had saved one.
    pub fn with_credentials(token: &str, login: &str) -> Self {
        Self {
            credentials: Some(Credentials {
                token: token.to_string(),
                login: login.to_string(),
            }),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Option<Credentials> {
        self.credentials.clone()
    }

    fn save(&mut self, credentials: &Credentials) {
        self.credentials = Some(credentials.clone());
    }

    fn clear(&mut self) {
        self.credentials = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_roundtrips() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load().is_none());
        let creds = Credentials {
            token: "tok".to_string(),
            login: "ada".to_string(),
        };
        storage.save(&creds);
        assert_eq!(storage.load(), Some(creds));
    }

    #[test]
    fn clear_removes_the_record() {
        let mut storage = MemoryStorage::with_credentials("tok", "ada");
        storage.clear();
        assert!(storage.load().is_none());
    }
}
