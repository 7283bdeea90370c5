//! Static credential seed data.
//!
//! Both stores are built once at startup and only read afterwards.

use std::collections::{HashMap, HashSet};

use super::config::ConfigValidationError;

/// Username to bcrypt hash mapping for Basic-Auth.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from `(username, password_hash)` pairs.
    ///
    /// Usernames must be unique and non-empty.
    pub fn new<I, U, H>(records: I) -> Result<Self, ConfigValidationError>
    where
        I: IntoIterator<Item = (U, H)>,
        U: Into<String>,
        H: Into<String>,
    {
        let mut users = HashMap::new();
        for (username, hash) in records {
            let username = username.into();
            if username.is_empty() {
                return Err(ConfigValidationError::InvalidBasicAuthEntry(
                    "empty username".to_string(),
                ));
            }
            if users.contains_key(&username) {
                return Err(ConfigValidationError::DuplicateUser(username));
            }
            users.insert(username, hash.into());
        }
        Ok(Self { users })
    }

    /// Build a store from `user:hash` entries, the format used in config files.
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self, ConfigValidationError> {
        let records = entries
            .iter()
            .map(|entry| {
                let entry = entry.as_ref();
                entry
                    .split_once(':')
                    .ok_or_else(|| ConfigValidationError::InvalidBasicAuthEntry(entry.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(records)
    }

    pub fn password_hash(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// External identity IDs permitted to sign in through the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: HashSet<u64>,
}

impl AllowList {
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u64> for AllowList {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
