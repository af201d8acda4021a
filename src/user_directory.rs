use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("User {0} could not be found")]
pub struct UserNotFound(pub String);

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Error reading user table {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error decoding user table {path}")]
    Decode {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Duplicate user id {0} in user table")]
    DuplicateId(u64),
}

/// Resolves user identifiers to user records.
pub trait UserDirectory {
    fn lookup(&self, identifier: &str) -> Result<UserRecord, UserNotFound>;
}

#[derive(Debug, Deserialize)]
struct UserTable {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// User table held in memory, keyed by numeric user id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: HashMap<u64, UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn new(records: impl IntoIterator<Item = UserRecord>) -> Result<Self, DirectoryError> {
        let mut users = HashMap::new();
        for record in records {
            let id = record.id;
            if users.insert(id, record).is_some() {
                return Err(DirectoryError::DuplicateId(id));
            }
        }
        Ok(Self { users })
    }

    /// Loads a TOML file made of `[[users]]` tables.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let table: UserTable = toml::from_str(&contents).map_err(|source| DirectoryError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let directory = Self::new(table.users)?;
        log::info!(
            "[DIRECTORY] Loaded {} user(s) from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    /// Only plain decimal ids match: no sign, no surrounding whitespace.
    fn lookup(&self, identifier: &str) -> Result<UserRecord, UserNotFound> {
        Some(identifier)
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|id| id.parse::<u64>().ok())
            .and_then(|id| self.users.get(&id))
            .cloned()
            .ok_or_else(|| UserNotFound(identifier.to_string()))
    }
}
