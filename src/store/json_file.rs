use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cipher::{self, FieldCipher};
use super::{StoreError, UserRepository};
use crate::models::User;

#[derive(Serialize, Deserialize)]
struct UsersFile {
    users: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Users kept in a single pretty-printed JSON document.
///
/// With a cipher, phone numbers are encrypted on save. Loading accepts both
/// encrypted and plain-text phones.
pub struct JsonFileStore {
    path: PathBuf,
    cipher: Option<FieldCipher>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cipher: None,
        }
    }

    /// Opens the store, encrypting phones when `encryption_key` is set.
    pub fn open(path: impl Into<PathBuf>, encryption_key: Option<&str>) -> Self {
        let store = Self::new(path);
        match encryption_key {
            Some(key) => store.with_cipher(FieldCipher::new(key)),
            None => {
                tracing::warn!("DATA_ENCRYPTION_KEY not set, phone numbers are stored in plain text");
                store
            }
        }
    }

    fn with_cipher(mut self, cipher: FieldCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    fn decode_phone(&self, stored: &str) -> Result<String, StoreError> {
        match &self.cipher {
            Some(c) => c.decrypt(stored),
            None if cipher::is_encrypted(stored) => Err(StoreError::Cipher(
                "users file holds encrypted phones but DATA_ENCRYPTION_KEY is not set".to_string(),
            )),
            None => Ok(stored.to_string()),
        }
    }
}

impl UserRepository for JsonFileStore {
    fn load_all(&self) -> Result<Vec<User>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "users file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut file: UsersFile = serde_json::from_str(&raw)?;
        for user in &mut file.users {
            user.phone = self.decode_phone(&user.phone)?;
        }
        Ok(file.users)
    }

    fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut users = users.to_vec();
        if let Some(c) = &self.cipher {
            for user in &mut users {
                user.phone = c.encrypt(&user.phone)?;
            }
        }

        let count = users.len();
        let file = UsersFile {
            users,
            updated_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write beside the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::info!(path = %self.path.display(), count, "saved users");
        Ok(())
    }
}
