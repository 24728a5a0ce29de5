pub mod cipher;
pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed user data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encryption error: {0}")]
    Cipher(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-set persistence for user records.
///
/// Callers own the locking: hold one lock across `load_all`, the mutation and
/// `save_all` so a reminder sweep and an inbound reply can't lose each other's
/// updates.
pub trait UserRepository: Send + Sync {
    fn load_all(&self) -> Result<Vec<User>, StoreError>;
    fn save_all(&self, users: &[User]) -> Result<(), StoreError>;
}

pub fn find_by_phone<'a>(users: &'a mut [User], phone: &str) -> Option<&'a mut User> {
    users.iter_mut().find(|u| u.phone == phone)
}
