use std::sync::Mutex;

use super::{StoreError, UserRepository};
use crate::models::User;

/// In-process store for previews and tests.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }
}

impl UserRepository for MemoryStore {
    fn load_all(&self) -> Result<Vec<User>, StoreError> {
        self.users
            .lock()
            .map(|users| users.clone())
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }

    fn save_all(&self, users: &[User]) -> Result<(), StoreError> {
        let mut stored = self
            .users
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        *stored = users.to_vec();
        Ok(())
    }
}
