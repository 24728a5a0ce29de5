use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::services::messaging::MessagingProvider;
use crate::store::UserRepository;

pub struct AppState {
    /// Held across load, mutate and save; sends happen while it is held.
    pub users: Mutex<Box<dyn UserRepository>>,
    pub config: AppConfig,
    pub messaging: Box<dyn MessagingProvider>,
}
