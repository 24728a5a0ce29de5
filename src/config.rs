use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub users_file: String,
    pub admin_secret: String,
    pub admin_token_ttl_secs: i64,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    /// Public base URL Twilio posts to; used to rebuild the signed URL.
    pub webhook_base_url: Option<String>,
    pub check_interval_secs: u64,
    /// Encrypts phone numbers in the users file when set.
    pub data_encryption_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let admin_secret = env::var("ADMIN_SECRET").unwrap_or_default();
        let admin_secret = if admin_secret.is_empty() {
            tracing::warn!(
                "ADMIN_SECRET not set, using a per-process secret; admin tokens won't survive restarts"
            );
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            admin_secret
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            users_file: env::var("USERS_FILE").unwrap_or_else(|_| "data/users.json".to_string()),
            admin_secret,
            admin_token_ttl_secs: env::var("ADMIN_TOKEN_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24 * 60 * 60),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            webhook_base_url: env::var("WEBHOOK_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            check_interval_secs: env::var("CHECK_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(60 * 60),
            data_encryption_key: env::var("DATA_ENCRYPTION_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    /// Without Twilio credentials messages are only logged.
    pub fn dry_run(&self) -> bool {
        self.twilio_account_sid.is_empty() || self.twilio_auth_token.is_empty()
    }
}
