use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Path to the local SQLite store (STRAYSAVER_DB_PATH, default ./straysaver.db)
    pub db_path: String,
    /// The signed-in user whose rewards are shown (STRAYSAVER_USER_ID).
    /// Authentication itself is handled by the hosted backend.
    pub user_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only db_path has a default; the user id is required for anything
    /// beyond `init`, `import`, `catalog` and `status`.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("STRAYSAVER_DB_PATH")
                .unwrap_or_else(|_| "./straysaver.db".to_string()),
            user_id: env::var("STRAYSAVER_USER_ID")
                .map(|id| id.trim().to_string())
                .unwrap_or_default(),
        })
    }

    /// Check that an active user is configured.
    /// Call this before any operation that reads or changes a user's rewards.
    pub fn require_user(&self) -> Result<&str> {
        if self.user_id.is_empty() {
            anyhow::bail!(
                "STRAYSAVER_USER_ID not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(&self.user_id)
    }
}
