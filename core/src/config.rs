//! Credentials and endpoint for the live scenarios, read from the environment.

use std::env;

use crate::client::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use crate::types::Credentials;

pub const EMAIL_VAR: &str = "PETFRIENDS_EMAIL";
pub const PASSWORD_VAR: &str = "PETFRIENDS_PASSWORD";
pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";

/// Load .env file if it exists. Variables already set in the environment win.
pub fn load_dotenv() {
    // Silently ignore errors (file might not exist)
    let _ = dotenvy::dotenv();
}

/// Account and endpoint used by the live scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub credentials: Credentials,
}

impl Settings {
    /// Resolve settings from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings through `lookup`. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());

        let email = present(EMAIL_VAR).ok_or(ConfigError::MissingVar(EMAIL_VAR))?;
        let password = present(PASSWORD_VAR).ok_or(ConfigError::MissingVar(PASSWORD_VAR))?;
        let base_url = present(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url,
            credentials: Credentials::new(email, password),
        })
    }
}
