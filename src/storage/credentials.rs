use super::Result;
use crate::api::client::Authorization;
use std::env;

#[cfg(not(test))]
use keyring::Entry;

#[cfg(not(test))]
const KEYRING_SERVICE: &str = "idm-rest";

/// Environment variable carrying a bearer token that overrides the keyring.
#[cfg(not(test))]
pub const TOKEN_ENV: &str = "IDM_REST_TOKEN";
#[cfg(test)]
pub const TOKEN_ENV: &str = "TEST_IDM_REST_TOKEN";

#[derive(Debug, Clone)]
pub struct Credentials {
    secret: Option<String>,
    token: Option<String>,
    pub profile_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthMode {
    /// Bearer token from the command line or the environment.
    Token,
    /// Secret stored in the OS keyring.
    Stored,
    None,
}

impl Credentials {
    pub fn new(profile_name: String) -> Self {
        Self {
            secret: None,
            token: None,
            profile_name,
        }
    }

    pub fn load(profile_name: &str) -> Result<Self> {
        let mut credentials = Self::new(profile_name.to_string());
        credentials.secret = credentials.load_credentials("secret")?;
        credentials.token = env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty());
        Ok(credentials)
    }

    /// A token passed explicitly wins over everything else.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|token| !token.is_empty()) {
            self.token = Some(token);
        }
        self
    }

    // use login
    pub fn save_secret_for_profile(profile_name: &str, secret: &str) -> Result<()> {
        let credentials = Self::new(profile_name.to_string());
        credentials.save_credentials("secret", secret)
    }

    // use logout
    pub fn clear_secret_for_profile(profile_name: &str) -> Result<()> {
        let credentials = Self::new(profile_name.to_string());
        credentials.delete_credentials("secret")
    }

    #[cfg(not(test))]
    fn entry(&self, key_type: &str) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE, &format!("{}-{}", key_type, self.profile_name))
            .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))
    }

    #[cfg(not(test))]
    fn load_credentials(&self, key_type: &str) -> Result<Option<String>> {
        match self.entry(key_type)?.get_password() {
            Ok(v) => Ok(Some(v)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(crate::error::StorageError::KeyringError(e.to_string())),
        }
    }

    #[cfg(not(test))]
    fn save_credentials(&self, key_type: &str, value: &str) -> Result<()> {
        self.entry(key_type)?
            .set_password(value)
            .map_err(|e| crate::error::StorageError::KeyringError(e.to_string()))
    }

    #[cfg(not(test))]
    fn delete_credentials(&self, key_type: &str) -> Result<()> {
        match self.entry(key_type)?.delete_credential() {
            Ok(_) => Ok(()),
            // Nothing stored is fine for logout
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(crate::error::StorageError::KeyringError(e.to_string())),
        }
    }

    #[cfg(test)]
    fn load_credentials(&self, key_type: &str) -> Result<Option<String>> {
        println!(
            "MOCK: Loading {} for profile {}",
            key_type, self.profile_name
        );
        Ok(None) // Mock implementation for tests
    }

    #[cfg(test)]
    fn save_credentials(&self, key_type: &str, _value: &str) -> Result<()> {
        println!(
            "MOCK: Saving {} for profile {}",
            key_type, self.profile_name
        );
        Ok(()) // Mock implementation for tests
    }

    #[cfg(test)]
    fn delete_credentials(&self, key_type: &str) -> Result<()> {
        println!(
            "MOCK: Deleting {} for profile {}",
            key_type, self.profile_name
        );
        Ok(()) // Mock implementation for tests
    }

    pub fn get_auth_mode(&self) -> AuthMode {
        if self.token.is_some() {
            AuthMode::Token
        } else if self.secret.is_some() {
            AuthMode::Stored
        } else {
            AuthMode::None
        }
    }

    /// Header material for the configured account.
    ///
    /// A stored secret is a password when the profile names a user (HTTP
    /// basic), otherwise it is used as a bearer token.
    pub fn authorization(&self, username: Option<&str>) -> Option<Authorization> {
        if let Some(token) = &self.token {
            return Some(Authorization::Bearer(token.clone()));
        }
        let secret = self.secret.clone()?;
        Some(match username {
            Some(username) => Authorization::Basic {
                username: username.to_string(),
                password: secret,
            },
            None => Authorization::Bearer(secret),
        })
    }
}
