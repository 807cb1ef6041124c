use super::types::AuthStatus;
use crate::AppError;
use crate::api::client::Authorization;
use crate::error::CliError;
use crate::storage::credentials::Credentials;

/// Authentication service for managing the secret of one profile
pub struct AuthService {
    credentials: Credentials,
    username: Option<String>,
}

impl AuthService {
    /// Create new AuthService instance
    pub fn new(credentials: Credentials, username: Option<String>) -> Self {
        Self {
            credentials,
            username,
        }
    }

    /// Store the secret for the profile in the OS keyring
    pub fn login(&self, secret: &str) -> Result<(), AppError> {
        if secret.is_empty() {
            return Err(CliError::InvalidArguments("Secret cannot be empty".to_string()).into());
        }
        Credentials::save_secret_for_profile(&self.credentials.profile_name, secret)?;
        log::debug!("stored secret for profile {}", self.credentials.profile_name);
        Ok(())
    }

    /// Remove the stored secret
    pub fn logout(&self) -> Result<(), AppError> {
        Credentials::clear_secret_for_profile(&self.credentials.profile_name)?;
        Ok(())
    }

    /// Get current authentication status
    pub fn get_auth_status(&self) -> AuthStatus {
        AuthStatus {
            profile_name: self.credentials.profile_name.clone(),
            auth_mode: self.credentials.get_auth_mode(),
            username: self.username.clone(),
        }
    }

    /// Header material for requests, if any credential is available
    pub fn authorization(&self) -> Option<Authorization> {
        self.credentials.authorization(self.username.as_deref())
    }

    /// Authorization, or an error telling the user how to obtain one
    pub fn require_authorization(&self, available_profiles: Vec<String>) -> Result<Authorization, AppError> {
        self.authorization().ok_or_else(|| {
            CliError::AuthRequired {
                message: format!(
                    "No credentials for profile '{}'",
                    self.credentials.profile_name
                ),
                hint: "Run 'idm-rest auth login' or set IDM_REST_TOKEN".to_string(),
                available_profiles,
            }
            .into()
        })
    }
}
