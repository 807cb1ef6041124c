use crate::error::{AppError, CliError};
use rpassword::read_password;
use std::io::{self, Write};

/// Secret read from the terminal without echo
pub struct SecretInput {
    pub secret: String,
}

impl SecretInput {
    /// Prompt once for a secret
    pub fn collect(prompt: &str) -> Result<Self, AppError> {
        Ok(Self {
            secret: read_hidden(prompt)?,
        })
    }

    /// Prompt twice and require both entries to match
    pub fn collect_confirmed(prompt: &str) -> Result<Self, AppError> {
        let secret = read_hidden(prompt)?;
        let confirmation = read_hidden("Confirm: ")?;
        Self::confirm(secret, &confirmation)
    }

    fn confirm(secret: String, confirmation: &str) -> Result<Self, AppError> {
        if secret != confirmation {
            return Err(AppError::Cli(CliError::InvalidArguments(
                "Entries do not match".to_string(),
            )));
        }
        Ok(Self { secret })
    }

    /// Validate that the secret is not empty
    pub fn validate(&self) -> Result<(), AppError> {
        if self.secret.is_empty() {
            return Err(AppError::Cli(CliError::InvalidArguments(
                "Secret cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

fn read_hidden(prompt: &str) -> Result<String, AppError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(|e| {
        AppError::Cli(CliError::InvalidArguments(format!(
            "Failed to flush stdout: {}",
            e
        )))
    })?;

    let secret = read_password().map_err(|e| {
        AppError::Cli(CliError::InvalidArguments(format!(
            "Failed to read secret: {}",
            e
        )))
    })?;

    Ok(secret.trim().to_string())
}
