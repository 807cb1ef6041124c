use crate::AppError;
use crate::core::provider::Provider;
use crate::error::{CliError, ConfigError};
use crate::storage::config::{Config, Profile};
use crate::utils::validation::{validate_realm, validate_url};
use std::path::PathBuf;

/// Keys accepted by `config set`
pub const PROFILE_FIELDS: &[&str] = &[
    "url",
    "provider",
    "realm",
    "username",
    "timeout",
    "start-param",
    "count-param",
    "filter-param",
];

/// Configuration service for managing application configuration
pub struct ConfigService {
    config: Config,
}

impl ConfigService {
    /// Create new ConfigService instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get profile by name
    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.config.profiles.get(name)
    }

    /// Profile by name, or a not-found error
    pub fn require_profile(&self, name: &str) -> Result<&Profile, AppError> {
        self.get_profile(name).ok_or_else(|| {
            ConfigError::ProfileNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Get default profile name
    pub fn get_default_profile(&self) -> Option<&String> {
        self.config.default_profile.as_ref()
    }

    pub fn set_default_profile(&mut self, name: &str) -> Result<(), AppError> {
        self.require_profile(name)?;
        self.config.default_profile = Some(name.to_string());
        Ok(())
    }

    /// Set profile field value, creating the profile on first use
    pub fn set_profile_field(&mut self, profile: &str, field: &str, value: &str) -> Result<(), AppError> {
        if !PROFILE_FIELDS.contains(&field) {
            return Err(unknown_field(field));
        }

        let profile_entry = self
            .config
            .profiles
            .entry(profile.to_string())
            .or_insert_with(|| Profile::new(String::new(), Provider::Jira));

        let optional = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        match field {
            "url" => {
                validate_url(value)?;
                profile_entry.url = value.to_string();
            }
            "provider" => {
                profile_entry.provider = value.parse().map_err(|reason| ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason,
                })?;
            }
            "realm" => {
                if !value.is_empty() {
                    validate_realm(value)?;
                }
                profile_entry.realm = optional(value);
            }
            "username" => profile_entry.username = optional(value),
            "timeout" => {
                let seconds = value.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        field: field.to_string(),
                        value: value.to_string(),
                        reason: "expected a positive number of seconds".to_string(),
                    }
                })?;
                profile_entry.timeout_seconds = Some(seconds);
            }
            "start-param" => profile_entry.start_param = optional(value),
            "count-param" => profile_entry.count_param = optional(value),
            "filter-param" => profile_entry.filter_param = optional(value),
            _ => return Err(unknown_field(field)),
        }

        if self.config.default_profile.is_none() {
            self.config.default_profile = Some(profile.to_string());
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_config(&self, path: Option<PathBuf>) -> Result<(), AppError> {
        self.config.save(path).map_err(|e| e.into())
    }

    /// List all profiles, sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.config.profiles.iter().collect();
        profiles.sort_by(|a, b| a.0.cmp(b.0));
        profiles
    }
}

fn unknown_field(field: &str) -> AppError {
    AppError::Cli(CliError::InvalidArguments(format!(
        "Unknown field: {}. Use one of: {}",
        field,
        PROFILE_FIELDS.join(", ")
    )))
}
