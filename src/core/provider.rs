//! Provider profiles
//!
//! Each REST provider spells its endpoints and pagination parameters
//! differently. A [`Provider`] carries the defaults; a profile in the
//! configuration file may override the parameter names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the query parameters that carry the page window and the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub start: String,
    pub count: String,
    pub filter: String,
}

impl PaginationParams {
    pub fn new(start: &str, count: &str, filter: &str) -> Self {
        Self {
            start: start.to_string(),
            count: count.to_string(),
            filter: filter.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Jira,
    Keycloak,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Jira => "jira",
            Provider::Keycloak => "keycloak",
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        match self {
            Provider::Jira => PaginationParams::new("startAt", "maxResults", "username"),
            Provider::Keycloak => PaginationParams::new("first", "max", "search"),
        }
    }

    /// Path prefix appended to the server URL of a profile.
    pub fn api_root(&self, realm: Option<&str>) -> String {
        match self {
            Provider::Jira => "rest/api/2".to_string(),
            Provider::Keycloak => format!("admin/realms/{}", realm.unwrap_or("master")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jira" => Ok(Provider::Jira),
            "keycloak" => Ok(Provider::Keycloak),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}
