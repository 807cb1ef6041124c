//! Input validation and sanitization utilities
//!
//! Values that end up in a URL path (account ids, group names, realms) are
//! checked here before any request is built.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate a value sent as a query parameter; the client encodes it
pub fn validate_value(kind: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(CliError::InvalidArguments(format!("{} cannot be empty", kind)).into());
    }
    Ok(())
}

/// Validate a value that is spliced into a path segment
pub fn validate_identifier(kind: &str, value: &str) -> crate::Result<()> {
    validate_value(kind, value)?;

    if value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
    {
        return Err(CliError::InvalidArguments(format!(
            "Invalid {} '{}': must not contain '/', '?', '#' or whitespace",
            kind, value
        ))
        .into());
    }

    Ok(())
}

/// Validate a Keycloak realm name
pub fn validate_realm(realm: &str) -> crate::Result<()> {
    validate_identifier("realm", realm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("https://jira.example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("localhost:8080").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("account", "fred").is_ok());
        assert!(validate_identifier("account", "6f1c0b3e-0000-4000-8000-000000000001").is_ok());
        assert!(validate_identifier("account", "").is_err());
        assert!(validate_identifier("account", "a/b").is_err());
        assert!(validate_identifier("group", "jira users").is_err());
        assert!(validate_identifier("group", "x?y=1").is_err());
    }

    #[test]
    fn test_validate_value() {
        assert!(validate_value("group", "Domain Users").is_ok());
        assert!(validate_value("group", "a/b?c#d").is_ok());
        assert!(validate_value("group", "").is_err());
        assert!(validate_value("group", "  ").is_err());
    }

    #[test]
    fn test_validate_realm() {
        assert!(validate_realm("master").is_ok());
        assert!(validate_realm("corp/../master").is_err());
    }
}
