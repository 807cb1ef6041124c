use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Custom deserializer: accepts identifiers sent as strings or numbers
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

// Account models
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Account {
    /// Keycloak `id`, Jira `key`
    #[serde(
        alias = "key",
        deserialize_with = "deserialize_identifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Keycloak `username`, Jira `name`
    #[serde(alias = "name")]
    pub username: String,
    #[serde(alias = "emailAddress", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(alias = "active", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Account {
    /// The identifier path segments are built from: the provider id when
    /// known, the login name otherwise.
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.username)
    }

    /// Human readable name, falling back to the login name.
    pub fn full_name(&self) -> String {
        if let Some(display_name) = &self.display_name {
            return display_name.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }
}

// Group models
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Group {
    #[serde(
        deserialize_with = "deserialize_identifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Group {
    pub fn identifier(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

// Request bodies
/// Keycloak credential representation sent to `reset-password`.
#[derive(Debug, Serialize)]
pub struct Credential {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub temporary: bool,
}

impl Credential {
    pub fn password(value: impl Into<String>, temporary: bool) -> Self {
        Self {
            kind: "password".to_string(),
            value: value.into(),
            temporary,
        }
    }
}

/// Jira `user/password` body.
#[derive(Debug, Serialize)]
pub struct PasswordUpdate {
    pub password: String,
}

/// Jira `group/user` body.
#[derive(Debug, Serialize)]
pub struct GroupMember {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_from_jira() {
        let account: Account = serde_json::from_value(json!({
            "self": "http://jira/rest/api/2/user?username=fred",
            "key": "JIRAUSER10100",
            "name": "fred",
            "emailAddress": "fred@example.com",
            "displayName": "Fred Flintstone",
            "active": true
        }))
        .unwrap();
        assert_eq!(account.id.as_deref(), Some("JIRAUSER10100"));
        assert_eq!(account.username, "fred");
        assert_eq!(account.email.as_deref(), Some("fred@example.com"));
        assert_eq!(account.enabled, Some(true));
        assert_eq!(account.full_name(), "Fred Flintstone");
    }

    #[test]
    fn test_account_from_keycloak() {
        let account: Account = serde_json::from_value(json!({
            "id": "6f1c0b3e-0000-4000-8000-000000000001",
            "username": "wilma",
            "firstName": "Wilma",
            "lastName": "Flintstone",
            "email": "wilma@example.com",
            "enabled": false,
            "createdTimestamp": 1700000000000u64
        }))
        .unwrap();
        assert_eq!(account.identifier(), "6f1c0b3e-0000-4000-8000-000000000001");
        assert_eq!(account.full_name(), "Wilma Flintstone");
        assert_eq!(account.enabled, Some(false));
    }

    #[test]
    fn test_numeric_and_missing_identifiers() {
        let account: Account = serde_json::from_value(json!({"id": 7, "username": "x"})).unwrap();
        assert_eq!(account.id.as_deref(), Some("7"));

        let account: Account = serde_json::from_value(json!({"username": "y"})).unwrap();
        assert_eq!(account.identifier(), "y");
        assert_eq!(account.full_name(), "y");
    }

    #[test]
    fn test_group_shapes() {
        let group: Group =
            serde_json::from_value(json!({"name": "jira-users", "html": "<b>jira</b>-users", "labels": []}))
                .unwrap();
        assert_eq!(group.identifier(), "jira-users");

        let group: Group =
            serde_json::from_value(json!({"id": "g-1", "name": "admins", "path": "/admins", "subGroups": []}))
                .unwrap();
        assert_eq!(group.identifier(), "g-1");
        assert_eq!(group.path.as_deref(), Some("/admins"));
    }

    #[test]
    fn test_request_bodies() {
        let credential = serde_json::to_value(Credential::password("s3cret", false)).unwrap();
        assert_eq!(
            credential,
            json!({"type": "password", "value": "s3cret", "temporary": false})
        );
        let member = serde_json::to_value(GroupMember { name: "fred".to_string() }).unwrap();
        assert_eq!(member, json!({"name": "fred"}));
        let password = serde_json::to_value(PasswordUpdate { password: "p".to_string() }).unwrap();
        assert_eq!(password, json!({"password": "p"}));
    }
}
