use crate::api::transport::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;
use crate::utils::error_helpers::convert_request_error;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("idm-rest/", env!("CARGO_PKG_VERSION"));
const MEDIA_TYPE: &str = "application/json";

/// How requests authenticate against the provider.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Jira Server style: user name plus password or personal token.
    Basic { username: String, password: String },
    /// Keycloak admin API style: an access token obtained out of band.
    Bearer(String),
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"*****")
                .finish(),
            Authorization::Bearer(_) => f.write_str("Bearer(*****)"),
        }
    }
}

/// Blocking HTTP client bound to one provider base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    pub base_url: String,
    pub authorization: Option<Authorization>,
    timeout_secs: u64,
}

impl ServiceClient {
    /// Client with the default timeout and no authorization
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init"))?;

        Ok(ServiceClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: None,
            timeout_secs,
        })
    }

    pub fn with_authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Absolute URL of a path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        let mut request = self.client.request(method, url).header(ACCEPT, MEDIA_TYPE);

        match &self.authorization {
            Some(Authorization::Basic { username, password }) => {
                request = request.basic_auth(username, Some(password));
            }
            Some(Authorization::Bearer(token)) => {
                request = request.bearer_auth(token);
            }
            None => {}
        }

        request
    }
}

impl Transport for ServiceClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let uri = self.endpoint(&request.path);
        let mut builder = self.build_request(request.method.clone(), &request.path);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, MEDIA_TYPE).json(body);
        }

        log::debug!("{} {}", request.method, uri);
        let response = crate::map_api_error!(builder.send(), &uri)?;

        let status = response.status().as_u16();
        let uri = response.url().to_string();
        log::debug!("{} {} -> {}", request.method, uri, status);

        Ok(HttpResponse::new(uri, status, Box::new(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ServiceClient::new("http://example.test/".to_string());
        assert!(client.is_ok());
        let client = client.expect("client creation failed");
        assert_eq!(client.base_url, "http://example.test");
        assert_eq!(client.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client =
            ServiceClient::new("http://example.test/rest/api/2".to_string()).expect("client");
        assert_eq!(
            client.endpoint("user/search"),
            "http://example.test/rest/api/2/user/search"
        );
        assert_eq!(
            client.endpoint("/groups/picker"),
            "http://example.test/rest/api/2/groups/picker"
        );
        assert_eq!(client.endpoint(""), "http://example.test/rest/api/2");
    }

    #[test]
    fn test_build_request_with_bearer() {
        let client = ServiceClient::new("http://example.test".to_string())
            .expect("client creation failed")
            .with_authorization(Authorization::Bearer("token-123".to_string()));

        let built_request = client
            .build_request(Method::GET, "users")
            .build()
            .expect("Failed to build request");

        assert_eq!(built_request.url().as_str(), "http://example.test/users");
        assert_eq!(built_request.method(), Method::GET);
        assert_eq!(
            built_request
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok()),
            Some("Bearer token-123")
        );
        assert_eq!(
            built_request
                .headers()
                .get("accept")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn test_build_request_with_basic() {
        let client = ServiceClient::new("http://example.test".to_string())
            .expect("client creation failed")
            .with_authorization(Authorization::Basic {
                username: "admin".to_string(),
                password: "secret".to_string(),
            });

        let built_request = client
            .build_request(Method::DELETE, "user")
            .build()
            .expect("Failed to build request");

        let header = built_request
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(header.starts_with("Basic "));
        assert_eq!(built_request.method(), Method::DELETE);
    }

    #[test]
    fn test_build_request_without_authorization() {
        let client =
            ServiceClient::new("http://example.test".to_string()).expect("client creation failed");
        let built_request = client
            .build_request(Method::POST, "users")
            .build()
            .expect("Failed to build request");
        assert!(built_request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_authorization_debug_masks_secrets() {
        let auth = Authorization::Basic {
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret"));
        assert_eq!(
            format!("{:?}", Authorization::Bearer("abc".to_string())),
            "Bearer(*****)"
        );
    }
}
