//! HTTP transport seam
//!
//! The search protocol and the single-shot operations talk to providers only
//! through [`Transport`]. The production implementation is
//! [`ServiceClient`](crate::api::client::ServiceClient); tests plug in
//! in-memory transports that hand back canned bodies.

use crate::error::ApiError;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::io::{BufRead, BufReader, Read};

/// A request as the protocol layer sees it, before any client specifics.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the transport's base URL.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A response whose body has not been read yet.
///
/// The body is consumed at most once; dropping the response releases the
/// underlying connection.
pub struct HttpResponse {
    uri: String,
    status: u16,
    body: Box<dyn Read + Send>,
}

impl HttpResponse {
    pub fn new(uri: impl Into<String>, status: u16, body: Box<dyn Read + Send>) -> Self {
        Self {
            uri: uri.into(),
            status,
            body,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_body(self) -> Box<dyn Read + Send> {
        self.body
    }

    /// Buffered body, or `None` when the provider sent no content at all.
    pub fn into_reader(self) -> std::io::Result<Option<BufReader<Box<dyn Read + Send>>>> {
        non_empty(self.body)
    }
}

/// Wraps `reader` in a buffer and peeks at it; an exhausted stream yields `None`.
pub fn non_empty<R: Read>(reader: R) -> std::io::Result<Option<BufReader<R>>> {
    let mut reader = BufReader::new(reader);
    if reader.fill_buf()?.is_empty() {
        Ok(None)
    } else {
        Ok(Some(reader))
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("uri", &self.uri)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends one request and returns the streamed response.
///
/// Implementations map every transport level failure (connection refused,
/// timeout, TLS) into [`ApiError::Processing`] carrying the target URI.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}
