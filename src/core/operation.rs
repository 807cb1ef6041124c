//! Single-exchange operations
//!
//! Everything that is not a paginated search (lookup, count, create, modify,
//! delete, membership changes, password resets) is one request and one
//! response. They share the transport and the error parser with [`Search`].
//!
//! [`Search`]: crate::core::search::Search

use crate::api::transport::{HttpRequest, HttpResponse, Transport};
use crate::core::error_parser;
use crate::error::ApiError;
use crate::utils::error_helpers::{convert_io_error, convert_json_error};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;

/// What an operation does, which fixes its verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Lookup,
    Count,
    Create,
    Modify,
    Delete,
    Assign,
    Revoke,
    Password,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Lookup => "lookup",
            OperationKind::Count => "count",
            OperationKind::Create => "create",
            OperationKind::Modify => "modify",
            OperationKind::Delete => "delete",
            OperationKind::Assign => "assign",
            OperationKind::Revoke => "revoke",
            OperationKind::Password => "password",
        }
    }
}

pub struct Operation<'t, X: Transport + ?Sized> {
    transport: &'t X,
    kind: OperationKind,
    request: HttpRequest,
}

impl<'t, X: Transport + ?Sized> Operation<'t, X> {
    fn with(transport: &'t X, kind: OperationKind, method: Method, path: impl Into<String>) -> Self {
        Self {
            transport,
            kind,
            request: HttpRequest::new(method, path),
        }
    }

    pub fn lookup(transport: &'t X, path: impl Into<String>) -> Self {
        Self::with(transport, OperationKind::Lookup, Method::GET, path)
    }

    pub fn count(transport: &'t X, path: impl Into<String>) -> Self {
        Self::with(transport, OperationKind::Count, Method::GET, path)
    }

    pub fn create(transport: &'t X, path: impl Into<String>, body: Value) -> Self {
        let mut operation = Self::with(transport, OperationKind::Create, Method::POST, path);
        operation.request.body = Some(body);
        operation
    }

    pub fn modify(transport: &'t X, path: impl Into<String>, body: Value) -> Self {
        let mut operation = Self::with(transport, OperationKind::Modify, Method::PUT, path);
        operation.request.body = Some(body);
        operation
    }

    pub fn delete(transport: &'t X, path: impl Into<String>) -> Self {
        Self::with(transport, OperationKind::Delete, Method::DELETE, path)
    }

    /// Membership grant. Providers disagree on the verb: Jira posts the
    /// member, Keycloak puts the relation.
    pub fn assign(
        transport: &'t X,
        method: Method,
        path: impl Into<String>,
        body: Option<Value>,
    ) -> Self {
        let mut operation = Self::with(transport, OperationKind::Assign, method, path);
        operation.request.body = body;
        operation
    }

    pub fn revoke(transport: &'t X, path: impl Into<String>) -> Self {
        Self::with(transport, OperationKind::Revoke, Method::DELETE, path)
    }

    pub fn password(transport: &'t X, path: impl Into<String>, body: Value) -> Self {
        let mut operation = Self::with(transport, OperationKind::Password, Method::PUT, path);
        operation.request.body = Some(body);
        operation
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.request.query.push((name.into(), value.to_string()));
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    fn execute(self) -> Result<HttpResponse, ApiError> {
        log::debug!(
            "{} {} {}",
            self.kind.name(),
            self.request.method,
            self.request.path
        );
        let response = self.transport.execute(self.request)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(error_parser::parse(response))
        }
    }

    /// Runs the operation and discards whatever the provider answered.
    pub fn invoke(self) -> Result<(), ApiError> {
        self.execute().map(drop)
    }

    /// Runs the operation and deserializes the answer. An empty body is `None`.
    pub fn invoke_for<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        let response = self.execute()?;
        let uri = response.uri().to_string();
        let Some(reader) = response
            .into_reader()
            .map_err(|e| convert_io_error(e, &uri))?
        else {
            return Ok(None);
        };
        let value = serde_json::from_reader(reader).map_err(|e| convert_json_error(e, &uri))?;
        Ok(Some(value))
    }

    /// Runs the operation and reads a bare number out of the answer.
    pub fn invoke_count(self) -> Result<i64, ApiError> {
        let response = self.execute()?;
        let uri = response.uri().to_string();
        let mut text = String::new();
        response
            .into_body()
            .read_to_string(&mut text)
            .map_err(|e| convert_io_error(e, &uri))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Processing {
                uri,
                message: "count response was empty".to_string(),
                source: None,
            });
        }
        serde_json::from_str::<i64>(text).map_err(|e| convert_json_error(e, &uri))
    }
}
