//! Search request model
//!
//! A [`SearchRequest`] is built per call and consumed by
//! [`Search`](crate::core::search::Search). Pagination is a [`PageWindow`] so
//! that `start` and `count` can only travel together.

use crate::api::transport::HttpRequest;
use crate::core::provider::PaginationParams;
use crate::error::ConfigError;
use reqwest::Method;
use serde_json::Value;

/// Offset and page size of one requested page.
///
/// Whether `start` is 0- or 1-based is a property of the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u32,
    pub count: u32,
}

impl PageWindow {
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    /// Builds a window from two independent optionals, rejecting the case
    /// where only one of them is present.
    pub fn from_parts(start: Option<u32>, count: Option<u32>) -> Result<Option<Self>, ConfigError> {
        match (start, count) {
            (Some(start), Some(count)) => Ok(Some(Self::new(start, count))),
            (None, None) => Ok(None),
            (start, count) => Err(ConfigError::InvalidPagination { start, count }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    endpoint: String,
    page: Option<PageWindow>,
    filter: Option<String>,
    parameters: Vec<(String, String)>,
    criteria: Option<Value>,
}

impl SearchRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            page: None,
            filter: None,
            parameters: Vec::new(),
            criteria: None,
        }
    }

    pub fn page(mut self, start: u32, count: u32) -> Self {
        self.page = Some(PageWindow::new(start, count));
        self
    }

    /// Applies a window given as two optionals, as they arrive from the
    /// command line or a caller that does not know both values up front.
    pub fn window(mut self, start: Option<u32>, count: Option<u32>) -> Result<Self, ConfigError> {
        self.page = PageWindow::from_parts(start, count)?;
        Ok(self)
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.push((name.into(), value.to_string()));
        self
    }

    /// Sends the search criteria in the request body, which turns the
    /// request into a POST.
    pub fn criteria(mut self, criteria: Value) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn page_window(&self) -> Option<PageWindow> {
        self.page
    }

    pub fn method(&self) -> Method {
        if self.criteria.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }

    /// Query parameters in wire order: fixed parameters, filter, then the
    /// pagination pair.
    pub fn query(&self, params: &PaginationParams) -> Vec<(String, String)> {
        let mut query = self.parameters.clone();
        if let Some(filter) = &self.filter {
            query.push((params.filter.clone(), filter.clone()));
        }
        if let Some(page) = self.page {
            query.push((params.start.clone(), page.start.to_string()));
            query.push((params.count.clone(), page.count.to_string()));
        }
        query
    }

    pub fn into_http(self, params: &PaginationParams) -> HttpRequest {
        let mut request = HttpRequest::new(self.method(), self.endpoint.clone());
        request.query = self.query(params);
        request.body = self.criteria;
        request
    }
}
