//! Paginated search protocol
//!
//! [`Search`] issues one request and streams the response body into a
//! [`ResultHandler`]. Two document shapes are understood:
//!
//! - a bare array, every element being one resource;
//! - an envelope object whose fields are classified through
//!   [`envelope::role_of`]. The first resource list is authoritative, later
//!   ones are skipped.
//!
//! The body is never buffered as a whole: elements are deserialized one by
//! one as the parser reaches them. When the handler asks to stop, the parse
//! is aborted on the spot and the body is released.

use crate::api::transport::{Transport, non_empty};
use crate::core::envelope::{self, FieldRole};
use crate::core::error_parser;
use crate::core::handler::{ResultCollector, ResultHandler, ResultPage};
use crate::core::provider::PaginationParams;
use crate::core::request::SearchRequest;
use crate::error::ApiError;
use crate::utils::error_helpers::{convert_io_error, convert_json_error};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, Error as _, IgnoredAny, MapAccess,
    SeqAccess, Visitor,
};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

const STOPPED: &str = "search stopped by result handler";

pub struct Search<'t, X: Transport + ?Sized> {
    transport: &'t X,
    params: PaginationParams,
    request: SearchRequest,
}

impl<'t, X: Transport + ?Sized> Search<'t, X> {
    pub fn new(transport: &'t X, params: PaginationParams, request: SearchRequest) -> Self {
        Self {
            transport,
            params,
            request,
        }
    }

    /// Runs the search and feeds every resource to `handler`.
    ///
    /// A handler that stops early is not an error. Non-2xx answers are
    /// translated by the error parser.
    pub fn invoke<T, H>(self, handler: &mut H) -> Result<(), ApiError>
    where
        T: DeserializeOwned,
        H: ResultHandler<T> + ?Sized,
    {
        log::debug!(
            "search {} window={:?}",
            self.request.endpoint(),
            self.request.page_window()
        );
        let request = self.request.into_http(&self.params);
        let response = self.transport.execute(request)?;
        if !response.is_success() {
            return Err(error_parser::parse(response));
        }

        let uri = response.uri().to_string();
        stream(response.into_body(), handler).map_err(|e| match e {
            StreamError::Io(e) => convert_io_error(e, &uri),
            StreamError::Json(e) => convert_json_error(e, &uri),
        })
    }

    /// Runs the search and materializes the page.
    pub fn list<T: DeserializeOwned>(self) -> Result<ResultPage<T>, ApiError> {
        let mut collector = ResultCollector::<T>::new();
        self.invoke(&mut collector)?;
        Ok(collector.finish())
    }

    /// Like [`list`](Self::list) but stops consuming after `limit` resources.
    pub fn list_limited<T: DeserializeOwned>(self, limit: usize) -> Result<ResultPage<T>, ApiError> {
        let mut collector = ResultCollector::<T>::with_limit(limit);
        self.invoke(&mut collector)?;
        Ok(collector.finish())
    }
}

/// Failure while walking a response body.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("{0}")]
    Io(std::io::Error),
    #[error("{0}")]
    Json(serde_json::Error),
}

/// Walks a search response read from `reader` and drives `handler`.
///
/// An empty body is an empty result.
pub fn stream<R, T, H>(reader: R, handler: &mut H) -> Result<(), StreamError>
where
    R: Read,
    T: DeserializeOwned,
    H: ResultHandler<T> + ?Sized,
{
    let Some(reader) = non_empty(reader).map_err(StreamError::Io)? else {
        return Ok(());
    };

    let mut walk = Walk::new(handler);
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let document = Document { walk: &mut walk };
    match document.deserialize(&mut deserializer) {
        Ok(()) => deserializer.end().map_err(StreamError::Json),
        Err(_) if walk.stopped => Ok(()),
        Err(e) => Err(StreamError::Json(e)),
    }
}

/// Per-invocation state shared by the document and list visitors.
struct Walk<'h, H: ?Sized, T> {
    handler: &'h mut H,
    stopped: bool,
    resources_seen: bool,
    total_seen: bool,
    start_seen: bool,
    items_seen: bool,
    _resource: PhantomData<fn() -> T>,
}

impl<'h, H, T> Walk<'h, H, T>
where
    H: ResultHandler<T> + ?Sized,
    T: DeserializeOwned,
{
    fn new(handler: &'h mut H) -> Self {
        Self {
            handler,
            stopped: false,
            resources_seen: false,
            total_seen: false,
            start_seen: false,
            items_seen: false,
            _resource: PhantomData,
        }
    }

    fn total(&mut self, total: i64) {
        if !std::mem::replace(&mut self.total_seen, true) {
            self.handler.total(total);
        }
    }

    fn start(&mut self, start: i64) {
        if !std::mem::replace(&mut self.start_seen, true) {
            self.handler.start(start);
        }
    }

    fn items(&mut self, items: i64) {
        if !std::mem::replace(&mut self.items_seen, true) {
            self.handler.items(items);
        }
    }

    /// Hands every element of `seq` to the handler. A stop request aborts
    /// the parse through an error that [`stream`] recognizes by `stopped`.
    fn elements<'de, A: SeqAccess<'de>>(&mut self, mut seq: A) -> Result<(), A::Error> {
        while let Some(resource) = seq.next_element::<T>()? {
            if !self.handler.resource(resource) {
                self.stopped = true;
                return Err(A::Error::custom(STOPPED));
            }
        }
        Ok(())
    }
}

/// Top level of a search response: bare array or envelope.
struct Document<'w, 'h, H: ?Sized, T> {
    walk: &'w mut Walk<'h, H, T>,
}

impl<'de, H, T> DeserializeSeed<'de> for Document<'_, '_, H, T>
where
    H: ResultHandler<T> + ?Sized,
    T: DeserializeOwned,
{
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, H, T> Visitor<'de> for Document<'_, '_, H, T>
where
    H: ResultHandler<T> + ?Sized,
    T: DeserializeOwned,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of resources or a pagination envelope")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        self.walk.elements(seq)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(field) = map.next_key::<String>()? {
            match envelope::role_of(&field) {
                Some(FieldRole::Total) => {
                    if let Some(total) = as_count(map.next_value::<Value>()?) {
                        self.walk.total(total);
                    }
                }
                Some(FieldRole::Start) => {
                    if let Some(start) = as_count(map.next_value::<Value>()?) {
                        self.walk.start(start);
                    }
                }
                Some(FieldRole::Items) => {
                    if let Some(items) = as_count(map.next_value::<Value>()?) {
                        self.walk.items(items);
                    }
                }
                Some(FieldRole::Header) => {
                    if let Value::String(header) = map.next_value::<Value>()? {
                        let (start, items) = envelope::parse_header(&header);
                        if let Some(start) = start {
                            self.walk.start(start);
                        }
                        if let Some(items) = items {
                            self.walk.items(items);
                        }
                    }
                }
                Some(FieldRole::Resources) if !self.walk.resources_seen => {
                    self.walk.resources_seen = true;
                    map.next_value_seed(ResourceList {
                        walk: &mut *self.walk,
                    })?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(())
    }
}

/// The authoritative resource list inside an envelope. `null` is an empty list.
struct ResourceList<'w, 'h, H: ?Sized, T> {
    walk: &'w mut Walk<'h, H, T>,
}

impl<'de, H, T> DeserializeSeed<'de> for ResourceList<'_, '_, H, T>
where
    H: ResultHandler<T> + ?Sized,
    T: DeserializeOwned,
{
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, H, T> Visitor<'de> for ResourceList<'_, '_, H, T>
where
    H: ResultHandler<T> + ?Sized,
    T: DeserializeOwned,
{
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of resources")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<(), A::Error> {
        self.walk.elements(seq)
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }
}

/// Paging numbers arrive as JSON numbers from most providers, as strings
/// from a few.
fn as_count(value: Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
