//! Translation of failed exchanges into typed errors
//!
//! Providers report failures with a JSON body carrying either an `errors`
//! object (field name to message) or an `errorMessages` array. Whatever the
//! body looks like, the status code decides the
//! [`ErrorCategory`](crate::error::ErrorCategory).

use crate::api::transport::{HttpResponse, non_empty};
use crate::error::ApiError;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::io::Read;

pub const UNSPECIFIED_ERROR: &str = "Unspecified error";

/// Consumes a non-2xx response and produces the matching [`ApiError`].
pub fn parse(response: HttpResponse) -> ApiError {
    let status = response.status();
    let uri = response.uri().to_string();
    log::debug!("{} answered {}", uri, status);

    match extract_detail(response.into_body()) {
        Ok(detail) => {
            ApiError::service(status, detail.unwrap_or_else(|| UNSPECIFIED_ERROR.to_string()))
        }
        Err(e) => {
            log::warn!("error body of {} ({}) could not be parsed: {}", uri, status, e);
            ApiError::processing(uri, format!("unreadable error response (status {})", status), e)
        }
    }
}

/// Reads the detail message out of an error body.
///
/// `Ok(None)` means the body was empty, not an object, or carried neither
/// recognized field with any content.
pub fn extract_detail<R: Read>(reader: R) -> serde_json::Result<Option<String>> {
    let Some(reader) = non_empty(reader).map_err(serde_json::Error::io)? else {
        return Ok(None);
    };
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let detail = ErrorBody.deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(detail)
}

struct ErrorBody;

impl<'de> DeserializeSeed<'de> for ErrorBody {
    type Value = Option<String>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ErrorBody {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an error document")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut detail = None;
        while let Some(field) = map.next_key::<String>()? {
            match field.as_str() {
                "errors" | "errorMessages" if detail.is_none() => {
                    detail = map.next_value_seed(Joined)?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(detail)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Messages of an `errors` object or an `errorMessages` array joined by
/// newlines. Nothing to join yields `None`.
struct Joined;

impl Joined {
    fn finish(messages: Vec<String>) -> Option<String> {
        let joined = messages.join("\n");
        if joined.is_empty() { None } else { Some(joined) }
    }

    fn message(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

impl<'de> DeserializeSeed<'de> for Joined {
    type Value = Option<String>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Joined {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("error messages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut messages = Vec::new();
        while let Some((_, value)) = map.next_entry::<IgnoredAny, Value>()? {
            messages.push(Self::message(value));
        }
        Ok(Self::finish(messages))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut messages = Vec::new();
        while let Some(value) = seq.next_element::<Value>()? {
            messages.push(Self::message(value));
        }
        Ok(Self::finish(messages))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Self::finish(vec![value.to_string()]))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::StaticTransport;
    use crate::api::transport::{HttpRequest, Transport};
    use crate::error::ErrorCategory;

    fn respond(status: u16, body: &str) -> (ApiError, StaticTransport) {
        let transport = StaticTransport::new(status, body);
        let response = transport
            .execute(HttpRequest::get("users"))
            .expect("static transport");
        (parse(response), transport)
    }

    fn detail(body: &str) -> Option<String> {
        extract_detail(body.as_bytes()).expect("parsable body")
    }

    #[test]
    fn test_status_classification_table() {
        let table = [
            (400, ErrorCategory::BadRequest),
            (401, ErrorCategory::Unauthorized),
            (403, ErrorCategory::Forbidden),
            (404, ErrorCategory::NotFound),
            (409, ErrorCategory::Conflict),
            (415, ErrorCategory::UnsupportedMediaType),
            (500, ErrorCategory::Unexpected),
            (501, ErrorCategory::Unavailable),
            (503, ErrorCategory::Aborted),
            (302, ErrorCategory::Aborted),
        ];
        for (status, expected) in table {
            let (error, transport) = respond(status, r#"{"errorMessages":["a","b"]}"#);
            match error {
                ApiError::Service {
                    status: actual,
                    category,
                    detail,
                } => {
                    assert_eq!(actual, status);
                    assert_eq!(category, expected, "status {}", status);
                    assert_eq!(detail, "a\nb");
                }
                other => panic!("Expected service error, got {:?}", other),
            }
            assert_eq!(transport.released(), 1);
        }
    }

    #[test]
    fn test_errors_object_joined_in_document_order() {
        assert_eq!(
            detail(r#"{"errors":{"username":"taken","email":"invalid"},"errorMessages":[]}"#),
            Some("taken\ninvalid".to_string())
        );
    }

    #[test]
    fn test_first_non_empty_field_wins() {
        assert_eq!(
            detail(r#"{"errorMessages":[],"errors":{"name":"required"}}"#),
            Some("required".to_string())
        );
        assert_eq!(
            detail(r#"{"errorMessages":["first"],"errors":{"name":"second"}}"#),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_unspecified_fallback() {
        let (error, _) = respond(400, r#"{"message":"something else"}"#);
        match error {
            ApiError::Service { detail, .. } => assert_eq!(detail, UNSPECIFIED_ERROR),
            other => panic!("Expected service error, got {:?}", other),
        }

        assert_eq!(detail(""), None);
        assert_eq!(detail("[1,2]"), None);
        assert_eq!(detail("\"text\""), None);
        assert_eq!(detail(r#"{"errors":{},"errorMessages":null}"#), None);
    }

    #[test]
    fn test_scalar_message_fields_are_unspecified() {
        let (error, transport) = respond(400, r#"{"errors":5}"#);
        match error {
            ApiError::Service {
                status,
                category,
                detail,
            } => {
                assert_eq!(status, 400);
                assert_eq!(category, ErrorCategory::BadRequest);
                assert_eq!(detail, UNSPECIFIED_ERROR);
            }
            other => panic!("Expected service error, got {:?}", other),
        }
        assert_eq!(transport.released(), 1);

        assert_eq!(detail(r#"{"errors":true,"errorMessages":2.5}"#), None);
        assert_eq!(
            detail(r#"{"errors":-1,"errorMessages":["later"]}"#),
            Some("later".to_string())
        );
    }

    #[test]
    fn test_empty_body_is_unspecified() {
        let (error, transport) = respond(404, "");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Not found (404): Unspecified error");
        assert_eq!(transport.released(), 1);
    }

    #[test]
    fn test_non_json_body_is_processing_error() {
        let (error, transport) = respond(502, "<html>Bad Gateway</html>");
        match error {
            ApiError::Processing { uri, message, source } => {
                assert_eq!(uri, "http://example.test/users");
                assert!(message.contains("502"));
                assert!(source.is_some());
            }
            other => panic!("Expected processing error, got {:?}", other),
        }
        assert_eq!(transport.released(), 1);
    }

    #[test]
    fn test_broken_body_is_processing_error() {
        let transport = StaticTransport::broken(500, r#"{"errors":"#);
        let response = transport
            .execute(HttpRequest::get("users"))
            .expect("static transport");
        assert!(matches!(parse(response), ApiError::Processing { .. }));
        assert_eq!(transport.released(), 1);
    }

    #[test]
    fn test_non_string_messages_are_rendered() {
        assert_eq!(
            detail(r#"{"errors":{"code":42}}"#),
            Some("42".to_string())
        );
    }
}
