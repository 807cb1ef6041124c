use crate::error::ApiError;
use std::io;

/// Helper functions for standardizing error conversions across the codebase
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else if error.is_builder() {
        "invalid request".to_string()
    } else {
        "transport error".to_string()
    };
    ApiError::processing(endpoint, message, error)
}

/// Convert JSON stream errors to ApiError with endpoint context
pub fn convert_json_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    let message = if error.is_io() {
        "response stream could not be read".to_string()
    } else if error.is_eof() {
        "response ended prematurely".to_string()
    } else {
        format!("malformed response at line {} column {}", error.line(), error.column())
    };
    ApiError::processing(endpoint, message, error)
}

/// Convert IO errors raised while reading a response body
pub fn convert_io_error(error: io::Error, endpoint: &str) -> ApiError {
    ApiError::processing(endpoint, "response stream could not be read", error)
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_request_error(e, $endpoint))
    };
}

/// Helper macro for JSON parsing errors
#[macro_export]
macro_rules! map_json_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_json_error(e, $endpoint))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_json_error_syntax() {
        let error = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        let api_error = convert_json_error(error, "/test");

        match api_error {
            ApiError::Processing { uri, message, source } => {
                assert_eq!(uri, "/test");
                assert_eq!(message, "response ended prematurely");
                assert!(source.is_some());
            }
            _ => panic!("Expected Processing error"),
        }
    }

    #[test]
    fn test_convert_json_error_position() {
        let error = serde_json::from_str::<serde_json::Value>("[1, x]").unwrap_err();
        let api_error = convert_json_error(error, "/test");
        match api_error {
            ApiError::Processing { message, .. } => {
                assert!(message.starts_with("malformed response at line 1"));
            }
            _ => panic!("Expected Processing error"),
        }
    }

    #[test]
    fn test_convert_io_error() {
        let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "test");
        let api_error = convert_io_error(io_error, "/users");

        match api_error {
            ApiError::Processing { uri, .. } => assert_eq!(uri, "/users"),
            _ => panic!("Expected Processing error"),
        }
    }

    #[test]
    fn test_map_json_error_macro() {
        let result: Result<serde_json::Value, ApiError> =
            crate::map_json_error!(serde_json::from_str("nope"), "/groups");
        assert!(matches!(result, Err(ApiError::Processing { .. })));
    }
}
