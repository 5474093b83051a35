//! Normalized HTTP errors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform error surfaced for every failed backend response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct HttpError {
    pub message: String,
    pub status_code: u16,
}

impl HttpError {
    /// Message used when the body carries none
    pub fn default_message(status: u16) -> String {
        format!("Request failed with status code {status}")
    }
}

/// Build the normalized error of a failed response
///
/// Uses the `message` field of a JSON body when it is a non-empty string,
/// and the generic status-code message otherwise.
pub fn build_http_error(status: u16, body: &[u8]) -> HttpError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|payload| match payload.get("message") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            _ => None,
        })
        .unwrap_or_else(|| HttpError::default_message(status));

    HttpError {
        message,
        status_code: status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_body() {
        let error = build_http_error(404, br#"{"message":"not found"}"#);
        assert_eq!(
            error,
            HttpError {
                message: "not found".to_string(),
                status_code: 404,
            }
        );
    }

    #[test]
    fn test_empty_body_falls_back() {
        let error = build_http_error(500, b"");
        assert_eq!(error.message, "Request failed with status code 500");
        assert_eq!(error.status_code, 500);
    }

    #[test]
    fn test_non_json_body_falls_back() {
        let error = build_http_error(502, b"<html>Bad Gateway</html>");
        assert_eq!(error.message, "Request failed with status code 502");
    }

    #[test]
    fn test_missing_or_empty_message_falls_back() {
        assert_eq!(
            build_http_error(400, br#"{"error":"bad"}"#).message,
            "Request failed with status code 400"
        );
        assert_eq!(
            build_http_error(400, br#"{"message":""}"#).message,
            "Request failed with status code 400"
        );
        assert_eq!(
            build_http_error(400, br#"{"message":null}"#).message,
            "Request failed with status code 400"
        );
        assert_eq!(
            build_http_error(400, br#"["message"]"#).message,
            "Request failed with status code 400"
        );
    }

    #[test]
    fn test_serializes_with_status_code_key() {
        let error = build_http_error(401, br#"{"message":"Unauthorized"}"#);
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"message":"Unauthorized","statusCode":401}"#
        );
        assert_eq!(error.to_string(), "Unauthorized");
    }
}
