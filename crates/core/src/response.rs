//! List response mapping
//!
//! The backend answers list requests with `{ data, pagination: { total } }`.
//! The body is buffered once and both the records and the total count are
//! derived from that buffer, so reading it "twice" never exhausts a stream.
//!
//! Malformed success bodies degrade to defaults (no records, fallback count)
//! instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{build_http_error, HttpError};

/// A completed HTTP response with its body fully read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn ensure_success(&self) -> Result<(), HttpError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(build_http_error(self.status, &self.body))
        }
    }
}

/// List envelope as returned by the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListResponse {
    pub data: Option<Vec<Value>>,
    pub total: Option<u64>,
}

impl ListResponse {
    /// Parse an envelope leniently
    ///
    /// Anything that is not the expected shape is treated as absent.
    pub fn parse(body: &[u8]) -> Self {
        let Ok(payload) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };

        let data = match payload.get("data") {
            Some(Value::Array(records)) => Some(records.clone()),
            _ => None,
        };

        let total = payload
            .get("pagination")
            .and_then(|pagination| pagination.get("total"))
            .and_then(parse_total);

        Self { data, total }
    }

    pub fn records(&self) -> Vec<Value> {
        self.data.clone().unwrap_or_default()
    }

    /// `pagination.total`, else the number of records, else zero
    pub fn total_count(&self) -> u64 {
        self.total
            .or_else(|| self.data.as_ref().map(|records| records.len() as u64))
            .unwrap_or(0)
    }
}

/// Accept non-negative integers, including integral floats like `42.0`
fn parse_total(value: &Value) -> Option<u64> {
    if let Some(total) = value.as_u64() {
        return Some(total);
    }
    match value.as_f64() {
        Some(total) if total >= 0.0 && total.fract() == 0.0 && total <= u64::MAX as f64 => {
            Some(total as u64)
        }
        _ => None,
    }
}

/// Records and total count of one list response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListResult {
    pub data: Vec<Value>,
    pub total: u64,
}

/// Records of a list response
pub fn map_response(response: &BufferedResponse) -> Result<Vec<Value>, HttpError> {
    response.ensure_success()?;
    Ok(ListResponse::parse(&response.body).records())
}

/// Total count of a list response
pub fn get_total_count(response: &BufferedResponse) -> Result<u64, HttpError> {
    response.ensure_success()?;
    Ok(ListResponse::parse(&response.body).total_count())
}

/// Records and total count from a single parse of the body
pub fn map_list_response(response: &BufferedResponse) -> Result<ListResult, HttpError> {
    response.ensure_success()?;
    let envelope = ListResponse::parse(&response.body);
    Ok(ListResult {
        total: envelope.total_count(),
        data: envelope.data.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &str) -> BufferedResponse {
        BufferedResponse::new(200, body.as_bytes())
    }

    /// Subjects as served by the backend
    fn sample_subjects() -> Value {
        json!([
            {
                "id": 1,
                "name": "Introduction to Computer Science",
                "code": "CS101",
                "department": "CS",
                "description": "Fundamental concepts of programming and computational thinking."
            },
            {
                "id": 2,
                "name": "Calculus I",
                "code": "MATH101",
                "department": "Math",
                "description": "Introduction to differential and integral calculus."
            },
            {
                "id": 3,
                "name": "Modern Physics",
                "code": "PHYS201",
                "department": "Physics",
                "description": "Exploration of relativity, quantum mechanics, and atomic physics."
            }
        ])
    }

    #[test]
    fn test_data_and_total() {
        let response = ok(r#"{"data":[{"id":1}],"pagination":{"total":42}}"#);

        assert_eq!(map_response(&response).unwrap(), vec![json!({"id": 1})]);
        assert_eq!(get_total_count(&response).unwrap(), 42);
    }

    #[test]
    fn test_total_falls_back_to_data_length() {
        let response = ok(r#"{"data":[{"id":1},{"id":2}]}"#);
        assert_eq!(get_total_count(&response).unwrap(), 2);
    }

    #[test]
    fn test_total_falls_back_to_zero() {
        assert_eq!(get_total_count(&ok("{}")).unwrap(), 0);
        assert_eq!(get_total_count(&ok(r#"{"data":null}"#)).unwrap(), 0);
    }

    #[test]
    fn test_total_without_data() {
        let response = ok(r#"{"pagination":{"total":7}}"#);

        assert!(map_response(&response).unwrap().is_empty());
        assert_eq!(get_total_count(&response).unwrap(), 7);
    }

    #[test]
    fn test_malformed_total_degrades() {
        for body in [
            r#"{"data":[{"id":1}],"pagination":{"total":-5}}"#,
            r#"{"data":[{"id":1}],"pagination":{"total":"many"}}"#,
            r#"{"data":[{"id":1}],"pagination":{"total":1.5}}"#,
            r#"{"data":[{"id":1}],"pagination":null}"#,
            r#"{"data":[{"id":1}],"pagination":{}}"#,
        ] {
            assert_eq!(get_total_count(&ok(body)).unwrap(), 1, "body: {body}");
        }
    }

    #[test]
    fn test_integral_float_total() {
        let response = ok(r#"{"data":[],"pagination":{"total":42.0}}"#);
        assert_eq!(get_total_count(&response).unwrap(), 42);
    }

    #[test]
    fn test_missing_or_null_data_is_empty() {
        assert!(map_response(&ok("{}")).unwrap().is_empty());
        assert!(map_response(&ok(r#"{"data":null}"#)).unwrap().is_empty());
        assert!(map_response(&ok(r#"{"data":{"id":1}}"#)).unwrap().is_empty());
    }

    #[test]
    fn test_unparsable_success_body_degrades() {
        let response = ok("not json");

        assert!(map_response(&response).unwrap().is_empty());
        assert_eq!(get_total_count(&response).unwrap(), 0);
    }

    #[test]
    fn test_not_found_fails_both_mappers() {
        let response = BufferedResponse::new(404, br#"{"message":"not found"}"#.to_vec());
        let expected = HttpError {
            message: "not found".to_string(),
            status_code: 404,
        };

        assert_eq!(map_response(&response).unwrap_err(), expected);
        assert_eq!(get_total_count(&response).unwrap_err(), expected);
        assert_eq!(map_list_response(&response).unwrap_err(), expected);
    }

    #[test]
    fn test_server_error_without_body() {
        let response = BufferedResponse::new(500, Vec::new());
        let expected = HttpError {
            message: "Request failed with status code 500".to_string(),
            status_code: 500,
        };

        assert_eq!(map_response(&response).unwrap_err(), expected);
        assert_eq!(get_total_count(&response).unwrap_err(), expected);
    }

    #[test]
    fn test_redirect_status_is_a_failure() {
        let response = BufferedResponse::new(304, Vec::new());
        assert_eq!(map_response(&response).unwrap_err().status_code, 304);
    }

    #[test]
    fn test_map_list_response_matches_separate_mappers() {
        let body = json!({ "data": sample_subjects(), "pagination": { "total": 30 } });
        let response = ok(&body.to_string());

        let result = map_list_response(&response).unwrap();
        assert_eq!(result.data, map_response(&response).unwrap());
        assert_eq!(result.total, get_total_count(&response).unwrap());
        assert_eq!(result.data.len(), 3);
        assert_eq!(result.data[1]["code"], "MATH101");
        assert_eq!(result.total, 30);
    }

    #[test]
    fn test_created_status_is_success() {
        let response = BufferedResponse::new(201, br#"{"data":[{"id":9}]}"#.to_vec());
        assert_eq!(map_list_response(&response).unwrap().total, 1);
    }
}
