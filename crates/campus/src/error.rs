use campus_core::HttpError;

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    /// The backend answered with a non-2xx status
    #[error("{}", describe_http_error(.0))]
    Http(#[from] HttpError),

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Append the status unless the message already is the generic status line
fn describe_http_error(err: &HttpError) -> String {
    if err.message == HttpError::default_message(err.status_code) {
        err.message.clone()
    } else {
        format!("{} (status {})", err.message, err.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_names_status_once() {
        let generic = Error::Http(HttpError {
            message: HttpError::default_message(500),
            status_code: 500,
        });
        assert_eq!(generic.to_string(), "Request failed with status code 500");

        let custom = Error::Http(HttpError {
            message: "not found".to_string(),
            status_code: 404,
        });
        assert_eq!(custom.to_string(), "not found (status 404)");
    }
}
