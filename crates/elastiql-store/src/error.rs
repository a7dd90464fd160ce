//! Store error types.

/// Errors that can occur while talking to the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status code.
    #[error("Store returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Failed to decode store response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// The configured base URL is not usable.
    #[error("Invalid store URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Status {
            status: 404,
            body: "index_not_found_exception".into(),
        };
        assert_eq!(
            err.to_string(),
            "Store returned status 404: index_not_found_exception"
        );

        let err = StoreError::invalid_url("nope", "relative URL without a base");
        assert!(err.to_string().contains("nope"));
        assert!(matches!(err, StoreError::InvalidUrl { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
