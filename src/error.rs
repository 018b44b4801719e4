use crate::ErrorResponse;

/// Broad category of a [`GgtaskerError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid local input, raised before any network activity.
    Configuration,
    /// The server could not be reached.
    Communication,
    /// The server answered with a 4xx/5xx status.
    Application,
    /// The server answered with a success status but an unusable payload.
    Protocol,
    /// The operation is not available in this SDK version.
    NotImplemented,
}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum GgtaskerError {
    /// Missing credential, invalid header value or unserializable body.
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    /// Transport failure; the wrapped response carries status `0`.
    #[error("communication error: {response}")]
    Communication {
        response: ErrorResponse,
        #[source]
        source: reqwest::Error,
    },
    /// Non-success HTTP status with the decoded (or synthesized) error list.
    #[error("api error: {response}")]
    Application {
        response: ErrorResponse,
        #[source]
        source: Option<reqwest::Error>,
    },
    /// Unexpected Content-Type or undecodable success payload.
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
    /// Endpoint exists in the API surface but has no client implementation yet.
    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),
}

impl GgtaskerError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Communication { .. } => ErrorKind::Communication,
            Self::Application { .. } => ErrorKind::Application,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
        }
    }

    /// Wrapped error response, present for communication and application errors.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Communication { response, .. } | Self::Application { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    /// HTTP status of the failed call; `Some(0)` for transport failures.
    pub fn status_code(&self) -> Option<u16> {
        self.error_response().map(ErrorResponse::status_code)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ApiErrorEntry, ErrorKind, ErrorResponse, GgtaskerError};

    #[test]
    fn configuration_error_has_no_status() {
        let err = GgtaskerError::config("You need to specify your user token!");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status_code(), None);
        assert!(err.error_response().is_none());
        assert_eq!(
            err.to_string(),
            "configuration error: You need to specify your user token!"
        );
    }

    #[test]
    fn application_error_exposes_status_and_entries() {
        let response = ErrorResponse::new(
            422,
            vec![ApiErrorEntry::new("bad name", "INVALID_NAME")],
        );
        let err = GgtaskerError::Application {
            response,
            source: None,
        };
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.status_code(), Some(422));
        let entries = err.error_response().map(ErrorResponse::errors).unwrap_or_default();
        assert_eq!(entries[0].code, "INVALID_NAME");
        assert_eq!(err.to_string(), "api error: 422: bad name [INVALID_NAME]");
    }

    #[test]
    fn not_implemented_names_the_operation() {
        let err = GgtaskerError::NotImplemented("user_report");
        assert_eq!(err.kind(), ErrorKind::NotImplemented);
        assert_eq!(err.to_string(), "user_report is not implemented yet");
    }
}
