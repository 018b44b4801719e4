use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub(crate) const COMMUNICATION_ERROR: &str = "COMMUNICATION_ERROR";
pub(crate) const BAD_REQUEST: &str = "BAD_REQUEST";

/// Single `{message, code}` entry of an API error payload.
///
/// Missing fields decode as empty strings and non-string values (such as a
/// numeric `code`) keep their JSON text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
}

impl ApiErrorEntry {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|_| Self::new("", "")),
            Value::String(message) => Self::new(message, ""),
            other => Self::new(other.to_string(), ""),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(value) => value,
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    errors: Vec<Value>,
}

/// Normalized representation of a failed API call.
///
/// `status_code` is `0` when no HTTP response was received at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    status_code: u16,
    errors: Vec<ApiErrorEntry>,
}

impl ErrorResponse {
    pub fn new(status_code: u16, errors: Vec<ApiErrorEntry>) -> Self {
        Self {
            status_code,
            errors,
        }
    }

    /// Synthetic response for a server that could not be reached.
    pub(crate) fn communication(base_url: &str) -> Self {
        Self::new(
            0,
            vec![ApiErrorEntry::new(
                format!("Could not communicate with {base_url}"),
                COMMUNICATION_ERROR,
            )],
        )
    }

    /// Decodes the `errors` list of an error body.
    ///
    /// Falls back to a single `BAD_REQUEST` entry when the body is not JSON,
    /// has no `errors` list, or the list is empty. A non-empty list is kept
    /// entry for entry, however loosely each entry is shaped.
    pub(crate) fn from_body(status_code: u16, body: &str) -> Self {
        let errors = serde_json::from_str::<ErrorDocument>(body)
            .ok()
            .map(|document| {
                document
                    .errors
                    .into_iter()
                    .map(ApiErrorEntry::from_value)
                    .collect::<Vec<_>>()
            })
            .filter(|errors| !errors.is_empty())
            .unwrap_or_else(|| {
                vec![ApiErrorEntry::new(
                    "Failed to get any error message from response",
                    BAD_REQUEST,
                )]
            });
        Self::new(status_code, errors)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn errors(&self) -> &[ApiErrorEntry] {
        &self.errors
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.status_code)?;
        for (index, entry) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} [{}]", entry.message, entry.code)?;
        }
        Ok(())
    }
}
