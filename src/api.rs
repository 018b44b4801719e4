use std::fmt;
use std::time::Duration;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    StatusCode,
};
use serde_json::{Map, Value};

use crate::{
    config::header_value, ApiRequest, ClientConfig, ErrorResponse, GgtaskerError, Result,
};

const JSON_CONTENT_TYPE: &str = "application/json";
const INVALID_CONTENT_TYPE: &str = "Invalid Content-Type specified in Response Header";

/// Low-level request executor for the Ggtasker API.
///
/// Every failure, whether the server was unreachable, answered with an error
/// status or sent back something that is not JSON, is folded into
/// [`GgtaskerError`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish()
    }
}

impl ApiClient {
    /// Builds the underlying HTTP client with the SDK default headers.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder().default_headers(config.default_headers()?);

        // connect_timeout is not available on wasm32 targets (no TCP)
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.options().connect_timeout_ms {
            Some(ms) => builder.connect_timeout(Duration::from_millis(ms)),
            None => builder,
        };

        let http = builder.build().map_err(|err| {
            GgtaskerError::config(format!("could not build HTTP client: {err}"))
        })?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs `request` and returns the decoded JSON body.
    ///
    /// A `204 No Content` or empty success body yields an empty JSON object.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let ApiRequest {
            method,
            path,
            query,
            body,
            headers,
        } = request;
        let url = self.config.url_for(&path);

        let mut request_headers = HeaderMap::new();
        for (name, value) in &headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                GgtaskerError::config(format!("invalid header name '{name}': {err}"))
            })?;
            request_headers.insert(name, header_value(value)?);
        }
        request_headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let mut builder = self
            .http
            .request(method.as_reqwest(), &url)
            .timeout(Duration::from_millis(self.config.options().timeout_ms));

        if !query.is_empty() {
            builder = builder.query(&query);
        }

        if method.has_body() {
            let payload = encode_body(body)?;
            request_headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            );
            builder = builder.body(payload);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(?method, %url, "sending ggtasker request");

        let response = builder
            .headers(request_headers)
            .send()
            .await
            .map_err(|err| self.communication_error(err))?;

        let status = response.status();

        #[cfg(feature = "tracing")]
        tracing::debug!(status = status.as_u16(), %url, "received ggtasker response");

        if status.is_client_error() || status.is_server_error() {
            let source = response.error_for_status_ref().err();
            // An unreadable error body is handled like an unparsable one.
            let body = response.text().await.unwrap_or_default();
            let error_response = ErrorResponse::from_body(status.as_u16(), &body);

            #[cfg(feature = "tracing")]
            tracing::warn!("ggtasker request to {} failed: {}", url, error_response);

            return Err(GgtaskerError::Application {
                response: error_response,
                source,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(empty_result());
        }

        check_content_type(response.headers())?;
        let body = response
            .text()
            .await
            .map_err(|err| self.communication_error(err))?;
        decode_body(&body)
    }

    fn communication_error(&self, err: reqwest::Error) -> GgtaskerError {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "could not communicate with {}: {}",
            self.config.base_url(),
            err
        );

        GgtaskerError::Communication {
            response: ErrorResponse::communication(self.config.base_url()),
            source: err,
        }
    }
}

fn empty_result() -> Value {
    Value::Object(Map::new())
}

/// Encodes a POST/PUT body, always as a JSON object.
///
/// A missing, `null` or empty body becomes `{}`; a top-level array is keyed
/// by element index. Only the top level is rewritten: arrays nested inside
/// the body are sent as arrays.
fn encode_body(body: Option<Value>) -> Result<String> {
    let object = match body {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        Some(other) => {
            return Err(GgtaskerError::config(format!(
                "request body must be a JSON object, got {other}"
            )))
        }
    };
    serde_json::to_string(&Value::Object(object)).map_err(|source| {
        GgtaskerError::Configuration {
            message: "request body could not be serialized".to_owned(),
            source: Some(source),
        }
    })
}

fn check_content_type(headers: &HeaderMap) -> Result<()> {
    let content_type: String = headers
        .get_all(header::CONTENT_TYPE)
        .iter()
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();
    if content_type.is_empty() || content_type.contains(JSON_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(GgtaskerError::protocol(INVALID_CONTENT_TYPE))
    }
}

fn decode_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(empty_result());
    }
    serde_json::from_str(body).map_err(|source| GgtaskerError::Protocol {
        message: "response body is not valid JSON".to_owned(),
        source: Some(source),
    })
}

#[cfg(test)]
mod tests {
    use reqwest::header::{self, HeaderMap, HeaderValue};
    use serde_json::json;

    use super::{check_content_type, decode_body, encode_body, ApiClient};
    use crate::{ClientConfig, ErrorKind};

    #[test]
    fn empty_bodies_encode_as_object() {
        assert_eq!(encode_body(None).unwrap(), "{}");
        assert_eq!(encode_body(Some(json!(null))).unwrap(), "{}");
        assert_eq!(encode_body(Some(json!({}))).unwrap(), "{}");
        assert_eq!(encode_body(Some(json!([]))).unwrap(), "{}");
    }

    #[test]
    fn top_level_array_is_keyed_by_index() {
        let encoded = encode_body(Some(json!(["a", {"b": [1, 2]}]))).unwrap();
        let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, json!({"0": "a", "1": {"b": [1, 2]}}));
    }

    #[test]
    fn scalar_body_is_rejected() {
        let err = encode_body(Some(json!("text"))).expect_err("scalar must fail");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn content_type_accepts_absent_or_json() {
        let mut headers = HeaderMap::new();
        assert!(check_content_type(&headers).is_ok());

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(check_content_type(&headers).is_ok());

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        let err = check_content_type(&headers).expect_err("html must be rejected");
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(
            err.to_string(),
            "protocol error: Invalid Content-Type specified in Response Header"
        );
    }

    #[test]
    fn decode_body_handles_empty_and_invalid_payloads() {
        assert_eq!(decode_body("  ").unwrap(), json!({}));
        assert_eq!(decode_body("[1,2]").unwrap(), json!([1, 2]));
        let err = decode_body("not json").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::new("http://api", "secret-key").unwrap();
        let client = ApiClient::new(config).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
    }
}
