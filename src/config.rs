use std::fmt;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::{ClientOptions, GgtaskerError, Result};

/// SDK version reported in the `User-Agent` and `x-sdk-version` headers.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SDK flavour reported in the `x-sdk-type` header.
pub const SDK_TYPE: &str = "Rust";

pub(crate) const SDK_VERSION_HEADER: HeaderName = HeaderName::from_static("x-sdk-version");
pub(crate) const SDK_TYPE_HEADER: HeaderName = HeaderName::from_static("x-sdk-type");
pub(crate) const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Immutable connection settings shared by every request.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    options: ClientOptions,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl ClientConfig {
    /// Validates the base URL and API key.
    ///
    /// Both must be non-blank and the key must be usable as a header value.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let api_key = api_key.into();
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(GgtaskerError::config(
                "You need to specify your API base URL & API KEY!",
            ));
        }
        HeaderValue::from_str(&api_key)
            .map_err(|err| GgtaskerError::config(format!("invalid API key: {err}")))?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            api_key,
            options: ClientOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Joins an endpoint path onto the base URL with a single `/`.
    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Headers attached to every request.
    pub(crate) fn default_headers(&self) -> Result<HeaderMap> {
        let user_agent = self
            .options
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("Ggtasker Rust SDK v{VERSION}"));

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, header_value(&user_agent)?);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(SDK_VERSION_HEADER, HeaderValue::from_static(VERSION));
        headers.insert(SDK_TYPE_HEADER, HeaderValue::from_static(SDK_TYPE));
        let mut api_key = header_value(&self.api_key)?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        Ok(headers)
    }
}

pub(crate) fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|err| GgtaskerError::config(format!("invalid header value: {err}")))
}

#[cfg(test)]
mod tests {
    use reqwest::header;

    use super::{ClientConfig, API_KEY_HEADER, SDK_TYPE_HEADER, SDK_VERSION_HEADER, VERSION};
    use crate::{ClientOptions, ErrorKind};

    #[test]
    fn rejects_blank_base_url_or_api_key() {
        for (url, key) in [("", "key"), ("   ", "key"), ("http://api", ""), ("http://api", " ")] {
            let err = ClientConfig::new(url, key).expect_err("blank input must fail");
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn rejects_api_key_that_is_not_a_header_value() {
        let err = ClientConfig::new("http://api", "key\nwith-newline")
            .expect_err("newline is not a valid header value");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn joins_paths_with_single_slash() {
        let config = ClientConfig::new("http://api.local/v1/", "key").unwrap();
        assert_eq!(config.base_url(), "http://api.local/v1");
        assert_eq!(config.url_for("/user/login"), "http://api.local/v1/user/login");
        assert_eq!(config.url_for("user/login"), "http://api.local/v1/user/login");
    }

    #[test]
    fn default_headers_identify_the_sdk() {
        let config = ClientConfig::new("http://api", "secret").unwrap();
        let headers = config.default_headers().unwrap();
        assert_eq!(headers[header::ACCEPT], "application/json");
        assert_eq!(
            headers[header::USER_AGENT],
            format!("Ggtasker Rust SDK v{VERSION}").as_str()
        );
        assert_eq!(headers[SDK_VERSION_HEADER], VERSION);
        assert_eq!(headers[SDK_TYPE_HEADER], "Rust");
        assert_eq!(headers[API_KEY_HEADER], "secret");
    }

    #[test]
    fn user_agent_override() {
        let config = ClientConfig::new("http://api", "secret")
            .unwrap()
            .with_options(ClientOptions {
                user_agent: Some("custom/1.0".to_owned()),
                ..ClientOptions::default()
            });
        let headers = config.default_headers().unwrap();
        assert_eq!(headers[header::USER_AGENT], "custom/1.0");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::new("http://api", "secret-key").unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-key"));
    }
}
