use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::{
    types::{Credentials, TokenResponse, UserId},
    ApiClient, ApiRequest, ClientConfig, ClientOptions, GgtaskerError, Result,
};

const TOKEN_HEADER: &str = "X-Token";

#[derive(Clone)]
/// SDK client for the Ggtasker task-management API.
pub struct GgtaskerClient {
    api: ApiClient,
}

impl fmt::Debug for GgtaskerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GgtaskerClient")
            .field("base_url", &self.api.config().base_url())
            .field("api_key", &"<redacted>")
            .field("options", self.api.config().options())
            .finish()
    }
}

impl GgtaskerClient {
    /// Creates a client for `base_url`, authenticating with `api_key`.
    ///
    /// Fails with a configuration error when either value is blank.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ggtasker::GgtaskerClient;
    ///
    /// let client = GgtaskerClient::new("https://api.ggtasker.example", "my-api-key")?;
    /// # Ok::<(), ggtasker::GgtaskerError>(())
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url, api_key)?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `GGTASKER_BASE_URL` — API base URL
    /// - `GGTASKER_API_KEY` — program API key
    ///
    /// **Not available on `wasm32` targets** — environment variables do not
    /// exist in browser runtimes. Use [`GgtaskerClient::new`] instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("GGTASKER_BASE_URL").map_err(|_| {
            GgtaskerError::config("missing GGTASKER_BASE_URL environment variable")
        })?;
        let api_key = std::env::var("GGTASKER_API_KEY")
            .map_err(|_| GgtaskerError::config("missing GGTASKER_API_KEY environment variable"))?;
        Self::new(base_url, api_key)
    }

    /// Rebuilds the client with new timeout/user-agent options.
    pub fn with_options(self, opts: ClientOptions) -> Result<Self> {
        let config = self.api.config().clone().with_options(opts);
        Self::from_config(config)
    }

    /// Underlying executor, for endpoints without a dedicated method.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Authenticates a user and returns the raw login response.
    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        let body = to_body(&Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        })?;
        self.api
            .execute(ApiRequest::post("/user/login").body(body))
            .await
    }

    /// Requests a user token and returns only the token string.
    pub async fn request_token(&self, username: &str, password: &str) -> Result<String> {
        let body = to_body(&Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        })?;
        let response = self
            .api
            .execute(ApiRequest::post("/user/request_token").body(body))
            .await?;
        let token: TokenResponse =
            serde_json::from_value(response).map_err(|source| GgtaskerError::Protocol {
                message: "response did not contain a Token".to_owned(),
                source: Some(source),
            })?;
        Ok(token.token)
    }

    /// Creates a user from caller-supplied data.
    ///
    /// A `user_token` that is empty after trimming fails with a configuration
    /// error before any request is sent.
    pub async fn add_user<T>(&self, user_data: &T, user_token: &str) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        require_token(user_token)?;
        let body = to_body(user_data)?;
        self.api
            .execute(
                ApiRequest::post("/user/add")
                    .body(body)
                    .headers(token_headers(user_token)),
            )
            .await
    }

    /// Fetches a user by id.
    ///
    /// A `user_token` that is empty after trimming fails with a configuration
    /// error before any request is sent.
    pub async fn get_user_details(&self, user_id: &str, user_token: &str) -> Result<Value> {
        require_token(user_token)?;
        self.api
            .execute(
                ApiRequest::get("/user/detail")
                    .query_param("Id", user_id)
                    .headers(token_headers(user_token)),
            )
            .await
    }

    /// Deletes a user by id.
    ///
    /// A `user_token` that is empty after trimming fails with a configuration
    /// error before any request is sent.
    pub async fn delete_user(&self, user_id: &str, user_token: &str) -> Result<Value> {
        require_token(user_token)?;
        let body = to_body(&UserId {
            id: user_id.to_owned(),
        })?;
        self.api
            .execute(
                ApiRequest::post("/user/delete")
                    .body(body)
                    .headers(token_headers(user_token)),
            )
            .await
    }

    /// Updates a user from caller-supplied data.
    ///
    /// A `user_token` that is empty after trimming fails with a configuration
    /// error before any request is sent.
    pub async fn update_user<T>(&self, user_data: &T, user_token: &str) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        require_token(user_token)?;
        let body = to_body(user_data)?;
        self.api
            .execute(
                ApiRequest::post("/user/update")
                    .body(body)
                    .headers(token_headers(user_token)),
            )
            .await
    }

    /// Not yet available; always fails with [`crate::ErrorKind::NotImplemented`]
    /// once the token has been checked. A blank (empty after trimming) token
    /// fails with a configuration error instead.
    pub async fn user_permissions<T>(&self, _user_data: &T, user_token: &str) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        require_token(user_token)?;
        Err(GgtaskerError::NotImplemented("user_permissions"))
    }

    /// Not yet available; see [`GgtaskerClient::user_permissions`].
    pub async fn user_settings<T>(&self, _user_data: &T, user_token: &str) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        require_token(user_token)?;
        Err(GgtaskerError::NotImplemented("user_settings"))
    }

    /// Not yet available; see [`GgtaskerClient::user_permissions`].
    pub async fn user_report<T>(&self, _user_data: &T, user_token: &str) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        require_token(user_token)?;
        Err(GgtaskerError::NotImplemented("user_report"))
    }
}

fn require_token(user_token: &str) -> Result<()> {
    if user_token.trim().is_empty() {
        return Err(GgtaskerError::config(
            "You need to specify your user token!",
        ));
    }
    Ok(())
}

fn token_headers(user_token: &str) -> Vec<(String, String)> {
    if user_token.is_empty() {
        return Vec::new();
    }
    vec![(TOKEN_HEADER.to_owned(), user_token.to_owned())]
}

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|source| GgtaskerError::Configuration {
        message: "request body could not be serialized".to_owned(),
        source: Some(source),
    })
}
