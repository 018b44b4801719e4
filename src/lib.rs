//! `ggtasker` is an async HTTP client SDK for the Ggtasker task-management API.
//!
//! [`GgtaskerClient`] exposes one method per endpoint:
//! - [`GgtaskerClient::login`] and [`GgtaskerClient::request_token`]
//! - [`GgtaskerClient::add_user`], [`GgtaskerClient::get_user_details`],
//!   [`GgtaskerClient::update_user`] and [`GgtaskerClient::delete_user`]
//!
//! Every failure surfaces as a [`GgtaskerError`]; use
//! [`GgtaskerError::kind`] and [`GgtaskerError::error_response`] to branch.

mod api;
mod client;
mod config;
mod error;
mod options;
mod request;
mod response;
mod types;

pub use api::ApiClient;
pub use client::GgtaskerClient;
pub use config::{ClientConfig, SDK_TYPE, VERSION};
pub use error::{ErrorKind, GgtaskerError};
pub use options::ClientOptions;
pub use request::{ApiRequest, Method};
pub use response::{ApiErrorEntry, ErrorResponse};
pub use types::{Credentials, UserId};

pub type Result<T> = std::result::Result<T, GgtaskerError>;
