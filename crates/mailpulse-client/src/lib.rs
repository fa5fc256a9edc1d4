#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Authenticated client for the Mailpulse backend.
//!
//! Layout:
//! - `config.rs`: base URL and timeout, from code or environment
//! - `session.rs`: token pair storage (`TokenStore`) and the `Session` facade
//! - `gateway.rs`: bearer attachment, refresh-on-401, error normalisation
//! - `endpoints/`: typed wrappers for each backend route group
//! - `controller.rs`: login/register/logout flows and the current-user snapshot
//! - `error.rs`: `ApiError` taxonomy surfaced to callers

pub mod config;
pub mod controller;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod session;

pub use config::{ClientConfig, ConfigError, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use controller::{AuthController, AuthSnapshot};
pub use error::{ApiError, ApiResult};
pub use gateway::{ApiRequest, AuthLostHook, Gateway, REFRESH_PATH};
pub use session::{
    ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, REFRESH_TOKEN_KEY, Session, StoreError,
    StoreResult, TokenStore,
};
