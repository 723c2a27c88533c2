//! Shared console utilities: the HTTP client, configuration, error types,
//! the response envelope and user-facing notices.
//!
//! ## Request lifecycle
//!
//! 1. **Outgoing:** the client attaches `Authorization: Bearer <access>` when a
//!    token is stored, and `X-Language` from the language preference.
//! 2. **Incoming:** 2xx bodies are unwrapped from `{success, code, message, data}`;
//!    `success: false` becomes `AppError::Business`.
//! 3. **Side effects:** a 401 outside login/register drops the access token and
//!    raises a session-expired notice; 403, 404 and 500 raise notices.
//!
//! Feature clients build on these helpers and never read tokens themselves.

pub mod api;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod notice;

pub use api::ApiClient;
pub use config::AppConfig;
pub use envelope::{ApiCode, ApiFailure, Page};
pub use errors::AppError;
pub use notice::{Notice, NoticeLevel, Notifier, TracingNotifier};
