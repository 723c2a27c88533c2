//! HTTP client for the RBAC REST API. Every request carries the stored bearer
//! token and the language preference, responses are unwrapped from the
//! backend envelope, and status-driven side effects (session expiry, access
//! denied, missing resources, server failures) are handled here once instead
//! of in every feature client.

use super::{
    config::AppConfig,
    envelope::{unwrap_envelope, ApiFailure},
    errors::AppError,
    notice::{Notice, Notifier},
};
use crate::features::{auth::storage::TokenStorage, i18n::current_language};
use reqwest::{
    header::{HeaderValue, ACCEPT},
    multipart::{Form, Part},
    Client, Method, RequestBuilder, Response, StatusCode,
};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

pub const LANGUAGE_HEADER: &str = "X-Language";

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Endpoints whose 401 means "bad credentials" rather than "session expired".
const AUTH_ENDPOINTS: [&str; 2] = ["/auth/login", "/auth/register"];

const SESSION_EXPIRED_NOTICE: &str = "Session expired, please sign in again";
const FORBIDDEN_NOTICE: &str = "You do not have permission to access this resource";
const NOT_FOUND_NOTICE: &str = "The requested resource does not exist";
const SERVER_ERROR_NOTICE: &str = "Internal server error";
const NETWORK_NOTICE: &str = "Network error, check your connection";

/// Shared API client. Cloning is cheap; clones share the connection pool,
/// token storage and notifier.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<AppConfig>,
    storage: Arc<dyn TokenStorage>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// # Errors
    /// Returns `AppError::Config` for an invalid base URL or if the HTTP
    /// client cannot be built.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn TokenStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            storage,
            notifier,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Language sent with each request.
    #[must_use]
    pub fn language(&self) -> String {
        current_language(self.storage.as_ref(), self.config.language.as_deref())
    }

    /// # Errors
    /// Returns an `AppError` for transport failures, non-2xx statuses, failed
    /// envelopes or undecodable payloads.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let value = self.send(Method::GET, path, |builder| builder).await?;
        decode(value)
    }

    /// GET with URL-encoded query parameters; `None` fields are omitted.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let value = self
            .send(Method::GET, path, |builder| builder.query(query))
            .await?;
        decode(value)
    }

    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self
            .send(Method::POST, path, |builder| builder.json(body))
            .await?;
        decode(value)
    }

    /// POST without a body.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let value = self.send(Method::POST, path, |builder| builder).await?;
        decode(value)
    }

    /// POST whose response payload is irrelevant.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn post_discard<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        self.send(Method::POST, path, |builder| builder.json(body))
            .await
            .map(|_| ())
    }

    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self
            .send(Method::PUT, path, |builder| builder.json(body))
            .await?;
        decode(value)
    }

    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self
            .send(Method::PATCH, path, |builder| builder.json(body))
            .await?;
        decode(value)
    }

    /// DELETE; any payload in the response is ignored.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.send(Method::DELETE, path, |builder| builder)
            .await
            .map(|_| ())
    }

    /// DELETE with URL-encoded query parameters.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn delete_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<(), AppError> {
        self.send(Method::DELETE, path, |builder| builder.query(query))
            .await
            .map(|_| ())
    }

    /// Uploads a single file as a multipart form field.
    ///
    /// # Errors
    /// See [`ApiClient::get`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<T, AppError> {
        let form = Form::new().part(field.to_string(), Part::bytes(bytes).file_name(file_name));
        let value = self
            .send(Method::POST, path, |builder| builder.multipart(form))
            .await?;
        decode(value)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value, AppError> {
        let url = build_url(&self.config.api_base_url, path);

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(LANGUAGE_HEADER, self.language());

        if let Some(token) = self.storage.access_token() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let span = info_span!("api.request", http.method = %method, url = %url);
        let response = build(builder)
            .send()
            .instrument(span)
            .await
            .map_err(|err| self.transport_error(&err))?;

        self.handle_response(path, response).await
    }

    async fn handle_response(&self, path: &str, response: Response) -> Result<Value, AppError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(&err))?;
        let text = String::from_utf8_lossy(&bytes);
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();

        debug!(status = status.as_u16(), path, "api response");

        if status.is_success() {
            let value = match body {
                Some(value) => value,
                None if text.trim().is_empty() => Value::Null,
                None => {
                    return Err(AppError::Parse(
                        "Failed to decode response: body is not JSON".to_string(),
                    ))
                }
            };
            return unwrap_envelope(value);
        }

        Err(self.status_error(path, status, body.as_ref(), &text))
    }

    fn status_error(
        &self,
        path: &str,
        status: StatusCode,
        body: Option<&Value>,
        text: &str,
    ) -> AppError {
        match status {
            StatusCode::UNAUTHORIZED if is_auth_endpoint(path) => AppError::Unauthorized(
                ApiFailure::from_body(body, text, "Login failed, check username and password"),
            ),
            StatusCode::UNAUTHORIZED => {
                if let Err(err) = self.storage.remove_access_token() {
                    warn!("failed to drop expired access token: {err}");
                }
                self.notify(Notice::error(SESSION_EXPIRED_NOTICE));
                AppError::SessionExpired
            }
            StatusCode::FORBIDDEN => {
                self.notify(Notice::error(FORBIDDEN_NOTICE));
                AppError::Forbidden(ApiFailure::from_body(body, text, FORBIDDEN_NOTICE).message)
            }
            StatusCode::NOT_FOUND => {
                self.notify(Notice::error(NOT_FOUND_NOTICE));
                AppError::NotFound(ApiFailure::from_body(body, text, NOT_FOUND_NOTICE).message)
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                self.notify(Notice::error(SERVER_ERROR_NOTICE));
                AppError::Server(ApiFailure::from_body(body, text, SERVER_ERROR_NOTICE).message)
            }
            _ => {
                let failure = ApiFailure::from_body(body, text, "Request failed");
                self.notify(Notice::error(failure.message.clone()));
                AppError::Http {
                    status: status.as_u16(),
                    message: failure.message,
                }
            }
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> AppError {
        self.notify(Notice::error(NETWORK_NOTICE));
        if err.is_timeout() {
            AppError::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            AppError::Serialization(format!("Failed to build request: {err}"))
        } else if err.is_decode() {
            AppError::Parse(format!("Failed to read response: {err}"))
        } else {
            AppError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Joins the API base URL and an endpoint path with exactly one slash.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS.iter().any(|endpoint| path.contains(endpoint))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}
