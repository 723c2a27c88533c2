//! Session store: tokens, the signed-in user and their grants, plus the
//! operations that move the session between phases.
//!
//! ```text
//! Unauthenticated ──restore──▶ Restoring ──▶ Authenticated | Unauthenticated
//!        │                                        │
//!        └──login/register──▶ Authenticated ──401/refresh failure──▶ Expired
//! ```

use crate::{
    app_lib::{ApiClient, AppError},
    features::auth::{
        authz::Grants,
        client,
        guards::{GuardContext, GuardOutcome, RouteGuard},
        token,
        types::{CurrentUser, LoginRequest, LoginResponse, RegisterRequest},
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    Restoring,
    Authenticated,
    Expired,
}

#[derive(Debug, Default)]
pub struct AuthState {
    pub user: Option<CurrentUser>,
    pub access: Option<SecretString>,
    pub refresh: Option<SecretString>,
    /// Tentatively true while an unverified access token is held.
    pub is_authenticated: bool,
    pub phase: SessionPhase,
    pub is_loading: bool,
    pub is_initialized: bool,
    pub error: Option<String>,
    pub permissions: BTreeSet<String>,
    pub roles: BTreeSet<String>,
}

#[derive(Debug)]
pub struct SessionStore {
    api: ApiClient,
    state: AuthState,
}

impl SessionStore {
    /// Starts from the tokens already in storage.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let access = api.storage().access_token();
        let refresh = api.storage().refresh_token();
        let state = AuthState {
            is_authenticated: access.is_some(),
            access,
            refresh,
            ..AuthState::default()
        };
        Self { api, state }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&CurrentUser> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    #[must_use]
    pub fn grants(&self) -> Grants<'_> {
        Grants::new(
            self.state.is_authenticated,
            &self.state.permissions,
            &self.state.roles,
        )
    }

    #[must_use]
    pub fn guard_context(&self) -> GuardContext<'_> {
        GuardContext {
            grants: self.grants(),
            is_initialized: self.state.is_initialized,
            has_token: self.state.access.is_some(),
        }
    }

    #[must_use]
    pub fn check(&self, guard: &RouteGuard, from: &str) -> GuardOutcome {
        guard.check(&self.guard_context(), from)
    }

    /// # Errors
    /// Returns the login failure; its message is kept in `error`.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<&CurrentUser, AppError> {
        self.begin();
        let result = client::login(&self.api, request).await;
        self.finish_sign_in(result)
    }

    /// # Errors
    /// Returns the registration failure; its message is kept in `error`.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<&CurrentUser, AppError> {
        self.begin();
        let result = client::register(&self.api, request).await;
        self.finish_sign_in(result)
    }

    /// Exchanges the refresh token for a new access token. Any failure drops
    /// the session and leaves it `Expired`.
    ///
    /// # Errors
    /// Returns `AppError::Validation` without a refresh token, or the API error.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let Some(refresh) = self.state.refresh.clone() else {
            self.drop_session(SessionPhase::Expired);
            return Err(AppError::Validation("No refresh token".to_string()));
        };

        let response = match client::refresh(&self.api, refresh.expose_secret()).await {
            Ok(response) => response,
            Err(err) => {
                warn!("token refresh failed: {err}");
                self.drop_session(SessionPhase::Expired);
                return Err(err);
            }
        };

        let access = SecretString::from(response.access);
        let storage = self.api.storage();
        storage.set_access_token(&access)?;
        if let Some(rotated) = response.refresh {
            let rotated = SecretString::from(rotated);
            storage.set_refresh_token(&rotated)?;
            self.state.refresh = Some(rotated);
        }
        self.state.access = Some(access);
        debug!("access token refreshed");
        Ok(())
    }

    /// Loads the signed-in user and their grants. On failure the session is
    /// dropped and marked initialized.
    ///
    /// # Errors
    /// Returns the API error.
    pub async fn fetch_current_user(&mut self) -> Result<&CurrentUser, AppError> {
        self.state.is_loading = true;
        let result = client::current_user(&self.api).await;
        self.state.is_loading = false;

        match result {
            Ok(user) => {
                self.apply_user(user);
                self.state.is_initialized = true;
                self.state.phase = SessionPhase::Authenticated;
                self.current()
            }
            Err(err) => {
                let phase = if err.is_session_expired() {
                    SessionPhase::Expired
                } else {
                    SessionPhase::Unauthenticated
                };
                self.drop_session(phase);
                Err(err)
            }
        }
    }

    /// Signs out. The backend is asked to blacklist the refresh token, but
    /// local state is cleared whatever it answers.
    ///
    /// # Errors
    /// Returns a storage error if the session file cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        if let Some(refresh) = self.state.refresh.clone() {
            if let Err(err) = client::logout(&self.api, refresh.expose_secret()).await {
                warn!("backend logout failed: {err}");
            }
        }
        self.clear_auth()?;
        self.state.phase = SessionPhase::Unauthenticated;
        info!("signed out");
        Ok(())
    }

    /// Restores a stored session. With both tokens present the user is
    /// fetched, refreshing first when the access token has expired. Failures
    /// are logged and leave the session signed out.
    pub async fn restore(&mut self) -> bool {
        self.state.phase = SessionPhase::Restoring;

        let storage = self.api.storage();
        let (Some(access), Some(refresh)) = (storage.access_token(), storage.refresh_token())
        else {
            self.state.is_authenticated = false;
            self.state.is_initialized = true;
            self.state.phase = SessionPhase::Unauthenticated;
            debug!("no stored session");
            return false;
        };

        let expired = token::is_expired(access.expose_secret());
        self.state.access = Some(access);
        self.state.refresh = Some(refresh);
        self.state.is_authenticated = true;

        if expired {
            debug!("stored access token expired, refreshing");
            if let Err(err) = self.refresh().await {
                warn!("session restore failed: {err}");
                self.state.is_initialized = true;
                return false;
            }
        }

        match self.fetch_current_user().await {
            Ok(user) => {
                debug!(username = %user.user.username, "session restored");
                true
            }
            Err(err) => {
                warn!("session restore failed: {err}");
                false
            }
        }
    }

    /// Drops the session after the backend rejected the access token.
    pub fn expire(&mut self) {
        self.drop_session(SessionPhase::Expired);
    }

    /// Passes a result through, expiring the session on `SessionExpired`.
    ///
    /// # Errors
    /// Returns `result`'s error unchanged.
    pub fn track<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(err) = &result {
            if err.is_session_expired() {
                self.expire();
            }
        }
        result
    }

    pub fn set_user(&mut self, user: Option<CurrentUser>) {
        self.state.is_authenticated = user.is_some();
        self.state.user = user;
    }

    /// # Errors
    /// Returns a storage error if the tokens cannot be persisted.
    pub fn set_tokens(&mut self, access: SecretString, refresh: SecretString) -> Result<(), AppError> {
        let storage = self.api.storage();
        storage.set_access_token(&access)?;
        storage.set_refresh_token(&refresh)?;
        self.state.access = Some(access);
        self.state.refresh = Some(refresh);
        Ok(())
    }

    /// Forgets the user, tokens and grants, in memory and in storage.
    ///
    /// # Errors
    /// Returns a storage error if the tokens cannot be removed.
    pub fn clear_auth(&mut self) -> Result<(), AppError> {
        self.reset();
        self.api.storage().clear_tokens()
    }

    pub fn set_permissions<I: IntoIterator<Item = String>>(&mut self, permissions: I) {
        self.state.permissions = permissions.into_iter().collect();
    }

    pub fn set_roles<I: IntoIterator<Item = String>>(&mut self, roles: I) {
        self.state.roles = roles.into_iter().collect();
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    pub fn set_initialized(&mut self, initialized: bool) {
        self.state.is_initialized = initialized;
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn finish_sign_in(
        &mut self,
        result: Result<LoginResponse, AppError>,
    ) -> Result<&CurrentUser, AppError> {
        self.state.is_loading = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.state.error = Some(err.to_string());
                self.state.is_authenticated = false;
                return Err(err);
            }
        };

        let LoginResponse {
            access,
            refresh,
            user,
        } = response;
        if let Err(err) = self.set_tokens(SecretString::from(access), SecretString::from(refresh)) {
            self.state.error = Some(err.to_string());
            self.state.is_authenticated = false;
            return Err(err);
        }

        info!(username = %user.user.username, "signed in");
        self.apply_user(user);
        self.state.is_initialized = true;
        self.state.phase = SessionPhase::Authenticated;
        self.current()
    }

    fn apply_user(&mut self, user: CurrentUser) {
        if let Some(permissions) = user.permissions.clone() {
            self.set_permissions(permissions);
        }
        if let Some(roles) = user.roles.clone() {
            self.set_roles(roles);
        }
        self.set_user(Some(user));
    }

    fn current(&self) -> Result<&CurrentUser, AppError> {
        self.state
            .user
            .as_ref()
            .ok_or_else(|| AppError::Parse("Signed-in user is missing".to_string()))
    }

    fn reset(&mut self) {
        let error = self.state.error.take();
        self.state = AuthState {
            is_initialized: true,
            error,
            ..AuthState::default()
        };
    }

    fn drop_session(&mut self, phase: SessionPhase) {
        if let Err(err) = self.clear_auth() {
            warn!("failed to clear stored tokens: {err}");
        }
        self.state.phase = phase;
    }
}
