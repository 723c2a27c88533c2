//! Authentication endpoints. These only talk to the backend; keeping tokens
//! and the signed-in user is the session store's job.

use crate::{
    app_lib::{ApiClient, AppError},
    features::{
        auth::types::{
            Captcha, CurrentUser, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
            RegisterRequest,
        },
        users,
    },
};
use regex::Regex;
use tracing::instrument;

#[instrument(skip(api, request), fields(username = %request.username))]
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".to_string(),
        ));
    }
    api.post("/auth/login/", request).await
}

#[instrument(skip(api, request), fields(username = %request.username))]
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest,
) -> Result<LoginResponse, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required.".to_string(),
        ));
    }
    if request.password != request.password_confirm {
        return Err(AppError::Validation(
            "The two passwords do not match.".to_string(),
        ));
    }
    if let Some(email) = request.email.as_deref() {
        if !valid_email(email) {
            return Err(AppError::Validation("Invalid email address.".to_string()));
        }
    }
    api.post("/auth/register/", request).await
}

#[instrument(skip_all)]
pub async fn refresh(api: &ApiClient, refresh: &str) -> Result<RefreshResponse, AppError> {
    api.post("/auth/refresh/", &RefreshRequest { refresh }).await
}

/// Blacklists the refresh token on the backend.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient, refresh: &str) -> Result<(), AppError> {
    api.post_discard("/auth/logout/", &RefreshRequest { refresh })
        .await
}

#[instrument(skip(api))]
pub async fn captcha(api: &ApiClient) -> Result<Captcha, AppError> {
    api.get("/auth/captcha/").await
}

/// Fetches the signed-in user.
#[instrument(skip(api))]
pub async fn current_user(api: &ApiClient) -> Result<CurrentUser, AppError> {
    users::client::current_user(api).await
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(valid_email("ops@example.com"));
        assert!(!valid_email("ops@example"));
        assert!(!valid_email("not an email"));
    }
}
