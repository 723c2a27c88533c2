use crate::features::users::types::UserDetail;
use serde::{Deserialize, Serialize};

/// The signed-in user, including permission and role codes.
pub type CurrentUser = UserDetail;

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .field("captcha", &self.captcha)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .field("password_confirm", &"***")
            .field("email", &self.email)
            .finish()
    }
}

/// Tokens and user returned by login and register.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: CurrentUser,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access", &"***")
            .field("refresh", &"***")
            .field("user", &self.user.user.username)
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// New access token; `refresh` is present when the backend rotates it.
#[derive(Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("access", &"***")
            .field("rotated", &self.refresh.is_some())
            .finish()
    }
}

/// Captcha challenge: a data-URL image and the key it is checked against.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Captcha {
    pub image: String,
    pub key: String,
}
