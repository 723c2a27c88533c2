//! Client helpers for user endpoints. Paths are centralized here; the backend
//! enforces authorization, the console only gates what it offers.

use crate::{
    app_lib::{ApiClient, AppError, Page},
    features::{
        users::types::{
            AvatarResponse, CreateUserRequest, ToggleActiveResponse, UpdateUserRequest,
            UserDetail, UserListItem, UserListParams,
        },
        validate_id,
    },
};
use std::path::Path;
use tracing::instrument;

/// Fetches a page of users.
#[instrument(skip(api))]
pub async fn list_users(
    api: &ApiClient,
    params: &UserListParams,
) -> Result<Page<UserListItem>, AppError> {
    api.get_with_query("/users/", params).await
}

/// Fetches user details by id.
#[instrument(skip(api))]
pub async fn get_user(api: &ApiClient, id: u64) -> Result<UserDetail, AppError> {
    let id = validate_id("User", id)?;
    api.get(&format!("/users/{id}/")).await
}

/// Creates a user; the password must match its confirmation.
#[instrument(skip(api, request), fields(username = %request.username))]
pub async fn create_user(
    api: &ApiClient,
    request: &CreateUserRequest,
) -> Result<UserDetail, AppError> {
    if request.username.trim().is_empty() {
        return Err(AppError::Validation("Username is required.".to_string()));
    }
    if request.password != request.password_confirm {
        return Err(AppError::Validation(
            "The two passwords do not match.".to_string(),
        ));
    }
    api.post("/users/", request).await
}

/// Replaces a user's editable fields.
#[instrument(skip(api, request))]
pub async fn update_user(
    api: &ApiClient,
    id: u64,
    request: &UpdateUserRequest,
) -> Result<UserDetail, AppError> {
    let id = validate_id("User", id)?;
    api.put(&format!("/users/{id}/"), request).await
}

/// Updates only the fields that are set.
#[instrument(skip(api, request))]
pub async fn patch_user(
    api: &ApiClient,
    id: u64,
    request: &UpdateUserRequest,
) -> Result<UserDetail, AppError> {
    let id = validate_id("User", id)?;
    if request.is_empty() {
        return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    api.patch(&format!("/users/{id}/"), request).await
}

#[instrument(skip(api))]
pub async fn delete_user(api: &ApiClient, id: u64) -> Result<(), AppError> {
    let id = validate_id("User", id)?;
    api.delete(&format!("/users/{id}/")).await
}

/// Flips the active flag and returns the new value.
#[instrument(skip(api))]
pub async fn toggle_user_active(api: &ApiClient, id: u64) -> Result<bool, AppError> {
    let id = validate_id("User", id)?;
    let response: ToggleActiveResponse = api
        .post_empty(&format!("/users/{id}/toggle_active/"))
        .await?;
    Ok(response.is_active)
}

/// Fetches the signed-in user with their permission and role codes.
#[instrument(skip(api))]
pub async fn current_user(api: &ApiClient) -> Result<UserDetail, AppError> {
    api.get("/users/me/").await
}

/// Updates the signed-in user's own profile.
#[instrument(skip(api, request))]
pub async fn update_current_user(
    api: &ApiClient,
    request: &UpdateUserRequest,
) -> Result<UserDetail, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    api.patch("/users/update_me/", request).await
}

/// Uploads an avatar image for the signed-in user.
#[instrument(skip(api))]
pub async fn upload_avatar(api: &ApiClient, file: &Path) -> Result<String, AppError> {
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Invalid file: {}", file.display())))?
        .to_string();

    let bytes = tokio::fs::read(file)
        .await
        .map_err(|err| AppError::Validation(format!("Failed to read {}: {err}", file.display())))?;

    let response: AvatarResponse = api
        .upload("/users/upload_avatar/", "avatar", file_name, bytes)
        .await?;
    Ok(response.avatar)
}
