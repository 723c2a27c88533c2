//! Client helpers for role endpoints, including permission assignment.

use crate::{
    app_lib::{ApiClient, AppError, Page},
    features::{
        permissions::types::Permission,
        roles::types::{
            AddedCount, CreateRoleRequest, PermissionIds, RemovedCount, ReplacedCount, Role,
            RoleListItem, RoleListParams, UpdateRoleRequest,
        },
        validate_id,
    },
};
use tracing::instrument;

#[instrument(skip(api))]
pub async fn list_roles(
    api: &ApiClient,
    params: &RoleListParams,
) -> Result<Page<RoleListItem>, AppError> {
    api.get_with_query("/roles/", params).await
}

#[instrument(skip(api))]
pub async fn get_role(api: &ApiClient, id: u64) -> Result<Role, AppError> {
    let id = validate_id("Role", id)?;
    api.get(&format!("/roles/{id}/")).await
}

#[instrument(skip(api))]
pub async fn create_role(api: &ApiClient, request: &CreateRoleRequest) -> Result<Role, AppError> {
    if request.name.trim().is_empty() || request.code.trim().is_empty() {
        return Err(AppError::Validation(
            "Role name and code are required.".to_string(),
        ));
    }
    api.post("/roles/", request).await
}

/// Full update (PUT).
#[instrument(skip(api))]
pub async fn update_role(
    api: &ApiClient,
    id: u64,
    request: &UpdateRoleRequest,
) -> Result<Role, AppError> {
    let id = validate_id("Role", id)?;
    api.put(&format!("/roles/{id}/"), request).await
}

/// Partial update (PATCH).
#[instrument(skip(api))]
pub async fn patch_role(
    api: &ApiClient,
    id: u64,
    request: &UpdateRoleRequest,
) -> Result<Role, AppError> {
    let id = validate_id("Role", id)?;
    if request.is_empty() {
        return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    api.patch(&format!("/roles/{id}/"), request).await
}

#[instrument(skip(api))]
pub async fn delete_role(api: &ApiClient, id: u64) -> Result<(), AppError> {
    let id = validate_id("Role", id)?;
    api.delete(&format!("/roles/{id}/")).await
}

/// Permissions currently assigned to a role.
#[instrument(skip(api))]
pub async fn role_permissions(api: &ApiClient, id: u64) -> Result<Vec<Permission>, AppError> {
    let id = validate_id("Role", id)?;
    api.get(&format!("/roles/{id}/permissions/")).await
}

/// Adds permissions to a role; returns how many were newly assigned.
#[instrument(skip(api))]
pub async fn add_role_permissions(
    api: &ApiClient,
    id: u64,
    permission_ids: &[u64],
) -> Result<u32, AppError> {
    let path = assignment_path(id, "add", permission_ids)?;
    let response: AddedCount = api.post(&path, &PermissionIds { permission_ids }).await?;
    Ok(response.added_count)
}

/// Removes permissions from a role; returns how many were unassigned.
#[instrument(skip(api))]
pub async fn remove_role_permissions(
    api: &ApiClient,
    id: u64,
    permission_ids: &[u64],
) -> Result<u32, AppError> {
    let path = assignment_path(id, "remove", permission_ids)?;
    let response: RemovedCount = api.post(&path, &PermissionIds { permission_ids }).await?;
    Ok(response.removed_count)
}

/// Replaces the whole permission set of a role. An empty list clears it.
#[instrument(skip(api))]
pub async fn replace_role_permissions(
    api: &ApiClient,
    id: u64,
    permission_ids: &[u64],
) -> Result<ReplacedCount, AppError> {
    let id = validate_id("Role", id)?;
    check_permission_ids(permission_ids)?;
    api.post(
        &format!("/roles/{id}/permissions/replace/"),
        &PermissionIds { permission_ids },
    )
    .await
}

fn assignment_path(id: u64, action: &str, permission_ids: &[u64]) -> Result<String, AppError> {
    let id = validate_id("Role", id)?;
    if permission_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one permission id is required.".to_string(),
        ));
    }
    check_permission_ids(permission_ids)?;
    Ok(format!("/roles/{id}/permissions/{action}/"))
}

fn check_permission_ids(permission_ids: &[u64]) -> Result<(), AppError> {
    for id in permission_ids {
        validate_id("Permission", *id)?;
    }
    Ok(())
}
