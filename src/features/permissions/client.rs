//! Client helpers for the read-only permission catalogue.

use crate::{
    app_lib::{ApiClient, AppError, Page},
    features::{
        permissions::types::{Permission, PermissionListParams, PermissionTreeNode},
        validate_id,
    },
};
use tracing::instrument;

#[instrument(skip(api))]
pub async fn list_permissions(
    api: &ApiClient,
    params: &PermissionListParams,
) -> Result<Page<Permission>, AppError> {
    api.get_with_query("/permissions/", params).await
}

#[instrument(skip(api))]
pub async fn get_permission(api: &ApiClient, id: u64) -> Result<Permission, AppError> {
    let id = validate_id("Permission", id)?;
    api.get(&format!("/permissions/{id}/")).await
}

/// Fetches the permission hierarchy (module permissions with their actions).
#[instrument(skip(api))]
pub async fn permission_tree(api: &ApiClient) -> Result<Vec<PermissionTreeNode>, AppError> {
    api.get("/permissions/tree/").await
}
