//! Client helpers for department endpoints.

use crate::{
    app_lib::{ApiClient, AppError, Page},
    features::{
        departments::types::{
            CreateDepartmentRequest, Department, DepartmentListParams, DepartmentTreeNode,
            UpdateDepartmentRequest,
        },
        validate_id,
    },
};
use tracing::instrument;

#[instrument(skip(api))]
pub async fn list_departments(
    api: &ApiClient,
    params: &DepartmentListParams,
) -> Result<Page<Department>, AppError> {
    api.get_with_query("/departments/", params).await
}

#[instrument(skip(api))]
pub async fn get_department(api: &ApiClient, id: u64) -> Result<Department, AppError> {
    let id = validate_id("Department", id)?;
    api.get(&format!("/departments/{id}/")).await
}

#[instrument(skip(api))]
pub async fn create_department(
    api: &ApiClient,
    request: &CreateDepartmentRequest,
) -> Result<Department, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Department name is required.".to_string()));
    }
    api.post("/departments/", request).await
}

/// Full update (PUT).
#[instrument(skip(api))]
pub async fn update_department(
    api: &ApiClient,
    id: u64,
    request: &UpdateDepartmentRequest,
) -> Result<Department, AppError> {
    let id = validate_id("Department", id)?;
    check_parent(id, request)?;
    api.put(&format!("/departments/{id}/"), request).await
}

/// Partial update (PATCH).
#[instrument(skip(api))]
pub async fn patch_department(
    api: &ApiClient,
    id: u64,
    request: &UpdateDepartmentRequest,
) -> Result<Department, AppError> {
    let id = validate_id("Department", id)?;
    if request.is_empty() {
        return Err(AppError::Validation("Nothing to update.".to_string()));
    }
    check_parent(id, request)?;
    api.patch(&format!("/departments/{id}/"), request).await
}

#[instrument(skip(api))]
pub async fn delete_department(api: &ApiClient, id: u64) -> Result<(), AppError> {
    let id = validate_id("Department", id)?;
    api.delete(&format!("/departments/{id}/")).await
}

/// Fetches the whole department hierarchy.
#[instrument(skip(api))]
pub async fn department_tree(api: &ApiClient) -> Result<Vec<DepartmentTreeNode>, AppError> {
    api.get("/departments/tree/").await
}

fn check_parent(id: u64, request: &UpdateDepartmentRequest) -> Result<(), AppError> {
    if request.parent == Some(Some(id)) {
        return Err(AppError::Validation(
            "A department cannot be its own parent.".to_string(),
        ));
    }
    Ok(())
}
