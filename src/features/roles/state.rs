//! Role management state: the cached list, the role being viewed and the
//! permission tree used for assignment. Mutations raise success notices.

use crate::{
    app_lib::{ApiClient, AppError, Notice},
    features::{
        permissions::{client::permission_tree, types::PermissionTreeNode},
        roles::{
            client,
            types::{CreateRoleRequest, Role, RoleListItem, RoleListParams, UpdateRoleRequest},
        },
    },
};
use tracing::debug;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleState {
    pub roles: Vec<RoleListItem>,
    pub total: u64,
    pub loading: bool,
    pub current_role: Option<Role>,
    pub permission_tree: Vec<PermissionTreeNode>,
    pub list_params: RoleListParams,
    pub error: Option<String>,
}

impl Default for RoleState {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            total: 0,
            loading: false,
            current_role: None,
            permission_tree: Vec::new(),
            list_params: RoleListParams {
                page: Some(DEFAULT_PAGE),
                page_size: Some(DEFAULT_PAGE_SIZE),
                ..RoleListParams::default()
            },
            error: None,
        }
    }
}

#[derive(Debug)]
pub struct RoleStore {
    api: ApiClient,
    state: RoleState,
}

impl RoleStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RoleState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &RoleState {
        &self.state
    }

    pub fn set_list_params(&mut self, params: RoleListParams) {
        self.state.list_params.merge(params);
    }

    pub fn clear_current_role(&mut self) {
        self.state.current_role = None;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    /// Loads a page of roles using the stored list parameters merged with `params`.
    ///
    /// # Errors
    /// Propagates the API error; the message is also kept in `error`.
    pub async fn fetch_roles(&mut self, params: Option<RoleListParams>) -> Result<(), AppError> {
        if let Some(params) = params {
            self.set_list_params(params);
        }
        self.state.loading = true;
        self.state.error = None;

        let result = client::list_roles(&self.api, &self.state.list_params).await;
        self.state.loading = false;
        let page = self.record(result)?;
        self.state.total = page.count;
        self.state.roles = page.results;
        debug!(total = self.state.total, "roles loaded");
        Ok(())
    }

    /// # Errors
    /// Propagates the API error.
    pub async fn fetch_role(&mut self, id: u64) -> Result<&Role, AppError> {
        self.state.error = None;
        let result = client::get_role(&self.api, id).await;
        let role = self.record(result)?;
        Ok(self.state.current_role.insert(role))
    }

    /// # Errors
    /// Propagates the API error after raising an error notice.
    pub async fn create_role(&mut self, request: &CreateRoleRequest) -> Result<Role, AppError> {
        let result = client::create_role(&self.api, request).await;
        let role = self.mutation(result, "Role created", "Failed to create role")?;
        Ok(role)
    }

    /// Applies a partial update and refreshes the cached copies of the role.
    ///
    /// # Errors
    /// Propagates the API error after raising an error notice.
    pub async fn update_role(
        &mut self,
        id: u64,
        request: &UpdateRoleRequest,
    ) -> Result<Role, AppError> {
        let result = client::patch_role(&self.api, id, request).await;
        let role = self.mutation(result, "Role updated", "Failed to update role")?;

        if self.state.current_role.as_ref().map(|r| r.id) == Some(role.id) {
            self.state.current_role = Some(role.clone());
        }
        if let Some(slot) = self.state.roles.iter_mut().find(|r| r.id == role.id) {
            *slot = RoleListItem::from(role.clone());
        }
        Ok(role)
    }

    /// # Errors
    /// Propagates the API error after raising an error notice.
    pub async fn delete_role(&mut self, id: u64) -> Result<(), AppError> {
        let result = client::delete_role(&self.api, id).await;
        self.mutation(result, "Role deleted", "Failed to delete role")?;

        self.state.roles.retain(|role| role.id != id);
        if self.state.current_role.as_ref().map(|r| r.id) == Some(id) {
            self.state.current_role = None;
        }
        Ok(())
    }

    /// # Errors
    /// Propagates the API error.
    pub async fn fetch_permission_tree(&mut self) -> Result<&[PermissionTreeNode], AppError> {
        let result = permission_tree(&self.api).await;
        self.state.permission_tree = self.record(result)?;
        Ok(&self.state.permission_tree)
    }

    fn record<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        result.inspect_err(|err| self.state.error = Some(err.to_string()))
    }

    fn mutation<T>(
        &mut self,
        result: Result<T, AppError>,
        success: &str,
        failure: &str,
    ) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                self.api.notify(Notice::success(success));
                Ok(value)
            }
            Err(err) => {
                // Status and transport failures were already reported by the client.
                if matches!(err, AppError::Business(_) | AppError::Validation(_)) {
                    self.api.notify(Notice::error(format!("{failure}: {err}")));
                }
                self.state.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
