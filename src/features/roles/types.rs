use crate::features::permissions::types::Permission;
use serde::{Deserialize, Serialize};

/// A role with its assigned permissions, as returned by the detail endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_by: Option<u64>,
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
    #[serde(default)]
    pub permissions_count: Option<u32>,
    #[serde(default)]
    pub users_count: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleListItem {
    pub id: u64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub permissions_count: Option<u32>,
    #[serde(default)]
    pub users_count: Option<u32>,
}

impl From<Role> for RoleListItem {
    fn from(role: Role) -> Self {
        let permissions_count = role
            .permissions_count
            .or_else(|| role.permissions.as_ref().and_then(|p| u32::try_from(p.len()).ok()));
        Self {
            id: role.id,
            name: role.name,
            code: role.code,
            description: role.description,
            sort_order: role.sort_order,
            is_active: role.is_active,
            is_system: role.is_system,
            created_at: role.created_at,
            updated_at: role.updated_at,
            permissions_count,
            users_count: role.users_count,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateRoleRequest {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<u64>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateRoleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<u64>>,
}

impl UpdateRoleRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl RoleListParams {
    /// Overlays the fields set in `other`.
    pub fn merge(&mut self, other: RoleListParams) {
        let RoleListParams {
            page,
            page_size,
            search,
            is_active,
            is_system,
            ordering,
        } = other;
        self.page = page.or(self.page);
        self.page_size = page_size.or(self.page_size);
        self.search = search.or(self.search.take());
        self.is_active = is_active.or(self.is_active);
        self.is_system = is_system.or(self.is_system);
        self.ordering = ordering.or(self.ordering.take());
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub(crate) struct PermissionIds<'a> {
    pub permission_ids: &'a [u64],
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddedCount {
    pub added_count: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemovedCount {
    pub removed_count: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplacedCount {
    pub old_count: u32,
    pub new_count: u32,
}
