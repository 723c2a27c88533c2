use crate::features::tree::TreeNode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub manager: Option<u64>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub children_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentTreeNode {
    #[serde(flatten)]
    pub department: Department,
    #[serde(default)]
    pub children: Vec<DepartmentTreeNode>,
}

impl TreeNode for DepartmentTreeNode {
    fn node_id(&self) -> u64 {
        self.department.id
    }

    fn label(&self) -> String {
        match self.department.code.as_deref() {
            Some(code) if !code.is_empty() => {
                format!("{} [{}] #{}", self.department.name, code, self.department.id)
            }
            _ => format!("{} #{}", self.department.name, self.department.id),
        }
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Create payload. `parent` and `manager` serialize as `null` when unset so
/// a department can be created at the root.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub parent: Option<u64>,
    pub manager: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Update payload. For `parent` and `manager`, `Some(None)` clears the link.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateDepartmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateDepartmentRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}
