use crate::features::tree::TreeNode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub id: u64,
    pub name: String,
    /// `resource:action`, e.g. `user:create`.
    pub code: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub children_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionTreeNode {
    #[serde(flatten)]
    pub permission: Permission,
    #[serde(default)]
    pub children: Vec<PermissionTreeNode>,
}

impl TreeNode for PermissionTreeNode {
    fn node_id(&self) -> u64 {
        self.permission.id
    }

    fn label(&self) -> String {
        format!(
            "{} ({}) #{}",
            self.permission.name, self.permission.code, self.permission.id
        )
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}
