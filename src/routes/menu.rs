//! Navigation menu and breadcrumbs, filtered by the session's grants.

use crate::features::{auth::authz::Grants, i18n};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label_key: &'static str,
    pub path: &'static str,
    /// Any-of permission requirement.
    pub permissions: Vec<&'static str>,
    /// Any-of role requirement.
    pub roles: Vec<&'static str>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn leaf(path: &'static str, label_key: &'static str) -> Self {
        Self {
            key: path,
            label_key,
            path,
            permissions: Vec::new(),
            roles: Vec::new(),
            children: Vec::new(),
        }
    }

    fn with_permission(mut self, code: &'static str) -> Self {
        self.permissions.push(code);
        self
    }

    fn with_role(mut self, code: &'static str) -> Self {
        self.roles.push(code);
        self
    }

    fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = children;
        self
    }

    fn permitted(&self, grants: &Grants<'_>) -> bool {
        (self.permissions.is_empty() || grants.has_any_permission(&self.permissions))
            && (self.roles.is_empty() || grants.has_any_role(&self.roles))
    }
}

/// A menu entry the user may see, with its label translated.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct VisibleItem {
    pub key: &'static str,
    pub label: String,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VisibleItem>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Crumb {
    pub title: String,
    pub path: &'static str,
}

#[must_use]
pub fn menu_config() -> Vec<MenuItem> {
    vec![
        MenuItem::leaf("/dashboard", "layout.dashboard"),
        MenuItem::leaf("/system", "layout.systemManagement").with_children(vec![
            MenuItem::leaf("/system/permissions", "layout.permissionList")
                .with_permission("permission:read"),
            MenuItem::leaf("/system/roles", "layout.roleManagement").with_permission("role:read"),
            MenuItem::leaf("/system/users", "layout.userManagement").with_permission("user:read"),
            MenuItem::leaf("/system/departments", "layout.departmentManagement")
                .with_permission("department:read"),
        ]),
        MenuItem::leaf("/settings", "layout.systemSettings").with_role("admin"),
    ]
}

/// Filters the menu recursively. A parent that declared children but has
/// none left after filtering is dropped.
#[must_use]
pub fn visible_menu(items: &[MenuItem], grants: &Grants<'_>, language: &str) -> Vec<VisibleItem> {
    items
        .iter()
        .filter(|item| item.permitted(grants))
        .filter_map(|item| {
            let children = visible_menu(&item.children, grants, language);
            if !item.children.is_empty() && children.is_empty() {
                return None;
            }
            Some(VisibleItem {
                key: item.key,
                label: i18n::label(item.label_key, language).to_string(),
                path: item.path,
                children,
            })
        })
        .collect()
}

/// Breadcrumb trail for a path, one crumb per menu entry on the way down.
#[must_use]
pub fn breadcrumbs(items: &[MenuItem], path: &str, language: &str) -> Vec<Crumb> {
    let mut crumbs = Vec::new();
    let mut current = String::new();

    for part in path.split('/').filter(|part| !part.is_empty()) {
        current.push('/');
        current.push_str(part);
        if let Some(item) = find(items, &current) {
            crumbs.push(Crumb {
                title: i18n::label(item.label_key, language).to_string(),
                path: item.path,
            });
        }
    }

    crumbs
}

fn find<'a>(items: &'a [MenuItem], path: &str) -> Option<&'a MenuItem> {
    items.iter().find_map(|item| {
        if item.path == path {
            Some(item)
        } else {
            find(&item.children, path)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn filters_children_by_permission() {
        let permissions = set(&["user:read", "role:read"]);
        let roles = set(&["user"]);
        let grants = Grants::new(true, &permissions, &roles);

        let menu = visible_menu(&menu_config(), &grants, "en");
        let paths: Vec<&str> = menu.iter().map(|item| item.path).collect();
        assert_eq!(paths, vec!["/dashboard", "/system"]);

        let children: Vec<&str> = menu[1].children.iter().map(|item| item.path).collect();
        assert_eq!(children, vec!["/system/roles", "/system/users"]);
        assert_eq!(menu[1].label, "System");
    }

    #[test]
    fn empty_parent_is_dropped_and_admin_sees_settings() {
        let permissions = set(&["dashboard:view"]);
        let roles = set(&["admin"]);
        let grants = Grants::new(true, &permissions, &roles);

        let menu = visible_menu(&menu_config(), &grants, "zh-CN");
        let paths: Vec<&str> = menu.iter().map(|item| item.path).collect();
        assert_eq!(paths, vec!["/dashboard", "/settings"]);
        assert_eq!(menu[0].label, "仪表盘");
    }

    #[test]
    fn breadcrumbs_follow_the_menu() {
        let crumbs = breadcrumbs(&menu_config(), "/system/users", "en");
        assert_eq!(
            crumbs,
            vec![
                Crumb {
                    title: "System".to_string(),
                    path: "/system"
                },
                Crumb {
                    title: "Users".to_string(),
                    path: "/system/users"
                },
            ]
        );
        assert!(breadcrumbs(&menu_config(), "/nowhere", "en").is_empty());
    }
}
