use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UserProfile {
    pub id: Option<u64>,
    pub user: Option<u64>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    /// 0 unknown, 1 male, 2 female.
    pub gender: Option<u8>,
    pub birthday: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub department: Option<u64>,
    pub position: Option<String>,
    pub employee_no: Option<String>,
    pub join_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserListItem {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub date_joined: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl UserListItem {
    /// `full_name`, else first and last name, else the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().map(str::trim) {
            if !full.is_empty() {
                return full.to_string();
            }
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.username.clone()
        } else {
            joined
        }
    }
}

/// A user with the permission and role codes granted to them. This is also
/// the shape of the signed-in user returned by login and `/users/me/`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: UserListItem,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 0 unknown, 1 male, 2 female.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

impl ProfileInput {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileInput>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("password_confirm", &"***")
            .field("is_active", &self.is_active)
            .field("is_staff", &self.is_staff)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileInput>,
}

impl UpdateUserRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleActiveResponse {
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_detail_flattens_list_fields() {
        let detail: UserDetail = serde_json::from_value(json!({
            "id": 3,
            "username": "alice",
            "email": "alice@example.com",
            "is_active": true,
            "is_staff": false,
            "date_joined": "2025-12-06T16:00:00Z",
            "permissions": ["user:read", "user:create"],
            "roles": ["admin"]
        }))
        .unwrap();

        assert_eq!(detail.user.id, 3);
        assert_eq!(detail.user.username, "alice");
        assert_eq!(
            detail.permissions,
            Some(vec!["user:read".to_string(), "user:create".to_string()])
        );
        assert_eq!(detail.roles, Some(vec!["admin".to_string()]));
    }

    #[test]
    fn profile_gender_is_numeric() {
        let item: UserListItem = serde_json::from_value(json!({
            "id": 4,
            "username": "erin",
            "profile": {"id": 4, "user": 4, "gender": 2, "department": 3, "position": "Engineer"}
        }))
        .unwrap();
        let profile = item.profile.unwrap();
        assert_eq!(profile.gender, Some(2));
        assert_eq!(profile.department, Some(3));
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user: UserListItem =
            serde_json::from_value(json!({"id": 1, "username": "bob"})).unwrap();
        assert_eq!(user.display_name(), "bob");

        user.first_name = Some("Bob".to_string());
        user.last_name = Some(" Li ".to_string());
        assert_eq!(user.display_name(), "Bob Li");

        user.full_name = Some("Li Bob".to_string());
        assert_eq!(user.display_name(), "Li Bob");
    }

    #[test]
    fn list_params_skip_unset_fields() {
        let params = UserListParams {
            page: Some(2),
            search: Some("ali".to_string()),
            ..UserListParams::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"page": 2, "search": "ali"})
        );
    }

    #[test]
    fn create_request_debug_hides_passwords() {
        let request = CreateUserRequest {
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            password: "hunter22".to_string(),
            password_confirm: "hunter22".to_string(),
            phone: None,
            first_name: None,
            last_name: None,
            is_active: None,
            is_staff: None,
            profile: None,
        };
        assert!(!format!("{request:?}").contains("hunter22"));
    }
}
