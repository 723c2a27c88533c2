//! Language preference. The chosen language is persisted next to the tokens
//! and sent to the backend as `X-Language` so messages come back localized.
//! Only the console's own navigation labels are translated here.

use crate::app_lib::AppError;
use crate::features::auth::storage::{LANGUAGE_KEY, TokenStorage};

pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Supported languages as `(label, code)`.
pub const LANGUAGES: [(&str, &str); 3] = [
    ("简体中文", "zh-CN"),
    ("English", "en"),
    ("繁體中文", "zh-TW"),
];

/// Returns the canonical code for a supported language, matching case-insensitively.
#[must_use]
pub fn normalize_language(code: &str) -> Option<&'static str> {
    let code = code.trim();
    LANGUAGES
        .iter()
        .map(|(_, supported)| *supported)
        .find(|supported| supported.eq_ignore_ascii_case(code))
}

/// Language for outgoing requests: explicit override, then stored preference,
/// then the default.
#[must_use]
pub fn current_language(storage: &dyn TokenStorage, explicit: Option<&str>) -> String {
    explicit
        .and_then(normalize_language)
        .or_else(|| storage.get(LANGUAGE_KEY).as_deref().and_then(normalize_language))
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}

/// Persists the language preference.
///
/// # Errors
/// Returns `AppError::Validation` for unsupported codes, or a storage error.
pub fn set_language(storage: &dyn TokenStorage, code: &str) -> Result<&'static str, AppError> {
    let Some(language) = normalize_language(code) else {
        let supported: Vec<&str> = LANGUAGES.iter().map(|(_, code)| *code).collect();
        return Err(AppError::Validation(format!(
            "Unsupported language '{}', expected one of: {}",
            code.trim(),
            supported.join(", ")
        )));
    };
    storage.set(LANGUAGE_KEY, language)?;
    Ok(language)
}

/// Translates a navigation label key. Unknown keys are returned unchanged.
#[must_use]
pub fn label<'a>(key: &'a str, language: &str) -> &'a str {
    let entry = match key {
        "layout.dashboard" => ("仪表盘", "Dashboard", "儀表板"),
        "layout.systemManagement" => ("系统管理", "System", "系統管理"),
        "layout.permissionList" => ("权限列表", "Permissions", "權限列表"),
        "layout.roleManagement" => ("角色管理", "Roles", "角色管理"),
        "layout.userManagement" => ("用户管理", "Users", "用戶管理"),
        "layout.departmentManagement" => ("部门管理", "Departments", "部門管理"),
        "layout.systemSettings" => ("系统设置", "Settings", "系統設定"),
        _ => return key,
    };

    match language {
        "en" => entry.1,
        "zh-TW" => entry.2,
        _ => entry.0,
    }
}
