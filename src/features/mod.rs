pub mod auth;
pub mod departments;
pub mod i18n;
pub mod permissions;
pub mod roles;
pub mod tree;
pub mod users;

use crate::app_lib::AppError;

/// Rejects id 0 before a request is sent; backend ids start at 1.
pub(crate) fn validate_id(kind: &str, id: u64) -> Result<u64, AppError> {
    if id == 0 {
        Err(AppError::Validation(format!("{kind} id is required.")))
    } else {
        Ok(id)
    }
}
