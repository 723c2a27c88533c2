use crate::cli::actions::{auth, departments, navigation, permissions, roles, users, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Auth(args) => auth::execute(args).await,
        Action::Navigation(args) => navigation::execute(args).await,
        Action::Users(args) => users::execute(args).await,
        Action::Roles(args) => roles::execute(args).await,
        Action::Departments(args) => departments::execute(args).await,
        Action::Permissions(args) => permissions::execute(args).await,
    }
}
