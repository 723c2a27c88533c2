pub mod auth;
pub mod departments;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod users;

mod context;
pub use context::Console;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Auth(auth::Args),
    Navigation(navigation::Args),
    Users(users::Args),
    Roles(roles::Args),
    Departments(departments::Args),
    Permissions(permissions::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
