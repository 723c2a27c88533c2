//! Console routes. Each route maps to a guard deciding whether the current
//! session may open it.

pub mod menu;

use crate::features::auth::guards::RouteGuard;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Permissions,
    Roles,
    Users,
    Departments,
    Settings,
    Forbidden,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Permissions,
        Route::Roles,
        Route::Users,
        Route::Departments,
        Route::Settings,
        Route::Forbidden,
        Route::NotFound,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Permissions => "/system/permissions",
            Route::Roles => "/system/roles",
            Route::Users => "/system/users",
            Route::Departments => "/system/departments",
            Route::Settings => "/settings",
            Route::Forbidden => "/403",
            Route::NotFound => "/404",
        }
    }

    /// Resolves a path. `/` goes to the dashboard and unknown paths to `/404`.
    #[must_use]
    pub fn from_path(path: &str) -> Route {
        let path = path.trim();
        let path = match path.trim_end_matches('/') {
            "" => return Route::Dashboard,
            trimmed => trimmed,
        };
        Route::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Route::NotFound)
    }

    #[must_use]
    pub fn guard(self) -> RouteGuard {
        match self {
            Route::Login | Route::Register | Route::Forbidden | Route::NotFound => {
                RouteGuard::public()
            }
            Route::Dashboard => RouteGuard::authenticated(),
            Route::Permissions => RouteGuard::permission("permission:read"),
            Route::Roles => RouteGuard::permission("role:read"),
            Route::Users => RouteGuard::permission("user:read"),
            Route::Departments => RouteGuard::permission("department:read"),
            Route::Settings => RouteGuard::role("admin"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
