//! Route guard: holds protected routes back until the session is known, then
//! redirects signed-out or under-privileged requests.

use crate::features::auth::authz::Grants;

/// Session facts a guard looks at.
#[derive(Clone, Copy, Debug)]
pub struct GuardContext<'a> {
    pub grants: Grants<'a>,
    pub is_initialized: bool,
    pub has_token: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session restoration has not finished yet.
    Pending(&'static str),
    /// Send the user to the login route, then back to `from`.
    RedirectLogin { from: String },
    /// Signed in but missing a required permission or role (403).
    Forbidden,
    Allow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteGuard {
    pub require_auth: bool,
    pub require_permission: Vec<String>,
    pub require_role: Vec<String>,
    pub require_all_permissions: bool,
    pub require_all_roles: bool,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self {
            require_auth: true,
            require_permission: Vec::new(),
            require_role: Vec::new(),
            require_all_permissions: false,
            require_all_roles: false,
        }
    }
}

impl RouteGuard {
    /// Open to everyone, e.g. the login page.
    #[must_use]
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn authenticated() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn permission(code: impl Into<String>) -> Self {
        Self {
            require_permission: vec![code.into()],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn role(code: impl Into<String>) -> Self {
        Self {
            require_role: vec![code.into()],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn check(&self, ctx: &GuardContext<'_>, from: &str) -> GuardOutcome {
        if self.require_auth && !ctx.is_initialized {
            return GuardOutcome::Pending(if ctx.has_token {
                "Verifying sign-in state"
            } else {
                "Checking sign-in state"
            });
        }

        if self.require_auth && !ctx.grants.authenticated {
            return GuardOutcome::RedirectLogin {
                from: from.to_string(),
            };
        }

        if !self.require_permission.is_empty() {
            let allowed = if self.require_all_permissions {
                ctx.grants.has_all_permissions(&self.require_permission)
            } else {
                ctx.grants.has_any_permission(&self.require_permission)
            };
            if !allowed {
                return GuardOutcome::Forbidden;
            }
        }

        if !self.require_role.is_empty() {
            let allowed = if self.require_all_roles {
                ctx.grants.has_all_roles(&self.require_role)
            } else {
                ctx.grants.has_any_role(&self.require_role)
            };
            if !allowed {
                return GuardOutcome::Forbidden;
            }
        }

        GuardOutcome::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn waits_for_restoration() {
        let empty = BTreeSet::new();
        let mut ctx = GuardContext {
            grants: Grants::new(true, &empty, &empty),
            is_initialized: false,
            has_token: true,
        };
        let guard = RouteGuard::authenticated();
        assert_eq!(
            guard.check(&ctx, "/dashboard"),
            GuardOutcome::Pending("Verifying sign-in state")
        );

        ctx.has_token = false;
        assert_eq!(
            guard.check(&ctx, "/dashboard"),
            GuardOutcome::Pending("Checking sign-in state")
        );
        assert_eq!(
            RouteGuard::public().check(&ctx, "/login"),
            GuardOutcome::Allow
        );
    }

    #[test]
    fn redirects_signed_out_users_with_origin() {
        let empty = BTreeSet::new();
        let ctx = GuardContext {
            grants: Grants::new(false, &empty, &empty),
            is_initialized: true,
            has_token: false,
        };
        assert_eq!(
            RouteGuard::permission("user:read").check(&ctx, "/system/users"),
            GuardOutcome::RedirectLogin {
                from: "/system/users".to_string()
            }
        );
    }

    #[test]
    fn permission_then_role_checks() {
        let permissions = set(&["user:read"]);
        let roles = set(&["user"]);
        let ctx = GuardContext {
            grants: Grants::new(true, &permissions, &roles),
            is_initialized: true,
            has_token: true,
        };

        assert_eq!(
            RouteGuard::permission("user:read").check(&ctx, "/system/users"),
            GuardOutcome::Allow
        );
        assert_eq!(
            RouteGuard::permission("role:read").check(&ctx, "/system/roles"),
            GuardOutcome::Forbidden
        );
        assert_eq!(
            RouteGuard::role("admin").check(&ctx, "/settings"),
            GuardOutcome::Forbidden
        );

        let all = RouteGuard {
            require_permission: vec!["user:read".to_string(), "user:update".to_string()],
            require_all_permissions: true,
            ..RouteGuard::default()
        };
        assert_eq!(all.check(&ctx, "/system/users"), GuardOutcome::Forbidden);
    }
}
