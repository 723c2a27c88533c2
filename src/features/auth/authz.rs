//! Client-side authorization checks over the signed-in user's grants.
//!
//! These decide what the console offers; the backend still authorizes every
//! request. Every predicate is false while signed out or when the relevant
//! grant set is empty.

use regex::Regex;
use std::collections::BTreeSet;

/// Borrowed view of the session's grants.
#[derive(Clone, Copy, Debug)]
pub struct Grants<'a> {
    pub authenticated: bool,
    pub permissions: &'a BTreeSet<String>,
    pub roles: &'a BTreeSet<String>,
}

impl<'a> Grants<'a> {
    #[must_use]
    pub fn new(
        authenticated: bool,
        permissions: &'a BTreeSet<String>,
        roles: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            authenticated,
            permissions,
            roles,
        }
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        usable(self.authenticated, self.permissions) && self.permissions.contains(permission)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        usable(self.authenticated, self.roles) && self.roles.contains(role)
    }

    #[must_use]
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        any_of(self.authenticated, self.permissions, permissions)
    }

    #[must_use]
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        any_of(self.authenticated, self.roles, roles)
    }

    /// True for an empty request list as long as some permission is granted.
    #[must_use]
    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        all_of(self.authenticated, self.permissions, permissions)
    }

    #[must_use]
    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        all_of(self.authenticated, self.roles, roles)
    }
}

fn usable(authenticated: bool, granted: &BTreeSet<String>) -> bool {
    authenticated && !granted.is_empty()
}

fn any_of<S: AsRef<str>>(authenticated: bool, granted: &BTreeSet<String>, wanted: &[S]) -> bool {
    usable(authenticated, granted) && wanted.iter().any(|code| granted.contains(code.as_ref()))
}

fn all_of<S: AsRef<str>>(authenticated: bool, granted: &BTreeSet<String>, wanted: &[S]) -> bool {
    usable(authenticated, granted) && wanted.iter().all(|code| granted.contains(code.as_ref()))
}

/// What to do with a gated action the user may not perform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeniedMode {
    #[default]
    Hide,
    Disable,
}

/// Outcome of evaluating a [`Requirement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    Visible,
    Disabled,
    Hidden,
}

impl Gate {
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Requirements attached to a gated action.
///
/// A single permission sets access; a non-empty permission list replaces that
/// result (any-of, or all-of with `require_all`); the single role and the role
/// list (any-of) must then hold as well. An empty requirement always passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirement {
    pub permission: Option<String>,
    pub permissions: Vec<String>,
    pub role: Option<String>,
    pub roles: Vec<String>,
    pub require_all: bool,
    pub denied: DeniedMode,
}

impl Requirement {
    #[must_use]
    pub fn permission(code: impl Into<String>) -> Self {
        Self {
            permission: Some(code.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn any_permission<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn all_permissions<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            require_all: true,
            ..Self::any_permission(codes)
        }
    }

    #[must_use]
    pub fn role(code: impl Into<String>) -> Self {
        Self {
            role: Some(code.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, code: impl Into<String>) -> Self {
        self.role = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_roles<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = codes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn or_disable(mut self) -> Self {
        self.denied = DeniedMode::Disable;
        self
    }

    #[must_use]
    pub fn allows(&self, grants: &Grants<'_>) -> bool {
        let mut allowed = true;

        if let Some(permission) = self.permission.as_deref() {
            allowed = grants.has_permission(permission);
        }
        if !self.permissions.is_empty() {
            allowed = if self.require_all {
                grants.has_all_permissions(&self.permissions)
            } else {
                grants.has_any_permission(&self.permissions)
            };
        }
        if let Some(role) = self.role.as_deref() {
            allowed = allowed && grants.has_role(role);
        }
        if !self.roles.is_empty() {
            allowed = allowed && grants.has_any_role(&self.roles);
        }

        allowed
    }

    #[must_use]
    pub fn evaluate(&self, grants: &Grants<'_>) -> Gate {
        match (self.allows(grants), self.denied) {
            (true, _) => Gate::Visible,
            (false, DeniedMode::Hide) => Gate::Hidden,
            (false, DeniedMode::Disable) => Gate::Disabled,
        }
    }
}

/// Checks the `resource:action` shape, e.g. `user:create` or `role:*`.
#[must_use]
pub fn is_valid_permission_code(code: &str) -> bool {
    Regex::new(r"^[a-z_]+:[a-z_*]+$").is_ok_and(|re| re.is_match(code))
}

/// Builds a `resource:action` code.
#[must_use]
pub fn permission_code(resource: &str, action: &str) -> String {
    format!("{resource}:{action}")
}
