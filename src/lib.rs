//! # rbac-console
//!
//! Administrative console for an RBAC backend: users, departments, roles and
//! permissions managed over the backend's REST API (`/api/v1`).
//!
//! ## Sessions
//!
//! Sign-in returns a short-lived access token and a longer-lived refresh
//! token. Both are kept in a session file (mode `0600`) so later runs can
//! restore the session: the current user is fetched again, refreshing the
//! access token first when its `exp` claim has passed. A 401 on any call
//! other than login/register drops the access token and expires the session.
//!
//! ## Authorization
//!
//! The signed-in user carries permission codes (`resource:action`, e.g.
//! `user:create`) and role codes. Routes are guarded by those grants and
//! mutating commands are gated by the permission they need. The backend
//! remains the authority; the console only avoids offering what would be
//! refused.
//!
//! ## Layout
//!
//! - [`app_lib`]: HTTP client, envelope handling, config, errors, notices.
//! - [`features`]: auth, users, roles, departments, permissions, i18n.
//! - [`routes`]: route table, guards and the navigation menu.
//! - [`cli`]: command-line front end.

pub mod app_lib;
pub mod cli;
pub mod features;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
