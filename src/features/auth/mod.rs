//! Authentication and client-side authorization.
//!
//! - [`storage`] keeps tokens and the language preference between runs.
//! - [`state`] owns the session lifecycle (login, refresh, restore, logout).
//! - [`authz`] and [`guards`] decide what the signed-in user is offered.
//! - [`token`] peeks at JWT claims to refresh before they are rejected.

pub mod authz;
pub mod client;
pub mod guards;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;
