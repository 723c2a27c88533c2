//! Role management: CRUD, permission assignment and the role store that keeps
//! the list view state between calls.

pub mod client;
pub mod state;
pub mod types;
