//! Department management: paginated listing, details, create/update/delete
//! and the department tree.

pub mod client;
pub mod types;
