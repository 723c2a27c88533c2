//! User management: paginated listing, details, create/update/delete,
//! activation toggling and the signed-in user's own profile.

pub mod client;
pub mod types;
