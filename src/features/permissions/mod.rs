//! Permission catalogue: listing, details and the permission tree used when
//! assigning permissions to roles.

pub mod client;
pub mod types;
