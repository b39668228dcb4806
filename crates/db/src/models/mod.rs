//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts
//! - Query parameter structs where a repository method takes more than a
//!   couple of arguments

pub mod draft;
pub mod place;
pub mod profile;
pub mod review;
pub mod session;
pub mod user;
