//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod draft_repo;
pub mod place_repo;
pub mod profile_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;

pub use draft_repo::DraftRepo;
pub use place_repo::PlaceRepo;
pub use profile_repo::ProfileRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
