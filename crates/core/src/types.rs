//! Shared type aliases.

/// Database primary keys (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamps, as stored in every `timestamptz` column.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A `(latitude, longitude)` pair in decimal degrees, used as the origin
/// for nearby ranking and distance filters.
pub type Coordinates = (f64, f64);
