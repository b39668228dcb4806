//! Review entity models and DTOs.

use sqlx::FromRow;
use vicinity_core::types::{DbId, Timestamp};

/// A review row from the `reviews` table.
///
/// `body` is the combined display text; `text_content` and `transcription`
/// keep the typed and voice-note sources separately.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: DbId,
    pub place_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub tags: Vec<String>,
    pub body: String,
    pub text_content: String,
    pub transcription: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A photo row from the `review_photos` table. The payload is the data URL
/// as submitted, already validated for type and size.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewPhoto {
    pub id: DbId,
    pub review_id: DbId,
    pub file_name: String,
    pub data_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review together with its photos, as the API serves it.
#[derive(Debug, Clone)]
pub struct ReviewWithPhotos {
    pub review: Review,
    pub photos: Vec<ReviewPhoto>,
}

/// DTO for creating a review with its photos in one transaction.
#[derive(Debug)]
pub struct CreateReview {
    pub place_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub tags: Vec<String>,
    pub body: String,
    pub text_content: String,
    pub transcription: String,
    /// `(file_name, data_url)` pairs in submission order.
    pub photos: Vec<(String, String)>,
}
