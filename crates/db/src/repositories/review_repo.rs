//! Repository for the `reviews` and `review_photos` tables.

use std::collections::BTreeMap;

use sqlx::PgPool;
use vicinity_core::types::DbId;

use crate::models::review::{CreateReview, Review, ReviewPhoto, ReviewWithPhotos};

/// Column list for `reviews` queries.
const COLUMNS: &str = "\
    id, place_id, user_id, rating, tags, body, text_content, transcription, \
    created_at, updated_at";

/// Column list for `review_photos` queries.
const PHOTO_COLUMNS: &str = "id, review_id, file_name, data_url, created_at, updated_at";

/// Provides review storage and the per-place listings.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review with its photos and bump the place's rating
    /// aggregates, all in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReview,
    ) -> Result<ReviewWithPhotos, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO reviews \
                 (place_id, user_id, rating, tags, body, text_content, transcription) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(input.place_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.tags)
            .bind(&input.body)
            .bind(&input.text_content)
            .bind(&input.transcription)
            .fetch_one(&mut *tx)
            .await?;

        let mut photos = Vec::with_capacity(input.photos.len());
        let photo_query = format!(
            "INSERT INTO review_photos (review_id, file_name, data_url) \
             VALUES ($1, $2, $3) \
             RETURNING {PHOTO_COLUMNS}"
        );
        for (file_name, data_url) in &input.photos {
            let photo = sqlx::query_as::<_, ReviewPhoto>(&photo_query)
                .bind(review.id)
                .bind(file_name)
                .bind(data_url)
                .fetch_one(&mut *tx)
                .await?;
            photos.push(photo);
        }

        sqlx::query(
            "UPDATE places \
             SET rating_sum = rating_sum + $2, review_count = review_count + 1, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(input.place_id)
        .bind(i64::from(input.rating))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReviewWithPhotos { review, photos })
    }

    /// Reviews for a place, newest first, with their photos.
    pub async fn list_for_place(
        pool: &PgPool,
        place_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewWithPhotos>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE place_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(place_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Self::attach_photos(pool, reviews).await
    }

    /// Reviews written by a user, newest first, with their photos.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReviewWithPhotos>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Self::attach_photos(pool, reviews).await
    }

    /// Count of reviews for a place.
    pub async fn count_for_place(pool: &PgPool, place_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE place_id = $1")
            .bind(place_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Count of reviews written by a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// Load the photos for a batch of reviews and pair them up, keeping
    /// the incoming review order.
    async fn attach_photos(
        pool: &PgPool,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewWithPhotos>, sqlx::Error> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }

        let review_ids: Vec<DbId> = reviews.iter().map(|r| r.id).collect();
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM review_photos \
             WHERE review_id = ANY($1) \
             ORDER BY review_id, id"
        );
        let all_photos = sqlx::query_as::<_, ReviewPhoto>(&query)
            .bind(&review_ids)
            .fetch_all(pool)
            .await?;

        let mut by_review: BTreeMap<DbId, Vec<ReviewPhoto>> = BTreeMap::new();
        for photo in all_photos {
            by_review.entry(photo.review_id).or_default().push(photo);
        }

        Ok(reviews
            .into_iter()
            .map(|review| {
                let photos = by_review.remove(&review.id).unwrap_or_default();
                ReviewWithPhotos { review, photos }
            })
            .collect())
    }
}
