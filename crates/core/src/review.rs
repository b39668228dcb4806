//! Review bounds and validation.
//!
//! A review needs a star rating plus at least one piece of content: text,
//! a photo, or a transcribed voice note. Photos travel inline as data URLs
//! and are size- and type-checked against their decoded payload.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Lowest selectable star rating.
pub const MIN_RATING: i32 = 1;

/// Highest selectable star rating.
pub const MAX_RATING: i32 = 5;

/// Maximum number of tags on a review.
pub const MAX_TAGS: usize = 4;

/// Maximum length of the written experience text.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Maximum length of a voice-note transcription.
pub const MAX_TRANSCRIPTION_CHARS: usize = 5000;

/// Maximum number of photos per review.
pub const MAX_PHOTOS: usize = 5;

/// Maximum decoded size of a single photo.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted photo MIME types.
pub const ACCEPTED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// A photo attached to a review, carried inline as a data URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAttachment {
    pub name: String,
    pub data_url: String,
}

/// A parsed photo payload: its MIME type and decoded size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPhoto {
    pub mime: String,
    pub decoded_len: usize,
}

/// The outcome of validating a review submission.
#[derive(Debug, Clone)]
pub struct ValidatedReview {
    pub rating: i32,
    /// Distinct tags, at most [`MAX_TAGS`].
    pub tags: Vec<String>,
    /// Written text and transcription joined into the review body.
    pub body: String,
    pub text: String,
    pub transcription: String,
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate the star rating. Zero means "not selected".
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if rating == 0 {
        return Err(CoreError::Validation(
            "Please select a rating".to_string(),
        ));
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Validate review tags: at most [`MAX_TAGS`] distinct, none blank.
/// Returns the distinct tags in submission order.
pub fn validate_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    let mut distinct: Vec<String> = Vec::new();
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation(
                "Tags must be non-empty".to_string(),
            ));
        }
        if !distinct.contains(tag) {
            distinct.push(tag.clone());
        }
    }

    if distinct.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "You can only select up to {MAX_TAGS} tags."
        )));
    }
    Ok(distinct)
}

/// Validate the written text length.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    let len = text.chars().count();
    if len > MAX_TEXT_CHARS {
        return Err(CoreError::Validation(format!(
            "Text is too long ({len}/{MAX_TEXT_CHARS})"
        )));
    }
    Ok(())
}

/// Validate the transcription length.
pub fn validate_transcription(transcription: &str) -> Result<(), CoreError> {
    let len = transcription.chars().count();
    if len > MAX_TRANSCRIPTION_CHARS {
        return Err(CoreError::Validation(format!(
            "Transcription is too long ({len}/{MAX_TRANSCRIPTION_CHARS})"
        )));
    }
    Ok(())
}

/// Parse and validate a photo's data URL against the accepted types and
/// the decoded size limit.
pub fn parse_photo_data_url(name: &str, data_url: &str) -> Result<ParsedPhoto, CoreError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation(format!("{name}: Invalid photo data")))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| CoreError::Validation(format!("{name}: Invalid photo data")))?;

    let mime = mime.to_ascii_lowercase();
    if !ACCEPTED_PHOTO_TYPES.contains(&mime.as_str()) {
        return Err(CoreError::Validation(format!(
            "{name}: Invalid file type. Please use JPG, PNG, or WebP."
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| CoreError::Validation(format!("{name}: Invalid photo data")))?;

    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation(format!(
            "{name}: File too large. Maximum size is 5MB."
        )));
    }

    Ok(ParsedPhoto {
        mime,
        decoded_len: bytes.len(),
    })
}

/// Validate the photo set: count plus every payload.
pub fn validate_photos(photos: &[PhotoAttachment]) -> Result<(), CoreError> {
    if photos.len() > MAX_PHOTOS {
        return Err(CoreError::Validation(format!(
            "You can only add up to {MAX_PHOTOS} photos"
        )));
    }
    for photo in photos {
        if photo.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Photo name must not be empty".to_string(),
            ));
        }
        parse_photo_data_url(&photo.name, &photo.data_url)?;
    }
    Ok(())
}

/// Whether the review carries any content at all.
pub fn has_content(text: &str, transcription: &str, photo_count: usize) -> bool {
    !text.trim().is_empty() || !transcription.trim().is_empty() || photo_count > 0
}

/// Join written text and transcription into the review body. Blank parts
/// are dropped; the remainder is joined with a single space.
pub fn combined_text(text: &str, transcription: &str) -> String {
    [text, transcription]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate a full review submission and assemble the fields to persist.
pub fn validate_review(
    rating: i32,
    tags: &[String],
    text: &str,
    transcription: &str,
    photos: &[PhotoAttachment],
) -> Result<ValidatedReview, CoreError> {
    validate_rating(rating)?;
    let tags = validate_tags(tags)?;
    validate_text(text)?;
    validate_transcription(transcription)?;
    validate_photos(photos)?;

    if !has_content(text, transcription, photos.len()) {
        return Err(CoreError::Validation(
            "Please add text, a photo, or a voice note".to_string(),
        ));
    }

    Ok(ValidatedReview {
        rating,
        tags,
        body: combined_text(text, transcription),
        text: text.to_string(),
        transcription: transcription.to_string(),
    })
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
