//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod discover;
pub mod drafts;
pub mod onboarding;
pub mod profile;
pub mod reviews;
pub mod transcribe;
