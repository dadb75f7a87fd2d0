//! HTTP handlers for the Libris pages

pub mod books;
pub mod health;
pub mod search;

use axum::{http::StatusCode, response::Html};

use crate::views;

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(views::page_not_found()))
}
