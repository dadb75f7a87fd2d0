//! Book page handlers
//!
//! Thin adapters between the HTTP surface and the catalog service: parse
//! parameters, delegate, then pick a redirect, a rendered page, or a form
//! re-render. Validation failures are intercepted here so the user gets
//! their submission back with messages; everything else propagates to
//! [`crate::error::AppError`]'s response mapping.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::book::BookDraft,
    views, AppState,
};

/// Query parameters for the list page
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Requested page number; anything but a positive integer means page 1
    pub p: Option<String>,
}

/// Book identifiers arrive as path text; anything that is not an integer
/// cannot name a record, so it reads as not found rather than a bad request.
fn parse_id(raw: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .map_err(|_| AppError::NotFound(format!("Book {} not found", raw)))
}

/// `GET /` — the catalog lives under `/books`
pub async fn home() -> Redirect {
    Redirect::to("/books")
}

/// `GET /books?p=` — one page of the full catalog
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Html<String>> {
    let listing = state
        .services
        .catalog
        .browse(None, query.p.as_deref())
        .await?;
    Ok(Html(views::index(&listing)))
}

/// `GET /books/new` — empty creation form
pub async fn new_book_form() -> Html<String> {
    Html(views::new_book(&BookDraft::default(), &[]))
}

/// `GET /books/:id` — detail/edit form, or the 404 page
pub async fn show_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id = parse_id(&id)?;
    let book = state.services.catalog.get(id).await?;
    Ok(Html(views::update_book(id, &BookDraft::from(&book), &[])))
}

/// `POST /books/new` — create, redirecting to the list on success and
/// re-rendering the form with messages on a rejected submission
pub async fn create_book(
    State(state): State<AppState>,
    Form(draft): Form<BookDraft>,
) -> AppResult<Response> {
    match state.services.catalog.create(draft.clone()).await {
        Ok(book) => {
            tracing::info!(id = book.id, title = %book.title, "book created");
            Ok(Redirect::to("/books").into_response())
        }
        Err(AppError::Validation(errors)) => {
            Ok(Html(views::new_book(&draft, &errors)).into_response())
        }
        Err(other) => Err(other),
    }
}

/// `POST /books/:id` — full-record update; same outcomes as creation, plus
/// the 404 page when the id names nothing
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(draft): Form<BookDraft>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.catalog.update(id, draft.clone()).await {
        Ok(book) => {
            tracing::info!(id = book.id, "book updated");
            Ok(Redirect::to("/books").into_response())
        }
        Err(AppError::Validation(errors)) => {
            Ok(Html(views::update_book(id, &draft, &errors)).into_response())
        }
        Err(other) => Err(other),
    }
}

/// `POST /books/:id/delete` — unconditional removal
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    let id = parse_id(&id)?;
    state.services.catalog.delete(id).await?;
    tracing::info!(id, "book deleted");
    Ok(Redirect::to("/books"))
}
