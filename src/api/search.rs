//! Search page handlers
//!
//! The search page accepts both a GET with query-string parameters (the
//! canonical form, used by pagination links) and a POST from the search box
//! with the term in the body. Both render the same list page scoped to the
//! filter.

use axum::{
    extract::{Query, State},
    response::Html,
    Form,
};
use serde::Deserialize;

use crate::{error::AppResult, views, AppState};

/// Query parameters for `GET /search`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term; blank means "match all"
    pub s: Option<String>,
    /// Requested page number
    pub p: Option<String>,
}

/// Body fields for `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub search: Option<String>,
    pub p: Option<String>,
}

/// `GET /search?s=&p=`
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    let listing = state
        .services
        .catalog
        .browse(query.s.as_deref(), query.p.as_deref())
        .await?;
    Ok(Html(views::index(&listing)))
}

/// `POST /search` with body field `search`
pub async fn search_books_form(
    State(state): State<AppState>,
    Form(body): Form<SearchBody>,
) -> AppResult<Html<String>> {
    let listing = state
        .services
        .catalog
        .browse(body.search.as_deref(), body.p.as_deref())
        .await?;
    Ok(Html(views::index(&listing)))
}
