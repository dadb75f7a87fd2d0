//! Catalog service: CRUD pass-throughs plus the list/search pagination
//! planner.
//!
//! The planner turns a raw query string and a raw page parameter into a
//! bounded fetch (limit/offset) against the store and derives the
//! navigation metadata (previous/next links, total pages) from the match
//! count. Bad page input never errors; it resets to page 1. A page beyond
//! the last renders as an empty list with the metadata still computed.

use std::sync::Arc;

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::book::{Book, BookDraft, BookFilter},
    repository::BookStore,
};

/// Navigation metadata for one page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pages {
    /// 1-based index of the page being shown
    pub current: i64,
    /// Fixed page size
    pub limit: i64,
    /// Total number of pages matching the filter
    pub total: i64,
    /// Link to the previous page, when in range
    pub previous: Option<String>,
    /// Link to the next page, when in range
    pub next: Option<String>,
}

impl Pages {
    /// Derive the page metadata from the total match count. Links carry the
    /// search term when one is active, so navigation stays scoped to the
    /// filter.
    fn compute(current: i64, limit: i64, total_count: i64, term: Option<&str>) -> Self {
        let total = if total_count == 0 {
            0
        } else {
            (total_count + limit - 1) / limit
        };

        let link = |page: i64| match term {
            Some(term) => format!("/search?s={}&p={}", encode_query_value(term), page),
            None => format!("/books?p={}", page),
        };

        let previous = (current > 1 && total > 1).then(|| link(current - 1));
        let next = (current < total && total > 1).then(|| link(current + 1));

        Self {
            current,
            limit,
            total,
            previous,
            next,
        }
    }
}

/// One page of books together with its navigation metadata.
#[derive(Debug, Clone)]
pub struct BookListing {
    pub rows: Vec<Book>,
    pub pages: Pages,
    /// The active search term, if any
    pub query: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>, mut config: CatalogConfig) -> Self {
        // page_size is also the divisor in the page count; keep it at least 1
        config.page_size = config.page_size.max(1);
        Self { store, config }
    }

    /// List or search the catalog, one page at a time.
    ///
    /// `raw_query` empty or absent means "match all"; `raw_page` absent or
    /// not a positive integer means page 1.
    pub async fn browse(
        &self,
        raw_query: Option<&str>,
        raw_page: Option<&str>,
    ) -> AppResult<BookListing> {
        let current = parse_page(raw_page);
        let limit = self.config.page_size;
        let offset = (current - 1).saturating_mul(limit);

        let filter = raw_query
            .and_then(|raw| BookFilter::parse(raw, self.config.case_insensitive_search));
        let term = filter.as_ref().map(|f| f.term.clone());

        let (rows, total_count) = self.store.list(filter, limit, offset).await?;
        let pages = Pages::compute(current, limit, total_count, term.as_deref());

        Ok(BookListing {
            rows,
            pages,
            query: term,
        })
    }

    /// Add a validated book to the catalog.
    pub async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        self.store.create(draft).await
    }

    /// Fetch a single book by identifier.
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.store.get_by_id(id).await
    }

    /// Overwrite a book's fields.
    pub async fn update(&self, id: i32, draft: BookDraft) -> AppResult<Book> {
        self.store.update(id, draft).await
    }

    /// Remove a book from the catalog.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.store.delete(id).await
    }
}

/// Parse a raw page parameter; anything other than a positive integer
/// silently resets to page 1.
fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Percent-encode a query-string value (RFC 3986 unreserved characters pass
/// through untouched).
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
