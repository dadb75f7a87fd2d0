//! Books repository
//!
//! Every operation is a single, independently committed database call.
//! Creation and update validate the submitted draft before touching the
//! table, so a validation failure never leaves a partial write behind.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDraft, BookFilter},
};

const BOOK_COLUMNS: &str = "id, title, author, genre, year, created_at, updated_at";

/// Storage access used by the catalog service. Kept behind a trait so the
/// pagination logic can be exercised against a mock store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new record after validating the draft.
    async fn create(&self, draft: BookDraft) -> AppResult<Book>;

    /// Fetch a single record by identifier.
    async fn get_by_id(&self, id: i32) -> AppResult<Book>;

    /// Fully overwrite a record's fields after validating the draft.
    async fn update(&self, id: i32, draft: BookDraft) -> AppResult<Book>;

    /// Remove a record unconditionally.
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Return one page of matching rows together with the total number of
    /// matches (not just the page), needed for pagination math.
    async fn list(
        &self,
        filter: Option<BookFilter>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Book>, i64)>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        let new_book = draft.into_new_book().map_err(AppError::Validation)?;
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, genre, year) VALUES ($1, $2, $3, $4) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&new_book.title)
        .bind(&new_book.author)
        .bind(&new_book.genre)
        .bind(new_book.year)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn update(&self, id: i32, draft: BookDraft) -> AppResult<Book> {
        let new_book = draft.into_new_book().map_err(AppError::Validation)?;
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = $1, author = $2, genre = $3, year = $4, updated_at = now() \
             WHERE id = $5 RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&new_book.title)
        .bind(&new_book.author)
        .bind(&new_book.genre)
        .bind(new_book.year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    async fn list(
        &self,
        filter: Option<BookFilter>,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Book>, i64)> {
        let Some(filter) = filter else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
                .fetch_one(&self.pool)
                .await?;
            let rows = sqlx::query_as::<_, Book>(&format!(
                "SELECT {BOOK_COLUMNS} FROM books ORDER BY title, id LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
            return Ok((rows, total));
        };

        let op = if filter.case_insensitive { "ILIKE" } else { "LIKE" };
        let where_clause = format!(
            "(title {op} $1 OR author {op} $1 OR genre {op} $1 OR year = $2)"
        );
        let pattern = like_pattern(&filter.term);

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM books WHERE {where_clause}"))
                .bind(&pattern)
                .bind(filter.year)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE {where_clause} \
             ORDER BY title, id LIMIT $3 OFFSET $4"
        ))
        .bind(&pattern)
        .bind(filter.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }
}

/// Wrap a search term in `%...%`, escaping LIKE metacharacters so the term
/// matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_the_term() {
        assert_eq!(like_pattern("dune"), "%dune%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
