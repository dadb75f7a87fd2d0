//! Book model and form-submission validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::FieldError;

/// Book record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw form submission for creating or updating a book.
///
/// All fields arrive as text; [`BookDraft::into_new_book`] turns a draft
/// into a [`NewBook`] or reports one message per invalid field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookDraft {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please provide a value for \"title\"."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please provide a value for \"author\"."))]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
}

impl From<&Book> for BookDraft {
    /// Prefill a form with a stored record's values.
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
        }
    }
}

/// Free-text catalog filter: substring match over title, author and genre,
/// plus an exact `year` match when the term itself parses as an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFilter {
    pub term: String,
    pub year: Option<i32>,
    pub case_insensitive: bool,
}

impl BookFilter {
    /// Build a filter from a raw query string. Blank input means
    /// "match all" and yields no filter at all.
    pub fn parse(raw: &str, case_insensitive: bool) -> Option<Self> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            year: term.parse::<i32>().ok(),
            case_insensitive,
        })
    }
}

/// Validated field values ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl BookDraft {
    /// Validate the submission, producing the values to persist or one
    /// message per invalid field. An empty optional field becomes `None`;
    /// a non-numeric `year` is rejected rather than silently dropped.
    pub fn into_new_book(self) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        // Whitespace-only input counts as empty, so the length checks run
        // on trimmed values. The stored values keep their whitespace.
        let checked = BookDraft {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: String::new(),
            year: String::new(),
        };
        if let Err(validation) = Validate::validate(&checked) {
            let by_field = validation.field_errors();
            for field in ["title", "author"] {
                if let Some(field_errors) = by_field.get(field) {
                    for error in *field_errors {
                        if let Some(message) = &error.message {
                            errors.push(FieldError::new(field, message.to_string()));
                        }
                    }
                }
            }
        }

        let year = match self.year.trim() {
            "" => None,
            raw => match raw.parse::<i32>() {
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push(FieldError::new(
                        "year",
                        "Please provide an integer value for \"year\"",
                    ));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let genre = match self.genre.trim() {
            "" => None,
            _ => Some(self.genre),
        };

        Ok(NewBook {
            title: self.title,
            author: self.author,
            genre,
            year,
        })
    }
}
