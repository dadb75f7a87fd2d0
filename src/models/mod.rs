//! Data models for Libris

pub mod book;

pub use book::{Book, BookDraft, BookFilter, NewBook};
