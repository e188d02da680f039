//! Books are read-only reference data for book instances.

pub mod models;
pub mod repository;

pub use models::{Book, BookTitle, BOOKS_COLLECTION};
pub use repository::{BookRepository, BookRepositoryArc, DocumentBookRepository};
