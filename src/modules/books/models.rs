use catalog_db::DocId;
use serde::{Deserialize, Serialize};

/// Collection holding book documents.
pub const BOOKS_COLLECTION: &str = "books";

/// Catalog book. Book instances reference it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: DocId,
    /// Title of the book
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: DocId::new(),
            title: title.into(),
            summary: String::new(),
            isbn: String::new(),
        }
    }
}

/// `title` projection of a book, used to fill selection lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookTitle {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub title: String,
}
