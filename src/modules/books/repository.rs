use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use catalog_db::{DbResult, DocId, DocumentStore};

use super::models::{Book, BookTitle, BOOKS_COLLECTION};
use crate::utils::documents::{decode, decode_all, encode};

/// Read access to books, plus `save` for seeding and tests.
#[async_trait]
pub trait BookRepository: Debug + Send + Sync {
    async fn find_by_id(&self, id: &DocId) -> DbResult<Option<Book>>;

    async fn find_all(&self) -> DbResult<Vec<Book>>;

    /// Id and title of every book, sorted by title.
    async fn find_all_titles(&self) -> DbResult<Vec<BookTitle>>;

    async fn save(&self, book: &Book) -> DbResult<()>;
}

pub type BookRepositoryArc = Arc<dyn BookRepository>;

/// Book repository over the document store.
#[derive(Debug, Clone)]
pub struct DocumentBookRepository {
    store: DocumentStore,
}

impl DocumentBookRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookRepository for DocumentBookRepository {
    async fn find_by_id(&self, id: &DocId) -> DbResult<Option<Book>> {
        self.store
            .find_by_id(BOOKS_COLLECTION, id)
            .await?
            .map(|document| decode(BOOKS_COLLECTION, document))
            .transpose()
    }

    async fn find_all(&self) -> DbResult<Vec<Book>> {
        let documents = self.store.find(BOOKS_COLLECTION, None).await?;
        decode_all(BOOKS_COLLECTION, documents)
    }

    async fn find_all_titles(&self) -> DbResult<Vec<BookTitle>> {
        let documents = self.store.find(BOOKS_COLLECTION, Some(&["title"][..])).await?;
        let mut titles: Vec<BookTitle> = decode_all(BOOKS_COLLECTION, documents)?;
        titles.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(titles)
    }

    async fn save(&self, book: &Book) -> DbResult<()> {
        self.store.insert(BOOKS_COLLECTION, encode(book)?).await?;
        Ok(())
    }
}
