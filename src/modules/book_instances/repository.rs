use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use catalog_db::{DbResult, DocId, DocumentStore};

use super::models::{BookInstance, PopulatedBookInstance, BOOK_INSTANCES_COLLECTION};
use crate::{
    modules::books::BookRepositoryArc,
    utils::documents::{decode, decode_all, encode},
};

/// Persistence contract for book instances.
///
/// `*_populated` reads resolve the referenced book alongside each instance.
#[async_trait]
pub trait BookInstanceRepository: Debug + Send + Sync {
    async fn find_by_id(&self, id: &DocId) -> DbResult<Option<BookInstance>>;

    async fn find_by_id_populated(&self, id: &DocId) -> DbResult<Option<PopulatedBookInstance>>;

    async fn find_all(&self) -> DbResult<Vec<BookInstance>>;

    async fn find_all_populated(&self) -> DbResult<Vec<PopulatedBookInstance>>;

    async fn save(&self, instance: &BookInstance) -> DbResult<()>;

    /// Replaces the instance stored under `id`; `None` when no such instance exists.
    async fn find_by_id_and_update(
        &self,
        id: &DocId,
        instance: &BookInstance,
    ) -> DbResult<Option<BookInstance>>;

    /// Removes the instance, returning it when it existed.
    async fn find_by_id_and_remove(&self, id: &DocId) -> DbResult<Option<BookInstance>>;
}

pub type BookInstanceRepositoryArc = Arc<dyn BookInstanceRepository>;

/// Book instance repository over the document store.
#[derive(Debug, Clone)]
pub struct DocumentBookInstanceRepository {
    store: DocumentStore,
    books: BookRepositoryArc,
}

impl DocumentBookInstanceRepository {
    pub fn new(store: DocumentStore, books: BookRepositoryArc) -> Self {
        Self { store, books }
    }
}

#[async_trait]
impl BookInstanceRepository for DocumentBookInstanceRepository {
    async fn find_by_id(&self, id: &DocId) -> DbResult<Option<BookInstance>> {
        self.store
            .find_by_id(BOOK_INSTANCES_COLLECTION, id)
            .await?
            .map(|document| decode(BOOK_INSTANCES_COLLECTION, document))
            .transpose()
    }

    async fn find_by_id_populated(&self, id: &DocId) -> DbResult<Option<PopulatedBookInstance>> {
        let Some(instance) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let book = self.books.find_by_id(&instance.book).await?;
        Ok(Some(PopulatedBookInstance { instance, book }))
    }

    async fn find_all(&self) -> DbResult<Vec<BookInstance>> {
        let documents = self.store.find(BOOK_INSTANCES_COLLECTION, None).await?;
        decode_all(BOOK_INSTANCES_COLLECTION, documents)
    }

    async fn find_all_populated(&self) -> DbResult<Vec<PopulatedBookInstance>> {
        let (instances, books) = tokio::try_join!(self.find_all(), self.books.find_all())?;
        let books: HashMap<DocId, _> = books.into_iter().map(|book| (book.id, book)).collect();

        Ok(instances
            .into_iter()
            .map(|instance| {
                let book = books.get(&instance.book).cloned();
                PopulatedBookInstance { instance, book }
            })
            .collect())
    }

    async fn save(&self, instance: &BookInstance) -> DbResult<()> {
        self.store
            .insert(BOOK_INSTANCES_COLLECTION, encode(instance)?)
            .await?;
        Ok(())
    }

    async fn find_by_id_and_update(
        &self,
        id: &DocId,
        instance: &BookInstance,
    ) -> DbResult<Option<BookInstance>> {
        self.store
            .replace(BOOK_INSTANCES_COLLECTION, id, encode(instance)?)
            .await?
            .map(|document| decode(BOOK_INSTANCES_COLLECTION, document))
            .transpose()
    }

    async fn find_by_id_and_remove(&self, id: &DocId) -> DbResult<Option<BookInstance>> {
        self.store
            .remove(BOOK_INSTANCES_COLLECTION, id)
            .await?
            .map(|document| decode(BOOK_INSTANCES_COLLECTION, document))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{
        book_instances::models::BookInstanceStatus,
        books::{Book, BookRepository, DocumentBookRepository},
    };

    async fn fixture() -> (DocumentBookInstanceRepository, Book) {
        let store = DocumentStore::new("test");
        let books = Arc::new(DocumentBookRepository::new(store.clone()));
        let book = Book::new("The Left Hand of Darkness");
        books.save(&book).await.unwrap();
        (DocumentBookInstanceRepository::new(store, books), book)
    }

    #[tokio::test]
    async fn populated_reads_resolve_the_book() {
        let (repo, book) = fixture().await;
        let instance = BookInstance::new(book.id, "Ace, 1969", BookInstanceStatus::Available, None);
        repo.save(&instance).await.unwrap();

        let populated = repo.find_by_id_populated(&instance.id).await.unwrap().unwrap();
        assert_eq!(populated.instance, instance);
        assert_eq!(populated.book.unwrap().title, book.title);

        let all = repo.find_all_populated().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].book.as_ref().map(|b| b.id), Some(book.id));
    }

    #[tokio::test]
    async fn dangling_book_reference_populates_as_none() {
        let (repo, _) = fixture().await;
        let orphan = BookInstance::new(DocId::new(), "Lost", BookInstanceStatus::Maintenance, None);
        repo.save(&orphan).await.unwrap();

        let populated = repo.find_by_id_populated(&orphan.id).await.unwrap().unwrap();
        assert!(populated.book.is_none());
    }

    #[tokio::test]
    async fn update_keeps_identity() {
        let (repo, book) = fixture().await;
        let instance = BookInstance::new(book.id, "Ace", BookInstanceStatus::Maintenance, None);
        repo.save(&instance).await.unwrap();

        let changed = BookInstance::with_id(
            instance.id,
            book.id,
            "Ace, reprint",
            BookInstanceStatus::Reserved,
            None,
        );
        let updated = repo
            .find_by_id_and_update(&instance.id, &changed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, changed);
        assert_eq!(repo.find_all().await.unwrap(), vec![changed]);

        let missing = repo
            .find_by_id_and_update(&DocId::new(), &instance)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn remove_reports_whether_anything_was_deleted() {
        let (repo, book) = fixture().await;
        let instance = BookInstance::new(book.id, "Ace", BookInstanceStatus::Loaned, None);
        repo.save(&instance).await.unwrap();

        assert_eq!(
            repo.find_by_id_and_remove(&instance.id).await.unwrap(),
            Some(instance.clone())
        );
        assert_eq!(repo.find_by_id_and_remove(&instance.id).await.unwrap(), None);
        assert!(repo.find_by_id(&instance.id).await.unwrap().is_none());
    }
}
