use std::{collections::HashMap, sync::Arc};

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    error::{DbError, DbResult},
    id::DocId,
};

/// Field holding the store-managed id on every document.
pub const ID_FIELD: &str = "_id";

type Document = Map<String, Value>;

#[derive(Debug, Default)]
struct Collection {
    documents: HashMap<DocId, Document>,
    // insertion order, used for natural-order scans
    order: Vec<DocId>,
}

impl Collection {
    fn insert(&mut self, id: DocId, document: Document) {
        self.order.push(id);
        self.documents.insert(id, document);
    }

    fn remove(&mut self, id: &DocId) -> Option<Document> {
        let removed = self.documents.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    fn iter(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().filter_map(|id| self.documents.get(id))
    }
}

/// In-memory document store, cheap to clone and shared across handlers.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    name: Arc<str>,
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document and returns its id.
    ///
    /// A parseable `_id` already present on the document is kept; otherwise
    /// a fresh id is assigned.
    pub async fn insert(&self, collection: &str, document: Value) -> DbResult<DocId> {
        let mut document = into_object(collection, document)?;
        let id = match document.get(ID_FIELD).and_then(Value::as_str) {
            Some(raw) => DocId::parse(raw).ok_or_else(|| DbError::InvalidId(raw.to_string()))?,
            None => DocId::new(),
        };
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        let entry = collections.entry(collection.to_string()).or_default();
        if entry.documents.contains_key(&id) {
            return Err(DbError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }
        entry.insert(id, document);

        tracing::debug!(store = %self.name, collection, id = %id, "document inserted");
        Ok(id)
    }

    /// Fetches one document by id.
    pub async fn find_by_id(&self, collection: &str, id: &DocId) -> DbResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|entry| entry.documents.get(id))
            .map(|document| Value::Object(document.clone())))
    }

    /// Fetches every document in natural order.
    ///
    /// With a projection only the listed fields (plus `_id`) are returned.
    pub async fn find(&self, collection: &str, projection: Option<&[&str]>) -> DbResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let Some(entry) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(entry
            .iter()
            .map(|document| match projection {
                Some(fields) => Value::Object(project(document, fields)),
                None => Value::Object(document.clone()),
            })
            .collect())
    }

    /// Replaces the document stored under `id`, keeping the id.
    ///
    /// Returns the stored document, or `None` when nothing has that id.
    pub async fn replace(
        &self,
        collection: &str,
        id: &DocId,
        document: Value,
    ) -> DbResult<Option<Value>> {
        let mut document = into_object(collection, document)?;
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|entry| entry.documents.get_mut(id))
        else {
            return Ok(None);
        };
        *existing = document;

        tracing::debug!(store = %self.name, collection, id = %id, "document replaced");
        Ok(Some(Value::Object(existing.clone())))
    }

    /// Removes a document, returning it when it existed.
    pub async fn remove(&self, collection: &str, id: &DocId) -> DbResult<Option<Value>> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|entry| entry.remove(id));

        if removed.is_some() {
            tracing::debug!(store = %self.name, collection, id = %id, "document removed");
        }
        Ok(removed.map(Value::Object))
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> DbResult<usize> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map_or(0, |entry| entry.documents.len()))
    }
}

fn into_object(collection: &str, document: Value) -> DbResult<Document> {
    match document {
        Value::Object(map) => Ok(map),
        _ => Err(DbError::NotAnObject {
            collection: collection.to_string(),
        }),
    }
}

fn project(document: &Document, fields: &[&str]) -> Document {
    document
        .iter()
        .filter(|(key, _)| key.as_str() == ID_FIELD || fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_find_returns_it() {
        let store = DocumentStore::new("test");
        let id = store
            .insert("books", json!({"title": "Dune"}))
            .await
            .unwrap();

        let found = store.find_by_id("books", &id).await.unwrap().unwrap();
        assert_eq!(found["title"], "Dune");
        assert_eq!(found[ID_FIELD], id.to_string());
    }

    #[tokio::test]
    async fn insert_keeps_supplied_id_and_rejects_duplicates() {
        let store = DocumentStore::new("test");
        let id = DocId::new();
        let doc = json!({"_id": id.to_string(), "title": "Dune"});

        assert_eq!(store.insert("books", doc.clone()).await.unwrap(), id);
        let err = store.insert("books", doc).await.unwrap_err();
        assert!(matches!(err, DbError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn non_object_documents_are_rejected() {
        let store = DocumentStore::new("test");
        let err = store.insert("books", json!(["x"])).await.unwrap_err();
        assert!(matches!(err, DbError::NotAnObject { .. }));
    }

    #[tokio::test]
    async fn find_preserves_insertion_order_and_projects() {
        let store = DocumentStore::new("test");
        for title in ["B", "A", "C"] {
            store
                .insert("books", json!({"title": title, "isbn": "x"}))
                .await
                .unwrap();
        }

        let all = store.find("books", Some(&["title"][..])).await.unwrap();
        let titles: Vec<_> = all.iter().map(|doc| doc["title"].clone()).collect();
        assert_eq!(titles, vec![json!("B"), json!("A"), json!("C")]);
        assert!(all.iter().all(|doc| doc.get("isbn").is_none()));
        assert!(all.iter().all(|doc| doc.get(ID_FIELD).is_some()));
    }

    #[tokio::test]
    async fn find_on_unknown_collection_is_empty() {
        let store = DocumentStore::new("test");
        assert!(store.find("nothing", None).await.unwrap().is_empty());
        assert_eq!(store.count("nothing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn replace_keeps_id_and_reports_missing() {
        let store = DocumentStore::new("test");
        let id = store.insert("books", json!({"title": "Old"})).await.unwrap();

        let replaced = store
            .replace("books", &id, json!({"title": "New", "_id": "ignored"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced["title"], "New");
        assert_eq!(replaced[ID_FIELD], id.to_string());
        assert_eq!(store.count("books").await.unwrap(), 1);

        let missing = store
            .replace("books", &DocId::new(), json!({"title": "x"}))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn remove_returns_document_once() {
        let store = DocumentStore::new("test");
        let id = store.insert("books", json!({"title": "Gone"})).await.unwrap();

        assert!(store.remove("books", &id).await.unwrap().is_some());
        assert!(store.remove("books", &id).await.unwrap().is_none());
        assert!(store.find("books", None).await.unwrap().is_empty());
    }
}
