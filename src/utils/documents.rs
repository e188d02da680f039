//! Typed conversions between domain records and store documents.

use catalog_db::{DbError, DbResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub fn encode<T: Serialize>(record: &T) -> DbResult<Value> {
    Ok(serde_json::to_value(record)?)
}

pub fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> DbResult<T> {
    serde_json::from_value(document).map_err(|source| DbError::Decode {
        collection: collection.to_string(),
        source,
    })
}

pub fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Value>) -> DbResult<Vec<T>> {
    documents
        .into_iter()
        .map(|document| decode(collection, document))
        .collect()
}
