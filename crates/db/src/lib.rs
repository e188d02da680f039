//! Document store backing the catalog.
//!
//! Documents are JSON objects grouped into named collections and keyed by a
//! store-managed `_id`. Each write touches exactly one document.

pub mod error;
pub mod id;
pub mod seed;
pub mod store;

pub use error::{DbError, DbResult};
pub use id::DocId;
pub use seed::SeedSummary;
pub use store::{DocumentStore, ID_FIELD};
