//! Catalog application library
//!
//! Book instance pages, their repositories and the server bootstrap.

pub mod modules;
pub mod server;
pub mod utils;

pub use server::{build_registry, open_store, run};
