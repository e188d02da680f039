//! Helpers shared by catalog modules: input sanitization and document conversion.

pub mod documents;
pub mod sanitize;
