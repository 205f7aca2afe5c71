//! Entity to model mappers
//!
//! Conversions between domain entities (blog-core) and database rows.
//! Rows carrying slugs go through `TryFrom`, since a malformed stored slug is a
//! data error rather than a panic.

mod content;
mod user;

pub(crate) use content::posts_from_models;
