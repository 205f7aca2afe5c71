//! Integration test utilities for the blog server
//!
//! Spawns the full application on a local port and drives it the way a
//! browser would: form posts, cookies and the ajax endpoints.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
