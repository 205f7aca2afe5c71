//! # blog-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! ports for external collaborators (asset storage, login sessions).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuthorTotals, Category, Comment, Follow, FollowState, Post, PostView, Profile, Session, User,
};
pub use error::DomainError;
pub use traits::{
    AssetStore, CategoryRepository, CommentRepository, FollowRepository, Page, PageRequest,
    PostFilter, PostRepository, ProfileRepository, RepoResult, SessionStore, UserRepository,
    ViewRepository,
};
pub use value_objects::{AssetKind, AssetRef, ImageFormat, NewAsset, Slug, SlugError};
