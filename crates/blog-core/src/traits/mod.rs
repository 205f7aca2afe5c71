//! Ports - traits implemented by the infrastructure layer

mod collaborators;
mod pagination;
mod repositories;

pub use collaborators::{AssetStore, SessionStore};
pub use pagination::{Page, PageRequest, PostFilter};
pub use repositories::{
    CategoryRepository, CommentRepository, FollowRepository, PostRepository, ProfileRepository,
    RepoResult, UserRepository, ViewRepository,
};
