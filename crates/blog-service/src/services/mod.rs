//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`], enforces the
//! authorization gates of its use cases, and talks to storage only through
//! the repository traits.

pub mod auth;
pub mod category;
pub mod comment;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod follow;
pub mod post;
pub mod profile;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthService;
pub use category::CategoryService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use error::{ServiceError, ServiceResult};
pub use follow::FollowService;
pub use post::PostService;
pub use profile::ProfileService;
pub use view::ViewService;

use uuid::Uuid;

/// Identity of the caller, or `Unauthenticated` for anonymous requests
pub(crate) fn authenticated(acting_user: Option<Uuid>) -> ServiceResult<Uuid> {
    acting_user.ok_or(ServiceError::Unauthenticated)
}
