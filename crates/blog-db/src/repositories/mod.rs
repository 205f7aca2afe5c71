//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in blog-core.
//! Each repository handles database operations for a specific domain entity.

mod category;
mod comment;
mod error;
mod follow;
mod post;
mod profile;
mod user;
mod view;

pub use category::PgCategoryRepository;
pub use comment::PgCommentRepository;
pub use follow::PgFollowRepository;
pub use post::PgPostRepository;
pub use profile::PgProfileRepository;
pub use user::PgUserRepository;
pub use view::PgViewRepository;
