//! Database models - SQLx-compatible structs for PostgreSQL tables

mod category;
mod comment;
mod post;
mod user;

pub use category::CategoryModel;
pub use comment::CommentModel;
pub use post::{AuthorTotalsModel, PostModel};
pub use user::{ProfileModel, UserModel};
