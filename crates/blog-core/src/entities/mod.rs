//! Domain entities - core business objects

mod category;
mod comment;
mod follow;
mod post;
mod post_view;
mod profile;
mod session;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use follow::{Follow, FollowState};
pub use post::{AuthorTotals, Post};
pub use post_view::PostView;
pub use profile::Profile;
pub use session::Session;
pub use user::User;
