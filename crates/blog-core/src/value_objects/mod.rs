//! Value objects - immutable types that represent domain concepts

mod asset;
mod slug;

pub use asset::{AssetKind, AssetRef, ImageFormat, NewAsset};
pub use slug::{Slug, SlugError};
