//! Asset storage backends

mod local;

pub use local::LocalAssetStore;
