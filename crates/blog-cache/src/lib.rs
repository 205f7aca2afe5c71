//! # blog-cache
//!
//! Redis layer holding login sessions.
//!
//! ## Example
//!
//! ```ignore
//! use blog_cache::{RedisPool, RedisPoolConfig, RedisSessionStore};
//! use blog_core::{Session, SessionStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let sessions = RedisSessionStore::new(pool);
//!
//! let session = Session::new(user_id, 3600);
//! sessions.create(&session).await?;
//! assert!(sessions.find(session.id).await?.is_some());
//! ```

pub mod pool;
pub mod session;

// Re-export pool types
pub use pool::{
    RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export session types
pub use session::RedisSessionStore;
