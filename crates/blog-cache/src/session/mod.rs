//! Session storage module.
//!
//! Redis-backed login sessions: `session:{id}` holds the session with a TTL,
//! `user_sessions:{user_id}` indexes a user's sessions for bulk revocation.

mod login_session;

pub use login_session::RedisSessionStore;
