//! Axum extractors for request handling
//!
//! Identity (bearer header or session cookie), validated bodies, form data
//! with uploads, and the client address.

mod auth;
mod client_ip;
mod form_data;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use client_ip::ClientIp;
pub use form_data::FormData;
pub use validated::{ValidatedForm, ValidatedJson};
