//! Authentication primitives.
//!
//! - [`session`]: HS256 session tokens carrying the user's email as subject
//! - [`password`]: Argon2 password hashing and verification
//! - [`credentials`]: Locating the session token on an incoming request
//!
//! Enforcement lives in the identity and authorization decorators under
//! [`crate::middleware`].

pub mod credentials;
pub mod password;
pub mod session;
