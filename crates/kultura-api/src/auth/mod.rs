//! Bearer-token authentication
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET` by the external auth service.
//! This crate only verifies them (and can issue them for tooling and tests).

pub mod jwt;
pub mod models;

pub use jwt::JwtKeys;
pub use models::{AuthUser, Claims, Role};
