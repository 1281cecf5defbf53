//! Authentication module
//!
//! Bearer JWT verification. Tokens are issued by the accounts service with
//! a shared HS256 secret; this service only checks them.

mod jwt;
mod middleware;

pub use jwt::{Claims, TokenVerifier};
pub use middleware::AuthUser;
