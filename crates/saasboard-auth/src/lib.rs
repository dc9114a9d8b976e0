//! # saasboard-auth
//!
//! Authentication for SaaSBoard.
//!
//! ## Modules
//!
//! - `rate_limit`: fixed-window login throttle with a lazily started sweep task
//! - `identity`: client identity derived from proxy headers
//! - `jwt`: access token creation and validation
//! - `password`: Argon2id password hashing
//! - `authenticator`: credential check against the user store

pub mod authenticator;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod rate_limit;

pub use authenticator::{Authenticator, PasswordAuthenticator};
pub use identity::{client_ip, login_rate_limit_key};
pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use rate_limit::{RateLimitDecision, RateLimiter};
