//! Authentication and authorization
//!
//! - [`JwtService`] - token issue / validation
//! - [`CurrentUser`] - caller context decoded from the token
//! - [`require_auth`] - global authentication middleware
//! - [`require_admin`] / [`require_courier`] - role gates
//! - [`password`] - argon2 hashing

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUserExt, require_admin, require_auth, require_courier};
pub use password::{MIN_PASSWORD_LEN, hash_password, verify_password};
