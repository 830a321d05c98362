//! Authentication
//!
//! JWT issuance/validation and the request extractor that turns a
//! Bearer token into a [`CurrentUser`].

pub mod extractor;
pub mod jwt;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtService};
