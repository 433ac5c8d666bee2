//! Authentication infrastructure module
//!
//! This module provides access token issuance and verification.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtService, TokenService, MIN_PRODUCTION_SECRET_LEN};
