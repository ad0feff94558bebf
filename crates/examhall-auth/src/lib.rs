//! # Examhall Auth
//!
//! Access token claims and JWT utilities for the Examhall API.
//!
//! This crate is the identity-resolution collaborator of the permission
//! component: it turns a bearer token into a principal id, and nothing more.
//! The principal's role is always read from the account store, never trusted
//! from the token.
//!
//! - [`claims`]: access token claim structure
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use examhall_auth::{create_access_token, verify_token};
//! use examhall_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "admin@examhall.io", Role::CampusAdmin, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id()?, user_id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
