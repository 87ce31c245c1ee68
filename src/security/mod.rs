//! Security module
//!
//! Bearer token issuance/validation and password hashing.

pub mod password;
pub mod token;

pub use token::{TokenService, VerifiedToken};
