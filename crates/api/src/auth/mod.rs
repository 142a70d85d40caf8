//! Credentials: argon2 password hashes and session tokens.

pub mod jwt;
pub mod password;
