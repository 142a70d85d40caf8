//! Well-known role name constants.
//!
//! These must match the seed data in `20250101000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Seeded id of the `admin` role.
pub const ROLE_ADMIN_ID: i64 = 1;
/// Seeded id of the `user` role. New accounts default to it.
pub const ROLE_USER_ID: i64 = 2;
