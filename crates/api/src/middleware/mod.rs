//! Request extractors for identity and access.
//!
//! [`auth::AuthUser`] resolves the bearer token. The [`rbac`] wrappers add
//! role requirements on top, and [`rbac::require_permission`] checks the
//! per-module levels stored on the user row.

pub mod auth;
pub mod rbac;
