//! Domain logic for the Plan-PM maintenance backend.
//!
//! This crate has no internal dependencies so the API, repository layer and
//! any future CLI tooling can share the same rules.

pub mod access;
pub mod advisor;
pub mod error;
pub mod export;
pub mod frequency;
pub mod maintenance_types;
pub mod projection;
pub mod results;
pub mod roles;
pub mod summary;
pub mod types;
