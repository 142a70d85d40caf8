//! Plan-PM API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! advisor client) so integration tests and the binary entrypoint can both
//! access them.

pub mod advisor;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
