//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod dashboard;
pub mod instrument;
pub mod maintenance_configuration;
pub mod maintenance_result;
pub mod maintenance_schedule;
pub mod maintenance_type;
pub mod role;
pub mod session;
pub mod user;
