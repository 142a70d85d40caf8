//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod instrument_repo;
pub mod maintenance_configuration_repo;
pub mod maintenance_result_repo;
pub mod maintenance_schedule_repo;
pub mod maintenance_type_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use instrument_repo::InstrumentRepo;
pub use maintenance_configuration_repo::MaintenanceConfigurationRepo;
pub use maintenance_result_repo::MaintenanceResultRepo;
pub use maintenance_schedule_repo::MaintenanceScheduleRepo;
pub use maintenance_type_repo::MaintenanceTypeRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
