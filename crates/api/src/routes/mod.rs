pub mod admin;
pub mod advisor;
pub mod auth;
pub mod configurations;
pub mod dashboard;
pub mod health;
pub mod instruments;
pub mod logs;
pub mod maintenance_types;
pub mod results;
pub mod schedules;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/change-password                change own password
/// /auth/user-role                      role lookup by username (public)
///
/// /admin/users                         list, create (admin only)
/// /admin/users/{id}                    get, update, delete
/// /admin/users/{id}/reset-password     reset password
///
/// /instruments                         list, create
/// /instruments/{id}                    get, update, delete
///
/// /maintenance-types                   list, create
/// /maintenance-types/{id}              rename, delete
///
/// /configurations                      list own, create
/// /configurations/{id}                 get, update, delete
///
/// /schedules                           list (?instrument_id), create
/// /schedules/{id}                      get, update, delete
/// /schedules/{id}/status               status transition
///
/// /results                             list (?search), record
/// /results/{id}                        get
///
/// /dashboard/projection                projected calendar
/// /dashboard/summary                   summary buckets (?window=30|90)
/// /dashboard/summary/export            printable HTML summary
/// /dashboard/overview                  headline counts
///
/// /advisor/predict                     failure prediction
///
/// /logs/client                         client log intake (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/instruments", instruments::router())
        .nest("/maintenance-types", maintenance_types::router())
        .nest("/configurations", configurations::router())
        .nest("/schedules", schedules::router())
        .nest("/results", results::router())
        .nest("/dashboard", dashboard::router())
        .nest("/advisor", advisor::router())
        .nest("/logs", logs::router())
}
