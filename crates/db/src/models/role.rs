use planpm_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// One of the fixed account roles (`admin`, `user`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}
