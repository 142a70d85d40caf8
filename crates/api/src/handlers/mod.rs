//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `planpm_db` and the pure
//! domain logic in `planpm_core`, mapping errors via [`AppError`](crate::error::AppError).

pub mod admin;
pub mod advisor;
pub mod auth;
pub mod configurations;
pub mod dashboard;
pub mod instruments;
pub mod logs;
pub mod maintenance_types;
pub mod results;
pub mod schedules;

use planpm_core::error::CoreError;

/// Trim a required text field, rejecting blank input.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("eqp_id", "  EQP-1 ").unwrap(), "EQP-1");
        assert!(required_text("eqp_id", "   ").is_err());
    }
}
