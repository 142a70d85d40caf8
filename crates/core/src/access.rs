//! Account rules: per-module permissions, password policy and login identity.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;

// ---------------------------------------------------------------------------
// Modules and levels
// ---------------------------------------------------------------------------

/// Dashboard areas that can be shown, hidden or made editable per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Dashboard,
    MaintenanceHistory,
    UpdateMaintenance,
    Instruments,
    DesignTemplates,
    Settings,
    UserManagement,
}

impl Module {
    pub const ALL: [Module; 7] = [
        Module::Dashboard,
        Module::MaintenanceHistory,
        Module::UpdateMaintenance,
        Module::Instruments,
        Module::DesignTemplates,
        Module::Settings,
        Module::UserManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::MaintenanceHistory => "maintenance_history",
            Self::UpdateMaintenance => "update_maintenance",
            Self::Instruments => "instruments",
            Self::DesignTemplates => "design_templates",
            Self::Settings => "settings",
            Self::UserManagement => "user_management",
        }
    }
}

/// Access level for one module. Ordered: `Hidden < View < Edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Hidden,
    View,
    Edit,
}

/// Per-module access map stored as JSONB on the user row.
///
/// Modules missing from the map are treated as hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub BTreeMap<Module, PermissionLevel>);

impl Default for Permissions {
    /// New accounts can view the dashboard and maintenance history only.
    fn default() -> Self {
        let map = Module::ALL
            .iter()
            .map(|m| {
                let level = match m {
                    Module::Dashboard | Module::MaintenanceHistory => PermissionLevel::View,
                    _ => PermissionLevel::Hidden,
                };
                (*m, level)
            })
            .collect();
        Self(map)
    }
}

impl Permissions {
    pub fn level(&self, module: Module) -> PermissionLevel {
        self.0.get(&module).copied().unwrap_or(PermissionLevel::Hidden)
    }

    /// Parse a stored JSON value, falling back to the defaults when malformed.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Check that `role` / `permissions` grant at least `required` on `module`.
///
/// Admins pass every check.
pub fn ensure_access(
    role: &str,
    permissions: &Permissions,
    module: Module,
    required: PermissionLevel,
) -> Result<(), CoreError> {
    if role == ROLE_ADMIN || permissions.level(module) >= required {
        return Ok(());
    }
    Err(CoreError::Forbidden(format!(
        "Requires {required:?} access to {}",
        module.as_str()
    )))
}

// ---------------------------------------------------------------------------
// Password policy
// ---------------------------------------------------------------------------

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted as the required special character.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate a password against the account policy.
///
/// Every unmet rule is reported in one message, comma separated.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let mut errors = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push("Minimum 8 characters required");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("One uppercase letter required");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("One lowercase letter required");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("One number required");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        errors.push("One special character required");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors.join(", ")))
    }
}

// ---------------------------------------------------------------------------
// Login identity
// ---------------------------------------------------------------------------

/// Domain used for accounts created from a bare username.
pub const INTERNAL_EMAIL_DOMAIN: &str = "planpm.local";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Derive the internal login email for a username.
///
/// Input already containing `@` is returned unchanged.
pub fn internal_email(username: &str) -> String {
    let trimmed = username.trim();
    if trimmed.contains('@') {
        return trimmed.to_string();
    }
    let normalized = WHITESPACE.replace_all(&trimmed.to_lowercase(), "_").into_owned();
    format!("{normalized}@{INTERNAL_EMAIL_DOMAIN}")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_permissions() {
        let p = Permissions::default();
        assert_eq!(p.level(Module::Dashboard), PermissionLevel::View);
        assert_eq!(p.level(Module::MaintenanceHistory), PermissionLevel::View);
        assert_eq!(p.level(Module::Instruments), PermissionLevel::Hidden);
        assert_eq!(p.level(Module::UserManagement), PermissionLevel::Hidden);
    }

    #[test]
    fn permissions_json_shape() {
        let p = Permissions::default();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["dashboard"], "view");
        assert_eq!(json["settings"], "hidden");

        let parsed = Permissions::from_json(&serde_json::json!({ "instruments": "edit" }));
        assert_eq!(parsed.level(Module::Instruments), PermissionLevel::Edit);
        assert_eq!(parsed.level(Module::Dashboard), PermissionLevel::Hidden);
    }

    #[test]
    fn malformed_permissions_fall_back_to_defaults() {
        let parsed = Permissions::from_json(&serde_json::json!("not a map"));
        assert_eq!(parsed, Permissions::default());
    }

    #[test]
    fn access_checks() {
        let p = Permissions::default();
        assert!(ensure_access("user", &p, Module::Dashboard, PermissionLevel::View).is_ok());
        assert_matches!(
            ensure_access("user", &p, Module::Dashboard, PermissionLevel::Edit),
            Err(CoreError::Forbidden(_))
        );
        assert!(ensure_access("admin", &p, Module::UserManagement, PermissionLevel::Edit).is_ok());
    }

    #[test]
    fn password_policy_reports_every_failure() {
        let err = validate_password("abc").unwrap_err();
        let CoreError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Minimum 8 characters required"));
        assert!(msg.contains("One uppercase letter required"));
        assert!(msg.contains("One number required"));
        assert!(msg.contains("One special character required"));
        assert!(!msg.contains("lowercase"));
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password("Calibr8!on").is_ok());
    }

    #[test]
    fn internal_email_normalizes_username() {
        assert_eq!(internal_email("Lab  Tech One"), "lab_tech_one@planpm.local");
        assert_eq!(internal_email("qa@example.com"), "qa@example.com");
    }
}
