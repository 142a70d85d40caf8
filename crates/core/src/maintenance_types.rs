//! Maintenance type registry: built-in presets plus user-defined types.

use crate::error::CoreError;

/// Types every installation offers without configuration.
pub const DEFAULT_MAINTENANCE_TYPES: &[&str] = &[
    "General",
    "Preventive Maintenance",
    "AMC",
    "Scheduled",
    "Others",
];

/// Maximum length of a maintenance type name.
pub const MAX_TYPE_NAME_LEN: usize = 100;

/// Whether `name` matches a built-in type, ignoring case.
pub fn is_default_type(name: &str) -> bool {
    DEFAULT_MAINTENANCE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(name.trim()))
}

/// Validate and normalize a type name. Returns the trimmed name.
pub fn validate_type_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Maintenance type name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TYPE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Maintenance type name exceeds maximum length of {MAX_TYPE_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Built-in types first, then custom names not already present (case-insensitive).
pub fn merge_with_defaults<'a, I>(custom: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut all: Vec<String> = DEFAULT_MAINTENANCE_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect();
    for name in custom {
        if !all.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            all.push(name.to_string());
        }
    }
    all
}
