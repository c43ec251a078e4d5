//! Input validation shared by the entity services

use crate::contract::{FleetError, FormField, FieldType};

/// Reject empty or whitespace-only required text
pub fn require_text(field: &str, value: &str) -> Result<(), FleetError> {
    if value.trim().is_empty() {
        return Err(FleetError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Minimal shape check: one '@' with text on both sides and a dotted domain
pub fn validate_email(email: &str) -> Result<(), FleetError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(FleetError::validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: f64) -> Result<(), FleetError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FleetError::validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Field ids unique per level; select needs options, table needs columns
pub fn validate_form_fields(fields: &[FormField]) -> Result<(), FleetError> {
    let mut seen = std::collections::HashSet::new();
    for field in fields {
        require_text("field id", &field.id)?;
        if !seen.insert(field.id.as_str()) {
            return Err(FleetError::validation(format!(
                "duplicate field id '{}'",
                field.id
            )));
        }
        match field.field_type {
            FieldType::Select if field.options.as_ref().map_or(true, Vec::is_empty) => {
                return Err(FleetError::validation(format!(
                    "select field '{}' requires options",
                    field.id
                )));
            }
            FieldType::Table => match &field.columns {
                Some(columns) if !columns.is_empty() => validate_form_fields(columns)?,
                _ => {
                    return Err(FleetError::validation(format!(
                        "table field '{}' requires columns",
                        field.id
                    )));
                }
            },
            _ => {}
        }
    }
    Ok(())
}
