//! Validation for level definitions and cross-level references.

use std::collections::HashSet;

use super::data::ZoneKind;
use super::registry::LevelRegistry;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub level_id: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Level '{}' field '{}': {}",
            self.level_id, self.field, self.message
        )
    }
}

/// Validate every level in the registry.
/// Returns a list of validation errors, empty if all levels are usable.
pub fn validate_levels(registry: &LevelRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for level in registry.iter() {
        let mut push = |field, message: String| {
            errors.push(ValidationError {
                level_id: level.id.clone(),
                field,
                message,
            })
        };

        if !seen.insert(level.id.as_str()) {
            push("id", "duplicate level id".to_string());
        }

        if level.solids.is_empty() {
            push("solids", "level has no solid geometry".to_string());
        }

        for solid in &level.solids {
            if solid.rect.w <= 0.0 || solid.rect.h <= 0.0 {
                push("solids", format!("non-positive size at {:?}", solid.rect));
            }
        }

        for zone in &level.zones {
            if zone.rect.w <= 0.0 || zone.rect.h <= 0.0 {
                push("zones", format!("non-positive size at {:?}", zone.rect));
            }
            if let ZoneKind::Door { destination } = zone.kind
                && destination >= registry.len()
            {
                push(
                    "zones",
                    format!(
                        "door leads to level {} but only {} exist",
                        destination,
                        registry.len()
                    ),
                );
            }
        }
    }

    errors
}
