use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Field-level validation failures, keyed by field name.
    #[error("Validation failed: {}", summarize_validation_errors(.0))]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Render field errors as `field: message` pairs, sorted by field name.
pub fn summarize_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(move |e| format!("{field}: {}", validation_message(e)))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Human-readable message for a single validation error, falling back to
/// its code when no message was attached.
pub fn validation_message(error: &validator::ValidationError) -> String {
    match &error.message {
        Some(msg) => msg.to_string(),
        None => error.code.to_string(),
    }
}
