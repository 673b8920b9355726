//! # AppError
//!
//! Centralized error handling for InnerCircle.
//! Maps domain-specific failures to actionable error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single user-visible validation message, optionally tied to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// `None` for messages about the form as a whole
    pub field: Option<&'static str>,
    pub message: String,
}

/// Ordered collection of validation messages for one submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: Some(field),
            message: message.into(),
        });
    }

    pub fn add_general(&mut self, message: impl Into<String>) {
        self.0.push(FieldError {
            field: None,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages attached to `field`.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == Some(field))
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == Some(field))
    }

    /// Messages not tied to any field.
    pub fn general(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            match e.field {
                Some(field) => write!(f, "{field}: {}", e.message)?,
                None => f.write_str(&e.message)?,
            }
        }
        Ok(())
    }
}

/// The primary error type for all ic-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Item, FriendRequest, username)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Malformed or out-of-range input; the write did not happen
    #[error("validation error: {0}")]
    Validation(FieldErrors),

    /// The actor has no rights over the target row
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Store-level constraint violation (e.g., duplicate friend request under a race)
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Infrastructure failure (e.g., DB down, hashing failure)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(kind: &str, id: impl fmt::Display) -> Self {
        AppError::NotFound(kind.to_string(), id.to_string())
    }

    /// A validation failure with a single form-wide message.
    pub fn invalid(message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add_general(message);
        AppError::Validation(errors)
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        AppError::Validation(errors)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    /// Text suitable for showing to the user as a flash message.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(kind, _) => format!("{kind} not found."),
            AppError::Integrity(_) | AppError::Internal(_) => "Something went wrong.".to_string(),
        }
    }
}

/// A specialized Result type for InnerCircle logic.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_render_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("title", "Title must be at least 3 characters long.");
        errors.add_general("Invalid username or password.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.for_field("title"), vec!["Title must be at least 3 characters long."]);
        assert_eq!(errors.general(), vec!["Invalid username or password."]);
        assert_eq!(
            errors.to_string(),
            "title: Title must be at least 3 characters long.; Invalid username or password."
        );
    }

    #[test]
    fn empty_errors_pass_value_through() {
        assert_eq!(FieldErrors::new().into_result(7).unwrap(), 7);

        let mut errors = FieldErrors::new();
        errors.add("bio", "too long");
        assert!(matches!(errors.into_result(()), Err(AppError::Validation(_))));
    }
}
