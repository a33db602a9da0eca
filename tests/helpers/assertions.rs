// Test Assertion Helpers
//
// Assertions over AppError shapes shared by repository tests.

use cane_registry::core::AppError;

/// Assert the result failed validation on `field`
///
/// # Panics
/// If the result is Ok, or failed with another error or field
pub fn assert_validation_field<T: std::fmt::Debug>(
    result: Result<T, AppError>,
    field: &str,
) -> String {
    match result {
        Err(AppError::Validation {
            field: Some(actual),
            message,
        }) => {
            assert_eq!(actual, field, "validation failed on the wrong field: {}", message);
            message
        }
        other => panic!("Expected validation error on '{}', got {:?}", field, other),
    }
}

/// Assert the result failed validation without naming a field
pub fn assert_request_error<T: std::fmt::Debug>(result: Result<T, AppError>) -> String {
    match result {
        Err(AppError::Validation { field: None, message }) => message,
        other => panic!("Expected request-level validation error, got {:?}", other),
    }
}

/// Assert a hard delete was blocked, returning (category, count) pairs
pub fn assert_blocked<T: std::fmt::Debug>(result: Result<T, AppError>) -> Vec<(String, i64)> {
    match result {
        Err(AppError::Dependency { blocking, .. }) => blocking
            .into_iter()
            .map(|b| (b.category, b.count))
            .collect(),
        other => panic!("Expected dependency error, got {:?}", other),
    }
}
