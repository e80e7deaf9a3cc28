use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// PostgreSQL reports the table, column and constraint of a violation as
/// separate fields; the offending key/value pair only appears in the
/// `DETAIL` line (`Key (username)=(bob) already exists.`).
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let entity = info.table_name().unwrap_or("resource").to_string();
        let key_value = info
            .details()
            .and_then(Self::parse_key_value)
            .or_else(|| Self::parse_key_value(info.message()));

        match (kind, key_value) {
            (DatabaseErrorKind::UniqueViolation, Some((field, value))) => AppError::Duplicate {
                entity,
                field,
                value,
            },
            (DatabaseErrorKind::ForeignKeyViolation, Some((field, value))) => {
                AppError::Validation {
                    field,
                    reason: format!("Invalid reference with value '{}'", value),
                }
            }
            (DatabaseErrorKind::NotNullViolation, _) => match info.column_name() {
                Some(column) => AppError::Validation {
                    field: column.to_string(),
                    reason: format!("Field is required for {}", entity),
                },
                None => Self::opaque(operation, "Not null constraint violation", info),
            },
            (DatabaseErrorKind::CheckViolation, _) => AppError::Validation {
                field: info
                    .column_name()
                    .or(info.constraint_name())
                    .unwrap_or("unknown")
                    .to_string(),
                reason: format!("Check constraint failed for {}", entity),
            },
            (DatabaseErrorKind::UniqueViolation, None) => {
                Self::opaque(operation, "Unique constraint violation", info)
            }
            (DatabaseErrorKind::ForeignKeyViolation, None) => {
                Self::opaque(operation, "Foreign key constraint violation", info)
            }
            _ => Self::opaque(operation, "Database error", info),
        }
    }

    fn opaque(
        operation: &str,
        label: &str,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
    ) -> AppError {
        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{}: {}", label, info.message())),
        }
    }

    /// Extracts `(field, value)` from `Key (field)=(value)`.
    pub fn parse_key_value(text: &str) -> Option<(String, String)> {
        let rest = &text[text.find("Key (")? + "Key (".len()..];
        let (field, rest) = rest.split_once(")=(")?;
        let value = &rest[..rest.rfind(')')?];

        Some((field.to_string(), value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        table: Option<String>,
        column: Option<String>,
        constraint: Option<String>,
    }

    impl DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            self.table.as_deref()
        }

        fn column_name(&self) -> Option<&str> {
            self.column.as_deref()
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, info: MockDatabaseErrorInfo) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(
            DieselError::DatabaseError(kind, Box::new(info)),
            "insert user",
        )
    }

    #[test]
    fn test_convert_not_found_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find user");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn test_convert_unique_violation() {
        let result = database_error(
            DatabaseErrorKind::UniqueViolation,
            MockDatabaseErrorInfo {
                message: "duplicate key value violates unique constraint \"users_username_key\""
                    .to_string(),
                details: Some("Key (username)=(lisa) already exists.".to_string()),
                table: Some("users".to_string()),
                constraint: Some("users_username_key".to_string()),
                ..Default::default()
            },
        );

        match result {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "users");
                assert_eq!(field, "username");
                assert_eq!(value, "lisa");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_unique_violation_without_detail() {
        let result = database_error(
            DatabaseErrorKind::UniqueViolation,
            MockDatabaseErrorInfo {
                message: "duplicate key".to_string(),
                ..Default::default()
            },
        );
        assert!(matches!(result, AppError::Database { .. }));
    }

    #[test]
    fn test_convert_not_null_violation() {
        let result = database_error(
            DatabaseErrorKind::NotNullViolation,
            MockDatabaseErrorInfo {
                message: "null value in column \"city\" violates not-null constraint".to_string(),
                table: Some("users".to_string()),
                column: Some("city".to_string()),
                ..Default::default()
            },
        );

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "city");
                assert!(reason.contains("required"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_convert_foreign_key_violation() {
        let result = database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            MockDatabaseErrorInfo {
                message: "insert or update on table \"likes\" violates foreign key constraint"
                    .to_string(),
                details: Some("Key (likee_id)=(999) is not present in table \"users\".".to_string()),
                table: Some("likes".to_string()),
                ..Default::default()
            },
        );

        match result {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "likee_id");
                assert!(reason.contains("999"));
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            DatabaseErrorConverter::parse_key_value("Key (liker_id, likee_id)=(1, 2) already exists."),
            Some(("liker_id, likee_id".to_string(), "1, 2".to_string()))
        );
        assert_eq!(DatabaseErrorConverter::parse_key_value("no key here"), None);
    }
}
