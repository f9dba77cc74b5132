use rollcall_domain::shared::DomainError;

/// Translates storage errors into domain errors, keeping the operation name
/// as context.
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(error: sqlx::Error, context: &str) -> DomainError {
        match &error {
            sqlx::Error::RowNotFound => DomainError::NotFound(context.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Validation(format!("{}: record already exists", context))
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DomainError::NotFound(format!("{}: referenced record does not exist", context))
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                DomainError::Validation(format!("{}: {}", context, db.message()))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DomainError::DataIntegrity(format!("{}: {}", context, error))
            }
            _ => DomainError::Repository(format!("{}: {}", context, error)),
        }
    }

    /// Inserting a check-in that collides on (user, event, day) means the
    /// pair already checked in that day.
    pub fn map_check_in_insert_error(error: sqlx::Error, context: &str) -> DomainError {
        if Self::is_unique_violation(&error) {
            return DomainError::DuplicateCheckIn(context.to_string());
        }
        Self::map_sqlx_error(error, context)
    }

    pub fn map_json_error(error: serde_json::Error, context: &str) -> DomainError {
        DomainError::DataIntegrity(format!("{}: {}", context, error))
    }

    pub fn is_unique_violation(error: &sqlx::Error) -> bool {
        matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}
