use rollcall_domain::shared::{DomainError, ErrorCode, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// Structured error printed by the CLI (and usable by any other front end).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    /// Numeric error code (2xxx-6xxx range)
    pub code: u16,

    pub message: String,

    pub severity: ErrorSeverity,

    /// Whether the operation can be retried
    pub recoverable: bool,

    /// HTTP-equivalent status
    pub status: u16,
}

impl CommandError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
            status: error_code.http_status(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        let message = match &err {
            DomainError::DuplicateCheckIn(_) => "Already checked in today".to_string(),
            other => other.to_string(),
        };
        Self::from_code(err.code(), message)
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self::infrastructure(format!("{:#}", err))
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_check_in_reads_as_already_checked_in() {
        let err = CommandError::from(DomainError::DuplicateCheckIn("u1 e1 2024-01-01".into()));
        assert_eq!(err.code, 3001);
        assert_eq!(err.message, "Already checked in today");
        assert_eq!(err.status, 400);
        assert!(!err.recoverable);
    }

    #[test]
    fn test_repository_error_is_recoverable_server_error() {
        let err = CommandError::from(DomainError::Repository("database is locked".into()));
        assert_eq!(err.status, 500);
        assert!(err.recoverable);
        assert_eq!(err.severity, ErrorSeverity::Error);
        assert!(err.to_string().starts_with("[4001]"));
    }

    #[test]
    fn test_not_found_status() {
        let err = CommandError::from(DomainError::NotFound("event x".into()));
        assert_eq!(err.status, 404);
        assert!(err.message.contains("event x"));
    }
}
