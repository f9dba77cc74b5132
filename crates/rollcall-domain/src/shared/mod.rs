use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod clock;
pub mod repository;
pub mod transaction;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::{Entity, Repository};
pub use transaction::{CheckInTransaction, CheckInUnitOfWork};

macro_rules! define_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parse untrusted input. Anything that is not a UUID is rejected
            /// before it can reach a query.
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                let trimmed = s.trim();
                Uuid::parse_str(trimmed)
                    .map(|uuid| Self(uuid.hyphenated().to_string()))
                    .map_err(|_| {
                        DomainError::InvalidIdentifier(format!("{} '{}'", $label, trimmed))
                    })
            }

            /// Restore an id read back from storage.
            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId, "user id");
define_id!(EventId, "event id");
define_id!(CheckInId, "check-in id");
define_id!(FreezeId, "freeze id");

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Resource Not Found (2xxx)
    NotFound = 2001,

    // Business Logic (3xxx)
    DuplicateCheckIn = 3001,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    DataIntegrityError = 4003,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,

    // Validation (6xxx)
    ValidationError = 6001,
    InvalidIdentifier = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// HTTP-equivalent status a request handler should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::DuplicateCheckIn
            | ErrorCode::ValidationError
            | ErrorCode::InvalidIdentifier => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::RepositoryError
            | ErrorCode::DataIntegrityError
            | ErrorCode::InfrastructureError => 500,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorCode::DuplicateCheckIn
            | ErrorCode::NotFound
            | ErrorCode::ValidationError
            | ErrorCode::InvalidIdentifier => ErrorSeverity::Info,

            ErrorCode::RepositoryError | ErrorCode::InfrastructureError => ErrorSeverity::Error,

            ErrorCode::DataIntegrityError => ErrorSeverity::Critical,
        }
    }

    /// Storage failures leave no partial state, so the caller may retry.
    /// A retried success is caught by the duplicate check.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::RepositoryError | ErrorCode::InfrastructureError
        )
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Already checked in today: {0}")]
    DuplicateCheckIn(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::DuplicateCheckIn(_) => ErrorCode::DuplicateCheckIn,
            DomainError::NotFound(_) => ErrorCode::NotFound,
            DomainError::InvalidIdentifier(_) => ErrorCode::InvalidIdentifier,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrityError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::DuplicateCheckIn(msg)
            | DomainError::NotFound(msg)
            | DomainError::InvalidIdentifier(msg)
            | DomainError::Validation(msg)
            | DomainError::Repository(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::DataIntegrity(msg) => msg,
        }
    }

    /// Get error severity
    pub fn severity(&self) -> ErrorSeverity {
        self.code().severity()
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
