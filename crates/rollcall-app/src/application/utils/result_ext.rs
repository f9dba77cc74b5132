use rollcall_domain::shared::DomainError;

/// Wrap foreign errors as `DomainError::Infrastructure`.
pub trait ResultExt<T, E> {
    /// `result.infra_context("Encode output")?`
    fn infra_context(self, context: &str) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn infra_context(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infra_context_prefixes_message() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.infra_context("Create data dir").unwrap_err();
        assert_eq!(err.message(), "Create data dir: denied");
        assert!(err.is_recoverable());
    }
}
