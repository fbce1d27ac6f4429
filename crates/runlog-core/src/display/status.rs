//! One-line status messages for operations with no resource to show.

use std::fmt;

/// How a status line should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    /// Nothing failed but nothing changed either, e.g. deleting a missing run
    Notice,
    Error,
}

impl StatusLevel {
    fn prefix(self) -> &'static str {
        match self {
            StatusLevel::Success => "Success:",
            StatusLevel::Notice => "Notice:",
            StatusLevel::Error => "Error:",
        }
    }
}

/// Confirmation or failure message shown instead of a resource.
pub struct OperationStatus {
    pub message: String,
    pub level: StatusLevel,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Success,
        }
    }

    pub fn notice(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Notice,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            level: StatusLevel::Error,
        }
    }

    /// False only for [`StatusLevel::Error`].
    pub fn is_success(&self) -> bool {
        self.level != StatusLevel::Error
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.level.prefix(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_prefixes() {
        let saved = OperationStatus::success("Run saved".to_string());
        assert_eq!(saved.to_string(), "Success: Run saved\n");

        let missing = OperationStatus::notice("Run 9 not found, nothing deleted".to_string());
        assert!(missing.is_success());
        assert!(missing.to_string().starts_with("Notice:"));

        let failed = OperationStatus::failure("Store locked".to_string());
        assert!(!failed.is_success());
    }
}
