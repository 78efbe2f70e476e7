use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a policy gate that
/// found unapproved warnings and a run that could not complete at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No unapproved warnings (or all new warnings were accepted)
    Success = 0,
    /// Unapproved warnings exist and were not accepted
    UnapprovedWarnings = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Fatal error (blocked package, unsupported lockfile, I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::UnapprovedWarnings => write!(f, "Unapproved Warnings (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Fatal errors that abort a policy check run.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// keeping the operator-facing messages in one place.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Lockfile not found: {path}\n\n💡 Hint: {suggestion}")]
    LockfileNotFound { path: PathBuf, suggestion: String },

    #[error("Unsupported lockfile format ({format}): {path}\n\n💡 Hint: Only npm lockfiles (package-lock.json / npm-shrinkwrap.json, lockfileVersion 2 or 3) are supported")]
    UnsupportedLockfile { path: PathBuf, format: String },

    #[error("Failed to parse lockfile: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the lockfile is valid JSON produced by npm")]
    LockfileParseError { path: PathBuf, details: String },

    #[error("Blocked package found: {name}@{version} matches blacklist range \"{range}\"\n\n💡 Hint: Remove the package from the dependency tree or change the blacklist entry")]
    BlockedPackage {
        name: String,
        version: String,
        range: String,
    },

    #[error("Invalid policy: {message}\n\n💡 Hint: Please check the lockgate configuration file")]
    InvalidPolicy { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory")]
    InvalidProjectPath { path: PathBuf, reason: String },
}

/// Failures at the registry metadata boundary.
///
/// Each variant is fatal for the affected package only; the orchestrator
/// records it and keeps evaluating the remaining dependencies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry metadata for {package} has no \"versions\" map")]
    MissingVersions { package: String },

    #[error("Registry metadata for {package} has no \"time\" map")]
    MissingTime { package: String },

    #[error("Version {version} of {package} not found in registry metadata")]
    VersionNotFound { package: String, version: String },

    #[error("Publish time for {package}@{version} not found in registry metadata")]
    PublishTimeMissing { package: String, version: String },

    #[error("Publish time for {package}@{version} is not a valid timestamp: {value}")]
    InvalidPublishTime {
        package: String,
        version: String,
        value: String,
    },

    #[error("Registry returned status code {status} for {package}")]
    HttpStatus { package: String, status: u16 },

    #[error("Unexpected registry response for {package}: {details}")]
    Schema { package: String, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UnapprovedWarnings.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::UnapprovedWarnings),
            "Unapproved Warnings (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_unsupported_lockfile_display() {
        let error = GateError::UnsupportedLockfile {
            path: PathBuf::from("/project/yarn.lock"),
            format: "yarn".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Unsupported lockfile format (yarn)"));
        assert!(display.contains("/project/yarn.lock"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_blocked_package_display() {
        let error = GateError::BlockedPackage {
            name: "event-stream".to_string(),
            version: "3.3.6".to_string(),
            range: "3.3.6".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("event-stream@3.3.6"));
        assert!(display.contains("blacklist range \"3.3.6\""));
    }

    #[test]
    fn test_lockfile_not_found_display() {
        let error = GateError::LockfileNotFound {
            path: PathBuf::from("/test/package-lock.json"),
            suggestion: "Run npm install first".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Lockfile not found"));
        assert!(display.contains("Run npm install first"));
    }

    #[test]
    fn test_registry_error_names_package_and_version() {
        let error = RegistryError::VersionNotFound {
            package: "left-pad".to_string(),
            version: "9.9.9".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("left-pad"));
        assert!(display.contains("9.9.9"));
    }
}
