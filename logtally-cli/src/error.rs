//! CLI-specific error types and exit code mapping

use logtally_analyzer::AnalyzerError;
use logtally_core::error::LogtallyError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic command failure (e.g. logging setup).
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logtally-core.
    #[error("{0}")]
    Core(#[from] LogtallyError),

    /// Wrapped analyzer error.
    #[error("{0}")]
    Analyzer(#[from] AnalyzerError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General error                             |
    /// | 2    | Configuration or usage error              |
    /// | 10   | IO error (unreadable input, failed write) |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Core(e) => match e {
                LogtallyError::Config(_) => 2,
                LogtallyError::Io(_) | LogtallyError::Output(_) => 10,
                LogtallyError::Analysis(_) => 1,
            },
            Self::Analyzer(e) => match e {
                AnalyzerError::Config { .. } => 2,
                AnalyzerError::Collector { .. }
                | AnalyzerError::Output { .. }
                | AnalyzerError::OutputBatch { .. } => 10,
                AnalyzerError::Worker(_) | AnalyzerError::Json(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtally_core::error::ConfigError;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err: CliError = LogtallyError::Config(ConfigError::FileNotFound {
            path: "logtally.toml".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_unreadable_input() {
        let err: CliError = AnalyzerError::Collector {
            path: "input.log".to_owned(),
            reason: "no such file".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_exit_code_partial_write_failure() {
        let err: CliError = AnalyzerError::OutputBatch {
            attempted: 3,
            failures: vec!["apm.json: denied".to_owned()],
        }
        .into();
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("apm.json"));
    }

    #[test]
    fn test_exit_code_analyzer_config_error() {
        let err: CliError = AnalyzerError::Config {
            field: "ingest.workers".to_owned(),
            reason: "must be at least 1".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cli_err: CliError = io_err.into();
        match cli_err {
            CliError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("expected Io error variant"),
        }
    }
}
