//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    /// A panel could not be rendered; the message is what the panel shows.
    #[error("{0}")]
    Render(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Render(_) => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::DataLoad { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(DomainError::NodeNotFound(_)) => {
                        crate::exitcode::USAGE
                    }
                    _ if app.is_corrupt_data() => crate::exitcode::DATAERR,
                    _ => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitcode;

    #[test]
    fn given_error_kinds_when_mapping_then_sysexits_codes() {
        let missing = CliError::from(ApplicationError::DataLoad {
            context: "skills.json".into(),
            source: "gone".into(),
        });
        let malformed = CliError::from(ApplicationError::Domain(DomainError::Malformed {
            path: "Engineering".into(),
            found: "number".into(),
        }));
        let config = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });

        assert_eq!(missing.exit_code(), exitcode::NOINPUT);
        assert_eq!(malformed.exit_code(), exitcode::DATAERR);
        assert_eq!(config.exit_code(), exitcode::CONFIG);
        assert_eq!(
            CliError::Render("x".into()).exit_code(),
            exitcode::DATAERR
        );
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
    }
}
