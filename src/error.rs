use std::path::PathBuf;

/// Failures the engine can raise. All of these propagate uncaught to the
/// invocation boundary; presentation is the CLI's job.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("question repository not found: {0}")]
    RepositoryNotFound(PathBuf),
    #[error("there is no group '{0}'")]
    UnknownGroup(String),
    #[error("there is no question '{question}' in group '{group}'")]
    UnknownQuestion { group: String, question: String },
    #[error("no more questions left in group '{0}'")]
    GroupExhausted(String),
    #[error("question '{group}:{question}' does not support '{capability}'")]
    MissingCapability {
        group: String,
        question: String,
        capability: &'static str,
    },
    #[error("compiler failed:\n{log}")]
    CompilerFailure { log: String },
    #[error("roster line {line} has no identifier token")]
    MalformedRoster { line: usize },
    #[error("participant id '{0}' is not an integer")]
    InvalidId(String),
    #[error("question module '{module}' failed: {message}")]
    ModuleInvocation { module: String, message: String },
}

impl Error {
    /// Stable code for the machine-readable error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::RepositoryNotFound(_) => "REPOSITORY_NOT_FOUND",
            Error::UnknownGroup(_) => "UNKNOWN_GROUP",
            Error::UnknownQuestion { .. } => "UNKNOWN_QUESTION",
            Error::GroupExhausted(_) => "GROUP_EXHAUSTED",
            Error::MissingCapability { .. } => "MISSING_CAPABILITY",
            Error::CompilerFailure { .. } => "COMPILER_FAILURE",
            Error::MalformedRoster { .. } => "MALFORMED_ROSTER",
            Error::InvalidId(_) => "INVALID_ID",
            Error::ModuleInvocation { .. } => "MODULE_INVOCATION",
        }
    }
}
