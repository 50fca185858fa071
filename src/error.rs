use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rcml operations.
///
/// Parse errors carry the 1-based line number of the offending line in the
/// original input (blank lines and comments included in the count).
#[derive(Error, Diagnostic, Debug)]
pub enum RcmlError {
    #[error("IO error: {0}")]
    #[diagnostic(code(rcml::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(rcml::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("line {line}: [{key}] is not a valid key")]
    #[diagnostic(code(rcml::parse::unknown_key))]
    UnknownKey {
        line: usize,
        key: String,
        #[help]
        help: Option<String>,
    },

    #[error("line {line}: [{name}] is not a valid environment")]
    #[diagnostic(
        code(rcml::parse::invalid_environment),
        help("Only recognized environments may open a block with a trailing `:`")
    )]
    InvalidEnvironment { line: usize, name: String },

    #[error("{}marker [{key}] is not allowed inside [{environment}]", line_prefix(.line))]
    #[diagnostic(code(rcml::parse::invalid_subkey))]
    InvalidSubkey {
        line: Option<usize>,
        environment: String,
        key: String,
        #[help]
        help: Option<String>,
    },

    #[error("line {line}: [{text}] {reason}")]
    #[diagnostic(code(rcml::parse::malformed_line))]
    MalformedLine {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("{}[{text}] is not a valid {expected}", line_prefix(.line))]
    #[diagnostic(code(rcml::coerce))]
    TypeCoercion {
        line: Option<usize>,
        text: String,
        expected: String,
    },

    #[error("This input has already been loaded")]
    #[diagnostic(
        code(rcml::parse::already_consumed),
        help("Create a new Loader for every parse")
    )]
    AlreadyConsumed,

    #[error("Invalid grammar configuration: {message}")]
    #[diagnostic(code(rcml::config))]
    Configuration {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot serialize: {message}")]
    #[diagnostic(code(rcml::serialize))]
    Serialize {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Recipe is missing the required field [{field}]")]
    #[diagnostic(code(rcml::recipe::missing_field))]
    MissingField { field: String },

    #[error("Storage error: {message}")]
    #[diagnostic(code(rcml::storage))]
    Storage { message: String },

    #[error("{failed} of {total} recipe file(s) failed to check")]
    #[diagnostic(code(rcml::check))]
    CheckFailed { failed: usize, total: usize },

    #[error("{path} is not formatted")]
    #[diagnostic(code(rcml::fmt), help("Run `rcml fmt --write` to format it"))]
    NotFormatted { path: std::path::PathBuf },
}

fn line_prefix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("line {}: ", line),
        None => String::new(),
    }
}

impl RcmlError {
    /// Line number the error points at, if it came from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            RcmlError::UnknownKey { line, .. }
            | RcmlError::InvalidEnvironment { line, .. }
            | RcmlError::MalformedLine { line, .. } => Some(*line),
            RcmlError::TypeCoercion { line, .. } | RcmlError::InvalidSubkey { line, .. } => *line,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RcmlError>;
