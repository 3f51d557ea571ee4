use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all stepman operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StepmanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable library manifest (`spec.json`, `steplib.toml`, `step.toml`).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Run `stepman update` to regenerate the library manifest"))]
    Manifest { message: String },

    /// No step version satisfied the requested constraint, or the step is unknown.
    #[error("Resolution failed: {message}")]
    #[diagnostic(help("Run `stepman step-info --id <ID>` to list the available versions"))]
    Resolution { message: String },

    /// The library is not set up, or its routing/cache state is inconsistent.
    #[error("Library error: {message}")]
    #[diagnostic(help("Run `stepman setup --library <URI>` first"))]
    Library { message: String },

    /// A git invocation failed.
    #[error("Git error: {message}")]
    #[diagnostic(help("Make sure `git` is installed and the repository is reachable"))]
    Git { message: String },

    /// Network request or download failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Copying a step into its destination failed.
    #[error("Activation failed: {message}")]
    Activation { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
