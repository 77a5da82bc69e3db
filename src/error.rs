//! Error types for the foehn-analysis crate.
//!
//! Engine failures ([`AnalysisError`]) and output failures ([`PresentationError`]) are kept in
//! separate types so a failed export can never be mistaken for a failed calculation.
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the thermodynamic engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AnalysisError {
    /// The inputs do not describe a physically valid parcel or path.
    #[error("Invalid parcel state: {0}")]
    InvalidParcelState(String),
    /// A root search did not reach its pressure tolerance within the iteration cap.
    #[error(
        "Root finding failed to converge after {iterations} iterations, last estimate {last_estimate:.3} hPa"
    )]
    Convergence {
        /// Midpoint of the final bracket, hPa.
        last_estimate: f64,
        /// Number of bisection iterations performed.
        iterations: usize,
    },
}

impl AnalysisError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        AnalysisError::InvalidParcelState(msg.into())
    }
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;

/// Error type for writing diagrams, tables, and reports.
#[derive(Debug, Error)]
pub enum PresentationError {
    /// Failure creating or writing an output file.
    #[error("Unable to write {path}: {source}")]
    Io {
        /// The file or directory being written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Failure serializing the key point table.
    #[error("Error writing csv: {0}")]
    Csv(#[from] csv::Error),
    /// Failure formatting text output.
    #[error("Error formatting output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Error type for loading scenarios and observation records.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failure reading a file.
    #[error("Unable to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file was not valid JSON for the expected record.
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
    /// The requested site is not in the observations.
    #[error("No observation for site '{0}'")]
    UnknownSite(String),
    /// The requested preset does not exist.
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
}
