//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::Error;

/// A diagnostic wrapper for resolution errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SourceDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<Error> for SourceDiagnostic {
    fn from(e: Error) -> Self {
        let help = match &e {
            Error::NotFound(_) => {
                "The source was classified as a file path. Pass an `is_actual_data` \
                 predicate if it is meant as literal text."
            }
            Error::PermissionDenied(_) => "Check the file permissions of the source.",
            Error::Http { .. } => "Check the URL, or the base location it was joined onto.",
            Error::Decode { .. } => "Set an explicit read codec that matches the input.",
            Error::InvalidUsage(_) => {
                "Call `Metadata::clear()` before reusing a metadata record for another source."
            }
            Error::Io { .. } => "The underlying stream failed while reading.",
        };
        SourceDiagnostic {
            message: e.to_string(),
            source: Some(Box::new(e)),
            help: Some(help.into()),
            severity: Severity::Error,
        }
    }
}

impl From<Error> for miette::Report {
    fn from(e: Error) -> Self {
        miette::Report::new(SourceDiagnostic::from(e))
    }
}
