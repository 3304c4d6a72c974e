//! Error adapter for converting SextantError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use sextant::SextantError;

/// Adapter rendering a [`SextantError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a SextantError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SextantError::Io(_) => "sextant::io",
            SextantError::Json(_) => "sextant::json",
            SextantError::Config(_) => "sextant::config",
            SextantError::Export(_) => "sextant::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SextantError::Json(err) => Some(Box::new(format!(
                "check that line {}, column {} of the input matches the selected --kind",
                err.line(),
                err.column()
            ))),
            SextantError::Config(_) => Some(Box::new(
                "fix the configuration file or pass another one with --config",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wraps a [`SextantError`] for rendering with a miette report handler.
pub fn to_reportable(err: &SextantError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
