//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Errors in this workspace point back into the equation string the user typed, such as
//! `Q = 3040 - 25P`. The [`Error`] type pairs the regions of that string with an [`ErrorKind`]
//! describing what went wrong, and can render itself as an [`ariadne`] report.

// allows `#[derive(ErrorKind)]` output, which names `econ_error`, to be used in this crate's tests
extern crate self as econ_error;

use ariadne::{Color, Report, Source};
use std::{fmt::Debug, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr, highlighting the given source code.
    ///
    /// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we can
    /// only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }

    /// Renders this error into a string, including ANSI color codes.
    pub fn report_to_string(&self, src_id: &str, input: &str) -> io::Result<String> {
        let mut buf = Vec::new();
        self.build_report(src_id).write((src_id, Source::from(input)), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
