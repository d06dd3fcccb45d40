//! The crate-wide error type.
//!
//! Every fallible entry point in this crate returns `Result<T, Error>`.
//! `Error` is a plain enum with a hand-written `Display` and
//! `std::error::Error` impl, in the style of this crate's other small
//! error types (compare the upstream `CatalogError`/`SchemaError`
//! pattern) rather than a derive-macro error crate. The template-parser
//! variants additionally carry a byte span into the original template
//! text and implement [`miette::Diagnostic`] by hand so a caller holding
//! that text can render a labeled report.

use std::fmt;
use std::ops::Range;

use crate::stream::Stream;

/// A byte-offset span into a template string.
pub type Span = Range<usize>;

/// Every failure mode this crate's public API can produce.
#[derive(Debug)]
pub enum Error {
    /// Attempted to assign an expression to a stream already declared as
    /// an input.
    InputRebinding {
        /// The input stream an expression was assigned to.
        stream: Stream,
    },
    /// An operation referenced a stream with no binding and not in inputs.
    UnknownStream {
        /// The stream with no binding.
        stream: Stream,
    },
    /// During collapse, reached a referenced stream with no binding and
    /// not an input.
    UnresolvedReference {
        /// The unresolved stream reference.
        stream: Stream,
    },
    /// During collapse, re-entered a stream already on the current
    /// recursion path.
    CyclicDependency {
        /// The stream at which the cycle was detected.
        stream: Stream,
    },
    /// Template parsing found a delimited token with no entry in the
    /// supplied name table.
    UnknownReference {
        /// The unresolved key inside the delimiters.
        name: String,
        /// Byte span of the delimited token in the template.
        span: Span,
    },
    /// Template contained delimited references but no name table was
    /// supplied.
    MissingTable {
        /// Byte span of the first delimiter encountered.
        span: Span,
    },
    /// Template delimiters are unbalanced.
    MalformedTemplate {
        /// Human-readable description of the imbalance.
        message: String,
        /// Byte span of the offending delimiter.
        span: Span,
    },
    /// The serialization sink failed to accept a write.
    SerializeIo {
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputRebinding { stream } => {
                write!(f, "cannot bind an expression to input stream '{stream}'")
            }
            Error::UnknownStream { stream } => {
                write!(f, "stream '{stream}' has no binding")
            }
            Error::UnresolvedReference { stream } => {
                write!(
                    f,
                    "stream '{stream}' is referenced but neither bound nor declared as an input"
                )
            }
            Error::CyclicDependency { stream } => {
                write!(f, "cyclic dependency detected while collapsing '{stream}'")
            }
            Error::UnknownReference { name, .. } => {
                write!(f, "unknown stream reference '{name}' in template")
            }
            Error::MissingTable { .. } => {
                write!(f, "template contains stream references but no name table was provided")
            }
            Error::MalformedTemplate { message, .. } => {
                write!(f, "malformed template: {message}")
            }
            Error::SerializeIo { source } => {
                write!(f, "failed to write specification: {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SerializeIo { source } => Some(source),
            _ => None,
        }
    }
}

impl Error {
    /// The byte span this error points at in the original template text,
    /// if any. Only the template-parser variants carry one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::UnknownReference { span, .. }
            | Error::MissingTable { span }
            | Error::MalformedTemplate { span, .. } => Some(span.clone()),
            _ => None,
        }
    }

    /// Renders this error as a [`miette::Report`] labeled against the
    /// original template text, for errors that carry a span. Errors with
    /// no span (graph-level failures) still render, just without a
    /// source snippet.
    pub fn to_report(self, template: &str) -> miette::Report {
        let span = self.span();
        let report = miette::Report::new(self);
        match span {
            Some(_) => report.with_source_code(template.to_string()),
            None => report,
        }
    }
}

impl miette::Diagnostic for Error {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let (span, message) = match self {
            Error::UnknownReference { name, span } => {
                (span.clone(), format!("no stream named '{name}' in the table"))
            }
            Error::MissingTable { span } => {
                (span.clone(), "reference delimiter found here".to_string())
            }
            Error::MalformedTemplate { message, span } => (span.clone(), message.clone()),
            _ => return None,
        };
        let label = miette::LabeledSpan::new_primary_with_span(
            Some(message),
            (span.start, span.end.saturating_sub(span.start)),
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::SerializeIo { source }
    }
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_stream_name() {
        let err = Error::UnknownStream {
            stream: Stream::new("x"),
        };
        assert!(err.to_string().contains("x"));
    }

    #[test]
    fn span_is_only_present_on_template_errors() {
        let err = Error::InputRebinding {
            stream: Stream::new("a"),
        };
        assert!(err.span().is_none());

        let err = Error::UnknownReference {
            name: "x".into(),
            span: 3..6,
        };
        assert_eq!(err.span(), Some(3..6));
    }

    #[test]
    fn serialize_io_exposes_source() {
        use std::error::Error as _;
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: Error = io_err.into();
        assert!(err.source().is_some());
    }

    #[test]
    fn to_report_renders_without_panicking() {
        let err = Error::UnknownReference {
            name: "x".into(),
            span: 0..3,
        };
        let report = err.to_report("‹x›");
        assert!(format!("{report:?}").contains("x"));
    }
}
