//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that's returned by the document builder, the
//! decoder, and the response envelope. Every error carries an [ErrorType] which stays the same
//! when request context (the operation text and any errors reported by the server) is attached
//! to it later on.

use crate::json::ErrorItem;
use logos::Span;
use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// This crate's error structure which internal errors are converted into.
///
/// The error is split into a general message and a context string. For decoding, for instance,
/// the context string is populated with a snippet of the JSON source around the failing token.
///
/// The Error implements both the [`fmt::Display`] and [`fmt::Debug`] traits. It also implements
/// [`error::Error`] so that it can be used with existing patterns for error handling.
#[derive(PartialEq, Clone)]
pub struct Error {
    pub(crate) message: String,
    pub(crate) location: Option<Location>,
    pub(crate) context: Option<String>,
    pub(crate) error_type: ErrorType,
    pub(crate) operation: Option<String>,
    pub(crate) errors: Vec<ErrorItem>,
}

/// The kind of failure an [Error] represents.
///
/// None of these are transient: retrying the same operation against the same response yields
/// the same error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorType {
    /// The shape produced an empty root selection set or can't be used as a decode destination.
    InvalidShape,
    /// The JSON input is not valid JSON or its root value isn't an object.
    MalformedJson,
    /// The JSON input ended inside of a value.
    UnexpectedEndOfInput,
    /// The JSON input contains tokens after the root object was closed.
    TrailingData,
    /// A JSON property has no destination in any active receiver.
    NoMatchingReceiver,
    /// A JSON value can't be stored in its destination's type.
    TypeMismatch,
    /// A variable's value can't be serialized to JSON.
    InvalidVariable,
    /// The server responded with errors of its own.
    Response,
}

impl Error {
    /// Create a new Error with only a main message from an input string.
    pub fn new<S: Into<String>>(message: S, error_type: ErrorType) -> Self {
        Self {
            message: message.into(),
            location: None,
            context: None,
            error_type,
            operation: None,
            errors: Vec::new(),
        }
    }

    /// Create a new Error with a main message and a context string from two input strings.
    pub fn new_with_context<S: Into<String>>(
        message: S,
        location: Option<Location>,
        context: S,
        error_type: ErrorType,
    ) -> Self {
        Self {
            message: message.into(),
            location,
            context: Some(context.into()),
            error_type,
            operation: None,
            errors: Vec::new(),
        }
    }

    /// Attach the operation text of the request this error occurred for.
    pub fn with_operation<S: Into<String>>(mut self, operation: S) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Attach the error items that the server reported alongside this error.
    pub fn with_errors(mut self, errors: Vec<ErrorItem>) -> Self {
        self.errors = errors;
        self
    }

    /// Returns the message of the current error. The context is discarded.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Returns the location of the current error.
    pub fn location(&self) -> &Option<Location> {
        &self.location
    }

    /// Returns the kind of the current error.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Returns the operation text, if the error has been attached to a request.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Returns the error items the server reported, if any.
    pub fn errors(&self) -> &[ErrorItem] {
        &self.errors
    }

    /// Formats this error, with the option to include the context information as well,
    /// which will cause the string to be multi-line.
    pub fn print(&self, include_ctx: bool) -> String {
        let formatted = match self.error_type {
            ErrorType::InvalidShape | ErrorType::InvalidVariable => {
                format!("Shape Error: {}", self.message)
            }
            ErrorType::MalformedJson
            | ErrorType::UnexpectedEndOfInput
            | ErrorType::TrailingData => format!("JSON Error: {}", self.message),
            ErrorType::NoMatchingReceiver | ErrorType::TypeMismatch => {
                format!("Decode Error: {}", self.message)
            }
            ErrorType::Response => format!("Response Error: {}", self.message),
        };
        if !include_ctx {
            return formatted;
        }

        let mut out = formatted;
        if let Some(ref context) = self.context {
            out.push('\n');
            out.push_str(context);
        }
        for item in self.errors.iter() {
            out.push_str("\n- ");
            out.push_str(item.message());
        }
        if let Some(ref operation) = self.operation {
            out.push_str("\nOperation: ");
            out.push_str(operation);
        }
        out
    }
}

pub(crate) fn print_span(source: &str, span: Span) -> String {
    let mut out = String::new();
    // The snippet starts one line before the span's line.
    let start = source[..span.start]
        .rfind('\n')
        .and_then(|start| source[..start].rfind('\n'))
        .map_or(0, |idx| idx + 1);
    let start_line = source[..start].lines().count() + 1;

    let end = source[span.end..]
        .find('\n')
        .map_or(source.len(), |idx| idx + span.end);

    let snippet = &source[start..end];
    let line_num_pad = (start_line + snippet.lines().count().max(1) - 1)
        .to_string()
        .len();
    for (index, line) in snippet.lines().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let line_num = (start_line + index).to_string();
        out.push_str(&" ".repeat(line_num_pad - line_num.len() + 1));
        out.push_str(&line_num);
        out.push_str(" | ");
        out.push_str(line);
    }
    if !source[span.start..span.end].contains('\n') {
        let start = source[..span.start].rfind('\n').map_or(0, |idx| idx + 1);
        out.push('\n');
        out.push_str(&" ".repeat(line_num_pad + 1));
        out.push_str(" | ");
        out.push_str(&" ".repeat(source[start..span.start].chars().count()));
        out.push_str(&"^".repeat(source[span.start..span.end].chars().count().max(1)));
    };

    out
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

pub(crate) fn get_location(source: &str, span: Span) -> Location {
    let line = source[..span.start].lines().count().max(1);
    let col = source[..span.start]
        .lines()
        .last()
        .map_or(span.start, |x| x.len());

    Location { line, column: col }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}\n", self)
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{get_location, print_span, Error, ErrorType};

    #[test]
    fn print_with_context() {
        let source = r#"{"a":1,"b":2}"#;
        let span = 7..10;
        let error = Error::new_with_context(
            "Unexpected property",
            Some(get_location(source, span.clone())),
            &print_span(source, span),
            ErrorType::NoMatchingReceiver,
        );
        assert_eq!(error.location().as_ref().map(|loc| loc.column), Some(7));
        assert_eq!(
            error.print(true),
            "Decode Error: Unexpected property\n 1 | {\"a\":1,\"b\":2}\n   |        ^^^"
        );
        assert_eq!(error.print(false), "Decode Error: Unexpected property");
    }

    #[test]
    fn context_keeps_kind() {
        let error = Error::new("Root selection set is empty", ErrorType::InvalidShape)
            .with_operation("query");
        assert_eq!(error.error_type(), ErrorType::InvalidShape);
        assert_eq!(error.operation(), Some("query"));
        assert_eq!(
            error.to_string(),
            "Shape Error: Root selection set is empty\nOperation: query"
        );
    }
}
