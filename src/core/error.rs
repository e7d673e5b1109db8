//! Purpose: Positional error type for JSON parse failures.
//! Exports: `Error`, `ErrorKind`, `Result`.
//! Role: The only failure channel of the crate; value access never returns it.
//! Invariants: Every error carries a 1-based line and column plus a human-readable message.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Syntax,
    UnexpectedEof,
    InvalidNumber,
    DepthLimit,
    TrailingCharacters,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::UnexpectedEof => "unexpected-eof",
            ErrorKind::InvalidNumber => "invalid-number",
            ErrorKind::DepthLimit => "depth-limit",
            ErrorKind::TrailingCharacters => "trailing-characters",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    line: usize,
    column: usize,
    offset: Option<usize>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(kind: ErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            message: None,
            line,
            column,
            offset: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    pub fn message(&self) -> &str {
        match &self.message {
            Some(message) => message,
            None => default_message(self.kind),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Syntax => "Invalid syntax",
        ErrorKind::UnexpectedEof => "Unexpected EOF",
        ErrorKind::InvalidNumber => "Invalid number",
        ErrorKind::DepthLimit => "Nesting too deep",
        ErrorKind::TrailingCharacters => "Unexpected trailing characters",
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} (line: {}, column: {})",
            self.kind,
            self.message(),
            self.line,
            self.column
        )?;
        if let Some(offset) = self.offset {
            write!(f, " (offset: {offset})")?;
        }
        Ok(())
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_includes_position() {
        let err = Error::new(ErrorKind::UnexpectedEof, 1, 6).with_message("Unexpected EOF");
        assert_eq!(
            err.to_string(),
            "UnexpectedEof: Unexpected EOF (line: 1, column: 6)"
        );
    }

    #[test]
    fn display_appends_offset_when_known() {
        let err = Error::new(ErrorKind::Syntax, 2, 3)
            .with_message("Expected ':'")
            .with_offset(17);
        assert_eq!(
            err.to_string(),
            "Syntax: Expected ':' (line: 2, column: 3) (offset: 17)"
        );
    }

    #[test]
    fn missing_message_falls_back_to_kind_default() {
        let err = Error::new(ErrorKind::DepthLimit, 1, 1);
        assert_eq!(err.message(), "Nesting too deep");
    }

    #[test]
    fn kind_labels_are_stable() {
        let cases = [
            (ErrorKind::Syntax, "syntax"),
            (ErrorKind::UnexpectedEof, "unexpected-eof"),
            (ErrorKind::InvalidNumber, "invalid-number"),
            (ErrorKind::DepthLimit, "depth-limit"),
            (ErrorKind::TrailingCharacters, "trailing-characters"),
        ];

        for (kind, label) in cases {
            assert_eq!(kind.as_str(), label);
        }
    }
}
