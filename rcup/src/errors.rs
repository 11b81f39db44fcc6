//! Error types, and the sink that collects diagnostics while a grammar is read.

use crate::symbols::SymbolKind;
use core::fmt;
use log::debug;
use log::warn;
use std::error;

/// The categories of problems that can be found in a grammar specification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A name was declared when it was already declared, as either a terminal or a
    /// non-terminal.  The first declaration is kept.
    DuplicateSymbolDeclaration,
    /// A production referred to a name that was never declared.  The reference is dropped.
    UndeclaredSymbolReference,
    /// An alternative had more parts than the configured limit.  The alternative is dropped.
    CapacityExceeded,
    /// `start with` named a non-terminal that was never declared.
    MissingDeclaration,
    /// A malformed declaration, directive, or production.  The reader skipped to the next `;`.
    SyntaxError,
    /// The reader could not resynchronize, and stopped.
    FatalParseFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::DuplicateSymbolDeclaration => "duplicate symbol declaration",
            ErrorKind::UndeclaredSymbolReference => "undeclared symbol",
            ErrorKind::CapacityExceeded => "production too long",
            ErrorKind::MissingDeclaration => "missing declaration",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::FatalParseFailure => "fatal error",
        };
        f.write_str(s)
    }
}

/// One reportable error: what kind it is, a message, and optionally some context (usually the
/// token or name the error was found at).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GrammarError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: Option<String>,
}

impl GrammarError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    pub fn syntax(message: impl Into<String>, context: Option<String>) -> Self {
        Self {
            kind: ErrorKind::SyntaxError,
            message: message.into(),
            context,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " (at {})", context)?;
        }
        Ok(())
    }
}

impl error::Error for GrammarError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuplicateSymbolDeclaration {
    pub name: String,
    /// How the name was declared the first time.
    pub previous: SymbolKind,
}

impl fmt::Display for DuplicateSymbolDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is already declared as a {}",
            self.name, self.previous
        )
    }
}

impl error::Error for DuplicateSymbolDeclaration {}

impl From<DuplicateSymbolDeclaration> for GrammarError {
    fn from(err: DuplicateSymbolDeclaration) -> GrammarError {
        GrammarError::new(ErrorKind::DuplicateSymbolDeclaration, err.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapacityExceeded {
    pub capacity: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a production may have at most {} parts on its right-hand side",
            self.capacity
        )
    }
}

impl error::Error for CapacityExceeded {}

impl From<CapacityExceeded> for GrammarError {
    fn from(err: CapacityExceeded) -> GrammarError {
        GrammarError::new(ErrorKind::CapacityExceeded, err.to_string())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingDeclaration {
    pub name: String,
}

impl fmt::Display for MissingDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start symbol '{}' is not a declared non-terminal",
            self.name
        )
    }
}

impl error::Error for MissingDeclaration {}

impl From<MissingDeclaration> for GrammarError {
    fn from(err: MissingDeclaration) -> GrammarError {
        GrammarError::new(ErrorKind::MissingDeclaration, err.to_string())
    }
}

/// Reading stopped, because there was no place to resynchronize after a syntax error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FatalParseFailure {
    pub message: String,
}

impl fmt::Display for FatalParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fatal error: {}", self.message)
    }
}

impl error::Error for FatalParseFailure {}

impl From<FatalParseFailure> for GrammarError {
    fn from(err: FatalParseFailure) -> GrammarError {
        GrammarError::new(ErrorKind::FatalParseFailure, err.message)
    }
}

/// Receives the diagnostics produced while reading a grammar.
///
/// The sink owns the error count.  The front end reports every error exactly once, so
/// `error_count()` is the number of problems found, and a driver should not hand the grammar to
/// table construction unless it is zero.
pub trait ErrorSink {
    fn emit_error(&mut self, error: GrammarError);
    fn emit_warning(&mut self, message: String);
    fn error_count(&self) -> usize;
    fn warning_count(&self) -> usize;

    /// Called before reading stops on a fatal error.
    fn flush(&mut self) {}
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn emit_error(&mut self, error: GrammarError) {
        (**self).emit_error(error)
    }

    fn emit_warning(&mut self, message: String) {
        (**self).emit_warning(message)
    }

    fn error_count(&self) -> usize {
        (**self).error_count()
    }

    fn warning_count(&self) -> usize {
        (**self).warning_count()
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// An `ErrorSink` that keeps everything it is given.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    errors: Vec<GrammarError>,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[GrammarError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Counts the errors of one kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<GrammarError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl ErrorSink for Diagnostics {
    fn emit_error(&mut self, error: GrammarError) {
        warn!("{}", error);
        self.errors.push(error);
    }

    fn emit_warning(&mut self, message: String) {
        warn!("warning: {}", message);
        self.warnings.push(message);
    }

    fn error_count(&self) -> usize {
        self.errors.len()
    }

    fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    fn flush(&mut self) {
        debug!(
            "diagnostics: {} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let e = GrammarError::syntax("expected `;`", Some("identifier `x`".to_string()));
        assert_eq!(
            e.to_string(),
            "syntax error: expected `;` (at identifier `x`)"
        );
    }

    #[test]
    fn typed_errors_convert() {
        let e: GrammarError = MissingDeclaration {
            name: "goal".to_string(),
        }
        .into();
        assert_eq!(e.kind, ErrorKind::MissingDeclaration);
        assert!(e.message.contains("'goal'"));

        let e: GrammarError = CapacityExceeded { capacity: 3 }.into();
        assert_eq!(e.kind, ErrorKind::CapacityExceeded);
    }

    #[test]
    fn diagnostics_count_by_kind() {
        let mut d = Diagnostics::new();
        assert!(!d.has_errors());
        d.emit_error(GrammarError::syntax("one", None));
        d.emit_error(GrammarError::new(ErrorKind::MissingDeclaration, "two"));
        d.emit_error(GrammarError::syntax("three", None));
        d.emit_warning("unused".to_string());

        assert_eq!(d.error_count(), 3);
        assert_eq!(d.warning_count(), 1);
        assert_eq!(d.count(ErrorKind::SyntaxError), 2);
        assert!(d.has_errors());
        assert_eq!(d.into_result().unwrap_err().len(), 3);
    }
}
