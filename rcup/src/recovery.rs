//! Resynchronization after syntax errors.
//!
//! There are two recovery points.  Inside the symbol declarations and the productions, the
//! reader skips to the end of the current statement (through the next `;`).  In the preamble
//! (package, imports, and code parts), it skips to the first `terminal` or `non` keyword, which
//! is where the declarations begin.  If the input ends before a recovery point is found, there
//! is nothing left to resynchronize on, and reading stops with `FatalParseFailure`.

use crate::builder::GrammarBuilder;
use crate::errors::{ErrorKind, ErrorSink, FatalParseFailure, GrammarError};
use crate::reader::TokenCursor;
use log::debug;
use rcup_tokens::TokenSource;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecoveryState {
    Normal,
    /// Skipping tokens, looking for a place to resume.
    Recovering,
    /// A fatal error was reported.  Nothing more will be read.
    Halted,
}

#[derive(Debug)]
pub struct RecoveryController {
    state: RecoveryState,
    recoveries: usize,
}

impl RecoveryController {
    pub fn new() -> Self {
        Self {
            state: RecoveryState::Normal,
            recoveries: 0,
        }
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    /// The number of times the reader resynchronized successfully.
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }

    /// Reports `error`, then skips tokens up to and including the next `;`.
    pub(crate) fn recover_statement<T: TokenSource, S: ErrorSink>(
        &mut self,
        cursor: &mut TokenCursor<T>,
        builder: &mut GrammarBuilder<S>,
        error: GrammarError,
    ) -> Result<(), FatalParseFailure> {
        self.begin(builder, error);

        let mut skipped = 0;
        loop {
            match cursor.next() {
                Some(t) if t.is_terminator() => break,
                Some(_) => skipped += 1,
                None => {
                    return Err(self.report_fatal_error(
                        builder,
                        "unexpected end of input; couldn't repair and continue parse",
                    ))
                }
            }
        }

        debug!("recovered after skipping {} token(s) and `;`", skipped);
        self.end();
        Ok(())
    }

    /// Reports `error`, then skips tokens until the start of the symbol declarations.  The
    /// `terminal` or `non` token that ends the skip is not consumed.
    pub(crate) fn recover_preamble<T: TokenSource, S: ErrorSink>(
        &mut self,
        cursor: &mut TokenCursor<T>,
        builder: &mut GrammarBuilder<S>,
        error: GrammarError,
    ) -> Result<(), FatalParseFailure> {
        self.begin(builder, error);

        let mut skipped = 0;
        loop {
            match cursor.peek() {
                Some(t) if t.begins_declarations() => break,
                Some(_) => {
                    cursor.next();
                    skipped += 1;
                }
                None => {
                    return Err(self.report_fatal_error(
                        builder,
                        "no symbol declarations found after syntax error; couldn't repair and \
                         continue parse",
                    ))
                }
            }
        }

        debug!("recovered at symbol declarations after skipping {} token(s)", skipped);
        self.end();
        Ok(())
    }

    fn begin<S: ErrorSink>(&mut self, builder: &mut GrammarBuilder<S>, error: GrammarError) {
        debug_assert_eq!(self.state, RecoveryState::Normal);
        self.state = RecoveryState::Recovering;
        builder.reset_transient();
        builder.report(error);
    }

    fn end(&mut self) {
        self.state = RecoveryState::Normal;
        self.recoveries += 1;
    }

    /// Reports an error that cannot be recovered from, flushes the sink, and halts.  The caller
    /// must return the result as an error, without reading any further.
    pub fn report_fatal_error<S: ErrorSink>(
        &mut self,
        builder: &mut GrammarBuilder<S>,
        message: &str,
    ) -> FatalParseFailure {
        builder.report(GrammarError::new(ErrorKind::FatalParseFailure, message));
        builder.sink_mut().flush();
        self.state = RecoveryState::Halted;
        FatalParseFailure {
            message: message.to_string(),
        }
    }
}

impl Default for RecoveryController {
    fn default() -> Self {
        Self::new()
    }
}
