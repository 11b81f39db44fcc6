//! Reads a sequence of tokens, which are provided by an external scanner, and builds a grammar.
//!
//! Our grammar for a grammar:
//!
//! ```text
//! spec        ::= preamble declaration* [start] production+
//! preamble    ::= [PACKAGE name ;] (IMPORT name [. *] ;)* code_part*
//! code_part   ::= ACTION CODE {:...:} [;] | PARSER CODE {:...:} [;]
//!               | INIT WITH {:...:} [;]   | SCAN WITH {:...:} [;]
//!               | DEBUG WITH name ;
//! declaration ::= TERMINAL [name] id (, id)* ;
//!               | NON TERMINAL [name] id (, id)* ;
//! start       ::= START WITH id ;
//! production  ::= id ::= rhs (| rhs)* ;
//! rhs         ::= (id [: label] | {:...:})*
//! name        ::= id (. id)*
//! ```
//!
//! In a declaration, a dotted name that is directly followed by another identifier is the type
//! of the symbols being declared (`terminal java.lang.Integer NUM;`).  Otherwise it is the first
//! symbol name, and it must not be dotted.
//!
//! The reader only recognizes syntax.  Each construct it recognizes is handed to the
//! `GrammarBuilder`, one call per construct, in the order the constructs appear.  Syntax errors
//! are handed to the `RecoveryController`, which reports them and skips ahead to a place where
//! reading can resume.

use crate::builder::GrammarBuilder;
use crate::errors::{Diagnostics, ErrorSink, FatalParseFailure, GrammarError};
use crate::grammar::{CodeKind, GrammarModel};
use crate::recovery::RecoveryController;
use crate::symbols::SymbolKind;
use crate::Config;
use log::debug;
use rcup_tokens::token_log;
use rcup_tokens::{Token, TokenSource};

/// Reads a grammar, collecting diagnostics in a new `Diagnostics`.
pub fn read_grammar<T: TokenSource>(
    tokens: T,
    config: Config,
) -> Result<(GrammarModel, Diagnostics), FatalParseFailure> {
    read_grammar_with_sink(tokens, config, Diagnostics::new())
}

/// Reads a grammar, reporting diagnostics to `sink`.  Pass `&mut sink` to keep the sink even if
/// reading fails.
pub fn read_grammar_with_sink<T: TokenSource, S: ErrorSink>(
    tokens: T,
    config: Config,
    sink: S,
) -> Result<(GrammarModel, S), FatalParseFailure> {
    let mut reader = Reader {
        cursor: TokenCursor::new(tokens),
        builder: GrammarBuilder::with_sink(config, sink),
        recovery: RecoveryController::new(),
    };
    reader.read()?;
    debug!(
        "read {} token(s), recovered {} time(s)",
        reader.cursor.consumed(),
        reader.recovery.recoveries()
    );
    Ok(reader.builder.finish())
}

/// A token source with one token of lookahead.
pub(crate) struct TokenCursor<T> {
    source: T,
    peeked: Option<Token>,
    at_end: bool,
    consumed: usize,
}

impl<T: TokenSource> TokenCursor<T> {
    pub(crate) fn new(source: T) -> Self {
        Self {
            source,
            peeked: None,
            at_end: false,
            consumed: 0,
        }
    }

    pub(crate) fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() && !self.at_end {
            match self.source.next_token() {
                Some(t) => {
                    token_log!("token {}: {}", self.consumed, t);
                    self.peeked = Some(t);
                }
                None => {
                    token_log!("end of input");
                    self.at_end = true;
                }
            }
        }
        self.peeked.as_ref()
    }

    pub(crate) fn next(&mut self) -> Option<Token> {
        self.peek();
        let t = self.peeked.take();
        if t.is_some() {
            self.consumed += 1;
        }
        t
    }

    pub(crate) fn next_is(&mut self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Describes the next token, for error messages.
    pub(crate) fn describe_next(&mut self) -> String {
        match self.peek() {
            Some(t) => t.to_string(),
            None => "end of input".to_string(),
        }
    }

    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }
}

struct Reader<T, S: ErrorSink> {
    cursor: TokenCursor<T>,
    builder: GrammarBuilder<S>,
    recovery: RecoveryController,
}

impl<T: TokenSource, S: ErrorSink> Reader<T, S> {
    fn read(&mut self) -> Result<(), FatalParseFailure> {
        if let Err(e) = self.read_preamble() {
            self.recovery
                .recover_preamble(&mut self.cursor, &mut self.builder, e)?;
        }
        self.read_declarations()?;
        self.read_productions()
    }

    fn unexpected(&mut self, expected: &str) -> GrammarError {
        let found = self.cursor.describe_next();
        GrammarError::syntax(format!("expected {}", expected), Some(found))
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), GrammarError> {
        if self.cursor.next_is(&token) {
            self.cursor.next();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, GrammarError> {
        match self.cursor.peek() {
            Some(Token::Identifier(_)) => match self.cursor.next() {
                Some(Token::Identifier(id)) => Ok(id),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected(expected)),
        }
    }

    fn expect_code(&mut self) -> Result<String, GrammarError> {
        match self.cursor.peek() {
            Some(Token::CodeBlock(_)) => match self.cursor.next() {
                Some(Token::CodeBlock(code)) => Ok(code),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("a code block")),
        }
    }

    fn skip_optional_semi(&mut self) {
        if self.cursor.next_is(&Token::Semi) {
            self.cursor.next();
        }
    }

    /// Reads `id (. id)*` into the builder's name accumulator.  If `wildcard` is true, the name
    /// may end with `.*`.
    fn read_name(&mut self, wildcard: bool) -> Result<(), GrammarError> {
        let first = self.expect_ident("a name")?;
        self.builder.name().append(&first);

        while self.cursor.next_is(&Token::Dot) {
            self.cursor.next();
            if wildcard && self.cursor.next_is(&Token::Star) {
                self.cursor.next();
                self.builder.name().append_wildcard();
                break;
            }
            let segment = self.expect_ident("a name after `.`")?;
            self.builder.name().append(&segment);
        }
        Ok(())
    }

    fn read_preamble(&mut self) -> Result<(), GrammarError> {
        if self.cursor.next_is(&Token::Package) {
            self.cursor.next();
            self.read_name(false)?;
            self.expect(Token::Semi, "`;` after package name")?;
            self.builder.set_package();
        }

        while self.cursor.next_is(&Token::Import) {
            self.cursor.next();
            self.read_name(true)?;
            self.expect(Token::Semi, "`;` after import")?;
            self.builder.add_import();
        }

        loop {
            let next = self.cursor.peek().cloned();
            match next {
                Some(Token::Action) => self.read_code_part(Token::Code, CodeKind::Action)?,
                Some(Token::Parser) => self.read_code_part(Token::Code, CodeKind::Parser)?,
                Some(Token::Init) => self.read_code_part(Token::With, CodeKind::Init)?,
                Some(Token::Scan) => self.read_code_part(Token::With, CodeKind::Scan)?,
                Some(Token::Debug) => {
                    self.cursor.next();
                    self.expect(Token::With, "`with` after `debug`")?;
                    self.read_name(false)?;
                    self.expect(Token::Semi, "`;` after debug hook")?;
                    self.builder.set_debug_hook();
                }
                Some(Token::Terminal) | Some(Token::Non) | Some(Token::Start)
                | Some(Token::Identifier(_)) | None => return Ok(()),
                Some(_) => return Err(self.unexpected("a code part or symbol declarations")),
            }
        }
    }

    // `action code {: ... :}` and friends.  The keyword has been peeked, not consumed.
    fn read_code_part(&mut self, second: Token, kind: CodeKind) -> Result<(), GrammarError> {
        self.cursor.next();
        let expected = format!("{} after the first word of `{}`", second, kind);
        self.expect(second, &expected)?;
        let code = self.expect_code()?;
        self.skip_optional_semi();
        self.builder.set_code(kind, code);
        Ok(())
    }

    fn read_declarations(&mut self) -> Result<(), FatalParseFailure> {
        loop {
            let next = self.cursor.peek().cloned();
            let result = match next {
                Some(Token::Terminal) => self.read_symbol_declaration(SymbolKind::Terminal),
                Some(Token::Non) => self.read_symbol_declaration(SymbolKind::NonTerminal),
                Some(Token::Start) => self.read_start(),
                Some(Token::Identifier(_)) | None => return Ok(()),
                Some(_) => Err(self.unexpected("a symbol declaration or a production")),
            };
            if let Err(e) = result {
                self.recovery
                    .recover_statement(&mut self.cursor, &mut self.builder, e)?;
            }
        }
    }

    fn read_symbol_declaration(&mut self, kind: SymbolKind) -> Result<(), GrammarError> {
        self.cursor.next();
        if kind == SymbolKind::NonTerminal {
            self.expect(Token::Terminal, "`terminal` after `non`")?;
        }

        // Either the type, or the first symbol name.
        self.read_name(false)?;
        let ty = match self.cursor.peek() {
            Some(Token::Identifier(_)) => Some(self.builder.take_type_id()),
            _ => None,
        };

        let first = match &ty {
            Some(_) => self.expect_ident("a symbol name")?,
            None => {
                if self.builder.name().is_qualified() {
                    let name = self.builder.name().as_str().to_string();
                    return Err(GrammarError::syntax(
                        "a dotted name cannot be declared as a symbol",
                        Some(name),
                    ));
                }
                self.builder.name().take_and_reset()
            }
        };
        self.builder.declare(kind, &first, ty.as_deref());

        loop {
            let next = self.cursor.peek().cloned();
            match next {
                Some(Token::Comma) => {
                    self.cursor.next();
                    let name = self.expect_ident("a symbol name after `,`")?;
                    self.builder.declare(kind, &name, ty.as_deref());
                }
                Some(Token::Semi) => {
                    self.cursor.next();
                    return Ok(());
                }
                _ => return Err(self.unexpected("`,` or `;`")),
            }
        }
    }

    fn read_start(&mut self) -> Result<(), GrammarError> {
        self.cursor.next();
        self.expect(Token::With, "`with` after `start`")?;
        let name = self.expect_ident("the name of the start symbol")?;
        self.expect(Token::Semi, "`;` after the start symbol")?;
        self.builder.explicit_start(&name);
        Ok(())
    }

    fn read_productions(&mut self) -> Result<(), FatalParseFailure> {
        loop {
            let next = self.cursor.peek().cloned();
            let result = match next {
                None => return Ok(()),
                Some(Token::Identifier(_)) => self.read_production(),
                // Out of place here; the builder reports it.
                Some(Token::Start) => self.read_start(),
                Some(_) => Err(self.unexpected("a production")),
            };
            if let Err(e) = result {
                self.recovery
                    .recover_statement(&mut self.cursor, &mut self.builder, e)?;
            }
        }
    }

    // In this loop, we process the parts of each alternative.  A symbol (with an optional label)
    // or a code block is added to the current alternative.  `|` finishes the current alternative
    // and starts another with the same left-hand side, and `;` finishes the production.
    fn read_production(&mut self) -> Result<(), GrammarError> {
        let lhs = self.expect_ident("the left-hand side of a production")?;
        self.expect(Token::ProductionArrow, "`::=`")?;
        self.builder.begin_production(&lhs);
        self.builder.start_alternative();

        loop {
            let next = self.cursor.peek().cloned();
            match next {
                Some(Token::Identifier(name)) => {
                    self.cursor.next();
                    let label = if self.cursor.next_is(&Token::Colon) {
                        self.cursor.next();
                        Some(self.expect_ident("a label after `:`")?)
                    } else {
                        None
                    };
                    self.builder.push_symbol(&name, label);
                }
                Some(Token::CodeBlock(code)) => {
                    self.cursor.next();
                    self.builder.push_action(code);
                }
                Some(Token::Bar) => {
                    self.cursor.next();
                    self.builder.end_alternative();
                    self.builder.start_alternative();
                }
                Some(Token::Semi) => {
                    self.cursor.next();
                    self.builder.end_alternative();
                    self.builder.end_production();
                    return Ok(());
                }
                _ => return Err(self.unexpected("a symbol, a code block, `|`, or `;`")),
            }
        }
    }
}
