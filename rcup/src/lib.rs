//! # RCUP -- the grammar front end of a CUP-style parser generator
//!
//! RCUP reads a grammar specification, in the form of a stream of tokens produced by some
//! external scanner, and builds a `GrammarModel`: a symbol table, a non-terminal table, an
//! ordered list of productions, and the synthesized start production.  The model is what an
//! LALR table builder consumes.  RCUP itself builds no tables and emits no code.
//!
//! # The specification language
//!
//! A specification has four sections, in this order:
//!
//! ```text
//! package calc;                       // optional
//! import java.util.*;                 // any number of these
//!
//! action code {: ... :}               // optional code parts, in any order
//! parser code {: ... :}
//! init with {: ... :}
//! scan with {: ... :}
//! debug with trace.hook;
//!
//! terminal PLUS, MINUS, LPAREN, RPAREN;        // symbol declarations
//! terminal Integer NUM;
//! non terminal Integer expr;
//!
//! start with expr;                    // optional
//!
//! expr ::= expr:l PLUS expr:r {: RESULT = l + r; :}
//!        | NUM:n                       {: RESULT = n; :}
//!        ;
//! ```
//!
//! Every symbol must be declared before it is used.  Terminals and non-terminals share a single
//! namespace, and the name `error` is always defined as a terminal, so that grammars can write
//! error-recovery productions.
//!
//! If the grammar contains a `start with` directive, the named non-terminal is the start
//! symbol.  Otherwise the left-hand side of the first production is used.  Either way, RCUP adds
//! the augmented production `$START ::= <start> EOF`, which gives the LALR automaton a single
//! accepting state.
//!
//! # Reading a grammar
//!
//! ```rust
//! use rcup::{read_grammar, Config, ErrorSink};
//! use rcup_tokens::Token;
//!
//! let tokens = vec![
//!     Token::Terminal, Token::ident("NUM"), Token::Comma, Token::ident("PLUS"), Token::Semi,
//!     Token::Non, Token::Terminal, Token::ident("E"), Token::Semi,
//!     Token::ident("E"), Token::ProductionArrow,
//!         Token::ident("E"), Token::ident("PLUS"), Token::ident("E"),
//!         Token::Bar, Token::ident("NUM"),
//!         Token::Semi,
//! ];
//!
//! let (grammar, diagnostics) = read_grammar(tokens.into_iter(), Config::default()).unwrap();
//! assert_eq!(diagnostics.error_count(), 0);
//! assert_eq!(grammar.productions().len(), 2);
//! assert_eq!(grammar.start_production_to_string().unwrap(), "$START ::= E EOF");
//! ```
//!
//! # Errors
//!
//! Most problems in a specification do not stop RCUP.  A duplicate declaration, a reference to
//! an undeclared symbol, or a malformed declaration is reported to the `ErrorSink`, and reading
//! continues with the next statement, so that one pass reports as many independent problems as
//! possible.  The caller decides what to do with a grammar that was read with errors; normally it
//! should not be handed to table construction unless `error_count()` is zero.
//!
//! The only error that stops reading is `FatalParseFailure`, which is returned when the reader
//! has nowhere to resynchronize, for example when the input ends in the middle of a production.
//!
//! # Logging
//!
//! RCUP logs through the `log` crate.  Reduction events and the finished grammar are logged at
//! `debug` level.  Enable the `token_log` feature to trace every token that is read.

#![warn(rust_2018_idioms)]

pub mod builder;
pub mod errors;
pub mod grammar;
pub mod name;
pub mod production;
pub mod reader;
pub mod recovery;
pub mod start;
pub mod symbols;


macro_rules! int_alias {
    (type $name:ident = $int:ty;) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
        pub struct $name(pub $int);

        impl $name {
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, fmt)
            }
        }

        impl core::convert::From<$name> for usize {
            fn from(i: $name) -> usize {
                i.0 as usize
            }
        }

        impl core::convert::From<usize> for $name {
            fn from(i: usize) -> $name {
                $name(i as $int)
            }
        }
    };
}

int_alias! {type SymbolId = u32;}
int_alias! {type ProductionId = u32;}

impl SymbolId {
    /// The end-of-input terminal.  It cannot be named in a specification.
    pub const EOF: SymbolId = SymbolId(0);
    /// The `error` terminal, used by error-recovery productions.
    pub const ERROR: SymbolId = SymbolId(1);
    /// The augmented start non-terminal, `$START`.  It cannot be named in a specification.
    pub const START: SymbolId = SymbolId(2);
}

/// The number of parts a single alternative may have, unless configured otherwise.
pub const DEFAULT_RHS_CAPACITY: usize = 200;

/// Settings for one compilation run.
#[derive(Clone, Debug)]
pub struct Config {
    /// The largest number of parts (symbols and actions) allowed in one alternative.
    pub rhs_capacity: usize,

    /// If true, `finish` warns about terminals and non-terminals that are declared but never
    /// used.
    pub warn_unused: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rhs_capacity: DEFAULT_RHS_CAPACITY,
            warn_unused: true,
        }
    }
}

pub use builder::GrammarBuilder;
pub use errors::{Diagnostics, ErrorKind, ErrorSink, FatalParseFailure, GrammarError};
pub use grammar::GrammarModel;
pub use production::{Production, ProductionPart, StartProduction};
pub use reader::{read_grammar, read_grammar_with_sink};
pub use symbols::{Symbol, SymbolKind};
