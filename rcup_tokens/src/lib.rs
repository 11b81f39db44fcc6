//! The token alphabet that RCUP reads, and the interface through which a scanner hands tokens
//! to it.
//!
//! RCUP does not scan text.  Something else (a hand-written scanner, a generated one, or a test
//! that simply builds a `Vec<Token>`) turns specification text into `Token` values, and the
//! front end pulls them one at a time through `TokenSource`.  Any iterator over `Token` is a
//! token source, and the end of the iterator is the end of the input.

use core::fmt;

/// One token of a grammar specification.
///
/// Keywords carry no data.  `Identifier` carries the identifier text, and `CodeBlock` carries
/// the contents of a `{: ... :}` block, exactly as the scanner found them.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Token {
    Package,
    Import,
    Code,
    Action,
    Parser,
    Terminal,
    Non,
    Init,
    Scan,
    With,
    Start,
    Semi,
    Comma,
    Star,
    Dot,
    Colon,
    /// `::=`
    ProductionArrow,
    Bar,
    Debug,
    Identifier(String),
    CodeBlock(String),
}

impl Token {
    pub fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    pub fn code(code: &str) -> Token {
        Token::CodeBlock(code.to_string())
    }

    /// Returns true for the token that ends a declaration, a directive, or a production.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Token::Semi)
    }

    /// Returns true for tokens that can only begin the symbol declaration section.
    pub fn begins_declarations(&self) -> bool {
        matches!(self, Token::Terminal | Token::Non)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::Package => "package",
            Token::Import => "import",
            Token::Code => "code",
            Token::Action => "action",
            Token::Parser => "parser",
            Token::Terminal => "terminal",
            Token::Non => "non",
            Token::Init => "init",
            Token::Scan => "scan",
            Token::With => "with",
            Token::Start => "start",
            Token::Semi => ";",
            Token::Comma => ",",
            Token::Star => "*",
            Token::Dot => ".",
            Token::Colon => ":",
            Token::ProductionArrow => "::=",
            Token::Bar => "|",
            Token::Debug => "debug",
            Token::Identifier(name) => return write!(fmt, "identifier `{}`", name),
            Token::CodeBlock(_) => "code block",
        };
        write!(fmt, "`{}`", s)
    }
}

/// Supplies tokens to the front end, one at a time, in textual order.
///
/// This is a plain call/return interface.  Returning `None` means the input is exhausted; the
/// front end will not call `next_token` again after that.
pub trait TokenSource {
    fn next_token(&mut self) -> Option<Token>;
}

impl<I: Iterator<Item = Token>> TokenSource for I {
    fn next_token(&mut self) -> Option<Token> {
        self.next()
    }
}

#[cfg(feature = "token_log")]
#[macro_export]
macro_rules! token_log {
    (
        $($t:tt)*
    ) => {
        ::log::trace!( $($t)* )
    }
}

#[cfg(not(feature = "token_log"))]
#[macro_export]
macro_rules! token_log {
    (
        $($t:tt)*
    ) => {
        // nothing
    };
}
