#![allow(dead_code)]

use rcup::{read_grammar, Config, Diagnostics, GrammarModel};
use rcup_tokens::Token;

#[static_init::dynamic]
static INIT_LOGGER: () = {
    env_logger::builder().default_format_timestamp(false).init();
};

/// Turns whitespace-separated words into tokens.  Keywords and punctuation are recognized by
/// their spelling, `{:text:}` (with no spaces inside) is a code block, and anything else is an
/// identifier.
pub fn tokens(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .map(|w| match w {
            "package" => Token::Package,
            "import" => Token::Import,
            "code" => Token::Code,
            "action" => Token::Action,
            "parser" => Token::Parser,
            "terminal" => Token::Terminal,
            "non" => Token::Non,
            "init" => Token::Init,
            "scan" => Token::Scan,
            "with" => Token::With,
            "start" => Token::Start,
            "debug" => Token::Debug,
            ";" => Token::Semi,
            "," => Token::Comma,
            "*" => Token::Star,
            "." => Token::Dot,
            ":" => Token::Colon,
            "::=" => Token::ProductionArrow,
            "|" => Token::Bar,
            w if w.starts_with("{:") && w.ends_with(":}") && w.len() >= 4 => {
                Token::code(&w[2..w.len() - 2])
            }
            w => Token::ident(w),
        })
        .collect()
}

pub fn read(description: &str, text: &str) -> (GrammarModel, Diagnostics) {
    read_with(description, text, Config::default())
}

pub fn read_with(description: &str, text: &str, config: Config) -> (GrammarModel, Diagnostics) {
    println!("reading grammar: {} -----", description);
    let (g, d) = read_grammar(tokens(text).into_iter(), config)
        .unwrap_or_else(|e| panic!("{}: {}", description, e));
    for e in d.errors() {
        println!("error: {}", e);
    }
    for w in d.warnings() {
        println!("warning: {}", w);
    }
    (g, d)
}
