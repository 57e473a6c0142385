//! Lexer for documentation type expressions.
//!
//! Tokenizes the text between `{` and `}` in a tag. Names absorb `.` and `:`
//! separators (`foo.Bar`, `external:String`); `.<` is its own token so the
//! dotted application form `Array.<string>` lexes unambiguously.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(".<")]
    DotAngle,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*([.:][A-Za-z_$][A-Za-z0-9_$]*)*", |lex| lex.slice().to_string())]
    Name(String),
}

/// Tokenize type-expression text. `None` if any character fails to lex;
/// callers treat that as an unreadable (hence absent) annotation.
pub fn lex(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    for result in Token::lexer(text) {
        tokens.push(result.ok()?);
    }
    Some(tokens)
}
