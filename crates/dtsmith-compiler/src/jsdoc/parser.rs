//! Recursive-descent parser for documentation type expressions.
//!
//! Grammar (loosest-binding first):
//!
//! ```text
//! union    := optional ('|' optional)*
//! optional := prefix '='?
//! prefix   := ('?' | '!' | '...') prefix | primary
//! primary  := '(' union ')'
//!           | '*'
//!           | 'function' '(' (union (',' union)*)? ')' (':' union)?
//!           | Name (('.<' | '<') union (',' union)* '>')?
//! ```
//!
//! The parser is total over its input: anything it cannot read returns
//! `None`, which upstream treats as an absent annotation.

use super::TypeExpr;
use super::lexer::{self, Token};

/// Parse type-expression text, e.g. `Array.<string>|number`.
pub fn parse_type_expr(text: &str) -> Option<TypeExpr> {
    let tokens = lexer::lex(text)?;
    if tokens.is_empty() {
        return None;
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.union()?;
    // Trailing tokens mean we misread the expression; reject the lot.
    if parser.pos != parser.tokens.len() {
        return None;
    }
    Some(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn union(&mut self) -> Option<TypeExpr> {
        let first = self.optional()?;
        if self.peek() != Some(&Token::Pipe) {
            return Some(first);
        }
        let mut members = vec![first];
        while self.eat(&Token::Pipe) {
            members.push(self.optional()?);
        }
        Some(TypeExpr::Union(members))
    }

    fn optional(&mut self) -> Option<TypeExpr> {
        let inner = self.prefix()?;
        if self.eat(&Token::Equals) {
            return Some(TypeExpr::Optional(Box::new(inner)));
        }
        Some(inner)
    }

    fn prefix(&mut self) -> Option<TypeExpr> {
        match self.peek() {
            Some(Token::Question) => {
                self.pos += 1;
                Some(TypeExpr::Nullable(Box::new(self.prefix()?)))
            }
            Some(Token::Bang) => {
                self.pos += 1;
                Some(TypeExpr::NonNullable(Box::new(self.prefix()?)))
            }
            Some(Token::Ellipsis) => {
                self.pos += 1;
                Some(TypeExpr::Rest(Box::new(self.prefix()?)))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Option<TypeExpr> {
        match self.bump()? {
            Token::LParen => {
                let inner = self.union()?;
                self.eat(&Token::RParen).then_some(inner)
            }
            Token::Star => Some(TypeExpr::All),
            Token::Name(name) if name == "function" && self.peek() == Some(&Token::LParen) => {
                self.function()
            }
            Token::Name(name) => {
                if self.peek() == Some(&Token::DotAngle) || self.peek() == Some(&Token::LAngle) {
                    self.pos += 1;
                    let args = self.comma_separated(Token::RAngle)?;
                    return Some(TypeExpr::Application { name, args });
                }
                Some(TypeExpr::Name(name))
            }
            _ => None,
        }
    }

    fn function(&mut self) -> Option<TypeExpr> {
        if !self.eat(&Token::LParen) {
            return None;
        }
        let params = if self.eat(&Token::RParen) {
            Vec::new()
        } else {
            self.comma_separated(Token::RParen)?
        };
        let result = if self.eat(&Token::Colon) {
            Some(Box::new(self.union()?))
        } else {
            None
        };
        Some(TypeExpr::Function { params, result })
    }

    /// `union (',' union)* <close>`, the closing token consumed.
    fn comma_separated(&mut self, close: Token) -> Option<Vec<TypeExpr>> {
        let mut items = vec![self.union()?];
        while self.eat(&Token::Comma) {
            items.push(self.union()?);
        }
        self.eat(&close).then_some(items)
    }
}
