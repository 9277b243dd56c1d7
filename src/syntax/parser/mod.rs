mod expr;
mod items;
mod stmts;

#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};
use crate::syntax::lexeme::Lexeme;

const MAX_NESTING_DEPTH: u32 = 256;

pub struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    pub fn parse_file(mut self) -> Result<File, Vec<Diagnostic>> {
        let mut classes = Vec::new();
        while !self.at(&Lexeme::Eof) {
            let before = self.pos;
            classes.push(self.parse_class());
            if self.pos == before {
                // No progress: skip the offending token so we terminate.
                self.advance();
            }
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(File { classes })
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "extract deeply nested code into separate methods",
            );
            // Skip to EOF to abort parsing entirely.
            while !self.at(&Lexeme::Eof) {
                self.advance();
            }
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    // --- Utility methods ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn peek_at(&self, offset: usize) -> &Lexeme {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].node
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let tok = &self.tokens[self.pos];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    /// Parse `a.b.c` and return the dotted name.
    fn parse_dotted_name(&mut self) -> Spanned<String> {
        let first = self.expect_ident();
        let mut name = first.node;
        let mut span = first.span;
        while self.at(&Lexeme::Dot) && matches!(self.peek_at(1), Lexeme::Ident(_)) {
            self.advance(); // .
            let part = self.expect_ident();
            name.push('.');
            name.push_str(&part.node);
            span = span.merge(part.span);
        }
        Spanned::new(name, span)
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}
