use crate::ast::*;
use crate::span::Spanned;
use crate::syntax::lexeme::Lexeme;

use super::Parser;

impl Parser {
    pub(super) fn parse_block(&mut self) -> Spanned<Block> {
        let start = self.current_span();
        self.expect(&Lexeme::LBrace);
        if !self.enter_nesting() {
            return Spanned::new(Block { stmts: Vec::new() }, start);
        }

        let mut stmts = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let before = self.pos;
            stmts.push(self.parse_stmt());
            if self.pos == before {
                self.advance();
            }
        }

        self.exit_nesting();
        self.expect(&Lexeme::RBrace);
        let span = start.merge(self.prev_span());
        Spanned::new(Block { stmts }, span)
    }

    pub(super) fn parse_stmt(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        match self.peek() {
            Lexeme::LBrace => self.parse_block().map(Stmt::Block),
            Lexeme::If => self.parse_if(),
            Lexeme::While => self.parse_while(),
            Lexeme::For => self.parse_for(),
            Lexeme::Return => {
                self.advance();
                let value = if self.at(&Lexeme::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                self.expect(&Lexeme::Semicolon);
                Spanned::new(Stmt::Return(value), start.merge(self.prev_span()))
            }
            Lexeme::Break => {
                self.advance();
                self.expect(&Lexeme::Semicolon);
                Spanned::new(Stmt::Break, start.merge(self.prev_span()))
            }
            Lexeme::Continue => {
                self.advance();
                self.expect(&Lexeme::Semicolon);
                Spanned::new(Stmt::Continue, start.merge(self.prev_span()))
            }
            Lexeme::Semicolon => {
                self.advance();
                Spanned::new(Stmt::Empty, start)
            }
            _ if self.is_local_decl_ahead() => {
                let decl = self.parse_local_var();
                self.expect(&Lexeme::Semicolon);
                Spanned::new(decl.node, start.merge(self.prev_span()))
            }
            _ => {
                let expr = self.parse_expr();
                self.expect(&Lexeme::Semicolon);
                Spanned::new(Stmt::Expr(expr), start.merge(self.prev_span()))
            }
        }
    }

    /// `Type name [= init]` without the trailing semicolon.
    fn parse_local_var(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        let ty = self.parse_type();
        if ty.node == Type::Void {
            self.diagnostics.push(crate::diagnostic::Diagnostic::error(
                "a local variable cannot have type 'void'".to_string(),
                ty.span,
            ));
        }
        let name = self.expect_ident();
        let init = if self.eat(&Lexeme::Eq) {
            Some(self.parse_expr())
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Spanned::new(Stmt::LocalVar { ty, name, init }, span)
    }

    /// The statement under `if`, `else`, `while` or `for`. A bare local
    /// declaration is not a statement there.
    fn parse_nested_stmt(&mut self) -> Box<Spanned<Stmt>> {
        if !self.at(&Lexeme::LBrace) && self.is_local_decl_ahead() {
            self.error_with_help(
                "a declaration is not allowed here",
                "wrap the declaration in braces: `{ ... }`",
            );
        }
        if !self.enter_nesting() {
            return Box::new(Spanned::new(Stmt::Empty, self.current_span()));
        }
        let stmt = self.parse_stmt();
        self.exit_nesting();
        Box::new(stmt)
    }

    fn parse_paren_cond(&mut self) -> Spanned<Expr> {
        self.expect(&Lexeme::LParen);
        let cond = self.parse_expr();
        self.expect(&Lexeme::RParen);
        cond
    }

    fn parse_if(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        self.advance(); // if
        let cond = self.parse_paren_cond();
        let then_branch = self.parse_nested_stmt();
        let else_branch = if self.eat(&Lexeme::Else) {
            Some(self.parse_nested_stmt())
        } else {
            None
        };
        let span = start.merge(self.prev_span());
        Spanned::new(
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    fn parse_while(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        self.advance(); // while
        let cond = self.parse_paren_cond();
        let body = self.parse_nested_stmt();
        let span = start.merge(self.prev_span());
        Spanned::new(Stmt::While { cond, body }, span)
    }

    fn parse_for(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        self.advance(); // for
        self.expect(&Lexeme::LParen);

        let init = if self.at(&Lexeme::Semicolon) {
            None
        } else if self.is_local_decl_ahead() {
            Some(Box::new(self.parse_local_var()))
        } else {
            let expr = self.parse_expr();
            let span = expr.span;
            Some(Box::new(Spanned::new(Stmt::Expr(expr), span)))
        };
        self.expect(&Lexeme::Semicolon);

        let cond = if self.at(&Lexeme::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(&Lexeme::Semicolon);

        let update = if self.at(&Lexeme::RParen) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.expect(&Lexeme::RParen);

        let body = self.parse_nested_stmt();
        let span = start.merge(self.prev_span());
        Spanned::new(
            Stmt::For {
                init,
                cond,
                update,
                body,
            },
            span,
        )
    }
}
