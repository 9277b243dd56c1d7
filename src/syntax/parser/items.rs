use crate::ast::*;
use crate::span::Spanned;
use crate::syntax::lexeme::Lexeme;

use super::Parser;

impl Parser {
    pub(super) fn parse_class(&mut self) -> Spanned<ClassDef> {
        let start = self.current_span();
        let modifiers = self.parse_modifiers();
        if !self.at(&Lexeme::Class) {
            self.error_with_help(
                &format!("expected 'class', found {}", self.peek().description()),
                "a compilation unit is a sequence of `class Name { ... }` declarations",
            );
            return Spanned::new(
                ClassDef {
                    modifiers,
                    name: Spanned::new("_error_".to_string(), start),
                    members: Vec::new(),
                },
                start,
            );
        }
        self.advance(); // class
        let name = self.expect_ident();
        self.expect(&Lexeme::LBrace);

        let mut members = Vec::new();
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            let before = self.pos;
            members.push(self.parse_member());
            if self.pos == before {
                self.advance();
            }
        }
        self.expect(&Lexeme::RBrace);
        let span = start.merge(self.prev_span());
        Spanned::new(
            ClassDef {
                modifiers,
                name,
                members,
            },
            span,
        )
    }

    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek() {
                Lexeme::Public => Modifier::Public,
                Lexeme::Private => Modifier::Private,
                Lexeme::Protected => Modifier::Protected,
                Lexeme::Static => Modifier::Static,
                Lexeme::Final => Modifier::Final,
                _ => break,
            };
            if modifiers.contains(&modifier) {
                self.error_at_current(&format!("repeated modifier '{}'", modifier.as_str()));
            }
            self.advance();
            modifiers.push(modifier);
        }
        modifiers
    }

    fn parse_member(&mut self) -> Spanned<Member> {
        let start = self.current_span();
        let modifiers = self.parse_modifiers();
        let ret = self.parse_type();
        let name = self.expect_ident();

        if self.eat(&Lexeme::LParen) {
            let params = self.parse_params();
            self.expect(&Lexeme::RParen);
            let body = self.parse_block();
            let span = start.merge(self.prev_span());
            return Spanned::new(
                Member::Method(MethodDef {
                    modifiers,
                    ret,
                    name,
                    params,
                    body,
                }),
                span,
            );
        }

        if ret.node == Type::Void {
            self.diagnostics.push(crate::diagnostic::Diagnostic::error(
                "a field cannot have type 'void'".to_string(),
                ret.span,
            ));
        }
        let init = if self.eat(&Lexeme::Eq) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(&Lexeme::Semicolon);
        let span = start.merge(self.prev_span());
        Spanned::new(
            Member::Field(FieldDef {
                modifiers,
                ty: ret,
                name,
                init,
            }),
            span,
        )
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            let ty = self.parse_type();
            let name = self.expect_ident();
            params.push(Param {
                ty: ty.node,
                name: name.node,
            });
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        params
    }

    pub(super) fn parse_type(&mut self) -> Spanned<Type> {
        let start = self.current_span();
        match self.peek() {
            Lexeme::IntTy => {
                self.advance();
                Spanned::new(Type::Int, start)
            }
            Lexeme::BooleanTy => {
                self.advance();
                Spanned::new(Type::Boolean, start)
            }
            Lexeme::VoidTy => {
                self.advance();
                Spanned::new(Type::Void, start)
            }
            Lexeme::Ident(_) => self.parse_dotted_name().map(Type::Named),
            _ => {
                self.error_with_help(
                    &format!("expected type, found {}", self.peek().description()),
                    "supported types are `int`, `boolean`, `void` and class names like `String`",
                );
                Spanned::new(Type::Named("_error_".to_string()), start)
            }
        }
    }

    /// Whether the tokens ahead form `Type name`, i.e. a local declaration.
    pub(super) fn is_local_decl_ahead(&self) -> bool {
        match self.peek() {
            Lexeme::IntTy | Lexeme::BooleanTy => true,
            Lexeme::Ident(_) => {
                let mut offset = 1;
                while matches!(self.peek_at(offset), Lexeme::Dot)
                    && matches!(self.peek_at(offset + 1), Lexeme::Ident(_))
                {
                    offset += 2;
                }
                matches!(self.peek_at(offset), Lexeme::Ident(_))
            }
            _ => false,
        }
    }
}
