use crate::ast::*;
use crate::span::Spanned;
use crate::syntax::lexeme::Lexeme;

use super::Parser;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        if !self.enter_nesting() {
            return self.error_expr();
        }
        let expr = self.parse_assign();
        self.exit_nesting();
        expr
    }

    /// Assignment is right-associative and binds loosest.
    fn parse_assign(&mut self) -> Spanned<Expr> {
        let target = self.parse_expr_bp(0);
        let op = match self.peek() {
            Lexeme::Eq => AssignOp::Assign,
            Lexeme::OpAssign(text) => match compound_op(text) {
                Some(op) => AssignOp::Compound(op),
                None => return target,
            },
            _ => return target,
        };
        if !matches!(target.node, Expr::Name(_)) {
            self.error_with_help(
                "invalid assignment target",
                "only variables and fields can be assigned",
            );
        }
        self.advance(); // operator
        let value = self.parse_assign();
        let span = target.span.merge(value.span);
        Spanned::new(
            Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        )
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();

        loop {
            let op = match self.peek() {
                Lexeme::PipePipe => InfixOp::Or,
                Lexeme::AmpAmp => InfixOp::And,
                Lexeme::Pipe => InfixOp::BitOr,
                Lexeme::Caret => InfixOp::BitXor,
                Lexeme::Amp => InfixOp::BitAnd,
                Lexeme::EqEq => InfixOp::Eq,
                Lexeme::BangEq => InfixOp::Ne,
                Lexeme::Lt => InfixOp::Lt,
                Lexeme::Le => InfixOp::Le,
                Lexeme::Gt => InfixOp::Gt,
                Lexeme::Ge => InfixOp::Ge,
                Lexeme::Shl => InfixOp::Shl,
                Lexeme::Shr => InfixOp::Shr,
                Lexeme::UShr => InfixOp::UShr,
                Lexeme::Plus => InfixOp::Add,
                Lexeme::Minus => InfixOp::Sub,
                Lexeme::Star => InfixOp::Mul,
                Lexeme::Slash => InfixOp::Div,
                Lexeme::Percent => InfixOp::Rem,
                _ => break,
            };

            // Left-associative: the right side must bind strictly tighter.
            let l_bp = op.precedence() * 2;
            let r_bp = l_bp + 1;
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator
            let rhs = self.parse_expr_bp(r_bp);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::Infix {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();
        let op = match self.peek() {
            Lexeme::Minus => PrefixOp::Neg,
            Lexeme::Bang => PrefixOp::Not,
            Lexeme::Tilde => PrefixOp::BitNot,
            Lexeme::PlusPlus => PrefixOp::Inc,
            Lexeme::MinusMinus => PrefixOp::Dec,
            _ => return self.parse_postfix(),
        };
        self.advance(); // operator

        // `-N` is a negative literal; this is also the only way to write
        // i32::MIN.
        if op == PrefixOp::Neg {
            if let Lexeme::Integer(n) = *self.peek() {
                if n <= 1 << 31 {
                    self.advance();
                    let span = start.merge(self.prev_span());
                    let value = (n as i64).wrapping_neg() as i32;
                    return Spanned::new(Expr::Literal(Literal::Int(value)), span);
                }
            }
        }

        if !self.enter_nesting() {
            return self.error_expr();
        }
        let operand = self.parse_unary();
        self.exit_nesting();

        if matches!(op, PrefixOp::Inc | PrefixOp::Dec) && !matches!(operand.node, Expr::Name(_)) {
            self.diagnostics.push(crate::diagnostic::Diagnostic::error(
                format!("operand of '{}' must be a variable", op.as_str()),
                operand.span,
            ));
        }
        let span = start.merge(operand.span);
        Spanned::new(
            Expr::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn parse_postfix(&mut self) -> Spanned<Expr> {
        let mut expr = self.parse_primary();
        loop {
            let op = match self.peek() {
                Lexeme::PlusPlus => PostfixOp::Inc,
                Lexeme::MinusMinus => PostfixOp::Dec,
                _ => break,
            };
            if !matches!(expr.node, Expr::Name(_)) {
                self.error_at_current(&format!(
                    "operand of '{}' must be a variable",
                    op.as_str()
                ));
            }
            self.advance();
            let span = expr.span.merge(self.prev_span());
            expr = Spanned::new(
                Expr::Postfix {
                    op,
                    operand: Box::new(expr),
                },
                span,
            );
        }
        expr
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        match self.peek().clone() {
            Lexeme::Integer(n) => {
                self.advance();
                match i32::try_from(n) {
                    Ok(value) => Spanned::new(Expr::Literal(Literal::Int(value)), start),
                    Err(_) => {
                        self.diagnostics.push(
                            crate::diagnostic::Diagnostic::error(
                                format!("integer literal {} is out of range for 'int'", n),
                                start,
                            )
                            .with_help("int literals range from -2147483648 to 2147483647".into()),
                        );
                        Spanned::new(Expr::Literal(Literal::Int(0)), start)
                    }
                }
            }
            Lexeme::True => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Bool(true)), start)
            }
            Lexeme::False => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Bool(false)), start)
            }
            Lexeme::Null => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Null), start)
            }
            Lexeme::Str(s) => {
                self.advance();
                Spanned::new(Expr::Literal(Literal::Str(s)), start)
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(&Lexeme::RParen);
                inner
            }
            Lexeme::Ident(_) => {
                let path = self.parse_dotted_name();
                if self.at(&Lexeme::LParen) {
                    self.advance();
                    let args = self.parse_call_args();
                    self.expect(&Lexeme::RParen);
                    let span = start.merge(self.prev_span());
                    Spanned::new(Expr::Call { path, args }, span)
                } else {
                    let span = path.span;
                    Spanned::new(Expr::Name(path.node), span)
                }
            }
            _ => {
                self.error_at_current(&format!(
                    "expected expression, found {}",
                    self.peek().description()
                ));
                self.error_expr()
            }
        }
    }

    fn parse_call_args(&mut self) -> Vec<Spanned<Expr>> {
        let mut args = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            args.push(self.parse_expr());
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        args
    }

    fn error_expr(&self) -> Spanned<Expr> {
        Spanned::new(Expr::Name("_error_".to_string()), self.current_span())
    }
}

fn compound_op(text: &str) -> Option<InfixOp> {
    Some(match text {
        "+" => InfixOp::Add,
        "-" => InfixOp::Sub,
        "*" => InfixOp::Mul,
        "/" => InfixOp::Div,
        "%" => InfixOp::Rem,
        "&" => InfixOp::BitAnd,
        "|" => InfixOp::BitOr,
        "^" => InfixOp::BitXor,
        "<<" => InfixOp::Shl,
        ">>" => InfixOp::Shr,
        ">>>" => InfixOp::UShr,
        _ => return None,
    })
}
