use crate::ast::*;
use crate::span::Spanned;

use super::expr::format_expr;
use super::{FormatCtx, INDENT};

impl FormatCtx {
    pub(super) fn emit_stmt(&mut self, stmt: &Spanned<Stmt>, indent: &str) {
        self.emit_leading_comments(stmt.span.start, indent);
        match &stmt.node {
            Stmt::Block(block) => {
                self.output.push_str(indent);
                self.output.push_str("{\n");
                self.emit_block(block, indent);
                self.output.push_str(indent);
                self.output.push_str("}\n");
            }
            Stmt::LocalVar { .. } | Stmt::Expr(_) => {
                self.output.push_str(indent);
                self.emit_simple(&stmt.node, indent);
                self.output.push(';');
                self.emit_trailing_comment(stmt.span.end);
                self.output.push('\n');
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.output.push_str(indent);
                self.emit_if(cond, then_branch, else_branch.as_deref(), indent);
            }
            Stmt::While { cond, body } => {
                self.output.push_str(indent);
                self.output.push_str("while (");
                self.output.push_str(&format_expr(&cond.node));
                self.output.push(')');
                if self.emit_body(body, indent) {
                    self.output.push('\n');
                }
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.output.push_str(indent);
                self.output.push_str("for (");
                if let Some(init) = init {
                    self.emit_simple(&init.node, indent);
                }
                self.output.push(';');
                if let Some(cond) = cond {
                    self.output.push(' ');
                    self.output.push_str(&format_expr(&cond.node));
                }
                self.output.push(';');
                if let Some(update) = update {
                    self.output.push(' ');
                    self.output.push_str(&format_expr(&update.node));
                }
                self.output.push(')');
                if self.emit_body(body, indent) {
                    self.output.push('\n');
                }
            }
            Stmt::Return(value) => {
                self.output.push_str(indent);
                match value {
                    Some(v) => {
                        self.output.push_str("return ");
                        self.emit_expr_wrapped(&v.node, indent);
                        self.output.push(';');
                    }
                    None => self.output.push_str("return;"),
                }
                self.emit_trailing_comment(stmt.span.end);
                self.output.push('\n');
            }
            Stmt::Break | Stmt::Continue | Stmt::Empty => {
                self.output.push_str(indent);
                self.output.push_str(match &stmt.node {
                    Stmt::Break => "break;",
                    Stmt::Continue => "continue;",
                    _ => ";",
                });
                self.emit_trailing_comment(stmt.span.end);
                self.output.push('\n');
            }
        }
    }

    /// A declaration or expression without its terminating `;`.
    fn emit_simple(&mut self, stmt: &Stmt, indent: &str) {
        match stmt {
            Stmt::LocalVar { ty, name, init } => {
                self.output.push_str(&ty.node.to_string());
                self.output.push(' ');
                self.output.push_str(&name.node);
                if let Some(init) = init {
                    self.output.push_str(" = ");
                    self.emit_expr_wrapped(&init.node, indent);
                }
            }
            Stmt::Expr(expr) => self.emit_expr_wrapped(&expr.node, indent),
            _ => {}
        }
    }

    /// Emit an `if` starting at the current column (after `indent` or `else `).
    fn emit_if(
        &mut self,
        cond: &Spanned<Expr>,
        then_branch: &Spanned<Stmt>,
        else_branch: Option<&Spanned<Stmt>>,
        indent: &str,
    ) {
        self.output.push_str("if (");
        self.output.push_str(&format_expr(&cond.node));
        self.output.push(')');
        let braced = self.emit_body(then_branch, indent);
        let Some(else_branch) = else_branch else {
            if braced {
                self.output.push('\n');
            }
            return;
        };

        if braced {
            self.output.push_str(" else");
        } else {
            self.output.push_str(indent);
            self.output.push_str("else");
        }
        if let Stmt::If {
            cond,
            then_branch,
            else_branch,
        } = &else_branch.node
        {
            self.output.push(' ');
            self.emit_if(cond, then_branch, else_branch.as_deref(), indent);
        } else if self.emit_body(else_branch, indent) {
            self.output.push('\n');
        }
    }

    /// Emit a loop or branch body. Returns true if it was braced, in which
    /// case the closing `}` is left open on the current line.
    fn emit_body(&mut self, body: &Spanned<Stmt>, indent: &str) -> bool {
        if let Stmt::Block(block) = &body.node {
            self.output.push_str(" {\n");
            self.emit_block(block, indent);
            self.output.push_str(indent);
            self.output.push('}');
            true
        } else {
            self.output.push('\n');
            let inner = format!("{}{}", indent, INDENT);
            self.emit_stmt(body, &inner);
            false
        }
    }
}
