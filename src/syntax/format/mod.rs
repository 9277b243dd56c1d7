mod expr;
mod items;
mod stmts;

#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::syntax::lexer::Comment;

pub(crate) use expr::format_expr;

const MAX_WIDTH: usize = 100;
const INDENT: &str = "    ";

/// Print a compilation unit back to Java source, preserving comments.
pub fn format_file(file: &File, comments: &[Comment]) -> String {
    let mut ctx = FormatCtx::new(comments);
    ctx.emit_file(file);
    let mut out = ctx.output;
    // Ensure single trailing newline
    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub(super) struct FormatCtx {
    pub(super) output: String,
    pub(super) comments: Vec<CommentEntry>,
}

#[derive(Clone)]
pub(super) struct CommentEntry {
    pub(super) text: String,
    pub(super) byte_offset: u32,
    pub(super) trailing: bool,
    pub(super) line_start: u32,
    pub(super) used: bool,
}

impl FormatCtx {
    fn new(comments: &[Comment]) -> Self {
        let entries = comments
            .iter()
            .map(|c| CommentEntry {
                text: c.text.clone(),
                byte_offset: c.span.start,
                trailing: c.trailing,
                line_start: c.line_start,
                used: false,
            })
            .collect();
        Self {
            output: String::new(),
            comments: entries,
        }
    }

    /// Emit own-line comments that start before `span_start`.
    ///
    /// Synthesized nodes carry a dummy span starting at 0, so they never
    /// pull comments forward.
    pub(super) fn emit_leading_comments(&mut self, span_start: u32, indent: &str) {
        for entry in self.comments.iter_mut() {
            if entry.used || entry.trailing {
                continue;
            }
            if entry.byte_offset < span_start {
                entry.used = true;
                self.output.push_str(indent);
                self.output.push_str(&entry.text);
                self.output.push('\n');
            }
        }
    }

    /// Emit the trailing comment on the line where `span_end` falls.
    pub(super) fn emit_trailing_comment(&mut self, span_end: u32) {
        if span_end == 0 {
            return;
        }
        for entry in self.comments.iter_mut() {
            if entry.used || !entry.trailing {
                continue;
            }
            if entry.byte_offset >= span_end && entry.line_start <= span_end {
                entry.used = true;
                self.output.push(' ');
                self.output.push_str(&entry.text);
                break;
            }
        }
    }

    /// Emit any remaining unused comments (e.g., at end of file).
    fn emit_remaining_comments(&mut self, indent: &str) {
        for entry in self.comments.iter_mut() {
            if entry.used {
                continue;
            }
            entry.used = true;
            self.output.push_str(indent);
            self.output.push_str(&entry.text);
            self.output.push('\n');
        }
    }

    fn emit_file(&mut self, file: &File) {
        for (i, class) in file.classes.iter().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            self.emit_class(class, "");
        }
        self.emit_remaining_comments("");
    }

    pub(super) fn emit_block(&mut self, block: &Block, outer_indent: &str) {
        let indent = format!("{}{}", outer_indent, INDENT);
        for stmt in &block.stmts {
            self.emit_stmt(stmt, &indent);
        }
    }

    /// Format an expression, breaking long calls one argument per line.
    pub(super) fn emit_expr_wrapped(&mut self, expr: &Expr, indent: &str) {
        let flat = format_expr(expr);
        let current_line_len = self.current_line_len();
        if current_line_len + flat.len() <= MAX_WIDTH {
            self.output.push_str(&flat);
        } else if let Expr::Call { path, args } = expr {
            if args.is_empty() {
                self.output.push_str(&flat);
            } else {
                let arg_indent = format!("{}{}", indent, INDENT);
                self.output.push_str(&path.node);
                self.output.push_str("(\n");
                for (i, arg) in args.iter().enumerate() {
                    self.output.push_str(&arg_indent);
                    self.output.push_str(&format_expr(&arg.node));
                    if i + 1 < args.len() {
                        self.output.push(',');
                    }
                    self.output.push('\n');
                }
                self.output.push_str(indent);
                self.output.push(')');
            }
        } else {
            self.output.push_str(&flat);
        }
    }

    pub(super) fn current_line_len(&self) -> usize {
        match self.output.rfind('\n') {
            Some(pos) => self.output.len() - pos - 1,
            None => self.output.len(),
        }
    }
}

pub(super) fn format_modifiers(modifiers: &[Modifier]) -> String {
    let mut out = String::new();
    for m in modifiers {
        out.push_str(m.as_str());
        out.push(' ');
    }
    out
}
