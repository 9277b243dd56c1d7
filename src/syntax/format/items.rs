use crate::ast::*;
use crate::span::Spanned;

use super::{format_modifiers, FormatCtx, INDENT};

impl FormatCtx {
    pub(super) fn emit_class(&mut self, class: &Spanned<ClassDef>, indent: &str) {
        self.emit_leading_comments(class.span.start, indent);
        let c = &class.node;
        self.output.push_str(indent);
        self.output.push_str(&format_modifiers(&c.modifiers));
        self.output.push_str("class ");
        self.output.push_str(&c.name.node);
        self.output.push_str(" {\n");

        let inner = format!("{}{}", indent, INDENT);
        let mut prev_was_method = false;
        for (i, member) in c.members.iter().enumerate() {
            let is_method = matches!(member.node, Member::Method(_));
            // Methods are set apart by a blank line; runs of fields are not.
            if i > 0 && (is_method || prev_was_method) {
                self.output.push('\n');
            }
            self.emit_member(member, &inner);
            prev_was_method = is_method;
        }

        self.output.push_str(indent);
        self.output.push_str("}\n");
    }

    fn emit_member(&mut self, member: &Spanned<Member>, indent: &str) {
        self.emit_leading_comments(member.span.start, indent);
        match &member.node {
            Member::Field(f) => {
                self.output.push_str(indent);
                self.output.push_str(&format_modifiers(&f.modifiers));
                self.output.push_str(&f.ty.node.to_string());
                self.output.push(' ');
                self.output.push_str(&f.name.node);
                if let Some(init) = &f.init {
                    self.output.push_str(" = ");
                    self.emit_expr_wrapped(&init.node, indent);
                }
                self.output.push(';');
                self.emit_trailing_comment(member.span.end);
                self.output.push('\n');
            }
            Member::Method(m) => self.emit_method(m, indent),
        }
    }

    fn emit_method(&mut self, m: &MethodDef, indent: &str) {
        self.output.push_str(indent);
        self.output.push_str(&format_modifiers(&m.modifiers));
        self.output.push_str(&m.ret.node.to_string());
        self.output.push(' ');
        self.output.push_str(&m.name.node);
        self.output.push('(');
        let params: Vec<String> = m
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        self.output.push_str(&params.join(", "));
        self.output.push_str(") {\n");
        self.emit_block(&m.body.node, indent);
        self.output.push_str(indent);
        self.output.push_str("}\n");
    }
}
