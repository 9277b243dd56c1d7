use std::fmt::Write;

use super::{ExprKind, NodeId, NodeKind, StmtKind, Tree};

impl Tree {
    /// Render the subtree at `id` as an S-expression, one node per line
    /// below the top level:
    ///
    /// ```text
    /// (block
    ///   (expr-stmt
    ///     (assign = (name x) (literal 1))))
    /// ```
    ///
    /// Expressions stay on one line. A stale id renders as `<stale>`.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else {
            out.push_str("<stale>");
            return;
        };
        out.push('(');
        out.push_str(node.kind.tag());
        if let Some(label) = label(&node.kind) {
            out.push(' ');
            out.push_str(&label);
        }
        for &child in &node.children {
            if node.kind.is_expr() {
                out.push(' ');
            } else {
                out.push('\n');
                for _ in 0..=depth {
                    out.push_str("  ");
                }
            }
            self.dump_into(child, depth + 1, out);
        }
        out.push(')');
    }
}

fn label(kind: &NodeKind) -> Option<String> {
    let text = match kind {
        NodeKind::CompilationUnit => return None,
        NodeKind::Class { name, .. } => name.clone(),
        NodeKind::Field { ty, name, .. } => format!("{} {}", ty, name),
        NodeKind::Method {
            ret, name, params, ..
        } => {
            let mut s = format!("{} {}(", ret, name);
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    s.push_str(", ");
                }
                let _ = write!(s, "{} {}", p.ty, p.name);
            }
            s.push(')');
            s
        }
        NodeKind::Stmt(StmtKind::LocalVar { ty, name }) => format!("{} {}", ty, name),
        NodeKind::Stmt(StmtKind::For { init, cond, update }) => {
            let flag = |b: bool, c: char| if b { c } else { '_' };
            format!("{}{}{}", flag(*init, 'i'), flag(*cond, 'c'), flag(*update, 'u'))
        }
        NodeKind::Stmt(_) => return None,
        NodeKind::Expr(e) => match e {
            ExprKind::Literal(lit) => lit.to_string(),
            ExprKind::Name(name) => name.clone(),
            ExprKind::Infix(op) => op.as_str().to_string(),
            ExprKind::Prefix(op) => op.as_str().to_string(),
            ExprKind::Postfix(op) => op.as_str().to_string(),
            ExprKind::Assign(op) => op.as_str().to_string(),
            ExprKind::Call(path) => path.clone(),
        },
    };
    Some(text)
}
