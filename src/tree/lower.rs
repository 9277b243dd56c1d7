//! Owned AST -> arena tree.

use crate::ast::*;
use crate::span::{Span, Spanned};

use super::{ExprKind, NodeId, NodeKind, StmtKind, Tree};

/// Build a tree whose root compilation unit holds `file`'s classes.
pub fn lower(file: &File) -> Tree {
    let mut tree = Tree::new();
    let root = tree.root();
    let classes: Vec<NodeId> = file.classes.iter().map(|c| lower_class(&mut tree, c)).collect();
    for class in classes {
        tree.link(root, class);
    }
    tree
}

fn lower_class(tree: &mut Tree, class: &Spanned<ClassDef>) -> NodeId {
    let c = &class.node;
    let members = c
        .members
        .iter()
        .map(|m| lower_member(tree, m))
        .collect();
    tree.insert(
        NodeKind::Class {
            modifiers: c.modifiers.clone(),
            name: c.name.node.clone(),
        },
        class.span,
        members,
    )
}

fn lower_member(tree: &mut Tree, member: &Spanned<Member>) -> NodeId {
    match &member.node {
        Member::Field(f) => {
            let init = f.init.iter().map(|e| lower_expr(tree, e)).collect();
            tree.insert(
                NodeKind::Field {
                    modifiers: f.modifiers.clone(),
                    ty: f.ty.node.clone(),
                    name: f.name.node.clone(),
                },
                member.span,
                init,
            )
        }
        Member::Method(m) => {
            let body = lower_block(tree, &m.body.node, m.body.span);
            tree.insert(
                NodeKind::Method {
                    modifiers: m.modifiers.clone(),
                    ret: m.ret.node.clone(),
                    name: m.name.node.clone(),
                    params: m.params.clone(),
                },
                member.span,
                vec![body],
            )
        }
    }
}

fn lower_block(tree: &mut Tree, block: &Block, span: Span) -> NodeId {
    let stmts = block.stmts.iter().map(|s| lower_stmt(tree, s)).collect();
    tree.insert(NodeKind::Stmt(StmtKind::Block), span, stmts)
}

fn lower_stmt(tree: &mut Tree, stmt: &Spanned<Stmt>) -> NodeId {
    let (kind, children) = match &stmt.node {
        Stmt::Block(block) => return lower_block(tree, block, stmt.span),
        Stmt::Expr(e) => (StmtKind::Expression, vec![lower_expr(tree, e)]),
        Stmt::LocalVar { ty, name, init } => (
            StmtKind::LocalVar {
                ty: ty.node.clone(),
                name: name.node.clone(),
            },
            init.iter().map(|e| lower_expr(tree, e)).collect(),
        ),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let mut children = vec![lower_expr(tree, cond), lower_stmt(tree, then_branch)];
            if let Some(else_branch) = else_branch {
                children.push(lower_stmt(tree, else_branch));
            }
            (StmtKind::If, children)
        }
        Stmt::While { cond, body } => (
            StmtKind::While,
            vec![lower_expr(tree, cond), lower_stmt(tree, body)],
        ),
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => {
            let mut children = Vec::new();
            if let Some(init) = init {
                children.push(lower_stmt(tree, init));
            }
            if let Some(cond) = cond {
                children.push(lower_expr(tree, cond));
            }
            if let Some(update) = update {
                children.push(lower_expr(tree, update));
            }
            children.push(lower_stmt(tree, body));
            (
                StmtKind::For {
                    init: init.is_some(),
                    cond: cond.is_some(),
                    update: update.is_some(),
                },
                children,
            )
        }
        Stmt::Return(value) => (
            StmtKind::Return,
            value.iter().map(|e| lower_expr(tree, e)).collect(),
        ),
        Stmt::Break => (StmtKind::Break, Vec::new()),
        Stmt::Continue => (StmtKind::Continue, Vec::new()),
        Stmt::Empty => (StmtKind::Empty, Vec::new()),
    };
    tree.insert(NodeKind::Stmt(kind), stmt.span, children)
}

fn lower_expr(tree: &mut Tree, expr: &Spanned<Expr>) -> NodeId {
    let (kind, children) = match &expr.node {
        Expr::Literal(lit) => (ExprKind::Literal(lit.clone()), Vec::new()),
        Expr::Name(name) => (ExprKind::Name(name.clone()), Vec::new()),
        Expr::Infix { op, lhs, rhs } => (
            ExprKind::Infix(*op),
            vec![lower_expr(tree, lhs), lower_expr(tree, rhs)],
        ),
        Expr::Prefix { op, operand } => (ExprKind::Prefix(*op), vec![lower_expr(tree, operand)]),
        Expr::Postfix { op, operand } => {
            (ExprKind::Postfix(*op), vec![lower_expr(tree, operand)])
        }
        Expr::Assign { op, target, value } => (
            ExprKind::Assign(*op),
            vec![lower_expr(tree, target), lower_expr(tree, value)],
        ),
        Expr::Call { path, args } => (
            ExprKind::Call(path.node.clone()),
            args.iter().map(|a| lower_expr(tree, a)).collect(),
        ),
    };
    tree.insert(NodeKind::Expr(kind), expr.span, children)
}
