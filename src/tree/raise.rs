//! Arena tree -> owned AST, for printing.

use crate::ast::*;
use crate::error::RewriteError;
use crate::span::Spanned;

use super::{ExprKind, NodeId, NodeKind, StmtKind, Tree};

/// Rebuild an owned AST from the tree rooted at `tree.root()`.
///
/// Fails with [`RewriteError::MalformedNode`] when a node's children do not
/// match its kind's layout.
pub fn raise(tree: &Tree) -> Result<File, RewriteError> {
    let root = tree.root();
    let classes = tree
        .children(root)
        .iter()
        .map(|&c| raise_class(tree, c))
        .collect::<Result<_, _>>()?;
    Ok(File { classes })
}

fn malformed(node: NodeId, expected: &'static str) -> RewriteError {
    RewriteError::MalformedNode { node, expected }
}

fn raise_class(tree: &Tree, id: NodeId) -> Result<Spanned<ClassDef>, RewriteError> {
    let NodeKind::Class { modifiers, name } = tree.kind(id) else {
        return Err(malformed(id, "a class"));
    };
    let members = tree
        .children(id)
        .iter()
        .map(|&m| raise_member(tree, m))
        .collect::<Result<_, _>>()?;
    Ok(Spanned::new(
        ClassDef {
            modifiers: modifiers.clone(),
            name: Spanned::dummy(name.clone()),
            members,
        },
        tree.span(id),
    ))
}

fn raise_member(tree: &Tree, id: NodeId) -> Result<Spanned<Member>, RewriteError> {
    let children = tree.children(id);
    let member = match tree.kind(id) {
        NodeKind::Field {
            modifiers,
            ty,
            name,
        } => {
            let init = match children {
                [] => None,
                [init] => Some(raise_expr(tree, *init)?),
                _ => return Err(malformed(id, "at most one initializer")),
            };
            Member::Field(FieldDef {
                modifiers: modifiers.clone(),
                ty: Spanned::dummy(ty.clone()),
                name: Spanned::dummy(name.clone()),
                init,
            })
        }
        NodeKind::Method {
            modifiers,
            ret,
            name,
            params,
        } => {
            let [body] = children else {
                return Err(malformed(id, "exactly one body block"));
            };
            Member::Method(MethodDef {
                modifiers: modifiers.clone(),
                ret: Spanned::dummy(ret.clone()),
                name: Spanned::dummy(name.clone()),
                params: params.clone(),
                body: Spanned::new(raise_block(tree, *body)?, tree.span(*body)),
            })
        }
        _ => return Err(malformed(id, "a field or method")),
    };
    Ok(Spanned::new(member, tree.span(id)))
}

fn raise_block(tree: &Tree, id: NodeId) -> Result<Block, RewriteError> {
    if !tree.kind(id).is_block() {
        return Err(malformed(id, "a block"));
    }
    let stmts = tree
        .children(id)
        .iter()
        .map(|&s| raise_stmt(tree, s))
        .collect::<Result<_, _>>()?;
    Ok(Block { stmts })
}

fn boxed(tree: &Tree, id: NodeId) -> Result<Box<Spanned<Stmt>>, RewriteError> {
    raise_stmt(tree, id).map(Box::new)
}

fn raise_stmt(tree: &Tree, id: NodeId) -> Result<Spanned<Stmt>, RewriteError> {
    let NodeKind::Stmt(kind) = tree.kind(id) else {
        return Err(malformed(id, "a statement"));
    };
    let children = tree.children(id);
    let stmt = match (kind, children) {
        (StmtKind::Block, _) => Stmt::Block(raise_block(tree, id)?),
        (StmtKind::Expression, [e]) => Stmt::Expr(raise_expr(tree, *e)?),
        (StmtKind::LocalVar { ty, name }, [] | [_]) => Stmt::LocalVar {
            ty: Spanned::dummy(ty.clone()),
            name: Spanned::dummy(name.clone()),
            init: match children.first() {
                Some(&init) => Some(raise_expr(tree, init)?),
                None => None,
            },
        },
        (StmtKind::If, [cond, then_branch, rest @ ..]) if rest.len() <= 1 => Stmt::If {
            cond: raise_expr(tree, *cond)?,
            then_branch: boxed(tree, *then_branch)?,
            else_branch: match rest.first() {
                Some(&e) => Some(boxed(tree, e)?),
                None => None,
            },
        },
        (StmtKind::While, [cond, body]) => Stmt::While {
            cond: raise_expr(tree, *cond)?,
            body: boxed(tree, *body)?,
        },
        (StmtKind::For { init, cond, update }, _) => {
            let expected = 1 + *init as usize + *cond as usize + *update as usize;
            if children.len() != expected {
                return Err(malformed(id, "for children matching its flags"));
            }
            let mut parts = children.iter().copied();
            let mut next = |present: bool| if present { parts.next() } else { None };
            let init = next(*init);
            let cond = next(*cond);
            let update = next(*update);
            let body = next(true);
            Stmt::For {
                init: init.map(|i| boxed(tree, i)).transpose()?,
                cond: cond.map(|c| raise_expr(tree, c)).transpose()?,
                update: update.map(|u| raise_expr(tree, u)).transpose()?,
                body: match body {
                    Some(b) => boxed(tree, b)?,
                    None => return Err(malformed(id, "a for body")),
                },
            }
        }
        (StmtKind::Return, [] | [_]) => Stmt::Return(match children.first() {
            Some(&v) => Some(raise_expr(tree, v)?),
            None => None,
        }),
        (StmtKind::Break, []) => Stmt::Break,
        (StmtKind::Continue, []) => Stmt::Continue,
        (StmtKind::Empty, []) => Stmt::Empty,
        _ => return Err(malformed(id, "children matching the statement kind")),
    };
    Ok(Spanned::new(stmt, tree.span(id)))
}

fn raise_expr(tree: &Tree, id: NodeId) -> Result<Spanned<Expr>, RewriteError> {
    let NodeKind::Expr(kind) = tree.kind(id) else {
        return Err(malformed(id, "an expression"));
    };
    let sub = |child: NodeId| raise_expr(tree, child).map(Box::new);
    let expr = match (kind, tree.children(id)) {
        (ExprKind::Literal(lit), []) => Expr::Literal(lit.clone()),
        (ExprKind::Name(name), []) => Expr::Name(name.clone()),
        (ExprKind::Infix(op), [lhs, rhs]) => Expr::Infix {
            op: *op,
            lhs: sub(*lhs)?,
            rhs: sub(*rhs)?,
        },
        (ExprKind::Prefix(op), [operand]) => Expr::Prefix {
            op: *op,
            operand: sub(*operand)?,
        },
        (ExprKind::Postfix(op), [operand]) => Expr::Postfix {
            op: *op,
            operand: sub(*operand)?,
        },
        (ExprKind::Assign(op), [target, value]) => Expr::Assign {
            op: *op,
            target: sub(*target)?,
            value: sub(*value)?,
        },
        (ExprKind::Call(path), args) => Expr::Call {
            path: Spanned::dummy(path.clone()),
            args: args
                .iter()
                .map(|&a| raise_expr(tree, a))
                .collect::<Result<_, _>>()?,
        },
        _ => return Err(malformed(id, "operands matching the expression kind")),
    };
    Ok(Spanned::new(expr, tree.span(id)))
}
