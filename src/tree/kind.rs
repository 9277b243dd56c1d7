use crate::ast::{AssignOp, InfixOp, Literal, Modifier, Param, PostfixOp, PrefixOp, Type};

/// What a tree node is. Children live on the node, not in the kind; see the
/// layout notes on each variant.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Children: classes.
    CompilationUnit,
    /// Children: fields and methods in declaration order.
    Class {
        modifiers: Vec<Modifier>,
        name: String,
    },
    /// Children: `[init?]`.
    Field {
        modifiers: Vec<Modifier>,
        ty: Type,
        name: String,
    },
    /// Children: `[body]`, always a block.
    Method {
        modifiers: Vec<Modifier>,
        ret: Type,
        name: String,
        params: Vec<Param>,
    },
    Stmt(StmtKind),
    Expr(ExprKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// Children: statements.
    Block,
    /// Children: `[expr]`.
    Expression,
    /// Children: `[init?]`.
    LocalVar { ty: Type, name: String },
    /// Children: `[cond, then, else?]`.
    If,
    /// Children: `[cond, body]`.
    While,
    /// Children: `[init?, cond?, update?, body]`; the flags say which of
    /// the optional parts are present.
    For { init: bool, cond: bool, update: bool },
    /// Children: `[value?]`.
    Return,
    Break,
    Continue,
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Name(String),
    /// Children: `[lhs, rhs]`.
    Infix(InfixOp),
    /// Children: `[operand]`.
    Prefix(PrefixOp),
    /// Children: `[operand]`.
    Postfix(PostfixOp),
    /// Children: `[target, value]`.
    Assign(AssignOp),
    /// Children: arguments.
    Call(String),
}

impl NodeKind {
    pub fn is_block(&self) -> bool {
        matches!(self, NodeKind::Stmt(StmtKind::Block))
    }

    pub fn is_stmt(&self) -> bool {
        matches!(self, NodeKind::Stmt(_))
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, NodeKind::Expr(_))
    }

    pub fn literal(&self) -> Option<&Literal> {
        match self {
            NodeKind::Expr(ExprKind::Literal(lit)) => Some(lit),
            _ => None,
        }
    }

    /// Short lowercase tag used by `Tree::dump` and in log output.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit => "unit",
            NodeKind::Class { .. } => "class",
            NodeKind::Field { .. } => "field",
            NodeKind::Method { .. } => "method",
            NodeKind::Stmt(s) => match s {
                StmtKind::Block => "block",
                StmtKind::Expression => "expr-stmt",
                StmtKind::LocalVar { .. } => "local",
                StmtKind::If => "if",
                StmtKind::While => "while",
                StmtKind::For { .. } => "for",
                StmtKind::Return => "return",
                StmtKind::Break => "break",
                StmtKind::Continue => "continue",
                StmtKind::Empty => "empty",
            },
            NodeKind::Expr(e) => match e {
                ExprKind::Literal(_) => "literal",
                ExprKind::Name(_) => "name",
                ExprKind::Infix(_) => "infix",
                ExprKind::Prefix(_) => "prefix",
                ExprKind::Postfix(_) => "postfix",
                ExprKind::Assign(_) => "assign",
                ExprKind::Call(_) => "call",
            },
        }
    }
}
