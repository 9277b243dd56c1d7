use crate::span::Spanned;

/// A parsed compilation unit: a sequence of class declarations.
#[derive(Clone, Debug)]
pub struct File {
    pub classes: Vec<Spanned<ClassDef>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Static,
    Final,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassDef {
    pub modifiers: Vec<Modifier>,
    pub name: Spanned<String>,
    pub members: Vec<Spanned<Member>>,
}

#[derive(Clone, Debug)]
pub enum Member {
    Field(FieldDef),
    Method(MethodDef),
}

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub modifiers: Vec<Modifier>,
    pub ty: Spanned<Type>,
    pub name: Spanned<String>,
    pub init: Option<Spanned<Expr>>,
}

#[derive(Clone, Debug)]
pub struct MethodDef {
    pub modifiers: Vec<Modifier>,
    pub ret: Spanned<Type>,
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    pub body: Spanned<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub ty: Type,
    pub name: String,
}

/// Syntactic types (as written in source).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Int,
    Boolean,
    Void,
    /// A class type such as `String` or `java.util.List`.
    Named(String),
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
            Type::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A brace-delimited statement sequence.
#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// Statements.
#[derive(Clone, Debug)]
pub enum Stmt {
    Block(Block),
    Expr(Spanned<Expr>),
    LocalVar {
        ty: Spanned<Type>,
        name: Spanned<String>,
        init: Option<Spanned<Expr>>,
    },
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    For {
        /// Either a `LocalVar` or an `Expr` statement.
        init: Option<Box<Spanned<Stmt>>>,
        cond: Option<Spanned<Expr>>,
        update: Option<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    Return(Option<Spanned<Expr>>),
    Break,
    Continue,
    Empty,
}

/// Expressions.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Literal),
    /// A variable or field reference, possibly dotted (`System.out`).
    Name(String),
    Infix {
        op: InfixOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Prefix {
        op: PrefixOp,
        operand: Box<Spanned<Expr>>,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Call {
        path: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i32),
    Bool(bool),
    Str(String),
    Null,
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => {
                write!(f, "\"")?;
                for ch in s.chars() {
                    match ch {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        '\r' => write!(f, "\\r")?,
                        '\0' => write!(f, "\\0")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
            Literal::Null => write!(f, "null"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Mul,    // *
    Div,    // /
    Rem,    // %
    Add,    // +
    Sub,    // -
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    Eq,     // ==
    Ne,     // !=
    BitAnd, // &
    BitXor, // ^
    BitOr,  // |
    And,    // &&
    Or,     // ||
}

impl InfixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Rem => "%",
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Shl => "<<",
            InfixOp::Shr => ">>",
            InfixOp::UShr => ">>>",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::BitAnd => "&",
            InfixOp::BitXor => "^",
            InfixOp::BitOr => "|",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        }
    }

    /// `&&` and `||` skip their right operand depending on the left.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, InfixOp::And | InfixOp::Or)
    }

    /// Java precedence level; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            InfixOp::Or => 1,
            InfixOp::And => 2,
            InfixOp::BitOr => 3,
            InfixOp::BitXor => 4,
            InfixOp::BitAnd => 5,
            InfixOp::Eq | InfixOp::Ne => 6,
            InfixOp::Lt | InfixOp::Le | InfixOp::Gt | InfixOp::Ge => 7,
            InfixOp::Shl | InfixOp::Shr | InfixOp::UShr => 8,
            InfixOp::Add | InfixOp::Sub => 9,
            InfixOp::Mul | InfixOp::Div | InfixOp::Rem => 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Neg,    // -
    Not,    // !
    BitNot, // ~
    Inc,    // ++
    Dec,    // --
}

impl PrefixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
            PrefixOp::Inc => "++",
            PrefixOp::Dec => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Inc, // ++
    Dec, // --
}

impl PostfixOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    /// Compound assignment `op=`.
    Compound(InfixOp),
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Compound(InfixOp::Add) => "+=",
            AssignOp::Compound(InfixOp::Sub) => "-=",
            AssignOp::Compound(InfixOp::Mul) => "*=",
            AssignOp::Compound(InfixOp::Div) => "/=",
            AssignOp::Compound(InfixOp::Rem) => "%=",
            AssignOp::Compound(InfixOp::BitAnd) => "&=",
            AssignOp::Compound(InfixOp::BitOr) => "|=",
            AssignOp::Compound(InfixOp::BitXor) => "^=",
            AssignOp::Compound(InfixOp::Shl) => "<<=",
            AssignOp::Compound(InfixOp::Shr) => ">>=",
            AssignOp::Compound(InfixOp::UShr) => ">>>=",
            // The parser never builds other compound forms.
            AssignOp::Compound(_) => "=",
        }
    }
}
