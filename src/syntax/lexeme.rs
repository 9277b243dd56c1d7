/// All lexemes of the supported Java subset.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    Class,
    Public,
    Private,
    Protected,
    Static,
    Final,
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,
    True,
    False,
    Null,

    // Primitive type keywords
    IntTy,
    BooleanTy,
    VoidTy,

    // Symbols
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .
    Eq,        // =
    EqEq,      // ==
    Bang,      // !
    BangEq,    // !=
    Lt,        // <
    Le,        // <=
    Gt,        // >
    Ge,        // >=
    Shl,       // <<
    Shr,       // >>
    UShr,      // >>>
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    Amp,       // &
    AmpAmp,    // &&
    Pipe,      // |
    PipePipe,  // ||
    Caret,     // ^
    Tilde,     // ~
    PlusPlus,  // ++
    MinusMinus, // --
    /// Compound assignment such as `+=`; carries the operator text without `=`.
    OpAssign(&'static str),

    // Literals
    Integer(u64),
    Str(String),
    Ident(String),

    // End of file
    Eof,
}

impl Lexeme {
    /// Try to match an identifier string to a keyword or type lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "class" => Some(Lexeme::Class),
            "public" => Some(Lexeme::Public),
            "private" => Some(Lexeme::Private),
            "protected" => Some(Lexeme::Protected),
            "static" => Some(Lexeme::Static),
            "final" => Some(Lexeme::Final),
            "if" => Some(Lexeme::If),
            "else" => Some(Lexeme::Else),
            "while" => Some(Lexeme::While),
            "for" => Some(Lexeme::For),
            "return" => Some(Lexeme::Return),
            "break" => Some(Lexeme::Break),
            "continue" => Some(Lexeme::Continue),
            "true" => Some(Lexeme::True),
            "false" => Some(Lexeme::False),
            "null" => Some(Lexeme::Null),
            "int" => Some(Lexeme::IntTy),
            "boolean" => Some(Lexeme::BooleanTy),
            "void" => Some(Lexeme::VoidTy),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Lexeme::Class => "'class'",
            Lexeme::Public => "'public'",
            Lexeme::Private => "'private'",
            Lexeme::Protected => "'protected'",
            Lexeme::Static => "'static'",
            Lexeme::Final => "'final'",
            Lexeme::If => "'if'",
            Lexeme::Else => "'else'",
            Lexeme::While => "'while'",
            Lexeme::For => "'for'",
            Lexeme::Return => "'return'",
            Lexeme::Break => "'break'",
            Lexeme::Continue => "'continue'",
            Lexeme::True => "'true'",
            Lexeme::False => "'false'",
            Lexeme::Null => "'null'",
            Lexeme::IntTy => "'int'",
            Lexeme::BooleanTy => "'boolean'",
            Lexeme::VoidTy => "'void'",
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::LBrace => "'{'",
            Lexeme::RBrace => "'}'",
            Lexeme::Comma => "','",
            Lexeme::Semicolon => "';'",
            Lexeme::Dot => "'.'",
            Lexeme::Eq => "'='",
            Lexeme::EqEq => "'=='",
            Lexeme::Bang => "'!'",
            Lexeme::BangEq => "'!='",
            Lexeme::Lt => "'<'",
            Lexeme::Le => "'<='",
            Lexeme::Gt => "'>'",
            Lexeme::Ge => "'>='",
            Lexeme::Shl => "'<<'",
            Lexeme::Shr => "'>>'",
            Lexeme::UShr => "'>>>'",
            Lexeme::Plus => "'+'",
            Lexeme::Minus => "'-'",
            Lexeme::Star => "'*'",
            Lexeme::Slash => "'/'",
            Lexeme::Percent => "'%'",
            Lexeme::Amp => "'&'",
            Lexeme::AmpAmp => "'&&'",
            Lexeme::Pipe => "'|'",
            Lexeme::PipePipe => "'||'",
            Lexeme::Caret => "'^'",
            Lexeme::Tilde => "'~'",
            Lexeme::PlusPlus => "'++'",
            Lexeme::MinusMinus => "'--'",
            Lexeme::OpAssign(_) => "compound assignment",
            Lexeme::Integer(_) => "integer literal",
            Lexeme::Str(_) => "string literal",
            Lexeme::Ident(_) => "identifier",
            Lexeme::Eof => "end of file",
        }
    }
}
