use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};
use crate::syntax::lexeme::Lexeme;

/// A source comment preserved for the formatter.
#[derive(Clone, Debug)]
pub struct Comment {
    pub text: String, // includes the "//" or "/*" delimiters
    pub span: Span,
    pub trailing: bool, // true if a token appeared earlier on the same line
    /// Byte offset where the comment's line begins.
    pub line_start: u32,
}

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    comments: Vec<Comment>,
    /// Whether we've seen a non-whitespace token on the current line.
    token_on_line: bool,
    line_start: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
            comments: Vec::new(),
            token_on_line: false,
            line_start: 0,
        }
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Comment>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.comments, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            self.token_on_line = true;

            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit() {
                return self.scan_number();
            }

            if ch == b'"' {
                return self.scan_string();
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                if self.source[self.pos] == b'\n' {
                    self.token_on_line = false;
                    self.line_start = self.pos + 1;
                }
                self.pos += 1;
            }

            if self.starts_with(b"//") {
                let start = self.pos;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                self.push_comment(start);
                continue;
            }

            if self.starts_with(b"/*") {
                let start = self.pos;
                self.pos += 2;
                while self.pos < self.source.len() && !self.starts_with(b"*/") {
                    self.pos += 1;
                }
                if self.pos >= self.source.len() {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated block comment".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("close the comment with `*/`".to_string()),
                    );
                } else {
                    self.pos += 2;
                }
                self.push_comment(start);
                continue;
            }

            break;
        }
    }

    fn push_comment(&mut self, start: usize) {
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        self.comments.push(Comment {
            text,
            span: Span::new(start as u32, self.pos as u32),
            trailing: self.token_on_line,
            line_start: self.line_start as u32,
        });
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        let token = Lexeme::from_keyword(&text).unwrap_or_else(|| Lexeme::Ident(text.into_owned()));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        match text.parse::<u64>() {
            Ok(n) => self.make_token(Lexeme::Integer(n), start, self.pos),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("integer literal '{}' is too large", text),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(format!("the largest int literal is {}", i32::MAX)),
                );
                self.make_token(Lexeme::Integer(0), start, self.pos)
            }
        }
    }

    fn scan_string(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated string literal".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("string literals must close on the same line".to_string()),
                    );
                    break;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    let escaped = match self.peek() {
                        Some(b'n') => Some(b'\n'),
                        Some(b't') => Some(b'\t'),
                        Some(b'r') => Some(b'\r'),
                        Some(b'0') => Some(b'\0'),
                        Some(b'"') => Some(b'"'),
                        Some(b'\'') => Some(b'\''),
                        Some(b'\\') => Some(b'\\'),
                        _ => None,
                    };
                    match escaped {
                        Some(b) => {
                            bytes.push(b);
                            self.pos += 1;
                        }
                        None => {
                            self.diagnostics.push(Diagnostic::error(
                                "unknown escape sequence".to_string(),
                                Span::new(escape_start as u32, (self.pos + 1) as u32),
                            ));
                            if self.peek().is_some() {
                                self.pos += 1;
                            }
                        }
                    }
                }
                Some(b) => {
                    bytes.push(b);
                    self.pos += 1;
                }
            }
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.make_token(Lexeme::Str(text), start, self.pos)
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b',' => Lexeme::Comma,
            b';' => Lexeme::Semicolon,
            b'.' => Lexeme::Dot,
            b'~' => Lexeme::Tilde,
            b'=' => self.pick(&[("=", Lexeme::EqEq)], Lexeme::Eq),
            b'!' => self.pick(&[("=", Lexeme::BangEq)], Lexeme::Bang),
            b'<' => self.pick(
                &[
                    ("<=", Lexeme::OpAssign("<<")),
                    ("<", Lexeme::Shl),
                    ("=", Lexeme::Le),
                ],
                Lexeme::Lt,
            ),
            b'>' => self.pick(
                &[
                    (">>=", Lexeme::OpAssign(">>>")),
                    (">>", Lexeme::UShr),
                    (">=", Lexeme::OpAssign(">>")),
                    (">", Lexeme::Shr),
                    ("=", Lexeme::Ge),
                ],
                Lexeme::Gt,
            ),
            b'+' => self.pick(
                &[("+", Lexeme::PlusPlus), ("=", Lexeme::OpAssign("+"))],
                Lexeme::Plus,
            ),
            b'-' => self.pick(
                &[("-", Lexeme::MinusMinus), ("=", Lexeme::OpAssign("-"))],
                Lexeme::Minus,
            ),
            b'*' => self.pick(&[("=", Lexeme::OpAssign("*"))], Lexeme::Star),
            b'/' => self.pick(&[("=", Lexeme::OpAssign("/"))], Lexeme::Slash),
            b'%' => self.pick(&[("=", Lexeme::OpAssign("%"))], Lexeme::Percent),
            b'^' => self.pick(&[("=", Lexeme::OpAssign("^"))], Lexeme::Caret),
            b'&' => self.pick(
                &[("&", Lexeme::AmpAmp), ("=", Lexeme::OpAssign("&"))],
                Lexeme::Amp,
            ),
            b'|' => self.pick(
                &[("|", Lexeme::PipePipe), ("=", Lexeme::OpAssign("|"))],
                Lexeme::Pipe,
            ),
            _ => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}' (U+{:04X})", ch as char, ch),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("this character is not part of the supported Java subset".to_string()),
                );
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    /// Longest-match helper: the first suffix found right after the already
    /// consumed character wins, so candidates must be listed longest first.
    fn pick(&mut self, candidates: &[(&str, Lexeme)], fallback: Lexeme) -> Lexeme {
        for (suffix, lexeme) in candidates {
            if self.starts_with(suffix.as_bytes()) {
                self.pos += suffix.len();
                return lexeme.clone();
            }
        }
        fallback
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$'
}
