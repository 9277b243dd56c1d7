pub mod api;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod error;
pub mod passes;
pub mod span;
pub mod syntax;
pub mod traverse;
pub mod tree;

// Re-exports: short paths for the CLI and integration tests
pub use syntax::format;
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;

// Re-export public API: `astfold::fold_source()` etc.
pub use api::*;
pub use config::Config;
pub use driver::{Driver, RunReport};
pub use error::{Error, RewriteError};
pub use passes::{Pass, PassKind};
pub use tree::{NodeId, Tree};

use diagnostic::{render_diagnostics, Diagnostic};
use lexer::{Comment, Lexer};
use parser::Parser;

/// Parse a source string, rendering any diagnostics to stderr.
pub fn parse_source(source: &str, filename: &str) -> Result<ast::File, Vec<Diagnostic>> {
    match parse_source_silent(source, filename) {
        Ok(file) => Ok(file),
        Err(errors) => {
            render_diagnostics(&errors, filename, source);
            Err(errors)
        }
    }
}

pub fn parse_source_silent(source: &str, _filename: &str) -> Result<ast::File, Vec<Diagnostic>> {
    parse_with_comments(source).map(|(file, _)| file)
}

/// Parse a source string, also returning its comments for the printer.
pub fn parse_with_comments(source: &str) -> Result<(ast::File, Vec<Comment>), Vec<Diagnostic>> {
    let (tokens, comments, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    let file = Parser::new(tokens).parse_file()?;
    Ok((file, comments))
}

/// Reformat Java source, preserving comments.
pub fn format_source(source: &str, _filename: &str) -> Result<String, Vec<Diagnostic>> {
    let (file, comments) = parse_with_comments(source)?;
    Ok(format::format_file(&file, &comments))
}
