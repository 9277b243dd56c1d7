//! Java-subset front end: lexer, parser and source printer.

pub mod format;
pub mod lexeme;
pub mod lexer;
pub mod parser;
