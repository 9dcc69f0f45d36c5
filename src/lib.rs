mod ast;
mod interpreter;
mod lexer;
mod parser;
pub mod repl;
mod resolver;
mod runtime;
mod value;

pub use runtime::Interpreter;
pub use value::{ErrorCode, RuntimeError, Value};

/// Parse a program and return a debug rendering of its AST.
pub fn dump_ast(input: &str) -> Result<String, RuntimeError> {
    let tokens = lexer::Lexer::new(input).tokenize()?;
    let stmts = parser::Parser::new(tokens, 0).parse()?;
    Ok(format!("{:#?}", stmts))
}
