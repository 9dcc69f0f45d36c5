use super::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::value::{ErrorCode, RuntimeError};

impl Interpreter {
    /// Run a program: lex, parse, statically resolve, then execute. Returns
    /// everything the program printed. Static errors are collected by the
    /// resolver and reported together — nothing executes if any exist.
    pub fn run(&mut self, input: &str) -> Result<String, RuntimeError> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser::new(tokens, self.next_node_id);
        let stmts = parser.parse()?;
        self.next_node_id = parser.next_id();

        match Resolver::new().resolve(&stmts) {
            Ok(bindings) => self.bindings.extend(bindings),
            Err(errors) => {
                let message = errors
                    .iter()
                    .map(|e| match e.line {
                        Some(line) => format!("[line {}] {}", line, e.message),
                        None => e.message.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                return Err(RuntimeError {
                    code: Some(ErrorCode::Static),
                    ..RuntimeError::new(message)
                });
            }
        }

        for stmt in &stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(self.output.clone())
    }
}
