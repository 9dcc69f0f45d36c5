use std::rc::Rc;

use crate::ast::{Expr, FunctionDecl, Stmt};
use crate::lexer::{Token, TokenKind};
use crate::value::{ErrorCode, RuntimeError, Value};

/// Recursive-descent parser over the token stream. Fails fast on the first
/// syntax error; the REPL uses the parse error code to decide whether the
/// input merely needs another line.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: usize,
}

impl Parser {
    /// `start_id` seeds the node-id counter so that ids stay unique across
    /// multiple `run` calls on one interpreter (the REPL case) — resolver
    /// bindings from earlier inputs must not be shadowed by id reuse.
    pub(crate) fn new(tokens: Vec<Token>, start_id: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            next_id: start_id,
        }
    }

    pub(crate) fn next_id(&self) -> usize {
        self.next_id
    }

    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, RuntimeError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(RuntimeError::with_location(
                message,
                ErrorCode::ParseExpected,
                self.peek().line,
                None,
            ))
        }
    }

    fn expect_ident(&mut self, message: &str) -> Result<(String, usize), RuntimeError> {
        let line = self.peek().line;
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                Ok((name, line))
            }
            _ => Err(RuntimeError::with_location(
                message,
                ErrorCode::ParseExpected,
                line,
                None,
            )),
        }
    }

    pub(crate) fn parse(&mut self) -> Result<Vec<Stmt>, RuntimeError> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Eof) {
            stmts.push(self.declaration()?);
        }
        Ok(stmts)
    }

    fn declaration(&mut self) -> Result<Stmt, RuntimeError> {
        match self.peek().kind {
            TokenKind::Class => self.class_decl(),
            TokenKind::Trait => self.trait_decl(),
            TokenKind::Fun => {
                self.advance();
                Ok(Stmt::FunDecl(self.function("function")?))
            }
            TokenKind::Var => self.var_decl(),
            _ => self.statement(),
        }
    }

    fn var_decl(&mut self) -> Result<Stmt, RuntimeError> {
        self.advance(); // var
        let (name, line) = self.expect_ident("Expected variable name after 'var'.")?;
        let init = if self.matches(&TokenKind::Eq) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(
            TokenKind::Semicolon,
            "Expected ';' after variable declaration.",
        )?;
        Ok(Stmt::VarDecl { name, init, line })
    }

    /// Parse the with-clause of a class or trait declaration: a non-empty,
    /// comma-separated list of trait references (ordinary variable
    /// expressions, so a trait held in a variable works too).
    fn with_clause(&mut self) -> Result<Vec<Expr>, RuntimeError> {
        let mut traits = Vec::new();
        if self.matches(&TokenKind::With) {
            loop {
                let (name, line) = self.expect_ident("Expected trait name after 'with'.")?;
                let id = self.fresh_id();
                traits.push(Expr::Var { name, id, line });
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        Ok(traits)
    }

    fn class_decl(&mut self) -> Result<Stmt, RuntimeError> {
        self.advance(); // class
        let (name, line) = self.expect_ident("Expected class name after 'class'.")?;
        let superclass = if self.matches(&TokenKind::Lt) {
            let (super_name, super_line) = self.expect_ident("Expected superclass name after '<'.")?;
            let id = self.fresh_id();
            Some(Expr::Var {
                name: super_name,
                id,
                line: super_line,
            })
        } else {
            None
        };
        let traits = self.with_clause()?;
        self.expect(TokenKind::LBrace, "Expected '{' before class body.")?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            methods.push(self.function("method")?);
        }
        self.expect(TokenKind::RBrace, "Expected '}' after class body.")?;
        Ok(Stmt::ClassDecl {
            name,
            superclass,
            traits,
            methods,
            line,
        })
    }

    fn trait_decl(&mut self) -> Result<Stmt, RuntimeError> {
        self.advance(); // trait
        let (name, line) = self.expect_ident("Expected trait name after 'trait'.")?;
        let traits = self.with_clause()?;
        self.expect(TokenKind::LBrace, "Expected '{' before trait body.")?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            methods.push(self.function("method")?);
        }
        self.expect(TokenKind::RBrace, "Expected '}' after trait body.")?;
        Ok(Stmt::TraitDecl {
            name,
            traits,
            methods,
            line,
        })
    }

    fn function(&mut self, kind: &str) -> Result<FunctionDecl, RuntimeError> {
        let (name, line) = self.expect_ident(&format!("Expected {} name.", kind))?;
        self.expect(
            TokenKind::LParen,
            &format!("Expected '(' after {} name.", kind),
        )?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let (param, _) = self.expect_ident("Expected parameter name.")?;
                params.push(param);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' after parameters.")?;
        let body = self.block()?;
        Ok(FunctionDecl {
            name,
            params,
            body: Rc::new(body),
            line,
        })
    }

    fn statement(&mut self) -> Result<Stmt, RuntimeError> {
        match self.peek().kind {
            TokenKind::Print => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::Semicolon, "Expected ';' after print value.")?;
                Ok(Stmt::Print(expr))
            }
            TokenKind::Return => {
                let line = self.advance().line;
                let expr = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.expect(TokenKind::Semicolon, "Expected ';' after return value.")?;
                Ok(Stmt::Return { expr, line })
            }
            TokenKind::If => self.if_stmt(),
            TokenKind::While => {
                self.advance();
                let cond = self.expression()?;
                let body = self.block()?;
                Ok(Stmt::While { cond, body })
            }
            TokenKind::LBrace => Ok(Stmt::Block(self.block()?)),
            _ => {
                let expr = self.expression()?;
                self.expect(TokenKind::Semicolon, "Expected ';' after expression.")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn if_stmt(&mut self) -> Result<Stmt, RuntimeError> {
        self.advance(); // if
        let cond = self.expression()?;
        let then_branch = self.block()?;
        let else_branch = if self.matches(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                vec![self.if_stmt()?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, RuntimeError> {
        self.expect(TokenKind::LBrace, "Expected '{' before block.")?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            stmts.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "Expected '}' after block.")?;
        Ok(stmts)
    }

    fn expression(&mut self) -> Result<Expr, RuntimeError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, RuntimeError> {
        let expr = self.or_expr()?;
        if self.check(&TokenKind::Eq) {
            let eq_line = self.advance().line;
            let value = self.assignment()?;
            return match expr {
                Expr::Var { name, id, line } => Ok(Expr::Assign {
                    name,
                    id,
                    expr: Box::new(value),
                    line,
                }),
                Expr::Get { target, name, line } => Ok(Expr::Set {
                    target,
                    name,
                    value: Box::new(value),
                    line,
                }),
                _ => Err(RuntimeError::with_location(
                    "Invalid assignment target.",
                    ErrorCode::ParseGeneric,
                    eq_line,
                    None,
                )
                .with_hint("only variables and object properties can be assigned.")),
            };
        }
        Ok(expr)
    }

    fn or_expr(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.and_expr()?;
        while self.check(&TokenKind::Or) {
            let op = self.advance().kind;
            let right = self.and_expr()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.equality()?;
        while self.check(&TokenKind::And) {
            let op = self.advance().kind;
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.comparison()?;
        while self.check(&TokenKind::EqEq) || self.check(&TokenKind::BangEq) {
            let token = self.advance();
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: token.kind,
                right: Box::new(right),
                line: token.line,
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.term()?;
        while self.check(&TokenKind::Lt)
            || self.check(&TokenKind::Lte)
            || self.check(&TokenKind::Gt)
            || self.check(&TokenKind::Gte)
        {
            let token = self.advance();
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: token.kind,
                right: Box::new(right),
                line: token.line,
            };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.factor()?;
        while self.check(&TokenKind::Plus) || self.check(&TokenKind::Minus) {
            let token = self.advance();
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: token.kind,
                right: Box::new(right),
                line: token.line,
            };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.unary()?;
        while self.check(&TokenKind::Star) || self.check(&TokenKind::Slash) {
            let token = self.advance();
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: token.kind,
                right: Box::new(right),
                line: token.line,
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, RuntimeError> {
        if self.check(&TokenKind::Bang) || self.check(&TokenKind::Minus) {
            let token = self.advance();
            let expr = self.unary()?;
            return Ok(Expr::Unary {
                op: token.kind,
                expr: Box::new(expr),
                line: token.line,
            });
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr, RuntimeError> {
        let mut expr = self.primary()?;
        loop {
            if self.check(&TokenKind::LParen) {
                let line = self.advance().line;
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.expression()?);
                        if !self.matches(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen, "Expected ')' after arguments.")?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    line,
                };
            } else if self.check(&TokenKind::Dot) {
                let line = self.advance().line;
                let (name, _) = self.expect_ident("Expected property name after '.'.")?;
                expr = Expr::Get {
                    target: Box::new(expr),
                    name,
                    line,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, RuntimeError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Num(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Nil => Ok(Expr::Literal(Value::Nil)),
            TokenKind::Ident(name) => {
                let id = self.fresh_id();
                Ok(Expr::Var {
                    name,
                    id,
                    line: token.line,
                })
            }
            TokenKind::This => {
                let id = self.fresh_id();
                Ok(Expr::This {
                    id,
                    line: token.line,
                })
            }
            TokenKind::Super => {
                self.expect(TokenKind::Dot, "Expected '.' after 'super'.")?;
                let (method, _) = self.expect_ident("Expected superclass method name.")?;
                let id = self.fresh_id();
                Ok(Expr::Super {
                    method,
                    id,
                    line: token.line,
                })
            }
            TokenKind::LParen => {
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "Expected ')' after expression.")?;
                Ok(expr)
            }
            _ => Err(RuntimeError::with_location(
                "Expected expression.",
                ErrorCode::ParseExpected,
                token.line,
                None,
            )),
        }
    }
}
