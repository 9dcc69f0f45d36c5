use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Expr, Stmt};
use crate::lexer::TokenKind;
use crate::runtime::Interpreter;
use crate::runtime::environment::Environment;
use crate::value::{Function, RuntimeError, Value};

impl Interpreter {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.last_value = Some(value);
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.eval_expr(expr)?;
                let text = format!("{}\n", value.to_string_value());
                self.write_out(&text);
                Ok(())
            }
            Stmt::VarDecl { name, init, .. } => {
                let value = match init {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                self.env.borrow_mut().define(name, value);
                Ok(())
            }
            Stmt::Block(stmts) => {
                let env = Environment::with_enclosing(self.env.clone());
                self.execute_block(stmts, Rc::new(RefCell::new(env)))
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_expr(cond)?.truthy() {
                    then_branch
                } else {
                    else_branch
                };
                let env = Environment::with_enclosing(self.env.clone());
                self.execute_block(branch, Rc::new(RefCell::new(env)))
            }
            Stmt::While { cond, body } => {
                while self.eval_expr(cond)?.truthy() {
                    let env = Environment::with_enclosing(self.env.clone());
                    self.execute_block(body, Rc::new(RefCell::new(env)))?;
                }
                Ok(())
            }
            Stmt::FunDecl(decl) => {
                let function = Function {
                    name: decl.name.clone(),
                    params: decl.params.clone(),
                    body: decl.body.clone(),
                    closure: self.env.clone(),
                    is_initializer: false,
                };
                self.env
                    .borrow_mut()
                    .define(&decl.name, Value::Fn(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { expr, .. } => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Err(RuntimeError::return_signal(value))
            }
            Stmt::ClassDecl {
                name,
                superclass,
                traits,
                methods,
                line,
            } => self.exec_class_decl(name, superclass.as_ref(), traits, methods, *line),
            Stmt::TraitDecl {
                name,
                traits,
                methods,
                line,
            } => self.exec_trait_decl(name, traits, methods, *line),
        }
    }

    /// Run statements inside `env`, restoring the previous scope on every
    /// exit path (including the `return` unwind).
    pub(crate) fn execute_block(
        &mut self,
        stmts: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> Result<(), RuntimeError> {
        let prev = std::mem::replace(&mut self.env, env);
        let mut result = Ok(());
        for stmt in stmts {
            result = self.exec_stmt(stmt);
            if result.is_err() {
                break;
            }
        }
        self.env = prev;
        result
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Var { name, id, line } => self.lookup_variable(name, *id, *line),
            Expr::Assign {
                name,
                id,
                expr,
                line,
            } => {
                let value = self.eval_expr(expr)?;
                match self.bindings.get(id) {
                    Some(&hops) => {
                        Environment::assign_at(&self.env, hops, name, value.clone(), *line)?
                    }
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(name, value.clone(), *line)?,
                }
                Ok(value)
            }
            Expr::Unary { op, expr, line } => {
                let value = self.eval_expr(expr)?;
                match op {
                    TokenKind::Bang => Ok(Value::Bool(!value.truthy())),
                    TokenKind::Minus => match value {
                        Value::Num(n) => Ok(Value::Num(-n)),
                        other => Err(RuntimeError::at_line(
                            format!("Operand must be a number, got {}.", other.type_name()),
                            *line,
                        )),
                    },
                    _ => Err(RuntimeError::at_line("Unknown unary operator.", *line)),
                }
            }
            Expr::Binary {
                left,
                op,
                right,
                line,
            } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                self.eval_binary(lhs, op, rhs, *line)
            }
            Expr::Logical { left, op, right } => {
                let lhs = self.eval_expr(left)?;
                match op {
                    TokenKind::Or if lhs.truthy() => Ok(lhs),
                    TokenKind::And if !lhs.truthy() => Ok(lhs),
                    _ => self.eval_expr(right),
                }
            }
            Expr::Call { callee, args, line } => {
                let callee = self.eval_expr(callee)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_expr(arg)?);
                }
                self.call_value(callee, arg_values, *line)
            }
            Expr::Get { target, name, line } => {
                let target = self.eval_expr(target)?;
                self.eval_get(target, name, *line)
            }
            Expr::Set {
                target,
                name,
                value,
                line,
            } => {
                let target = self.eval_expr(target)?;
                let value = self.eval_expr(value)?;
                self.eval_set(target, name, value, *line)
            }
            Expr::This { id, line } => self.lookup_variable("this", *id, *line),
            Expr::Super { method, id, line } => self.eval_super(method, *id, *line),
        }
    }

    fn eval_binary(
        &mut self,
        lhs: Value,
        op: &TokenKind,
        rhs: Value,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        match op {
            TokenKind::EqEq => return Ok(Value::Bool(lhs == rhs)),
            TokenKind::BangEq => return Ok(Value::Bool(lhs != rhs)),
            TokenKind::Plus => {
                return match (lhs, rhs) {
                    (Value::Num(a), Value::Num(b)) => Ok(Value::Num(a + b)),
                    (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                    (lhs, rhs) => Err(RuntimeError::at_line(
                        format!(
                            "Operands of '+' must be two numbers or two strings, got {} and {}.",
                            lhs.type_name(),
                            rhs.type_name()
                        ),
                        line,
                    )),
                };
            }
            _ => {}
        }
        let (a, b) = match (&lhs, &rhs) {
            (Value::Num(a), Value::Num(b)) => (*a, *b),
            _ => {
                return Err(RuntimeError::at_line(
                    format!(
                        "Operands must be numbers, got {} and {}.",
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                    line,
                ));
            }
        };
        match op {
            TokenKind::Minus => Ok(Value::Num(a - b)),
            TokenKind::Star => Ok(Value::Num(a * b)),
            TokenKind::Slash => Ok(Value::Num(a / b)),
            TokenKind::Lt => Ok(Value::Bool(a < b)),
            TokenKind::Lte => Ok(Value::Bool(a <= b)),
            TokenKind::Gt => Ok(Value::Bool(a > b)),
            TokenKind::Gte => Ok(Value::Bool(a >= b)),
            _ => Err(RuntimeError::at_line("Unknown binary operator.", line)),
        }
    }

    pub(crate) fn lookup_variable(
        &self,
        name: &str,
        id: usize,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        match self.bindings.get(&id) {
            Some(&hops) => Environment::get_at(&self.env, hops, name, line),
            None => self.globals.borrow().get(name, line),
        }
    }

    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::NativeFn(native) => {
                Self::check_arity(native.arity, args.len(), line)?;
                (native.func)(&args)
            }
            Value::Fn(function) => {
                Self::check_arity(function.arity(), args.len(), line)?;
                self.call_function(&function, args)
            }
            Value::Class(class) => self.instantiate(class, args, line),
            Value::Trait(t) => Err(RuntimeError::at_line(
                format!("Trait '{}' is not callable.", t.name),
                line,
            )),
            other => Err(RuntimeError::at_line(
                format!("Can only call functions and classes, got {}.", other.type_name()),
                line,
            )),
        }
    }

    pub(crate) fn check_arity(
        expected: usize,
        got: usize,
        line: usize,
    ) -> Result<(), RuntimeError> {
        if expected == got {
            Ok(())
        } else {
            Err(RuntimeError::at_line(
                format!("Expected {} arguments but got {}.", expected, got),
                line,
            ))
        }
    }

    pub(crate) fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut env = Environment::with_enclosing(function.closure.clone());
        for (param, arg) in function.params.iter().zip(args) {
            env.define(param, arg);
        }
        let result = self.execute_block(&function.body, Rc::new(RefCell::new(env)));
        let returned = match result {
            Ok(()) => Value::Nil,
            Err(mut err) => match err.return_value.take() {
                Some(value) => value,
                None => return Err(err),
            },
        };
        if function.is_initializer {
            // An initializer always evaluates to its receiver; the bound
            // closure's innermost scope holds `this`.
            return Environment::get_at(&function.closure, 0, "this", 0);
        }
        Ok(returned)
    }
}
