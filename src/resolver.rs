use std::collections::HashMap;

use crate::ast::{Expr, FunctionDecl, Stmt};
use crate::value::RuntimeError;

/// Node id → number of environment hops to the binding scope. Names that are
/// not in the table resolve dynamically against the globals.
pub(crate) type Bindings = HashMap<usize, usize>;

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
    Trait,
}

/// The pre-execution pass: walks every declaration once, binds each name
/// occurrence to a lexical slot, and validates `this`/`super` legality plus
/// the other purely static rules. Errors are collected rather than
/// fatal-on-first; a program with any static error never executes.
pub(crate) struct Resolver {
    /// Lexical scope stack; `false` marks a name that is declared but whose
    /// initializer has not finished resolving.
    scopes: Vec<HashMap<String, bool>>,
    bindings: Bindings,
    errors: Vec<RuntimeError>,
    current_function: FunctionKind,
    current_class: ClassKind,
}

impl Resolver {
    pub(crate) fn new() -> Self {
        Self {
            scopes: Vec::new(),
            bindings: Bindings::new(),
            errors: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
        }
    }

    pub(crate) fn resolve(mut self, stmts: &[Stmt]) -> Result<Bindings, Vec<RuntimeError>> {
        self.resolve_stmts(stmts);
        if self.errors.is_empty() {
            Ok(self.bindings)
        } else {
            Err(self.errors)
        }
    }

    fn error(&mut self, message: impl Into<String>, line: usize) {
        self.errors.push(RuntimeError::static_error(message, line));
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, line: usize) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name) {
                self.error(
                    format!("Already a variable named '{}' in this scope.", name),
                    line,
                );
                return;
            }
            scope.insert(name.to_string(), false);
        }
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    fn resolve_local(&mut self, id: usize, name: &str) {
        for (hops, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.bindings.insert(id, hops);
                return;
            }
        }
        // Not found locally: a global, resolved at runtime.
    }

    fn resolve_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::VarDecl { name, init, line } => {
                self.declare(name, *line);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Block(stmts) => {
                self.begin_scope();
                self.resolve_stmts(stmts);
                self.end_scope();
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(cond);
                self.begin_scope();
                self.resolve_stmts(then_branch);
                self.end_scope();
                self.begin_scope();
                self.resolve_stmts(else_branch);
                self.end_scope();
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(cond);
                self.begin_scope();
                self.resolve_stmts(body);
                self.end_scope();
            }
            Stmt::FunDecl(decl) => {
                self.declare(&decl.name, decl.line);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::Return { expr, line } => {
                if self.current_function == FunctionKind::None {
                    self.error("Can't return from top-level code.", *line);
                }
                if let Some(expr) = expr {
                    if self.current_function == FunctionKind::Initializer {
                        self.error("Can't return a value from an initializer.", *line);
                    }
                    self.resolve_expr(expr);
                }
            }
            Stmt::ClassDecl {
                name,
                superclass,
                traits,
                methods,
                line,
            } => self.resolve_class(name, superclass.as_ref(), traits, methods, *line),
            Stmt::TraitDecl {
                name,
                traits,
                methods,
                line,
            } => self.resolve_trait(name, traits, methods, *line),
        }
    }

    fn resolve_class(
        &mut self,
        name: &str,
        superclass: Option<&Expr>,
        traits: &[Expr],
        methods: &[FunctionDecl],
        line: usize,
    ) {
        let enclosing = self.current_class;
        self.current_class = ClassKind::Class;
        self.declare(name, line);
        self.define(name);

        if let Some(superclass) = superclass {
            if let Expr::Var {
                name: super_name,
                line: super_line,
                ..
            } = superclass
            {
                if super_name == name {
                    self.error("A class can't inherit from itself.", *super_line);
                }
            }
            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass);
            // The superclass pseudo-binding lives in its own scope so `super`
            // resolves one hop outside the `this` scope.
            self.begin_scope();
            self.define("super");
        }

        // With-clause references are ordinary variable expressions, resolved
        // before the `this` scope opens.
        for trait_ref in traits {
            self.resolve_expr(trait_ref);
        }

        self.begin_scope();
        self.define("this");
        for method in methods {
            let kind = if method.name == "init" {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind);
        }
        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }
        self.current_class = enclosing;
    }

    fn resolve_trait(
        &mut self,
        name: &str,
        traits: &[Expr],
        methods: &[FunctionDecl],
        line: usize,
    ) {
        let enclosing = self.current_class;
        self.current_class = ClassKind::Trait;
        self.declare(name, line);
        self.define(name);

        for trait_ref in traits {
            self.resolve_expr(trait_ref);
        }

        self.begin_scope();
        self.define("this");
        for method in methods {
            // No initializer treatment inside a trait: an `init` here is a
            // plain method. A trait-supplied constructor only behaves like
            // one by being composed into a class (see DESIGN.md).
            self.resolve_function(method, FunctionKind::Method);
        }
        self.end_scope();
        self.current_class = enclosing;
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing = self.current_function;
        self.current_function = kind;
        self.begin_scope();
        for param in &decl.params {
            self.declare(param, decl.line);
            self.define(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();
        self.current_function = enclosing;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Var { name, id, line } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name) == Some(&false) {
                        self.error(
                            format!("Can't read local variable '{}' in its own initializer.", name),
                            *line,
                        );
                    }
                }
                self.resolve_local(*id, name);
            }
            Expr::Assign { name, id, expr, .. } => {
                self.resolve_expr(expr);
                self.resolve_local(*id, name);
            }
            Expr::Unary { expr, .. } => self.resolve_expr(expr),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { target, .. } => self.resolve_expr(target),
            Expr::Set { target, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(target);
            }
            Expr::This { id, line } => {
                if self.current_class == ClassKind::None {
                    self.error("Can't use 'this' outside of a class.", *line);
                    return;
                }
                self.resolve_local(*id, "this");
            }
            Expr::Super { id, line, .. } => match self.current_class {
                ClassKind::Trait => self.error("Can't use 'super' in a trait.", *line),
                ClassKind::None => self.error("Can't use 'super' outside of a class.", *line),
                ClassKind::Class => {
                    self.error("Can't use 'super' in a class with no superclass.", *line)
                }
                ClassKind::Subclass => self.resolve_local(*id, "super"),
            },
        }
    }
}
