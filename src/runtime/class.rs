use std::cell::RefCell;
use std::rc::Rc;

use super::Interpreter;
use super::environment::Environment;
use crate::ast::{Expr, FunctionDecl};
use crate::value::{ClassValue, Function, MethodTable, RuntimeError, TraitValue, Value};

impl Interpreter {
    /// The composition engine: evaluate each with-clause reference in
    /// declaration order and flatten the traits' methods into one table.
    /// Entries are copied (`Rc` clones) into a fresh map — the source trait's
    /// table is never aliased. Any name collision is a hard error; there is
    /// no precedence and no override.
    pub(crate) fn apply_traits(&mut self, refs: &[Expr]) -> Result<MethodTable, RuntimeError> {
        let mut methods = MethodTable::new();
        for trait_ref in refs {
            let (ref_name, line) = match trait_ref {
                Expr::Var { name, line, .. } => (name.as_str(), *line),
                _ => ("trait reference", 0),
            };
            let composed = match self.eval_expr(trait_ref)? {
                Value::Trait(t) => t,
                _ => {
                    return Err(RuntimeError::at_line(
                        format!("'{}' is not a trait.", ref_name),
                        line,
                    ));
                }
            };
            for (method_name, method) in &composed.methods {
                if methods.contains_key(method_name) {
                    return Err(RuntimeError::at_line(
                        format!(
                            "Method '{}' from trait '{}' collides with a previously composed method.",
                            method_name, composed.name
                        ),
                        line,
                    ));
                }
                methods.insert(method_name.clone(), method.clone());
            }
        }
        Ok(methods)
    }

    /// Add directly-declared methods to an already-composed table, with the
    /// identical collision check: an own method never silently overrides a
    /// composed one. `init` only gets initializer semantics in a class body.
    fn define_methods(
        &mut self,
        table: &mut MethodTable,
        methods: &[FunctionDecl],
        closure: &Rc<RefCell<Environment>>,
        class_body: bool,
    ) -> Result<(), RuntimeError> {
        for decl in methods {
            if table.contains_key(&decl.name) {
                return Err(RuntimeError::at_line(
                    format!(
                        "Method '{}' collides with a composed trait method of the same name.",
                        decl.name
                    ),
                    decl.line,
                ));
            }
            let function = Function {
                name: decl.name.clone(),
                params: decl.params.clone(),
                body: decl.body.clone(),
                closure: closure.clone(),
                is_initializer: class_body && decl.name == "init",
            };
            table.insert(decl.name.clone(), Rc::new(function));
        }
        Ok(())
    }

    /// Execute a class declaration. Two-phase binding: the name is bound to
    /// an uninitialized placeholder before anything is evaluated, so method
    /// bodies may reference the class recursively; the finished value is
    /// assigned only after composition succeeds. On failure the slot stays
    /// uninitialized — no partial class is ever published.
    pub(crate) fn exec_class_decl(
        &mut self,
        name: &str,
        superclass: Option<&Expr>,
        traits: &[Expr],
        methods: &[FunctionDecl],
        line: usize,
    ) -> Result<(), RuntimeError> {
        self.env.borrow_mut().declare(name);

        let superclass = match superclass {
            Some(expr) => match self.eval_expr(expr)? {
                Value::Class(class) => Some(class),
                other => {
                    return Err(RuntimeError::at_line(
                        format!("Superclass must be a class, got {}.", other.type_name()),
                        line,
                    ));
                }
            },
            None => None,
        };

        // Methods close over an extra scope holding `super` when there is a
        // superclass; the resolver counted its hops the same way.
        let method_env = match &superclass {
            Some(superclass) => {
                let mut env = Environment::with_enclosing(self.env.clone());
                env.define("super", Value::Class(superclass.clone()));
                Rc::new(RefCell::new(env))
            }
            None => self.env.clone(),
        };

        let prev = std::mem::replace(&mut self.env, method_env.clone());
        let table = self.apply_traits(traits).and_then(|mut table| {
            self.define_methods(&mut table, methods, &method_env, true)?;
            Ok(table)
        });
        self.env = prev;

        let class = ClassValue {
            name: name.to_string(),
            superclass,
            methods: table?,
        };
        self.env
            .borrow_mut()
            .define(name, Value::Class(Rc::new(class)));
        Ok(())
    }

    /// Execute a trait declaration: same two-phase shape as a class, minus
    /// superclass and instantiability.
    pub(crate) fn exec_trait_decl(
        &mut self,
        name: &str,
        traits: &[Expr],
        methods: &[FunctionDecl],
        _line: usize,
    ) -> Result<(), RuntimeError> {
        self.env.borrow_mut().declare(name);

        let closure = self.env.clone();
        let table = self.apply_traits(traits).and_then(|mut table| {
            self.define_methods(&mut table, methods, &closure, false)?;
            Ok(table)
        });

        let composed = TraitValue {
            name: name.to_string(),
            methods: table?,
        };
        self.env
            .borrow_mut()
            .define(name, Value::Trait(Rc::new(composed)));
        Ok(())
    }
}
