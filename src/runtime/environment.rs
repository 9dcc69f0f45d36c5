use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::{RuntimeError, Value};

/// A lexical scope. Slots hold `Option<Value>`: a `None` slot is declared
/// but uninitialized — the placeholder state a class or trait name sits in
/// while its declaration is still being constructed. Reading such a slot is
/// an error rather than a stale value.
pub(crate) struct Environment {
    values: HashMap<String, Option<Value>>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub(crate) fn new() -> Self {
        Self {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub(crate) fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind a name to an uninitialized placeholder slot (two-phase init).
    pub(crate) fn declare(&mut self, name: &str) {
        self.values.insert(name.to_string(), None);
    }

    pub(crate) fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), Some(value));
    }

    pub(crate) fn get(&self, name: &str, line: usize) -> Result<Value, RuntimeError> {
        match self.values.get(name) {
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(RuntimeError::at_line(
                format!("Variable '{}' is not initialized.", name),
                line,
            )),
            None => match &self.enclosing {
                Some(parent) => parent.borrow().get(name, line),
                None => Err(RuntimeError::at_line(
                    format!("Undefined variable '{}'.", name),
                    line,
                )),
            },
        }
    }

    pub(crate) fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), RuntimeError> {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), Some(value));
            return Ok(());
        }
        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value, line),
            None => Err(RuntimeError::at_line(
                format!("Undefined variable '{}'.", name),
                line,
            )),
        }
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, hops: usize) -> Rc<RefCell<Environment>> {
        let mut current = env.clone();
        for _ in 0..hops {
            let next = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver produced a binding deeper than the environment chain");
            current = next;
        }
        current
    }

    /// Distance-addressed lookup driven by the resolver's binding table.
    pub(crate) fn get_at(
        env: &Rc<RefCell<Environment>>,
        hops: usize,
        name: &str,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let scope = Self::ancestor(env, hops);
        let slot = scope.borrow().values.get(name).cloned();
        match slot {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(RuntimeError::at_line(
                format!("Variable '{}' is not initialized.", name),
                line,
            )),
            None => Err(RuntimeError::at_line(
                format!("Undefined variable '{}'.", name),
                line,
            )),
        }
    }

    pub(crate) fn assign_at(
        env: &Rc<RefCell<Environment>>,
        hops: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<(), RuntimeError> {
        let scope = Self::ancestor(env, hops);
        let mut scope = scope.borrow_mut();
        if scope.values.contains_key(name) {
            scope.values.insert(name.to_string(), Some(value));
            Ok(())
        } else {
            Err(RuntimeError::at_line(
                format!("Undefined variable '{}'.", name),
                line,
            ))
        }
    }
}
