use std::cell::RefCell;
use std::rc::Rc;

use super::Interpreter;
use super::environment::Environment;
use crate::value::{ClassValue, Instance, RuntimeError, Value};

impl Interpreter {
    /// Property lookup on an instance: fields first (a field shadows a
    /// method of the same name), then method dispatch through the class's
    /// flattened table and superclass chain. A found method is handed out
    /// bound to the receiver.
    pub(crate) fn eval_get(
        &mut self,
        target: Value,
        name: &str,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let instance = match target {
            Value::Instance(instance) => instance,
            other => {
                return Err(RuntimeError::at_line(
                    format!("Only instances have properties, got {}.", other.type_name()),
                    line,
                ));
            }
        };
        if let Some(value) = instance.borrow().fields.get(name) {
            return Ok(value.clone());
        }
        let class = instance.borrow().class.clone();
        match class.find_method(name) {
            Some(method) => Ok(Value::Fn(method.bind(&instance))),
            None => Err(RuntimeError::at_line(
                format!("Undefined property '{}' on {} instance.", name, class.name),
                line,
            )),
        }
    }

    pub(crate) fn eval_set(
        &mut self,
        target: Value,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        match target {
            Value::Instance(instance) => {
                instance
                    .borrow_mut()
                    .fields
                    .insert(name.to_string(), value.clone());
                Ok(value)
            }
            other => Err(RuntimeError::at_line(
                format!("Only instances have fields, got {}.", other.type_name()),
                line,
            )),
        }
    }

    /// Calling a class constructs a fresh instance; an `init` found anywhere
    /// on the dispatch chain runs bound to it with the call arguments.
    /// Traits are rejected before this point (they are not callable).
    pub(crate) fn instantiate(
        &mut self,
        class: Rc<ClassValue>,
        args: Vec<Value>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(class.clone())));
        match class.find_method("init") {
            Some(init) => {
                Self::check_arity(init.arity(), args.len(), line)?;
                let bound = init.bind(&instance);
                self.call_function(&bound, args)?;
            }
            None => Self::check_arity(0, args.len(), line)?,
        }
        Ok(Value::Instance(instance))
    }

    /// `super.m` — start the method search at the superclass of the class
    /// that lexically encloses the running method, and bind the result to
    /// the current receiver.
    pub(crate) fn eval_super(
        &mut self,
        method: &str,
        id: usize,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let hops = match self.bindings.get(&id) {
            Some(&hops) => hops,
            None => {
                return Err(RuntimeError::at_line(
                    "'super' used outside of a method.",
                    line,
                ));
            }
        };
        let superclass = match Environment::get_at(&self.env, hops, "super", line)? {
            Value::Class(class) => class,
            _ => {
                return Err(RuntimeError::at_line(
                    "'super' does not refer to a class.",
                    line,
                ));
            }
        };
        // The receiver's scope sits one hop inside the superclass scope.
        let receiver = match Environment::get_at(&self.env, hops - 1, "this", line)? {
            Value::Instance(instance) => instance,
            _ => {
                return Err(RuntimeError::at_line(
                    "'this' is not bound to an instance.",
                    line,
                ));
            }
        };
        match superclass.find_method(method) {
            Some(found) => Ok(Value::Fn(found.bind(&receiver))),
            None => {
                let class_name = receiver.borrow().class.name.clone();
                Err(RuntimeError::at_line(
                    format!(
                        "Undefined method '{}' on superclass of {}.",
                        method, class_name
                    ),
                    line,
                ))
            }
        }
    }
}
