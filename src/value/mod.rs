use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::ast::Stmt;
use crate::runtime::environment::Environment;

mod display;
mod error;

pub use error::{ErrorCode, RuntimeError};

/// A runtime value. Compound values are reference-counted so that bindings,
/// fields and method tables can share them freely; the interpreter is
/// single-threaded, so `Rc`/`RefCell` suffice.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Num(f64),
    Str(String),
    NativeFn(NativeFn),
    Fn(Rc<Function>),
    Class(Rc<ClassValue>),
    Trait(Rc<TraitValue>),
    Instance(Rc<RefCell<Instance>>),
}

/// A built-in function implemented in Rust.
#[derive(Clone)]
pub struct NativeFn {
    pub(crate) name: &'static str,
    pub(crate) arity: usize,
    pub(crate) func: fn(&[Value]) -> Result<Value, RuntimeError>,
}

/// A user-defined function or method. Methods are stored unbound in their
/// class/trait table; `bind` produces the receiver-bound copy handed out by
/// property lookup.
pub struct Function {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Rc<Vec<Stmt>>,
    pub(crate) closure: Rc<RefCell<Environment>>,
    pub(crate) is_initializer: bool,
}

impl Function {
    pub(crate) fn arity(&self) -> usize {
        self.params.len()
    }

    /// Rebind this method to a receiver: wrap the captured closure in a fresh
    /// scope that defines `this`, leaving the original entry untouched.
    pub(crate) fn bind(&self, instance: &Rc<RefCell<Instance>>) -> Rc<Function> {
        let mut env = Environment::with_enclosing(self.closure.clone());
        env.define("this", Value::Instance(instance.clone()));
        Rc::new(Function {
            name: self.name.clone(),
            params: self.params.clone(),
            body: self.body.clone(),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        })
    }
}

/// A method table. `BTreeMap` keeps iteration order deterministic, which in
/// turn keeps composition-collision reporting stable across runs.
pub(crate) type MethodTable = BTreeMap<String, Rc<Function>>;

/// A non-instantiable bundle of methods, usable only through a with-clause.
pub struct TraitValue {
    pub(crate) name: String,
    pub(crate) methods: MethodTable,
}

/// A class: its flattened method table (composed traits + own methods, built
/// exactly once at declaration time) and an optional superclass link.
pub struct ClassValue {
    pub(crate) name: String,
    pub(crate) superclass: Option<Rc<ClassValue>>,
    pub(crate) methods: MethodTable,
}

impl ClassValue {
    /// Method lookup: own table first, then the superclass chain.
    pub(crate) fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }
}

/// An instance: per-object field storage plus a back-reference to the class
/// used for method dispatch.
pub struct Instance {
    pub(crate) class: Rc<ClassValue>,
    pub(crate) fields: HashMap<String, Value>,
}

impl Instance {
    pub(crate) fn new(class: Rc<ClassValue>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub(crate) fn truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::NativeFn(_) | Value::Fn(_) => "function",
            Value::Class(_) => "class",
            Value::Trait(_) => "trait",
            Value::Instance(_) => "instance",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::NativeFn(a), Value::NativeFn(b)) => a.name == b.name,
            (Value::Fn(a), Value::Fn(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Trait(a), Value::Trait(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Num(n) => write!(f, "Num({})", n),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::NativeFn(n) => write!(f, "NativeFn({})", n.name),
            Value::Fn(fun) => write!(f, "Fn({})", fun.name),
            Value::Class(c) => write!(f, "Class({})", c.name),
            Value::Trait(t) => write!(f, "Trait({})", t.name),
            Value::Instance(i) => write!(f, "Instance({})", i.borrow().class.name),
        }
    }
}
