use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{NativeFn, RuntimeError, Value};

mod class;
mod dispatch;
pub(crate) mod environment;
mod run;

use environment::Environment;

/// The tree-walking interpreter. Holds the global scope, the current scope,
/// the resolver's binding table and the output buffer that `print` writes
/// into; `run` returns that buffer, which is what the integration tests
/// assert against.
pub struct Interpreter {
    pub(crate) globals: Rc<RefCell<Environment>>,
    pub(crate) env: Rc<RefCell<Environment>>,
    /// Node id → environment hops, merged in from the resolver on every run.
    pub(crate) bindings: HashMap<usize, usize>,
    /// Seed for parser node ids, so ids stay unique across REPL inputs.
    pub(crate) next_node_id: usize,
    pub(crate) output: String,
    immediate_stdout: bool,
    /// Value of the last top-level expression statement (shown by the REPL).
    pub last_value: Option<Value>,
}

fn native_clock(_args: &[Value]) -> Result<Value, RuntimeError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RuntimeError::new(format!("clock: {}", e)))?;
    Ok(Value::Num(now.as_secs_f64()))
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));
        globals.borrow_mut().define(
            "clock",
            Value::NativeFn(NativeFn {
                name: "clock",
                arity: 0,
                func: native_clock,
            }),
        );
        Self {
            env: globals.clone(),
            globals,
            bindings: HashMap::new(),
            next_node_id: 0,
            output: String::new(),
            immediate_stdout: false,
            last_value: None,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// When set, `print` also writes straight to stdout (CLI mode).
    pub fn set_immediate_stdout(&mut self, immediate: bool) {
        self.immediate_stdout = immediate;
    }

    pub(crate) fn write_out(&mut self, text: &str) {
        self.output.push_str(text);
        if self.immediate_stdout {
            print!("{}", text);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
