use super::Value;

impl Value {
    /// The user-visible rendering used by `print` and the REPL. Whole
    /// numbers print without a fractional part (`f64`'s shortest form).
    pub fn to_string_value(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(true) => "true".to_string(),
            Value::Bool(false) => "false".to_string(),
            Value::Num(n) => format!("{}", n),
            Value::Str(s) => s.clone(),
            Value::NativeFn(n) => format!("<native fn {}>", n.name),
            Value::Fn(f) => format!("<fn {}>", f.name),
            Value::Class(c) => c.name.clone(),
            Value::Trait(t) => format!("<trait {}>", t.name),
            Value::Instance(i) => format!("{} instance", i.borrow().class.name),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}
