use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseExpected,
    ParseGeneric,
    Static,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCode::ParseExpected => "PARSE_EXPECTED",
            ErrorCode::ParseGeneric => "PARSE_GENERIC",
            ErrorCode::Static => "STATIC",
        };
        write!(f, "{}", name)
    }
}

impl ErrorCode {
    pub fn is_parse(self) -> bool {
        matches!(self, ErrorCode::ParseExpected | ErrorCode::ParseGeneric)
    }
}

/// The single error type of the interpreter. Parse errors carry a code and a
/// source location, static (resolver) errors carry a line, and `return` is
/// routed through `return_value` so it can unwind an arbitrary statement
/// nesting without a dedicated control-flow enum.
#[derive(Debug)]
pub struct RuntimeError {
    pub message: String,
    pub code: Option<ErrorCode>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub hint: Option<String>,
    pub return_value: Option<Value>,
}

impl RuntimeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            line: None,
            column: None,
            hint: None,
            return_value: None,
        }
    }

    pub(crate) fn at_line(message: impl Into<String>, line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::new(message)
        }
    }

    pub(crate) fn with_location(
        message: impl Into<String>,
        code: ErrorCode,
        line: usize,
        column: Option<usize>,
    ) -> Self {
        Self {
            code: Some(code),
            line: Some(line),
            column,
            ..Self::new(message)
        }
    }

    pub(crate) fn static_error(message: impl Into<String>, line: usize) -> Self {
        Self {
            code: Some(ErrorCode::Static),
            line: Some(line),
            ..Self::new(message)
        }
    }

    pub(crate) fn return_signal(value: Value) -> Self {
        Self {
            return_value: Some(value),
            ..Self::new("return outside of a function")
        }
    }

    pub(crate) fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
