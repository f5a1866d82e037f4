// ABOUTME: Value types representing runtime values and their display/truthiness rules

use crate::ast::Block;
use crate::env::Environment;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    List(Vec<Value>),
    Function {
        params: Vec<String>,
        body: Rc<Block>,
        env: Rc<Environment>,
    },
    Builtin(fn(&[Value]) -> Value),
    /// Wraps a value returned with `return`; propagates until a call
    /// boundary (or the program boundary) absorbs it.
    ReturnValue(Box<Value>),
    /// `"break"` or `"continue"`; propagates until the innermost `for`
    /// absorbs it.
    LoopControl(&'static str),
    /// A first-class error value. Short-circuits any evaluator step that
    /// receives it as an operand.
    Error(String),
}

impl Value {
    /// Name used in error messages (`type mismatch: INTEGER + BOOLEAN`, …).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::List(_) => "LIST",
            Value::Function { .. } => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::LoopControl(_) => "LOOP_CONTROL",
            Value::Error(_) => "ERROR",
        }
    }

    /// Null and boolean-false are falsey; every other value (including
    /// integer zero) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Value::ReturnValue(_))
    }

    pub fn is_loop_control(&self) -> bool {
        matches!(self, Value::LoopControl(_))
    }

    /// Short-circuits composite evaluation: true for any of the three
    /// propagating kinds (Error, ReturnValue, LoopControl).
    pub fn is_propagating(&self) -> bool {
        self.is_error() || self.is_return() || self.is_loop_control()
    }

    /// Content equality used by `==`/`!=`. Integer and Boolean compare by
    /// value; Null equals Null; all other cross-kind comparisons are false.
    pub fn values_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Function { params, .. } => write!(f, "func({})", params.join(", ")),
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::ReturnValue(v) => write!(f, "{}", v),
            Value::LoopControl(lit) => write!(f, "{}", lit),
            Value::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_display() {
        assert_eq!(format!("{}", Value::Integer(42)), "42");
        assert_eq!(format!("{}", Value::Integer(-5)), "-5");
    }

    #[test]
    fn test_bool_display() {
        assert_eq!(format!("{}", Value::Boolean(true)), "true");
        assert_eq!(format!("{}", Value::Boolean(false)), "false");
    }

    #[test]
    fn test_list_display() {
        let list = Value::List(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(format!("{}", list), "[1, 2, 3]");
        assert_eq!(format!("{}", Value::List(vec![])), "[]");
    }

    #[test]
    fn test_null_display() {
        assert_eq!(format!("{}", Value::Null), "null");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        // Integer zero is truthy - matches `if (1) { 10 } -> 10`-style tests.
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::String(String::new()).is_truthy());
    }

    #[test]
    fn test_values_equal_cross_kind_is_false() {
        assert!(Value::Integer(1).values_equal(&Value::Integer(1)));
        assert!(!Value::Integer(1).values_equal(&Value::Boolean(true)));
        assert!(Value::Null.values_equal(&Value::Null));
        assert!(!Value::Null.values_equal(&Value::Boolean(false)));
    }

    #[test]
    fn test_is_propagating() {
        assert!(Value::Error("oops".into()).is_propagating());
        assert!(Value::ReturnValue(Box::new(Value::Integer(1))).is_propagating());
        assert!(Value::LoopControl("break").is_propagating());
        assert!(!Value::Integer(1).is_propagating());
    }
}
