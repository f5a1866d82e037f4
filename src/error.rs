// ABOUTME: Error types and message constructors for evaluation failures

use thiserror::Error;

/// Errors surfaced by the environment's binding operations. The evaluator
/// converts these into `Value::Error` at the point of use - evaluation
/// failures are first-class propagating values (see `value::Value::Error`),
/// not a separate Rust error channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("identifier already declared: {0}")]
    AlreadyDeclared(String),

    #[error("cannot assign to undeclared: {0}")]
    UndefinedAssign(String),
}

/// `type mismatch` error kind: an operator applied to operand kinds it does
/// not support.
pub fn type_mismatch(operator: &str, left: &str, right: &str) -> String {
    format!("type mismatch: {} {} {}", left, operator, right)
}

/// `unknown operator` error kind: an operator that does not exist for the
/// given (prefix or infix) operand kind(s).
pub fn unknown_operator(operator: &str, operand: &str) -> String {
    format!("unknown operator: {}{}", operator, operand)
}

/// `unknown operator` error kind for an infix operator applied to two
/// operands of the same (unsupported) kind, e.g. `true + true`.
pub fn unknown_infix_operator(operator: &str, left: &str, right: &str) -> String {
    format!("unknown operator: {} {} {}", left, operator, right)
}

/// `index operator not supported` error kind.
pub fn not_indexable(kind: &str) -> String {
    format!("index operator not supported: {}", kind)
}

/// `identifier not found` error kind.
pub fn identifier_not_found(name: &str) -> String {
    format!("identifier not found: {}", name)
}

/// `wrong number of arguments` error kind.
pub fn wrong_number_of_arguments(expected: usize, got: usize) -> String {
    format!(
        "wrong number of arguments: expected {}, got {}",
        expected, got
    )
}

/// `not callable` error kind.
pub fn not_callable(kind: &str) -> String {
    format!("not a function: {}", kind)
}

/// `division by zero` error kind.
pub fn division_by_zero() -> String {
    "division by zero".to_string()
}

/// `negative index` error kind.
pub fn negative_index() -> String {
    "index out of range: negative index".to_string()
}

/// `negative exponent` error kind (`**` with a negative right-hand side).
pub fn negative_exponent() -> String {
    "negative exponent".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(
            type_mismatch("+", "INTEGER", "BOOLEAN"),
            "type mismatch: INTEGER + BOOLEAN"
        );
        assert_eq!(
            unknown_operator("-", "BOOLEAN"),
            "unknown operator: -BOOLEAN"
        );
        assert_eq!(identifier_not_found("x"), "identifier not found: x");
        assert_eq!(
            wrong_number_of_arguments(2, 1),
            "wrong number of arguments: expected 2, got 1"
        );
    }
}
