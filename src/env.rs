// ABOUTME: Environment module: nested symbol tables supporting create, get, update

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no outer scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// Creates a new child environment extending `outer`. Used when entering
    /// a function call - the new frame extends the function's captured
    /// environment, not the caller's.
    pub fn with_outer(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// Binds `name` in this frame only. Fails if `name` is already bound in
    /// this frame - shadowing across frames is allowed, redeclaration within
    /// a frame is not.
    pub fn create(&self, name: String, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(&name) {
            return Err(EvalError::AlreadyDeclared(name));
        }
        self.bindings.borrow_mut().insert(name, value);
        Ok(())
    }

    /// Looks up `name` in this frame and, failing that, walks outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Writes `value` to the innermost frame that already binds `name`.
    /// Fails if no frame in the chain binds it.
    pub fn update(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return Ok(());
        }
        match &self.outer {
            Some(outer) => outer.update(name, value),
            None => Err(EvalError::UndefinedAssign(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let env = Environment::new();
        env.create("x".to_string(), Value::Integer(42)).unwrap();
        match env.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, 42),
            _ => panic!("expected Integer(42)"),
        }
    }

    #[test]
    fn test_get_undefined_is_none() {
        let env = Environment::new();
        assert!(env.get("undefined").is_none());
    }

    #[test]
    fn test_create_redeclaration_in_same_frame_fails() {
        let env = Environment::new();
        env.create("x".to_string(), Value::Integer(1)).unwrap();
        let err = env.create("x".to_string(), Value::Integer(2)).unwrap_err();
        assert_eq!(err, EvalError::AlreadyDeclared("x".to_string()));
    }

    #[test]
    fn test_shadowing_across_frames_is_allowed() {
        let parent = Environment::new();
        parent.create("x".to_string(), Value::Integer(1)).unwrap();

        let child = Environment::with_outer(parent.clone());
        child.create("x".to_string(), Value::Integer(2)).unwrap();

        match child.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, 2),
            _ => panic!("expected child's own binding"),
        }
        match parent.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, 1),
            _ => panic!("parent binding should be unaffected"),
        }
    }

    #[test]
    fn test_get_walks_outward() {
        let parent = Environment::new();
        parent.create("x".to_string(), Value::Integer(1)).unwrap();
        let child = Environment::with_outer(parent);
        match child.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, 1),
            _ => panic!("expected parent's binding"),
        }
    }

    #[test]
    fn test_update_writes_innermost_binding() {
        let parent = Environment::new();
        parent.create("x".to_string(), Value::Integer(1)).unwrap();
        let child = Environment::with_outer(parent.clone());

        child.update("x", Value::Integer(99)).unwrap();

        match parent.get("x") {
            Some(Value::Integer(n)) => assert_eq!(n, 99),
            _ => panic!("expected update to reach the parent frame"),
        }
    }

    #[test]
    fn test_update_unbound_name_fails() {
        let env = Environment::new();
        let err = env.update("nope", Value::Integer(1)).unwrap_err();
        assert_eq!(err, EvalError::UndefinedAssign("nope".to_string()));
    }
}
