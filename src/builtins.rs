// ABOUTME: Standard library: the small set of builtins registered into every global environment

use crate::env::Environment;
use crate::error;
use crate::value::Value;
use std::rc::Rc;

/// Registers the standard library (`len`, `print`) into `env`.
pub fn register_builtins(env: &Rc<Environment>) {
    let _ = env.create("len".to_string(), Value::Builtin(len));
    let _ = env.create("print".to_string(), Value::Builtin(print));
}

/// `len(x)` - the element count of a list, or the byte length of a string.
fn len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(error::wrong_number_of_arguments(1, args.len()));
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::List(items) => Value::Integer(items.len() as i64),
        other => Value::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

/// `print(...)` - writes its arguments to stdout, space-separated, and
/// returns `null`.
fn print(args: &[Value]) -> Value {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Value::Null
}
