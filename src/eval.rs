// ABOUTME: Tree-walking evaluator: recursive eval over the AST producing Values

use crate::ast::{AssignKind, Block, Expr, Stmt};
use crate::builtins;
use crate::env::Environment;
use crate::error;
use crate::value::Value;
use std::rc::Rc;

/// Builds a fresh global environment with the standard library registered.
pub fn new_global_env() -> Rc<Environment> {
    let env = Environment::new();
    builtins::register_builtins(&env);
    env
}

/// Parses and evaluates `source` against a fresh global environment.
/// If parsing fails, evaluation is skipped and the parse errors are
/// returned alongside `Value::Null`.
pub fn run(source: &str) -> (Value, Vec<String>) {
    let (program, errors) = crate::parser::parse(source);
    if !errors.is_empty() {
        return (Value::Null, errors);
    }
    let env = new_global_env();
    (eval_program(&program, &env), Vec::new())
}

/// Evaluates a whole program. Unlike `eval_block`, a top-level `return`
/// simply ends the program - its wrapped value is unwrapped here rather
/// than left propagating for some outer caller to absorb.
pub fn eval_program(program: &Block, env: &Rc<Environment>) -> Value {
    let result = eval_block(program, env);
    match result {
        Value::ReturnValue(v) => *v,
        other => other,
    }
}

/// Evaluates a statement list, stopping early and returning as-is the
/// moment a statement produces a propagating value (Error, ReturnValue,
/// LoopControl) - the caller decides whether to absorb or re-propagate it.
fn eval_block(block: &Block, env: &Rc<Environment>) -> Value {
    let mut result = Value::Null;
    for stmt in block {
        result = eval_statement(stmt, env);
        if result.is_propagating() {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Stmt, env: &Rc<Environment>) -> Value {
    match stmt {
        Stmt::Assignment {
            kind, names, values, ..
        } => eval_assignment(*kind, names, values.as_deref(), env),
        Stmt::Return { value, .. } => {
            let inner = match value {
                Some(expr) => {
                    let v = eval_expr(expr, env);
                    if v.is_propagating() {
                        return v;
                    }
                    v
                }
                None => Value::Null,
            };
            Value::ReturnValue(Box::new(inner))
        }
        Stmt::LoopControl { literal, .. } => Value::LoopControl(literal),
        Stmt::Expression { expr, .. } => eval_expr(expr, env),
        Stmt::Block { statements, .. } => eval_block(statements, env),
        Stmt::If {
            condition,
            consequence,
            follow_if,
            alternative,
            ..
        } => eval_if(condition, consequence, follow_if.as_deref(), alternative.as_deref(), env),
        Stmt::For {
            init,
            condition,
            update,
            body,
            ..
        } => eval_for(init, condition, update, body, env),
        Stmt::Func {
            name, params, body, ..
        } => {
            let function = Value::Function {
                params: params.clone(),
                body: Rc::new(body.clone()),
                env: env.clone(),
            };
            match env.create(name.clone(), function) {
                Ok(()) => Value::Null,
                Err(err) => Value::Error(err.to_string()),
            }
        }
    }
}

fn eval_assignment(
    kind: AssignKind,
    names: &[String],
    values: Option<&[Expr]>,
    env: &Rc<Environment>,
) -> Value {
    let evaluated: Vec<Value> = match values {
        Some(exprs) => {
            let mut out = Vec::with_capacity(exprs.len());
            for expr in exprs {
                let v = eval_expr(expr, env);
                if v.is_propagating() {
                    return v;
                }
                out.push(v);
            }
            out
        }
        None => names.iter().map(|_| Value::Null).collect(),
    };

    for (name, value) in names.iter().zip(evaluated.into_iter()) {
        let outcome = match kind {
            AssignKind::Var => env.create(name.clone(), value),
            AssignKind::Assign => env.update(name, value),
        };
        if let Err(err) = outcome {
            return Value::Error(err.to_string());
        }
    }
    Value::Null
}

fn eval_if(
    condition: &Expr,
    consequence: &Block,
    follow_if: Option<&Stmt>,
    alternative: Option<&Block>,
    env: &Rc<Environment>,
) -> Value {
    let cond = eval_expr(condition, env);
    if cond.is_propagating() {
        return cond;
    }
    if cond.is_truthy() {
        return eval_block(consequence, env);
    }
    if let Some(follow) = follow_if {
        return eval_statement(follow, env);
    }
    if let Some(alt) = alternative {
        return eval_block(alt, env);
    }
    Value::Null
}

/// `for` introduces no frame of its own - the init binding lives in the
/// enclosing function/global frame, same as `var` inside any other block
/// (spec: blocks do not introduce new frames).
fn eval_for(
    init: &Stmt,
    condition: &Expr,
    update: &Stmt,
    body: &Block,
    env: &Rc<Environment>,
) -> Value {
    let init_result = eval_statement(init, env);
    if init_result.is_propagating() {
        return init_result;
    }

    loop {
        let cond = eval_expr(condition, env);
        if cond.is_propagating() {
            return cond;
        }
        if !cond.is_truthy() {
            break;
        }

        let result = eval_block(body, env);
        match result {
            Value::LoopControl("break") => break,
            Value::LoopControl("continue") => {}
            Value::LoopControl(_) => unreachable!("only break/continue are produced"),
            other if other.is_propagating() => return other,
            _ => {}
        }

        let update_result = eval_statement(update, env);
        if update_result.is_propagating() {
            return update_result;
        }
    }

    Value::Null
}

fn eval_expr(expr: &Expr, env: &Rc<Environment>) -> Value {
    match expr {
        Expr::Identifier { value, .. } => match env.get(value) {
            Some(v) => v,
            None => Value::Error(error::identifier_not_found(value)),
        },
        Expr::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expr::BooleanLiteral { value, .. } => Value::Boolean(*value),
        Expr::StringLiteral { value, .. } => Value::String(value.clone()),
        Expr::Prefix {
            operator, right, ..
        } => eval_prefix(operator, right, env),
        Expr::Infix {
            operator,
            left,
            right,
            ..
        } => eval_infix(operator, left, right, env),
        Expr::List { elements, .. } => {
            let mut items = Vec::with_capacity(elements.len());
            for el in elements {
                let v = eval_expr(el, env);
                if v.is_propagating() {
                    return v;
                }
                items.push(v);
            }
            Value::List(items)
        }
        Expr::Index { left, index, .. } => eval_index(left, index, env),
        Expr::Call {
            function,
            arguments,
            ..
        } => eval_call(function, arguments, env),
    }
}

fn eval_prefix(operator: &str, right_expr: &Expr, env: &Rc<Environment>) -> Value {
    let right = eval_expr(right_expr, env);
    if right.is_propagating() {
        return right;
    }
    match operator {
        "!" => Value::Boolean(!right.is_truthy()),
        "-" => match right {
            Value::Integer(n) => Value::Integer(-n),
            other => Value::Error(error::unknown_operator(operator, other.type_name())),
        },
        _ => Value::Error(error::unknown_operator(operator, right.type_name())),
    }
}

fn eval_infix(operator: &str, left_expr: &Expr, right_expr: &Expr, env: &Rc<Environment>) -> Value {
    let left = eval_expr(left_expr, env);
    if left.is_propagating() {
        return left;
    }

    match operator {
        "&&" => {
            if !left.is_truthy() {
                return Value::Boolean(false);
            }
            let right = eval_expr(right_expr, env);
            if right.is_propagating() {
                return right;
            }
            Value::Boolean(right.is_truthy())
        }
        "||" => {
            if left.is_truthy() {
                return Value::Boolean(true);
            }
            let right = eval_expr(right_expr, env);
            if right.is_propagating() {
                return right;
            }
            Value::Boolean(right.is_truthy())
        }
        _ => {
            let right = eval_expr(right_expr, env);
            if right.is_propagating() {
                return right;
            }
            apply_infix(operator, left, right)
        }
    }
}

fn apply_infix(operator: &str, left: Value, right: Value) -> Value {
    match operator {
        "==" => return Value::Boolean(left.values_equal(&right)),
        "!=" => return Value::Boolean(!left.values_equal(&right)),
        _ => {}
    }

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => apply_integer_infix(operator, *a, *b),
        (Value::String(a), Value::String(b)) if operator == "+" => {
            Value::String(format!("{}{}", a, b))
        }
        _ if left.type_name() != right.type_name() => Value::Error(error::type_mismatch(
            operator,
            left.type_name(),
            right.type_name(),
        )),
        _ => Value::Error(error::unknown_infix_operator(
            operator,
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn apply_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Value::Error(error::division_by_zero())
            } else {
                Value::Integer(left / right)
            }
        }
        "%" => {
            if right == 0 {
                Value::Error(error::division_by_zero())
            } else {
                Value::Integer(left % right)
            }
        }
        "**" => {
            if right < 0 {
                Value::Error(error::negative_exponent())
            } else {
                Value::Integer(left.wrapping_pow(right as u32))
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "<=" => Value::Boolean(left <= right),
        ">=" => Value::Boolean(left >= right),
        _ => Value::Error(error::unknown_infix_operator(operator, "INTEGER", "INTEGER")),
    }
}

fn eval_index(left_expr: &Expr, index_expr: &Expr, env: &Rc<Environment>) -> Value {
    let left = eval_expr(left_expr, env);
    if left.is_propagating() {
        return left;
    }
    let index = eval_expr(index_expr, env);
    if index.is_propagating() {
        return index;
    }

    match (&left, &index) {
        (Value::List(items), Value::Integer(i)) => {
            if *i < 0 {
                Value::Error(error::negative_index())
            } else if (*i as usize) >= items.len() {
                Value::Null
            } else {
                items[*i as usize].clone()
            }
        }
        (Value::List(_), other) => Value::Error(error::type_mismatch(
            "[]",
            left.type_name(),
            other.type_name(),
        )),
        _ => Value::Error(error::not_indexable(left.type_name())),
    }
}

fn eval_call(function: &str, arguments: &[Expr], env: &Rc<Environment>) -> Value {
    let callee = match env.get(function) {
        Some(v) => v,
        None => return Value::Error(error::identifier_not_found(function)),
    };

    let mut args = Vec::with_capacity(arguments.len());
    for arg in arguments {
        let v = eval_expr(arg, env);
        if v.is_propagating() {
            return v;
        }
        args.push(v);
    }

    match callee {
        Value::Builtin(f) => f(&args),
        Value::Function { params, body, env: closure_env } => {
            if params.len() != args.len() {
                return Value::Error(error::wrong_number_of_arguments(params.len(), args.len()));
            }
            let call_env = Environment::with_outer(closure_env);
            for (param, arg) in params.iter().zip(args.into_iter()) {
                // Fresh frame per call: redeclaration can only happen with
                // duplicate parameter names, which we simply let shadow.
                let _ = call_env.create(param.clone(), arg);
            }
            match eval_block(&body, &call_env) {
                Value::ReturnValue(v) => *v,
                Value::LoopControl(_) => Value::Null,
                other => other,
            }
        }
        other => Value::Error(error::not_callable(other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(input: &str) -> Value {
        let (value, errors) = run(input);
        assert!(errors.is_empty(), "unexpected parser errors: {:?}", errors);
        value
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval_str("5 + 5 + 5 + 5 - 10;").to_string(), "10");
        assert_eq!(
            eval_str("(5 + 10 * 2 + 15 / 3) * 2 + -10;").to_string(),
            "50"
        );
        assert_eq!(eval_str("10 % 3;").to_string(), "1");
        assert_eq!(eval_str("2 ** 10;").to_string(), "1024");
    }

    #[test]
    fn test_bang_prefix() {
        assert_eq!(eval_str("!!5;").to_string(), "true");
        assert_eq!(eval_str("!true;").to_string(), "false");
        assert_eq!(eval_str("!false;").to_string(), "true");
    }

    #[test]
    fn test_if_else() {
        assert_eq!(eval_str("if true { 10 }").to_string(), "10");
        assert_eq!(eval_str("if false { 10 } else { 20 }").to_string(), "20");
        assert_eq!(eval_str("if 1 > 2 { 10 } else { 20 }").to_string(), "20");
    }

    #[test]
    fn test_else_if_chain() {
        let program = "var x = 2;\nif x == 1 { 1 } else if x == 2 { 2 } else { 3 }";
        assert_eq!(eval_str(program).to_string(), "2");
    }

    #[test]
    fn test_return_short_circuits_block() {
        let program = "if true { return 10; 20; } 99;";
        assert_eq!(eval_str(program).to_string(), "10");
    }

    #[test]
    fn test_var_and_reassignment() {
        assert_eq!(eval_str("var a = 5; a = a + 1; a;").to_string(), "6");
        assert_eq!(
            eval_str("var a, b = 1, 2; a, b = b, a; a;").to_string(),
            "2"
        );
    }

    #[test]
    fn test_function_call_and_closures() {
        let program = "func add(x, y) { return x + y; } add(2, 3);";
        assert_eq!(eval_str(program).to_string(), "5");

        let program = "func makeCounter() { var c = 0; return c; } var n = makeCounter(); n;";
        assert_eq!(eval_str(program).to_string(), "0");
    }

    #[test]
    fn test_closure_captures_environment() {
        let program = "\
var make_adder_base = 10;
func adder(x) {
    return x + make_adder_base;
}
adder(5);";
        assert_eq!(eval_str(program).to_string(), "15");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            eval_str(r#""Hello" + " " + "World!";"#).to_string(),
            "Hello World!"
        );
    }

    #[test]
    fn test_list_indexing() {
        assert_eq!(eval_str("[1, 2, 3][0];").to_string(), "1");
        assert_eq!(eval_str("[1, 2, 3][1 + 1];").to_string(), "3");
        assert_eq!(eval_str("[1, 2, 3][10];").to_string(), "null");
    }

    #[test]
    fn test_negative_index_errors() {
        match eval_str("[1, 2, 3][-1];") {
            Value::Error(msg) => assert!(msg.contains("negative index")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop_accumulation() {
        let program = "var sum = 0; for var i = 0; i < 5; i = i + 1 { sum = sum + i; } sum;";
        assert_eq!(eval_str(program).to_string(), "10");
    }

    #[test]
    fn test_for_loop_break_and_continue() {
        let program =
            "var sum = 0; for var i = 0; i < 10; i = i + 1 { if i == 5 { break; } sum = sum + i; } sum;";
        assert_eq!(eval_str(program).to_string(), "10");

        let program = "var sum = 0; for var i = 0; i < 5; i = i + 1 { if i % 2 == 0 { continue; } sum = sum + i; } sum;";
        assert_eq!(eval_str(program).to_string(), "4");
    }

    #[test]
    fn test_len_builtin() {
        assert_eq!(eval_str(r#"len("hello");"#).to_string(), "5");
        assert_eq!(eval_str("len([1, 2, 3]);").to_string(), "3");
    }

    #[test]
    fn test_len_builtin_wrong_arity_errors() {
        match eval_str("len(1, 2);") {
            Value::Error(msg) => assert!(msg.contains("wrong number of arguments")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_error() {
        match eval_str("5 + true;") {
            Value::Error(msg) => assert!(msg.contains("type mismatch")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_operator_error() {
        match eval_str("true + true;") {
            Value::Error(msg) => assert!(msg.contains("unknown operator")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_division_by_zero_error() {
        match eval_str("1 / 0;") {
            Value::Error(msg) => assert_eq!(msg, "division by zero"),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_not_found_error() {
        match eval_str("foobar;") {
            Value::Error(msg) => assert!(msg.contains("identifier not found")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_short_circuits_further_statements() {
        let program = "5 + true; 9999;";
        match eval_str(program) {
            Value::Error(_) => {}
            other => panic!("expected error to halt the program, got {:?}", other),
        }
    }

    #[test]
    fn test_redeclaration_in_same_scope_errors() {
        match eval_str("var a = 1; var a = 2;") {
            Value::Error(msg) => assert!(msg.contains("already declared")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_assign_to_undeclared_errors() {
        match eval_str("a = 1;") {
            Value::Error(msg) => assert!(msg.contains("cannot assign")),
            other => panic!("expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_and_or_short_circuit() {
        assert_eq!(eval_str("true && false;").to_string(), "false");
        assert_eq!(eval_str("false || true;").to_string(), "true");
        // Short-circuit: the right side is never reached, so no error.
        assert_eq!(eval_str("false && (1 / 0 > 0);").to_string(), "false");
        assert_eq!(eval_str("true || (1 / 0 > 0);").to_string(), "true");
    }
}
