// ABOUTME: AST model: tagged statement and expression node families

use crate::token::Token;
use std::fmt;

/// Distinguishes a declaring assignment (`var`) from a re-assignment (`=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignKind {
    Var,
    Assign,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum Stmt {
    Assignment {
        token: Token,
        kind: AssignKind,
        names: Vec<String>,
        values: Option<Vec<Expr>>,
    },
    Return {
        token: Token,
        value: Option<Expr>,
    },
    LoopControl {
        token: Token,
        literal: &'static str,
    },
    Expression {
        token: Token,
        expr: Expr,
    },
    Block {
        token: Token,
        statements: Block,
    },
    If {
        token: Token,
        condition: Expr,
        consequence: Block,
        follow_if: Option<Box<Stmt>>,
        alternative: Option<Block>,
    },
    For {
        token: Token,
        init: Box<Stmt>,
        condition: Expr,
        update: Box<Stmt>,
        body: Block,
    },
    Func {
        token: Token,
        name: String,
        params: Vec<String>,
        body: Block,
    },
}

impl Stmt {
    pub fn token_literal(&self) -> &str {
        match self {
            Stmt::Assignment { token, .. }
            | Stmt::Return { token, .. }
            | Stmt::LoopControl { token, .. }
            | Stmt::Expression { token, .. }
            | Stmt::Block { token, .. }
            | Stmt::If { token, .. }
            | Stmt::For { token, .. }
            | Stmt::Func { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assignment {
                kind, names, values, ..
            } => {
                if *kind == AssignKind::Var {
                    write!(f, "var {}", names.join(", "))?;
                } else {
                    write!(f, "{}", names.join(", "))?;
                }
                if let Some(values) = values {
                    write!(f, " = ")?;
                    let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                    write!(f, "{}", rendered.join(", "))?;
                }
                write!(f, ";")
            }
            Stmt::Return { value, .. } => match value {
                Some(v) => write!(f, "return {};", v),
                None => write!(f, "return;"),
            },
            Stmt::LoopControl { literal, .. } => write!(f, "{};", literal),
            Stmt::Expression { expr, .. } => write!(f, "{}", expr),
            Stmt::Block { statements, .. } => {
                for stmt in statements {
                    write!(f, "{}", stmt)?;
                }
                Ok(())
            }
            Stmt::If {
                condition,
                consequence,
                follow_if,
                alternative,
                ..
            } => {
                write!(f, "if {} {{ ", condition)?;
                for stmt in consequence {
                    write!(f, "{}", stmt)?;
                }
                write!(f, " }}")?;
                if let Some(follow) = follow_if {
                    write!(f, " else {}", follow)?;
                } else if let Some(alt) = alternative {
                    write!(f, " else {{ ")?;
                    for stmt in alt {
                        write!(f, "{}", stmt)?;
                    }
                    write!(f, " }}")?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                write!(f, "for {} {}; {} {{ ", init, condition, update)?;
                for stmt in body {
                    write!(f, "{}", stmt)?;
                }
                write!(f, " }}")
            }
            Stmt::Func {
                name, params, body, ..
            } => {
                write!(f, "func {}({}) {{ ", name, params.join(", "))?;
                for stmt in body {
                    write!(f, "{}", stmt)?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Identifier {
        token: Token,
        value: String,
    },
    IntegerLiteral {
        token: Token,
        value: i64,
    },
    BooleanLiteral {
        token: Token,
        value: bool,
    },
    StringLiteral {
        token: Token,
        value: String,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expr>,
    },
    Infix {
        token: Token,
        left: Box<Expr>,
        operator: String,
        right: Box<Expr>,
    },
    List {
        token: Token,
        elements: Vec<Expr>,
    },
    Index {
        token: Token,
        left: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        token: Token,
        function: String,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    pub fn token_literal(&self) -> &str {
        match self {
            Expr::Identifier { token, .. }
            | Expr::IntegerLiteral { token, .. }
            | Expr::BooleanLiteral { token, .. }
            | Expr::StringLiteral { token, .. }
            | Expr::Prefix { token, .. }
            | Expr::Infix { token, .. }
            | Expr::List { token, .. }
            | Expr::Index { token, .. }
            | Expr::Call { token, .. } => &token.literal,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier { value, .. } => write!(f, "{}", value),
            Expr::IntegerLiteral { value, .. } => write!(f, "{}", value),
            Expr::BooleanLiteral { value, .. } => write!(f, "{}", value),
            Expr::StringLiteral { value, .. } => write!(f, "{}", value),
            Expr::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),
            Expr::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::List { elements, .. } => {
                let rendered: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
            Expr::Call {
                function,
                arguments,
                ..
            } => {
                let rendered: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, 1)
    }

    #[test]
    fn test_infix_display_parenthesizes() {
        let expr = Expr::Infix {
            token: tok(TokenKind::Plus, "+"),
            left: Box::new(Expr::IntegerLiteral {
                token: tok(TokenKind::Int, "3"),
                value: 3,
            }),
            operator: "+".to_string(),
            right: Box::new(Expr::IntegerLiteral {
                token: tok(TokenKind::Int, "4"),
                value: 4,
            }),
        };
        assert_eq!(expr.to_string(), "(3 + 4)");
    }

    #[test]
    fn test_call_display() {
        let expr = Expr::Call {
            token: tok(TokenKind::Ident, "add"),
            function: "add".to_string(),
            arguments: vec![
                Expr::IntegerLiteral {
                    token: tok(TokenKind::Int, "1"),
                    value: 1,
                },
                Expr::IntegerLiteral {
                    token: tok(TokenKind::Int, "2"),
                    value: 2,
                },
            ],
        };
        assert_eq!(expr.to_string(), "add(1, 2)");
    }

    #[test]
    fn test_index_display() {
        let expr = Expr::Index {
            token: tok(TokenKind::LBracket, "["),
            left: Box::new(Expr::Identifier {
                token: tok(TokenKind::Ident, "a"),
                value: "a".to_string(),
            }),
            index: Box::new(Expr::IntegerLiteral {
                token: tok(TokenKind::Int, "0"),
                value: 0,
            }),
        };
        assert_eq!(expr.to_string(), "(a[0])");
    }

    #[test]
    fn test_assignment_display() {
        let stmt = Stmt::Assignment {
            token: tok(TokenKind::Var, "var"),
            kind: AssignKind::Var,
            names: vec!["x".to_string()],
            values: Some(vec![Expr::IntegerLiteral {
                token: tok(TokenKind::Int, "10"),
                value: 10,
            }]),
        };
        assert_eq!(stmt.to_string(), "var x = 10;");
        assert_eq!(stmt.token_literal(), "var");
    }
}
