// ABOUTME: Pratt parser: precedence-driven expression parsing and statement dispatch

use crate::ast::{AssignKind, Block, Expr, Stmt};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Power,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
        TokenKind::Pow => Precedence::Power,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn is_infix_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Or
            | TokenKind::And
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Pow
    )
}

/// A Pratt parser over a token stream. Never panics on malformed input:
/// failures append to an error list and the parser resynchronizes at the
/// next `;`/`}`/EOF and keeps going.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Parser {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(&self.peek_token.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(&self.cur_token.kind)
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token.kind == kind {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {:?}, got {:?} ('{}') instead at line {}",
                kind, self.peek_token.kind, self.peek_token.literal, self.peek_token.line
            ));
            false
        }
    }

    /// Skips tokens until the current one is `;`, `}`, or EOF - leaving it
    /// there so the caller's own `next_token()` advances exactly one token
    /// past it, same as a successfully parsed statement would.
    fn synchronize(&mut self) {
        while !matches!(
            self.cur_token.kind,
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) {
            self.next_token();
        }
    }

    /// Parses the whole token stream into a program (the root block).
    pub fn parse_program(&mut self) -> Block {
        let mut statements = Vec::new();
        while self.cur_token.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }
        statements
    }

    /// Parses a `{ ... }` block. Assumes `cur_token` is `{` on entry; leaves
    /// `cur_token` on the block's own closing `}` on return.
    fn parse_block_statement(&mut self) -> Block {
        let mut statements = Vec::new();
        self.next_token();
        while self.cur_token.kind != TokenKind::RBrace && self.cur_token.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }
        statements
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur_token.kind {
            TokenKind::Var => self.parse_assignment_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break | TokenKind::Continue => self.parse_loop_control_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Func => self.parse_func_statement(),
            TokenKind::Ident
                if matches!(self.peek_token.kind, TokenKind::Comma | TokenKind::Assign) =>
            {
                self.parse_assignment_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Handles both the `var`-declaration form and the bare re-assignment
    /// form. `cur_token` is `var` or the first identifier on entry.
    fn parse_assignment_statement(&mut self) -> Option<Stmt> {
        let kind = if self.cur_token.kind == TokenKind::Var {
            AssignKind::Var
        } else {
            AssignKind::Assign
        };
        let mut token = self.cur_token.clone();
        if kind == AssignKind::Var {
            self.next_token();
        }

        let mut names = Vec::new();
        if self.cur_token.kind != TokenKind::Ident {
            self.errors.push(format!(
                "expected identifier, got {:?} ('{}') instead at line {}",
                self.cur_token.kind, self.cur_token.literal, self.cur_token.line
            ));
            return None;
        }
        names.push(self.cur_token.literal.clone());

        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            if self.cur_token.kind != TokenKind::Ident {
                self.errors.push(format!(
                    "expected identifier after ',', got {:?} ('{}') instead at line {}",
                    self.cur_token.kind, self.cur_token.literal, self.cur_token.line
                ));
                return None;
            }
            names.push(self.cur_token.literal.clone());
        }

        let values = if self.peek_token.kind == TokenKind::Assign {
            self.next_token(); // cur = '='
            if kind == AssignKind::Assign {
                token = self.cur_token.clone();
            }
            self.next_token(); // cur = first value expression
            let mut values = vec![self.parse_expression(Precedence::Lowest)?];
            while self.peek_token.kind == TokenKind::Comma {
                self.next_token();
                self.next_token();
                values.push(self.parse_expression(Precedence::Lowest)?);
            }
            Some(values)
        } else {
            None
        };

        if kind == AssignKind::Assign && values.is_none() {
            self.errors.push(format!(
                "expected '=' in assignment at line {}",
                self.cur_token.line
            ));
            return None;
        }

        if let Some(ref values) = values {
            if values.len() != names.len() {
                self.errors.push(format!(
                    "assignment arity mismatch: {} name(s), {} value(s) at line {}",
                    names.len(),
                    values.len(),
                    token.line
                ));
                return None;
            }
        }

        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }

        Some(Stmt::Assignment {
            token,
            kind,
            names,
            values,
        })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        if matches!(
            self.peek_token.kind,
            TokenKind::Semicolon | TokenKind::RBrace
        ) {
            if self.peek_token.kind == TokenKind::Semicolon {
                self.next_token();
            }
            return Some(Stmt::Return { token, value: None });
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::Return {
            token,
            value: Some(value),
        })
    }

    fn parse_loop_control_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        let literal = if token.kind == TokenKind::Break {
            "break"
        } else {
            "continue"
        };
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::LoopControl { token, literal })
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Stmt::Expression { token, expr })
    }

    fn parse_if_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let mut follow_if = None;
        let mut alternative = None;

        if self.peek_token.kind == TokenKind::Else {
            self.next_token();
            if self.peek_token.kind == TokenKind::If {
                self.next_token();
                follow_if = Some(Box::new(self.parse_if_statement()?));
            } else {
                if !self.expect_peek(TokenKind::LBrace) {
                    return None;
                }
                alternative = Some(self.parse_block_statement());
            }
        }

        Some(Stmt::If {
            token,
            condition,
            consequence,
            follow_if,
            alternative,
        })
    }

    fn parse_for_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        self.next_token();
        let init = self.parse_assignment_statement()?;
        if self.cur_token.kind != TokenKind::Semicolon {
            self.errors.push(format!(
                "expected ';' after for-loop init, got {:?} instead at line {}",
                self.cur_token.kind, self.cur_token.line
            ));
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.next_token();
        let update = self.parse_assignment_statement()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Stmt::For {
            token,
            init: Box::new(init),
            condition,
            update: Box::new(update),
            body,
        })
    }

    fn parse_func_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_identifier_list(TokenKind::RParen)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Stmt::Func {
            token,
            name,
            params,
            body,
        })
    }

    /// Assumes `cur_token` is the opening delimiter; consumes through `end`.
    fn parse_identifier_list(&mut self, end: TokenKind) -> Option<Vec<String>> {
        let mut idents = Vec::new();
        if self.peek_token.kind == end {
            self.next_token();
            return Some(idents);
        }
        self.next_token();
        if self.cur_token.kind != TokenKind::Ident {
            self.errors.push(format!(
                "expected identifier in parameter list, got {:?} instead at line {}",
                self.cur_token.kind, self.cur_token.line
            ));
            return None;
        }
        idents.push(self.cur_token.literal.clone());
        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            if self.cur_token.kind != TokenKind::Ident {
                self.errors.push(format!(
                    "expected identifier in parameter list, got {:?} instead at line {}",
                    self.cur_token.kind, self.cur_token.line
                ));
                return None;
            }
            idents.push(self.cur_token.literal.clone());
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(idents)
    }

    /// Assumes `cur_token` is the opening delimiter; consumes through `end`.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();
        if self.peek_token.kind == end {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        while self.peek_token.kind != TokenKind::Semicolon && precedence < self.peek_precedence()
        {
            match &self.peek_token.kind {
                TokenKind::LParen if matches!(left, Expr::Identifier { .. }) => {
                    self.next_token();
                    left = self.parse_call_expression(left)?;
                }
                TokenKind::LBracket => {
                    self.next_token();
                    left = self.parse_index_expression(left)?;
                }
                kind if is_infix_operator(kind) => {
                    self.next_token();
                    left = self.parse_infix_expression(left)?;
                }
                _ => break,
            }
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(self.parse_identifier()),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Str => Some(self.parse_string_literal()),
            TokenKind::True | TokenKind::False => Some(self.parse_boolean_literal()),
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self.parse_list_literal(),
            _ => {
                self.errors.push(format!(
                    "no prefix parse function for {:?} ('{}') found at line {}",
                    self.cur_token.kind, self.cur_token.literal, self.cur_token.line
                ));
                None
            }
        }
    }

    fn parse_identifier(&self) -> Expr {
        Expr::Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::IntegerLiteral { token, value }),
            Err(_) => {
                self.errors
                    .push(format!("could not parse '{}' as integer", token.literal));
                None
            }
        }
    }

    fn parse_string_literal(&self) -> Expr {
        Expr::StringLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }
    }

    fn parse_boolean_literal(&self) -> Expr {
        Expr::BooleanLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token.kind == TokenKind::True,
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expr::Prefix {
            token,
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_list_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::List { token, elements })
    }

    fn parse_call_expression(&mut self, function_expr: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let function = match function_expr {
            Expr::Identifier { value, .. } => value,
            _ => {
                self.errors
                    .push("call expressions require an identifier callee".to_string());
                return None;
            }
        };
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call {
            token,
            function,
            arguments,
        })
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        Some(Expr::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }
}

/// Parses `source` end to end, returning the program and any diagnostics.
/// An empty error list means success; the program is returned regardless
/// (possibly partial) so the caller can decide how to treat errors.
pub fn parse(source: &str) -> (Block, Vec<String>) {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    (program, parser.errors().to_vec())
}
