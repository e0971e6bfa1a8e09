// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! MQL parser: token stream -> AST, precedence-climbing style.
//!
//! Syntactic errors are collected on the parser, not raised. A failed parse
//! yields a best-effort partial AST; callers are expected to inspect
//! [`errors()`][Parser::errors] before trusting the result.
//!

use crate::{
    ast::{
        AttributeIdentifier, BooleanLiteral, Expression, ExpressionStatement, FloatLiteral,
        FuncIdentifier, InfixExpression, IntegerLiteral, Mql, PrefixExpression, SelectStatement,
        SelectionItem, Statement, StringLiteral, WhereStatement,
    },
    lexer::Lexer,
    token::{Token, TokenKind},
};

// Binding powers, lowest to highest. Boolean connectives bind loosest so
// `a = 1 and b = 2` groups the comparisons first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Boolean,     // and, or
    Equals,      // =, <>
    LessGreater, // <, <=, >, >=
    Sum,         // +, - (binary)
    Prefix,      // -x, !x, not x
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::And | TokenKind::Or | TokenKind::Not => Precedence::Boolean,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        _ => Precedence::Lowest,
    }
}

/// MQL parser over a [`Lexer`].
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    /// Create a new instance, priming the current/peek token pair.
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut p = Parser {
            lexer,
            cur_token: Token::new(TokenKind::Eof, ""),
            peek_token: Token::new(TokenKind::Eof, ""),
            errors: vec![],
        };
        p.next_token();
        p.next_token();
        p
    }

    /// Convenience constructor straight from source text.
    pub fn from_input(input: &'a str) -> Self {
        Parser::new(Lexer::new(input))
    }

    /// Collected syntax errors, in discovery order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Parse the whole input into an [`Mql`] tree.
    pub fn parse_mql(&mut self) -> Mql {
        let mut mql = Mql::default();
        while self.cur_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                mql.statements.push(stmt);
            }
            self.next_token();
        }
        mql
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Select => self.parse_select_statement().map(Statement::Select),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_select_statement(&mut self) -> Option<SelectStatement> {
        let token = self.cur_token.clone();
        if !self.peek_token_is(TokenKind::Samples) && !self.peek_token_is(TokenKind::Processes) {
            self.append_error(format!(
                "expected 'samples' or 'processes' after select, got {}",
                self.peek_token.kind
            ));
            return None;
        }
        self.next_token();
        let selections = self.parse_selection_list();
        let where_clause = if self.cur_token_is(TokenKind::Where) {
            Some(self.parse_where_statement())
        } else {
            None
        };

        Some(SelectStatement {
            token,
            selections,
            where_clause,
        })
    }

    // Consumes `samples`/`processes` separated by commas; leaves the current
    // token on whatever follows the list.
    fn parse_selection_list(&mut self) -> Vec<SelectionItem> {
        let mut items = vec![];
        loop {
            match self.cur_token.kind {
                TokenKind::Samples => items.push(SelectionItem::Samples),
                TokenKind::Processes => items.push(SelectionItem::Processes),
                TokenKind::Comma => {} // skip over to the next entry
                _ => return items,
            }
            self.next_token();
        }
    }

    fn parse_where_statement(&mut self) -> WhereStatement {
        let token = self.cur_token.clone();

        // move past `where`...
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        WhereStatement { token, expr }
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest);
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
        // a statement w/o an expression carries no information; the error
        // list already explains what went wrong...
        expr.as_ref()?;
        Some(ExpressionStatement { token, expr })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            if !is_infix_operator(self.peek_token.kind) {
                return Some(left);
            }
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    // Prefix-parse dispatch keyed on the current token kind.
    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::Str => Some(Expression::Str(StringLiteral {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            })),
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(BooleanLiteral {
                token: self.cur_token.clone(),
                value: self.cur_token_is(TokenKind::True),
            })),
            TokenKind::Lparen => self.parse_grouped_expression(),
            TokenKind::SampleAttr => self
                .parse_attribute_identifier()
                .map(Expression::SampleAttribute),
            TokenKind::ProcessAttr => self
                .parse_attribute_identifier()
                .map(Expression::ProcessAttribute),
            TokenKind::SampleHasProcess => self
                .parse_func_identifier("has-process")
                .map(Expression::SampleFunc),
            TokenKind::SampleHasAttribute => self
                .parse_func_identifier("has-attribute")
                .map(Expression::SampleFunc),
            TokenKind::ProcessHasSample => self
                .parse_func_identifier("has-sample")
                .map(Expression::ProcessFunc),
            TokenKind::ProcessHasAttribute => self
                .parse_func_identifier("has-attribute")
                .map(Expression::ProcessFunc),
            TokenKind::Minus | TokenKind::Bang | TokenKind::Not => self.parse_prefix_expression(),
            kind => {
                self.append_error(format!("no prefix parse function for {kind}"));
                None
            }
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(IntegerLiteral { token, value })),
            Err(_) => {
                self.append_error(format!("could not parse {:?} as integer", token.literal));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float(FloatLiteral { token, value })),
            Err(_) => {
                self.append_error(format!("could not parse {:?} as float", token.literal));
                None
            }
        }
    }

    // `sample:hardness`, `process:'with space'`, ... the prefix token is
    // current; the name follows as an IDENT or STRING.
    fn parse_attribute_identifier(&mut self) -> Option<AttributeIdentifier> {
        let prefix = self.cur_token.literal.clone();
        if !self.peek_is_name() {
            self.append_error(format!(
                "expected attribute name after '{prefix}', got {}",
                self.peek_token.kind
            ));
            return None;
        }
        self.next_token();
        Some(AttributeIdentifier {
            token: self.cur_token.clone(),
            prefix,
            name: self.cur_token.literal.clone(),
        })
    }

    // `s-has-process:Texture`, `p-has-attribute:"Beam Type"`, ...
    fn parse_func_identifier(&mut self, func: &str) -> Option<FuncIdentifier> {
        let prefix = self.cur_token.literal.clone();
        if !self.peek_is_name() {
            self.append_error(format!(
                "expected a name after '{prefix}', got {}",
                self.peek_token.kind
            ));
            return None;
        }
        self.next_token();
        Some(FuncIdentifier {
            token: self.cur_token.clone(),
            prefix,
            func: func.to_owned(),
            name: self.cur_token.literal.clone(),
        })
    }

    fn peek_is_name(&self) -> bool {
        matches!(self.peek_token.kind, TokenKind::Ident | TokenKind::Str)
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(InfixExpression {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest);
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        expr
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.append_error(format!(
                "expected next token to be {kind}, got {} instead",
                self.peek_token.kind
            ));
            false
        }
    }

    fn cur_precedence(&self) -> Precedence {
        precedence_of(self.cur_token.kind)
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek_token.kind)
    }

    fn append_error(&mut self, msg: String) {
        self.errors.push(msg);
    }
}

fn is_infix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Plus
            | TokenKind::Minus
    )
}
