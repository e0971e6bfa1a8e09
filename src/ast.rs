// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! MQL abstract syntax tree produced by the [parser][crate::parser::Parser].
//!
//! Nodes keep the token they were parsed from so `token_literal()` can answer
//! debugging questions, and `Display` reconstructs a parenthesized canonical
//! form used by round-trip tests.
//!

use crate::token::Token;
use core::fmt;

/// A whole MQL input: one or more statements.
#[derive(Debug, Default)]
pub struct Mql {
    /// Top-level statements in input order.
    pub statements: Vec<Statement>,
}

impl Mql {
    /// Literal of the first statement's leading token, or "" when empty.
    pub fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map(|s| s.token_literal())
            .unwrap_or("")
    }
}

impl fmt::Display for Mql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for s in &self.statements {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// Statement variants.
#[derive(Debug)]
pub enum Statement {
    /// `select ... (where ...)?`
    Select(SelectStatement),
    /// A bare expression at the top level. Kept so the front-end stays
    /// usable for poking at expressions w/o a full select.
    Expression(ExpressionStatement),
}

impl Statement {
    /// Literal of the statement's leading token.
    pub fn token_literal(&self) -> &str {
        match self {
            Statement::Select(s) => &s.token.literal,
            Statement::Expression(s) => &s.token.literal,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Select(s) => write!(f, "{s}"),
            Statement::Expression(s) => write!(f, "{s}"),
        }
    }
}

/// `select` statement: the selection list + an optional where clause.
#[derive(Debug)]
pub struct SelectStatement {
    /// The `select` token.
    pub token: Token,
    /// Result classes asked for, in source order.
    pub selections: Vec<SelectionItem>,
    /// Filtering clause, if any.
    pub where_clause: Option<WhereStatement>,
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "select ")?;
        let items: Vec<_> = self.selections.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", items.join(", "))?;
        if let Some(w) = &self.where_clause {
            write!(f, " {w}")?;
        }
        Ok(())
    }
}

/// One entry of a select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionItem {
    /// `samples`
    Samples,
    /// `processes`
    Processes,
}

impl fmt::Display for SelectionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionItem::Samples => write!(f, "samples"),
            SelectionItem::Processes => write!(f, "processes"),
        }
    }
}

/// `where` clause of a select statement.
#[derive(Debug)]
pub struct WhereStatement {
    /// The `where` token.
    pub token: Token,
    /// The predicate expression. `None` when the clause failed to parse;
    /// the parser's error list tells the rest of the story.
    pub expr: Option<Expression>,
}

impl fmt::Display for WhereStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.expr {
            Some(e) => write!(f, "where {e}"),
            None => write!(f, "where"),
        }
    }
}

/// A bare expression used where a statement is expected.
#[derive(Debug)]
pub struct ExpressionStatement {
    /// First token of the expression.
    pub token: Token,
    /// The expression itself, absent when parsing failed.
    pub expr: Option<Expression>,
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.expr {
            Some(e) => write!(f, "{e}"),
            None => Ok(()),
        }
    }
}

/// Expression variants.
#[derive(Debug)]
pub enum Expression {
    /// Integer literal.
    Integer(IntegerLiteral),
    /// Float literal.
    Float(FloatLiteral),
    /// String literal.
    Str(StringLiteral),
    /// Boolean literal.
    Boolean(BooleanLiteral),
    /// `sample:<name>` and its alias spellings.
    SampleAttribute(AttributeIdentifier),
    /// `process:<name>` and its alias spellings.
    ProcessAttribute(AttributeIdentifier),
    /// `s-has-process:<name>` | `s-has-attribute:<name>`.
    SampleFunc(FuncIdentifier),
    /// `p-has-sample:<name>` | `p-has-attribute:<name>`.
    ProcessFunc(FuncIdentifier),
    /// `-x`, `!x`, `not x`.
    Prefix(PrefixExpression),
    /// `left <op> right`.
    Infix(InfixExpression),
}

impl Expression {
    /// Literal of the expression's leading token.
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Integer(e) => &e.token.literal,
            Expression::Float(e) => &e.token.literal,
            Expression::Str(e) => &e.token.literal,
            Expression::Boolean(e) => &e.token.literal,
            Expression::SampleAttribute(e) | Expression::ProcessAttribute(e) => &e.token.literal,
            Expression::SampleFunc(e) | Expression::ProcessFunc(e) => &e.token.literal,
            Expression::Prefix(e) => &e.token.literal,
            Expression::Infix(e) => &e.token.literal,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Integer(e) => write!(f, "{}", e.token.literal),
            Expression::Float(e) => write!(f, "{}", e.token.literal),
            Expression::Str(e) => write!(f, "{}", e.value),
            Expression::Boolean(e) => write!(f, "{}", e.value),
            Expression::SampleAttribute(e) | Expression::ProcessAttribute(e) => {
                write!(f, "{}{}", e.prefix, e.name)
            }
            Expression::SampleFunc(e) | Expression::ProcessFunc(e) => {
                write!(f, "{}{}", e.prefix, e.name)
            }
            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),
            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),
        }
    }
}

/// Integer literal node.
#[derive(Debug)]
pub struct IntegerLiteral {
    /// Source token.
    pub token: Token,
    /// Parsed value.
    pub value: i64,
}

/// Float literal node.
#[derive(Debug)]
pub struct FloatLiteral {
    /// Source token.
    pub token: Token,
    /// Parsed value.
    pub value: f64,
}

/// String literal node; value excludes the quotes.
#[derive(Debug)]
pub struct StringLiteral {
    /// Source token.
    pub token: Token,
    /// Literal content.
    pub value: String,
}

/// Boolean literal node.
#[derive(Debug)]
pub struct BooleanLiteral {
    /// Source token.
    pub token: Token,
    /// Parsed value.
    pub value: bool,
}

/// A qualified attribute identifier, e.g. `sample:'metal hardness'`.
///
/// `token` is the name token that followed the prefix, so `token_literal()`
/// answers w/ the attribute name; `prefix` keeps the spelling that was used.
#[derive(Debug)]
pub struct AttributeIdentifier {
    /// The name token (IDENT or STRING) following the prefix.
    pub token: Token,
    /// Prefix spelling as written, trailing `:` included.
    pub prefix: String,
    /// Attribute name.
    pub name: String,
}

/// A built-in function identifier, e.g. `p-has-attribute:"Beam Type"`.
#[derive(Debug)]
pub struct FuncIdentifier {
    /// The operand token (IDENT or STRING) following the prefix.
    pub token: Token,
    /// Prefix spelling as written, trailing `:` included.
    pub prefix: String,
    /// Canonical function name (`has-process`, `has-attribute`, `has-sample`).
    pub func: String,
    /// Operand: the process/sample/attribute name being tested for.
    pub name: String,
}

/// Prefix (unary) expression node.
#[derive(Debug)]
pub struct PrefixExpression {
    /// Operator token.
    pub token: Token,
    /// Operator spelling.
    pub operator: String,
    /// Operand.
    pub right: Box<Expression>,
}

/// Infix (binary) expression node.
#[derive(Debug)]
pub struct InfixExpression {
    /// Operator token.
    pub token: Token,
    /// Operator spelling.
    pub operator: String,
    /// Left operand.
    pub left: Box<Expression>,
    /// Right operand.
    pub right: Box<Expression>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_display_canonical_form() {
        // (sample:hardness > 5)
        let e = Expression::Infix(InfixExpression {
            token: Token::new(TokenKind::Gt, ">"),
            operator: ">".into(),
            left: Box::new(Expression::SampleAttribute(AttributeIdentifier {
                token: Token::new(TokenKind::Ident, "hardness"),
                prefix: "sample:".into(),
                name: "hardness".into(),
            })),
            right: Box::new(Expression::Integer(IntegerLiteral {
                token: Token::new(TokenKind::Int, "5"),
                value: 5,
            })),
        });
        assert_eq!(e.to_string(), "(sample:hardness > 5)");
    }

    #[test]
    fn test_token_literal_of_attribute_identifier() {
        let e = Expression::SampleAttribute(AttributeIdentifier {
            token: Token::new(TokenKind::Ident, "metal hardness"),
            prefix: "sample:".into(),
            name: "metal hardness".into(),
        });
        assert_eq!(e.token_literal(), "metal hardness");
    }
}
