// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! JSON statement adapter: callers on the REST path send pre-built
//! statement trees as JSON objects; this maps them onto the IR.
//!
//! Objects are recognized by the keys present: `and` -> conjunction, `or`
//! -> disjunction, `field_name` -> leaf. The marker value itself is
//! ignored; only its presence discriminates.
//!

use crate::{
    MqlError,
    op::MatchOp,
    statement::{FieldKind, Scalar, Statement},
};
use serde::Deserialize;
use serde_json::Value;

/// Wire form of a statement tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonStatement {
    /// `{ "and": _, "left": ..., "right": ... }`
    And(AndNode),
    /// `{ "or": _, "left": ..., "right": ... }`
    Or(OrNode),
    /// `{ "field_type": ..., "field_name": ..., "operation": ..., "value": ... }`
    Match(MatchNode),
}

/// Conjunction node.
#[derive(Debug, Clone, Deserialize)]
pub struct AndNode {
    /// Discriminating marker; value ignored.
    #[serde(rename = "and")]
    pub marker: Value,
    /// Left subtree.
    pub left: Box<JsonStatement>,
    /// Right subtree.
    pub right: Box<JsonStatement>,
}

/// Disjunction node.
#[derive(Debug, Clone, Deserialize)]
pub struct OrNode {
    /// Discriminating marker; value ignored.
    #[serde(rename = "or")]
    pub marker: Value,
    /// Left subtree.
    pub left: Box<JsonStatement>,
    /// Right subtree.
    pub right: Box<JsonStatement>,
}

/// Leaf node.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchNode {
    /// Field kind wire code, 1..=6.
    pub field_type: i64,
    /// Field or attribute name; empty if absent.
    #[serde(default)]
    pub field_name: String,
    /// Operator spelling.
    pub operation: String,
    /// Comparand.
    pub value: Value,
}

impl JsonStatement {
    /// Parse a JSON document into the wire form.
    pub fn try_from_str(input: &str) -> Result<Self, MqlError> {
        Ok(serde_json::from_str::<JsonStatement>(input)?)
    }

    /// Convert the wire form to the evaluator-ready IR.
    pub fn to_ir(&self) -> Result<Statement, MqlError> {
        match self {
            JsonStatement::And(node) => Ok(Statement::And(
                Box::new(node.left.to_ir()?),
                Box::new(node.right.to_ir()?),
            )),
            JsonStatement::Or(node) => Ok(Statement::Or(
                Box::new(node.left.to_ir()?),
                Box::new(node.right.to_ir()?),
            )),
            JsonStatement::Match(node) => {
                let field = FieldKind::from_code(node.field_type)
                    .ok_or(MqlError::UnknownFieldType(node.field_type))?;
                let op = node
                    .operation
                    .parse::<MatchOp>()
                    .map_err(|_| MqlError::UnknownOperation(node.operation.clone()))?;
                let value = scalar_from_json(&node.value)?;
                Ok(Statement::matching(field, &node.field_name, op, value))
            }
        }
    }
}

// JSON scalar -> IR scalar. Whole numbers become ints, everything else
// numeric becomes a float.
fn scalar_from_json(value: &Value) -> Result<Scalar, MqlError> {
    match value {
        Value::Bool(x) => Ok(Scalar::Bool(*x)),
        Value::Number(x) => match x.as_i64() {
            Some(v) => Ok(Scalar::Int(v)),
            None => x
                .as_f64()
                .map(Scalar::Float)
                .ok_or_else(|| MqlError::InvalidValue(x.to_string())),
        },
        Value::String(x) => Ok(Scalar::Str(x.clone())),
        other => Err(MqlError::InvalidValue(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_match_leaf() {
        let src = r#"{
            "field_type": 3,
            "field_name": "frames per second",
            "operation": ">",
            "value": 3
        }"#;
        let stmt = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap();
        assert_eq!(
            stmt,
            Statement::matching(
                FieldKind::ProcessAttribute,
                "frames per second",
                MatchOp::Gt,
                Scalar::Int(3),
            )
        );
    }

    #[test]
    fn test_and_or_tree() {
        let src = r#"{
            "or": 0,
            "left": {
                "and": 0,
                "left":  { "field_type": 3, "field_name": "note", "operation": "=", "value": "x" },
                "right": { "field_type": 1, "field_name": "name", "operation": "=", "value": "Texture" }
            },
            "right": { "field_type": 4, "field_name": "zn", "operation": "=", "value": 0.5 }
        }"#;
        let stmt = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap();
        let Statement::Or(left, right) = stmt else {
            panic!("expected or at the root");
        };
        assert!(matches!(*left, Statement::And(_, _)));
        assert_eq!(
            *right,
            Statement::matching(FieldKind::SampleAttribute, "zn", MatchOp::Eq, Scalar::Float(0.5))
        );
    }

    #[test]
    fn test_missing_field_name_is_empty() {
        let src = r#"{ "field_type": 6, "operation": "has-process", "value": "Texture" }"#;
        let stmt = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap();
        assert_eq!(
            stmt,
            Statement::matching(
                FieldKind::SampleFunc,
                "",
                MatchOp::HasProcess,
                Scalar::Str("Texture".into()),
            )
        );
    }

    #[test]
    fn test_unknown_field_type() {
        let src = r#"{ "field_type": 9, "field_name": "x", "operation": "=", "value": 1 }"#;
        let err = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap_err();
        assert!(matches!(err, MqlError::UnknownFieldType(9)));
    }

    #[test]
    fn test_unknown_operation() {
        let src = r#"{ "field_type": 1, "field_name": "name", "operation": "~=", "value": 1 }"#;
        let err = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap_err();
        assert!(matches!(err, MqlError::UnknownOperation(_)));
    }

    #[test]
    fn test_non_scalar_value() {
        let src = r#"{ "field_type": 1, "field_name": "name", "operation": "=", "value": [1, 2] }"#;
        let err = JsonStatement::try_from_str(src).unwrap().to_ir().unwrap_err();
        assert!(matches!(err, MqlError::InvalidValue(_)));
    }
}
