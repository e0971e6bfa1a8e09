// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! AST -> IR lowering.
//!
//! Lowering is structural: it never fails on an odd-shaped sub-expression,
//! it just refuses to produce a statement for it. An `and` needs both sides
//! to survive (a conjunction w/ an unusable side can never match anything),
//! an `or` keeps whichever side lowered.
//!

use crate::{
    MqlError,
    ast::{AttributeIdentifier, Expression, FuncIdentifier, Mql, SelectionItem, Statement as Ast},
    op::MatchOp,
    statement::{FieldKind, Scalar, Selection, Statement},
};

/// Lower a parsed [`Mql`] tree to a [`Selection`] + IR statement pair.
///
/// The first statement must be a `select`, otherwise this signals
/// [`MqlError::NoSelection`]. A select w/o a usable where clause lowers to
/// `None`, which evaluates to empty result sets.
pub fn ast_to_selection(mql: &Mql) -> Result<(Selection, Option<Statement>), MqlError> {
    let Some(Ast::Select(select)) = mql.statements.first() else {
        return Err(MqlError::NoSelection);
    };

    let mut selection = Selection::default();
    for item in &select.selections {
        match item {
            SelectionItem::Samples => selection.select_samples = true,
            SelectionItem::Processes => selection.select_processes = true,
        }
    }

    let statement = select
        .where_clause
        .as_ref()
        .and_then(|w| w.expr.as_ref())
        .and_then(convert_expression);

    Ok((selection, statement))
}

// Convert one AST expression to an IR statement, or nothing.
fn convert_expression(expr: &Expression) -> Option<Statement> {
    match expr {
        Expression::Infix(infix) => {
            let left = &infix.left;
            let right = &infix.right;
            match infix.operator.to_ascii_lowercase().as_str() {
                "and" => {
                    let l = convert_expression(left)?;
                    let r = convert_expression(right)?;
                    Some(Statement::And(Box::new(l), Box::new(r)))
                }
                "or" => match (convert_expression(left), convert_expression(right)) {
                    (Some(l), Some(r)) => Some(Statement::Or(Box::new(l), Box::new(r))),
                    (Some(l), None) => Some(l),
                    (None, Some(r)) => Some(r),
                    (None, None) => None,
                },
                op => convert_comparison(left, op, right),
            }
        }
        // a bare attribute identifier degrades to presence semantics...
        Expression::SampleAttribute(ai) => Some(presence(FieldKind::SampleFunc, ai)),
        Expression::ProcessAttribute(ai) => Some(presence(FieldKind::ProcessFunc, ai)),
        Expression::SampleFunc(fi) => func_match(FieldKind::SampleFunc, fi),
        Expression::ProcessFunc(fi) => func_match(FieldKind::ProcessFunc, fi),
        // literals, prefix expressions etc. carry no selection meaning on
        // their own; a sibling may still contribute...
        _ => None,
    }
}

// `<attr-ident> <cmp> <literal>` -> Match leaf. The attribute name "name"
// addresses the entity's own field instead of an attribute.
fn convert_comparison(left: &Expression, op: &str, right: &Expression) -> Option<Statement> {
    let op = op.parse::<MatchOp>().ok().filter(MatchOp::is_comparison)?;
    let value = literal_scalar(right)?;

    let (field, field_name) = match left {
        Expression::SampleAttribute(ai) if ai.name == "name" => {
            (FieldKind::SampleField, ai.name.clone())
        }
        Expression::SampleAttribute(ai) => (FieldKind::SampleAttribute, ai.name.clone()),
        Expression::ProcessAttribute(ai) if ai.name == "name" => {
            (FieldKind::ProcessField, ai.name.clone())
        }
        Expression::ProcessAttribute(ai) => (FieldKind::ProcessAttribute, ai.name.clone()),
        _ => return None,
    };

    Some(Statement::matching(field, field_name, op, value))
}

fn literal_scalar(expr: &Expression) -> Option<Scalar> {
    match expr {
        Expression::Integer(lit) => Some(Scalar::Int(lit.value)),
        Expression::Float(lit) => Some(Scalar::Float(lit.value)),
        Expression::Str(lit) => Some(Scalar::Str(lit.value.clone())),
        Expression::Boolean(lit) => Some(Scalar::Bool(lit.value)),
        _ => None,
    }
}

fn presence(field: FieldKind, ai: &AttributeIdentifier) -> Statement {
    Statement::matching(
        field,
        "",
        MatchOp::HasAttribute,
        Scalar::Str(ai.name.clone()),
    )
}

fn func_match(field: FieldKind, fi: &FuncIdentifier) -> Option<Statement> {
    let op = fi.func.parse::<MatchOp>().ok().filter(MatchOp::is_function)?;
    Some(Statement::matching(
        field,
        "",
        op,
        Scalar::Str(fi.name.clone()),
    ))
}
