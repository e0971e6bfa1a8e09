// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Evaluator-ready intermediate representation: [`Selection`], [`Scalar`]
//! and the [`Statement`] tree.
//!
//! IR trees are constructed per request, reference no snapshot state, and
//! are plain values throughout.
//!

use crate::op::MatchOp;
use core::fmt;

/// Which entity category an IR leaf talks about.
///
/// The discriminants are the wire codes of the JSON statement encoding
/// --see [crate::json].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i64)]
pub enum FieldKind {
    /// Intrinsic process field (`name`, `id`).
    ProcessField = 1,
    /// Intrinsic sample field (`name`, `id`).
    SampleField = 2,
    /// Named attribute of a process.
    ProcessAttribute = 3,
    /// Named attribute of a sample state.
    SampleAttribute = 4,
    /// Built-in function over a process.
    ProcessFunc = 5,
    /// Built-in function over a sample.
    SampleFunc = 6,
}

impl FieldKind {
    /// Map a wire code back to a kind; `None` for anything outside 1..=6.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(FieldKind::ProcessField),
            2 => Some(FieldKind::SampleField),
            3 => Some(FieldKind::ProcessAttribute),
            4 => Some(FieldKind::SampleAttribute),
            5 => Some(FieldKind::ProcessFunc),
            6 => Some(FieldKind::SampleFunc),
            _ => None,
        }
    }

    // Leaves of these kinds make a statement "about processes"...
    pub(crate) fn is_process_kind(&self) -> bool {
        matches!(
            self,
            FieldKind::ProcessField | FieldKind::ProcessAttribute | FieldKind::ProcessFunc
        )
    }

    // ...and of these, "about samples".
    pub(crate) fn is_sample_kind(&self) -> bool {
        matches!(
            self,
            FieldKind::SampleField | FieldKind::SampleAttribute | FieldKind::SampleFunc
        )
    }
}

/// The untyped scalar of a match leaf, normalized at IR construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
}

impl Scalar {
    /// Coerce to `i64`: ints pass through, floats truncate toward zero,
    /// strings parse as a float first then truncate. Booleans never coerce.
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(x) => Some(*x),
            Scalar::Float(x) => Some(*x as i64),
            Scalar::Str(x) => x.trim().parse::<f64>().ok().map(|v| v as i64),
            Scalar::Bool(_) => None,
        }
    }

    /// Coerce to `f64` likewise.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(x) => Some(*x as f64),
            Scalar::Float(x) => Some(*x),
            Scalar::Str(x) => x.trim().parse::<f64>().ok(),
            Scalar::Bool(_) => None,
        }
    }

    /// The string payload, if this is a string. No cross-type coercion.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(x) => Some(x),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int(x) => write!(f, "{x}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(x) => write!(f, "\"{x}\""),
            Scalar::Bool(x) => write!(f, "{x}"),
        }
    }
}

/// Leaf predicate of the IR tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Entity category + addressing mode of the leaf.
    pub field: FieldKind,
    /// Field or attribute name; empty for function leaves.
    pub field_name: String,
    /// Comparison or function operator.
    pub op: MatchOp,
    /// Comparand (or function operand).
    pub value: Scalar,
}

/// The IR statement tree the evaluator interprets.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Leaf predicate.
    Match(Match),
    /// Short-circuit conjunction.
    And(Box<Statement>, Box<Statement>),
    /// Short-circuit disjunction.
    Or(Box<Statement>, Box<Statement>),
}

impl Statement {
    /// Leaf constructor, mostly for tests and hand-built queries.
    pub fn matching(
        field: FieldKind,
        field_name: impl Into<String>,
        op: MatchOp,
        value: Scalar,
    ) -> Self {
        Statement::Match(Match {
            field,
            field_name: field_name.into(),
            op,
            value,
        })
    }

    /// Return TRUE if any leaf of this tree addresses processes. Decides
    /// whether the evaluator runs a process pass --see [crate::evaluator].
    pub fn has_process_match(&self) -> bool {
        match self {
            Statement::Match(m) => m.field.is_process_kind(),
            Statement::And(left, right) | Statement::Or(left, right) => {
                left.has_process_match() || right.has_process_match()
            }
        }
    }

    /// Return TRUE if any leaf of this tree addresses samples.
    pub fn has_sample_match(&self) -> bool {
        match self {
            Statement::Match(m) => m.field.is_sample_kind(),
            Statement::And(left, right) | Statement::Or(left, right) => {
                left.has_sample_match() || right.has_sample_match()
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Match(m) if m.op.is_function() => {
                write!(f, "{:?}:{} {}", m.field, m.op, m.value)
            }
            Statement::Match(m) => write!(f, "{:?}:{} {} {}", m.field, m.field_name, m.op, m.value),
            Statement::And(left, right) => write!(f, "({left} and {right})"),
            Statement::Or(left, right) => write!(f, "({left} or {right})"),
        }
    }
}

/// The result classes a query asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Include matching processes in the result.
    pub select_processes: bool,
    /// Include matching samples in the result.
    pub select_samples: bool,
}

impl Selection {
    /// Processes only.
    pub fn processes() -> Self {
        Selection {
            select_processes: true,
            select_samples: false,
        }
    }

    /// Samples only.
    pub fn samples() -> Self {
        Selection {
            select_processes: false,
            select_samples: true,
        }
    }

    /// Both categories.
    pub fn both() -> Self {
        Selection {
            select_processes: true,
            select_samples: true,
        }
    }
}
