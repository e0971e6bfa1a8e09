// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Match operators carried by IR leaves.
//!

use core::fmt;
use std::str::FromStr;

/// Operator of a [`Match`][crate::Match] leaf: either one of the six
/// comparisons, or one of the three built-in existence functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `has-process` -- sample is linked to a process w/ the given name.
    HasProcess,
    /// `has-attribute` -- the process / sample-state carries an attribute
    /// w/ the given name.
    HasAttribute,
    /// `has-sample` -- process is linked to a sample w/ the given name.
    HasSample,
}

impl MatchOp {
    /// Return TRUE if this is one of the comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            MatchOp::Eq | MatchOp::Ne | MatchOp::Lt | MatchOp::Le | MatchOp::Gt | MatchOp::Ge
        )
    }

    /// Return TRUE if this is one of the built-in existence functions.
    pub fn is_function(&self) -> bool {
        matches!(
            self,
            MatchOp::HasProcess | MatchOp::HasAttribute | MatchOp::HasSample
        )
    }

    // Operators with meaning for string values. Ordered comparisons never
    // apply to strings.
    pub(crate) fn applies_to_strings(&self) -> bool {
        matches!(self, MatchOp::Eq | MatchOp::Ne)
    }
}

impl fmt::Display for MatchOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let it = match self {
            MatchOp::Eq => "=",
            MatchOp::Ne => "<>",
            MatchOp::Lt => "<",
            MatchOp::Le => "<=",
            MatchOp::Gt => ">",
            MatchOp::Ge => ">=",
            MatchOp::HasProcess => "has-process",
            MatchOp::HasAttribute => "has-attribute",
            MatchOp::HasSample => "has-sample",
        };
        write!(f, "{it}")
    }
}

impl FromStr for MatchOp {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(MatchOp::Eq),
            "<>" => Ok(MatchOp::Ne),
            "<" => Ok(MatchOp::Lt),
            "<=" => Ok(MatchOp::Le),
            ">" => Ok(MatchOp::Gt),
            ">=" => Ok(MatchOp::Ge),
            "has-process" => Ok(MatchOp::HasProcess),
            "has-attribute" => Ok(MatchOp::HasAttribute),
            "has-sample" => Ok(MatchOp::HasSample),
            _ => Err(()),
        }
    }
}
