// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Errors raised from this library.
//!
//! Evaluation itself never raises: type mismatches, missing attributes and
//! missing edges all degrade to "no match" so a query always produces a
//! well-formed result set. Everything below happens at the boundaries
//! --parsing, lowering, loading, request validation.
//!

use thiserror::Error;

/// Variants of error raised from this library.
#[derive(Debug, Error)]
pub enum MqlError {
    /// I/O errors, e.g. while reading the dotenv file.
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),

    /// Syntax errors collected by the parser; the input did not yield a
    /// clean AST.
    #[error("parse error(s): {}", .0.join("; "))]
    Parse(Vec<String>),

    /// The first statement of the input was not a `select`.
    #[error("no selection statement")]
    NoSelection,

    /// JSON statement (`serde`) related error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON statement carried a `field_type` code outside 1..=6.
    #[error("unknown field type code: {0}")]
    UnknownFieldType(i64),

    /// The JSON statement carried an operation w/ no known spelling.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    /// The JSON statement carried a non-scalar `value`.
    #[error("unsupported value in statement: {0}")]
    InvalidValue(String),

    /// No project row w/ the given id exists in the backing store.
    #[error("project not found: {0}")]
    ProjectNotFound(i64),

    /// A zero or otherwise unusable project id in a request.
    #[error("unknown project: {0}")]
    UnknownProject(i64),

    /// A query arrived for a project whose snapshot was never loaded.
    #[error("project not loaded: {0}")]
    ProjectNotLoaded(i64),

    /// Relational store (`sqlx`) related error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}
