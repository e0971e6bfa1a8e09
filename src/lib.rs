// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! MQL ("Materials Query Language") parser and in-memory query engine.
//!
//! The next paragraphs explain in more detail the elements of this project
//! as well as the rationale behind some of the decisions that shaped its
//! components.
//!
//! # Queries
//!
//! The kernel of this project is the [`Query`]: a pair of a [`Selection`]
//! (which result classes the caller wants back) and an IR [`Statement`]
//! tree (the predicate to run). Queries arrive in one of two encodings:
//!
//! * MQL text, a small SQL-flavored language --lexed, parsed and lowered
//!   by this crate's front-end:
//! ```rust
//! use mc_mql::Query;
//!
//! # fn test() -> Result<(), mc_mql::MqlError> {
//! let q = Query::try_from_mql(
//!     r#"select samples where sample:hardness > 5 and sample:color = "blue";"#,
//! )?;
//! # Ok(())
//! # }
//! ```
//! * a pre-lowered JSON statement tree, for callers on the REST path that
//!   build predicates programmatically:
//! ```rust
//! use mc_mql::{Query, Selection};
//!
//! # fn test() -> Result<(), mc_mql::MqlError> {
//! let q = Query::try_from_json(
//!     r#"{ "field_type": 4, "field_name": "alloy", "operation": "=", "value": "zn45" }"#,
//!     Selection::samples(),
//! )?;
//! # Ok(())
//! # }
//! ```
//! An `Ok` result implies a syntactically correct, fully lowered query!
//! Parse errors are collected by the [parser][crate::parser::Parser] rather
//! than raised; [`Query::try_from_mql`] surfaces them as
//! [`MqlError::Parse`] while the lower-level API hands back the partial
//! AST + the error list for callers that want both.
//!
//! For convenience, a standalone tool is included that can be used from the
//! command line to quickly test the validity of candidate queries. Once the
//! library is built, invoke it by calling:
//! ```bash
//! cargo r --bin repl
//! ```
//!
//! # Snapshots
//!
//! A [`Query`] on its own is close to useless unless it is evaluated
//! against a project's data. Execution runs against an in-memory
//! [`Snapshot`]: a denormalized graph of [`Process`]es, [`Sample`]s (each
//! w/ one or more historical [`SampleState`]s), their [`Attribute`]s, and
//! the process/sample relationship edges, plus the reverse indices that
//! make predicate checks cheap.
//!
//! Snapshots are built once per project by the [loader][crate::load_project]
//! from a [`SnapshotSource`] --the trait that abstracts the relational
//! store. Two implementations are provided: [`PgSnapshotSource`] for a
//! PostgreSQL materials store, and [`MemSource`], an in-memory stand-in
//! used by the test suite and the benchmarks.
//!
//! # Evaluation
//!
//! [`eval_statement`] interprets an IR tree against a snapshot and returns
//! [`QueryResults`]: the matching processes and/or samples, deduplicated by
//! id, in unspecified order. Predicates over one category can still select
//! the other ("samples whose processes satisfy P") through the relationship
//! indices --see [`eval_statement`] for the two-pass scheme. Evaluation
//! never raises; the worst case is an empty result.
//!
//! # Serving many projects
//!
//! [`SnapshotStore`] keeps one immutable snapshot per project id and exposes
//! the three operations a front-end server needs: `load` (idempotent),
//! `reload` (always rebuilds) and `execute`. Snapshots are shared as `Arc`s,
//! so a reload never disturbs queries in flight.
//!
//! # Configuration
//!
//! The `MC_DOTENV_PATH` environment variable names a `.env`-format file
//! providing the store DSN --see [config][crate::config()].
//!
//! # Third-party crates
//!
//! The most important ones...
//!
//! 1. Persistence:
//!    * [`sqlx`](https://crates.io/crates/sqlx): async Postgres driver the
//!      [`PgSnapshotSource`] reads through.
//! 2. JSON deserialization:
//!    * [`serde`](https://crates.io/crates/serde) +
//!      [`serde_json`](https://crates.io/crates/serde_json): for the JSON
//!      statement encoding and result serialization.
//! 3. Diagnostics:
//!    * [`tracing`](https://crates.io/crates/tracing): structured debug
//!      output from the loader and the evaluator.
//! 4. Errors:
//!    * [`thiserror`](https://crates.io/crates/thiserror): the [`MqlError`]
//!      taxonomy.
//!

pub mod ast;
mod config;
mod ds;
mod error;
mod evaluator;
pub mod lexer;
mod loader;
mod lower;
mod op;
pub mod parser;
mod snapshot;
mod statement;
mod store;
pub mod token;

mod json;

pub use config::{Config, config};
pub use ds::*;
pub use evaluator::*;
pub use json::*;
pub use loader::*;
pub use lower::*;
pub use op::*;
pub use snapshot::*;
pub use statement::*;
pub use store::*;

pub mod prelude;

use crate::parser::Parser;
use core::fmt;
pub use error::MqlError;

/// A fully lowered, evaluator-ready query: what to return + how to filter.
#[derive(Debug)]
pub struct Query {
    /// Result classes the caller asked for.
    pub selection: Selection,
    /// The predicate; `None` when the select carried no usable where
    /// clause (such a query evaluates to empty result sets).
    pub statement: Option<Statement>,
}

impl Query {
    /// Try to construct from MQL text.
    pub fn try_from_mql(input: &str) -> Result<Self, MqlError> {
        let mut parser = Parser::from_input(input);
        let mql = parser.parse_mql();
        if !parser.errors().is_empty() {
            return Err(MqlError::Parse(parser.errors().to_vec()));
        }
        let (selection, statement) = ast_to_selection(&mql)?;
        Ok(Query {
            selection,
            statement,
        })
    }

    /// Try to construct from a JSON-encoded statement tree. The selection
    /// travels separately on the wire, so the caller provides it.
    pub fn try_from_json(input: &str, selection: Selection) -> Result<Self, MqlError> {
        let statement = JsonStatement::try_from_str(input)?.to_ir()?;
        Ok(Query {
            selection,
            statement: Some(statement),
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut classes = vec![];
        if self.selection.select_processes {
            classes.push("processes");
        }
        if self.selection.select_samples {
            classes.push("samples");
        }
        write!(f, "select {}", classes.join(", "))?;
        if let Some(stmt) = &self.statement {
            write!(f, " where {stmt}")?;
        }
        Ok(())
    }
}
