// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Sources of snapshot rows: the trait the [loader][crate::load_project]
//! pulls from, plus the provided implementations (a Postgres store and an
//! in-memory one for tests and benches).
//!

mod mem;
mod pg;

pub use mem::*;
pub use pg::*;

use crate::{MqlError, snapshot::AttributeValue};
use async_trait::async_trait;
use sqlx::FromRow;

// Wire codes of the typed attribute values in the backing store. Codes
// outside this set exist in source data and are ignored.
pub(crate) const VALUE_TYPE_INT: i32 = 1;
pub(crate) const VALUE_TYPE_FLOAT: i32 = 2;
pub(crate) const VALUE_TYPE_STRING: i32 = 3;

/// Which entity kind an attribute row hangs off of. Maps to the store's
/// `attributable_type` discriminator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributableKind {
    /// Attributes of processes (`attributable_type = 'Activity'`).
    Process,
    /// Attributes of sample states (`attributable_type = 'EntityState'`).
    SampleState,
}

impl AttributableKind {
    /// The discriminator value as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributableKind::Process => "Activity",
            AttributableKind::SampleState => "EntityState",
        }
    }
}

/// One process row.
#[derive(Debug, Clone, FromRow)]
pub struct ProcessRow {
    /// Primary id.
    pub id: i64,
    /// Process name.
    pub name: String,
}

/// One sample row.
#[derive(Debug, Clone, FromRow)]
pub struct SampleRow {
    /// Primary id.
    pub id: i64,
    /// Sample name.
    pub name: String,
}

/// One sample-state row.
#[derive(Debug, Clone, FromRow)]
pub struct StateRow {
    /// Primary id.
    pub id: i64,
    /// The sample this state belongs to.
    pub sample_id: i64,
}

/// One attribute row. `attributable_id` points at a process or a sample
/// state depending on the [`AttributableKind`] it was fetched under.
#[derive(Debug, Clone, FromRow)]
pub struct AttributeRow {
    /// Primary id; attribute values reference it.
    pub id: i64,
    /// Attribute name.
    pub name: String,
    /// Owning process or sample-state id.
    pub attributable_id: i64,
}

/// One attribute-value row, typed by `value_type`.
#[derive(Debug, Clone, FromRow)]
pub struct AttributeValueRow {
    /// The attribute this value belongs to.
    pub attribute_id: i64,
    /// Type discriminator --see the `VALUE_TYPE_*` codes.
    pub value_type: i32,
    /// Payload when integer-typed.
    pub value_int: Option<i64>,
    /// Payload when float-typed.
    pub value_float: Option<f64>,
    /// Payload when string-typed.
    pub value_string: Option<String>,
}

impl AttributeValueRow {
    /// Materialize the typed value; `None` for unknown type codes or a
    /// missing payload.
    pub fn to_value(&self) -> Option<AttributeValue> {
        match self.value_type {
            VALUE_TYPE_INT => self.value_int.map(AttributeValue::Int),
            VALUE_TYPE_FLOAT => self.value_float.map(AttributeValue::Float),
            VALUE_TYPE_STRING => self.value_string.clone().map(AttributeValue::Str),
            _ => None,
        }
    }
}

/// One `(activity, entity)` join-table row.
#[derive(Debug, Clone, FromRow)]
pub struct LinkRow {
    /// Process side of the edge.
    pub process_id: i64,
    /// Sample side of the edge.
    pub sample_id: i64,
}

/// Capability of providing the rows of one project's graph. The loader is
/// written against this so a mock can stand in for the relational store.
#[async_trait]
pub trait SnapshotSource {
    /// Return TRUE if a project row w/ the given id exists.
    async fn project_exists(&self, project_id: i64) -> Result<bool, MqlError>;

    /// All processes of the project.
    async fn processes(&self, project_id: i64) -> Result<Vec<ProcessRow>, MqlError>;

    /// All samples of the project.
    async fn samples(&self, project_id: i64) -> Result<Vec<SampleRow>, MqlError>;

    /// All sample states of the project, oldest first per sample.
    async fn sample_states(&self, project_id: i64) -> Result<Vec<StateRow>, MqlError>;

    /// Attribute rows of the project filtered to one attributable kind.
    async fn attributes(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeRow>, MqlError>;

    /// Attribute-value rows matching [`attributes`][Self::attributes].
    async fn attribute_values(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeValueRow>, MqlError>;

    /// The `(activity_id, entity_id)` join rows of the project.
    async fn links(&self, project_id: i64) -> Result<Vec<LinkRow>, MqlError>;
}
