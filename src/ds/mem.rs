// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! In-memory [`SnapshotSource`]: plain row vectors standing in for the
//! relational store. Used by tests and benches to exercise the loader w/o
//! a database.
//!

use crate::{
    MqlError,
    ds::{
        AttributableKind, AttributeRow, AttributeValueRow, LinkRow, ProcessRow, SampleRow,
        SnapshotSource, StateRow, VALUE_TYPE_FLOAT, VALUE_TYPE_INT, VALUE_TYPE_STRING,
    },
    snapshot::AttributeValue,
};
use async_trait::async_trait;

/// Row vectors of a single project.
#[derive(Debug, Default)]
pub struct MemSource {
    project_id: i64,
    processes: Vec<ProcessRow>,
    samples: Vec<SampleRow>,
    states: Vec<StateRow>,
    process_attrs: Vec<AttributeRow>,
    sample_attrs: Vec<AttributeRow>,
    values: Vec<AttributeValueRow>,
    links: Vec<LinkRow>,
    next_attr_id: i64,
}

impl MemSource {
    /// Start an empty source holding the given project.
    pub fn new(project_id: i64) -> Self {
        MemSource {
            project_id,
            next_attr_id: 1,
            ..MemSource::default()
        }
    }

    /// Add a process row.
    pub fn add_process(&mut self, id: i64, name: &str) -> &mut Self {
        self.processes.push(ProcessRow {
            id,
            name: name.to_owned(),
        });
        self
    }

    /// Add a sample row together w/ its state ids.
    pub fn add_sample(&mut self, id: i64, name: &str, state_ids: &[i64]) -> &mut Self {
        self.samples.push(SampleRow {
            id,
            name: name.to_owned(),
        });
        for &sid in state_ids {
            self.states.push(StateRow {
                id: sid,
                sample_id: id,
            });
        }
        self
    }

    /// Add an attribute row + its value rows for a process.
    pub fn add_process_attr(
        &mut self,
        process_id: i64,
        name: &str,
        values: Vec<AttributeValue>,
    ) -> &mut Self {
        let id = self.alloc_attr_id();
        self.process_attrs.push(AttributeRow {
            id,
            name: name.to_owned(),
            attributable_id: process_id,
        });
        self.push_values(id, values);
        self
    }

    /// Add an attribute row + its value rows for a sample state.
    pub fn add_sample_attr(
        &mut self,
        state_id: i64,
        name: &str,
        values: Vec<AttributeValue>,
    ) -> &mut Self {
        let id = self.alloc_attr_id();
        self.sample_attrs.push(AttributeRow {
            id,
            name: name.to_owned(),
            attributable_id: state_id,
        });
        self.push_values(id, values);
        self
    }

    /// Add one `(process, sample)` join row.
    pub fn add_link(&mut self, process_id: i64, sample_id: i64) -> &mut Self {
        self.links.push(LinkRow {
            process_id,
            sample_id,
        });
        self
    }

    fn alloc_attr_id(&mut self) -> i64 {
        let id = self.next_attr_id;
        self.next_attr_id += 1;
        id
    }

    fn push_values(&mut self, attribute_id: i64, values: Vec<AttributeValue>) {
        for value in values {
            let row = match value {
                AttributeValue::Int(x) => AttributeValueRow {
                    attribute_id,
                    value_type: VALUE_TYPE_INT,
                    value_int: Some(x),
                    value_float: None,
                    value_string: None,
                },
                AttributeValue::Float(x) => AttributeValueRow {
                    attribute_id,
                    value_type: VALUE_TYPE_FLOAT,
                    value_int: None,
                    value_float: Some(x),
                    value_string: None,
                },
                AttributeValue::Str(x) => AttributeValueRow {
                    attribute_id,
                    value_type: VALUE_TYPE_STRING,
                    value_int: None,
                    value_float: None,
                    value_string: Some(x),
                },
            };
            self.values.push(row);
        }
    }

    fn attr_rows(&self, kind: AttributableKind) -> &[AttributeRow] {
        match kind {
            AttributableKind::Process => &self.process_attrs,
            AttributableKind::SampleState => &self.sample_attrs,
        }
    }
}

#[async_trait]
impl SnapshotSource for MemSource {
    async fn project_exists(&self, project_id: i64) -> Result<bool, MqlError> {
        Ok(project_id == self.project_id)
    }

    async fn processes(&self, project_id: i64) -> Result<Vec<ProcessRow>, MqlError> {
        Ok(if project_id == self.project_id {
            self.processes.clone()
        } else {
            vec![]
        })
    }

    async fn samples(&self, project_id: i64) -> Result<Vec<SampleRow>, MqlError> {
        Ok(if project_id == self.project_id {
            self.samples.clone()
        } else {
            vec![]
        })
    }

    async fn sample_states(&self, project_id: i64) -> Result<Vec<StateRow>, MqlError> {
        Ok(if project_id == self.project_id {
            self.states.clone()
        } else {
            vec![]
        })
    }

    async fn attributes(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeRow>, MqlError> {
        Ok(if project_id == self.project_id {
            self.attr_rows(kind).to_vec()
        } else {
            vec![]
        })
    }

    async fn attribute_values(
        &self,
        project_id: i64,
        kind: AttributableKind,
    ) -> Result<Vec<AttributeValueRow>, MqlError> {
        if project_id != self.project_id {
            return Ok(vec![]);
        }
        // only the values whose attribute row is of the requested kind...
        let ids: Vec<i64> = self.attr_rows(kind).iter().map(|a| a.id).collect();
        Ok(self
            .values
            .iter()
            .filter(|v| ids.contains(&v.attribute_id))
            .cloned()
            .collect())
    }

    async fn links(&self, project_id: i64) -> Result<Vec<LinkRow>, MqlError> {
        Ok(if project_id == self.project_id {
            self.links.clone()
        } else {
            vec![]
        })
    }
}
