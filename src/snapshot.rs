// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! The in-memory, per-project snapshot the evaluator runs against: a
//! denormalized sample/process/attribute graph + the reverse indices that
//! make queries cheap.
//!
//! A snapshot is immutable once [built][SnapshotBuilder::build]; readers
//! share it (behind an `Arc`) and use it unsynchronized.
//!

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A recorded experimental or computational step (aka _Activity_).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    /// Primary id.
    pub id: i64,
    /// Process name, e.g. "EBSD".
    pub name: String,
    /// Attributes attached to this process.
    pub attributes: Vec<Attribute>,
}

/// A physical specimen or data item (aka _Entity_). A sample has one or
/// more states representing its history; each state carries an independent
/// attribute set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Primary id.
    pub id: i64,
    /// Sample name, e.g. "S1".
    pub name: String,
    /// Historical states, in load order.
    pub states: Vec<SampleState>,
}

/// One historical state of a [`Sample`] (aka _EntityState_).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleState {
    /// Primary id.
    pub id: i64,
    /// Attributes attached to this state.
    pub attributes: Vec<Attribute>,
}

/// A named property of a process or sample state. Zero values is legal; the
/// attribute is then present-but-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name, e.g. "Beam Type".
    pub name: String,
    /// Attribute values, in load order.
    pub values: Vec<AttributeValue>,
}

impl Attribute {
    /// Construct from a name + values.
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Attribute {
            name: name.into(),
            values,
        }
    }
}

/// A single typed attribute value. Source data may carry other value kinds;
/// those never make it into a snapshot and predicate matching ignores them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
}

/// Immutable per-project graph + indices.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// The project this snapshot was loaded for.
    pub project_id: i64,
    processes: Vec<Process>,
    samples: Vec<Sample>,
    // id -> offset into the entity vectors...
    process_ndx: HashMap<i64, usize>,
    sample_ndx: HashMap<i64, usize>,
    // process id -> attribute name -> attribute...
    process_attrs: HashMap<i64, HashMap<String, Attribute>>,
    // sample id -> state id -> attribute name -> attribute...
    sample_attrs: HashMap<i64, HashMap<i64, HashMap<String, Attribute>>>,
    // relationship edges, mutual inverses of each other...
    process_samples: HashMap<i64, Vec<i64>>,
    sample_processes: HashMap<i64, Vec<i64>>,
}

impl Snapshot {
    /// All processes of the project.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// All samples of the project.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Look a process up by id.
    pub fn process(&self, id: i64) -> Option<&Process> {
        self.process_ndx.get(&id).map(|&ndx| &self.processes[ndx])
    }

    /// Look a sample up by id.
    pub fn sample(&self, id: i64) -> Option<&Sample> {
        self.sample_ndx.get(&id).map(|&ndx| &self.samples[ndx])
    }

    /// The named attributes of a process; `None` when it has none.
    pub fn process_attrs(&self, process_id: i64) -> Option<&HashMap<String, Attribute>> {
        self.process_attrs.get(&process_id)
    }

    /// The named attributes of one sample state; `None` when absent.
    pub fn sample_state_attrs(
        &self,
        sample_id: i64,
        state_id: i64,
    ) -> Option<&HashMap<String, Attribute>> {
        self.sample_attrs
            .get(&sample_id)
            .and_then(|states| states.get(&state_id))
    }

    /// Ids of the samples produced/consumed by a process.
    pub fn samples_of(&self, process_id: i64) -> &[i64] {
        self.process_samples
            .get(&process_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids of the processes a sample took part in.
    pub fn processes_of(&self, sample_id: i64) -> &[i64] {
        self.sample_processes
            .get(&sample_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Accumulates rows into a [`Snapshot`]. Used by the loader; handy for
/// tests that want a graph w/o a backing store.
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Start an empty snapshot for the given project.
    pub fn new(project_id: i64) -> Self {
        SnapshotBuilder {
            snapshot: Snapshot {
                project_id,
                ..Snapshot::default()
            },
        }
    }

    /// Add a process. Attributes come later via [`set_process_attr`][Self::set_process_attr].
    pub fn add_process(&mut self, id: i64, name: impl Into<String>) -> &mut Self {
        let s = &mut self.snapshot;
        s.process_ndx.insert(id, s.processes.len());
        s.processes.push(Process {
            id,
            name: name.into(),
            attributes: vec![],
        });
        self
    }

    /// Add a sample together w/ its state ids, oldest first.
    pub fn add_sample(&mut self, id: i64, name: impl Into<String>, state_ids: &[i64]) -> &mut Self {
        let s = &mut self.snapshot;
        s.sample_ndx.insert(id, s.samples.len());
        s.samples.push(Sample {
            id,
            name: name.into(),
            states: state_ids
                .iter()
                .map(|&sid| SampleState {
                    id: sid,
                    attributes: vec![],
                })
                .collect(),
        });
        self
    }

    /// Attach an attribute to a process. Unknown processes are dropped.
    pub fn set_process_attr(&mut self, process_id: i64, attr: Attribute) -> &mut Self {
        let s = &mut self.snapshot;
        if !s.process_ndx.contains_key(&process_id) {
            debug!("dropping attribute '{}' of unknown process {process_id}", attr.name);
            return self;
        }
        s.process_attrs
            .entry(process_id)
            .or_default()
            .insert(attr.name.clone(), attr);
        self
    }

    /// Attach an attribute to one state of a sample. The state must belong
    /// to the sample, otherwise the row is dropped.
    pub fn set_sample_attr(&mut self, sample_id: i64, state_id: i64, attr: Attribute) -> &mut Self {
        let s = &mut self.snapshot;
        let known_state = s
            .sample_ndx
            .get(&sample_id)
            .map(|&ndx| s.samples[ndx].states.iter().any(|st| st.id == state_id))
            .unwrap_or(false);
        if !known_state {
            debug!(
                "dropping attribute '{}' of unknown sample/state {sample_id}/{state_id}",
                attr.name
            );
            return self;
        }
        s.sample_attrs
            .entry(sample_id)
            .or_default()
            .entry(state_id)
            .or_default()
            .insert(attr.name.clone(), attr);
        self
    }

    /// Record one process/sample edge, filling both directions. Edges w/ a
    /// missing endpoint are silently dropped; duplicates are kept (results
    /// deduplicate on the way out).
    pub fn link(&mut self, process_id: i64, sample_id: i64) -> &mut Self {
        let s = &mut self.snapshot;
        if !s.process_ndx.contains_key(&process_id) || !s.sample_ndx.contains_key(&sample_id) {
            debug!("dropping dangling edge {process_id} <-> {sample_id}");
            return self;
        }
        s.process_samples
            .entry(process_id)
            .or_default()
            .push(sample_id);
        s.sample_processes
            .entry(sample_id)
            .or_default()
            .push(process_id);
        self
    }

    /// Finish: walk the indices and attach attributes onto the `Process`
    /// and `SampleState` entries so downstream code has object-level access
    /// as well as index-level access.
    pub fn build(mut self) -> Snapshot {
        let s = &mut self.snapshot;
        for process in &mut s.processes {
            if let Some(attrs) = s.process_attrs.get(&process.id) {
                process.attributes = attrs.values().cloned().collect();
            }
        }
        for sample in &mut s.samples {
            if let Some(states) = s.sample_attrs.get(&sample.id) {
                for state in &mut sample.states {
                    if let Some(attrs) = states.get(&state.id) {
                        state.attributes = attrs.values().cloned().collect();
                    }
                }
            }
        }
        self.snapshot
    }
}
