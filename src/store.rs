// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! The process-wide snapshot registry: one immutable [`Snapshot`] per
//! project id, loaded through a [`SnapshotSource`].
//!
//! Snapshots are published as `Arc`s out of an `RwLock`ed map; a query
//! clones the `Arc` and evaluates w/o holding any lock. Since snapshots are
//! immutable this satisfies the required property: from the moment a query
//! obtains its snapshot until it finishes, that snapshot is never mutated.
//! A concurrent reload swaps the map entry w/o touching in-flight queries.
//! Builds themselves are serialized by an async mutex.
//!

use crate::{
    MqlError,
    ds::SnapshotSource,
    evaluator::{QueryResults, eval_statement},
    loader::load_project,
    snapshot::Snapshot,
    statement::{Selection, Statement},
};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tokio::sync::Mutex;
use tracing::debug;

/// Registry of per-project snapshots over a [`SnapshotSource`].
#[derive(Debug)]
pub struct SnapshotStore<S> {
    source: S,
    snapshots: RwLock<HashMap<i64, Arc<Snapshot>>>,
    // serializes load/reload builds...
    load_lock: Mutex<()>,
}

impl<S> SnapshotStore<S>
where
    S: SnapshotSource + Sync,
{
    /// Create an empty registry over the given source.
    pub fn new(source: S) -> Self {
        SnapshotStore {
            source,
            snapshots: RwLock::new(HashMap::new()),
            load_lock: Mutex::new(()),
        }
    }

    /// Load a project's snapshot unless it is already present (idempotent).
    pub async fn load(&self, project_id: i64) -> Result<Arc<Snapshot>, MqlError> {
        if let Some(snapshot) = self.get(project_id) {
            debug!("project {project_id} already loaded");
            return Ok(snapshot);
        }

        let _guard = self.load_lock.lock().await;
        // somebody else may have built it while we waited...
        if let Some(snapshot) = self.get(project_id) {
            return Ok(snapshot);
        }
        let snapshot = Arc::new(load_project(&self.source, project_id).await?);
        self.publish(project_id, snapshot.clone());
        Ok(snapshot)
    }

    /// Rebuild a project's snapshot unconditionally and swap it in.
    /// Queries already holding the previous snapshot are unaffected.
    pub async fn reload(&self, project_id: i64) -> Result<Arc<Snapshot>, MqlError> {
        let _guard = self.load_lock.lock().await;
        let snapshot = Arc::new(load_project(&self.source, project_id).await?);
        self.publish(project_id, snapshot.clone());
        Ok(snapshot)
    }

    /// The currently published snapshot of a project, if any.
    pub fn get(&self, project_id: i64) -> Option<Arc<Snapshot>> {
        self.snapshots
            .read()
            .expect("snapshot registry poisoned")
            .get(&project_id)
            .cloned()
    }

    /// Run a statement against a loaded project.
    ///
    /// A zero project id is refused w/ [`MqlError::UnknownProject`]; a
    /// project that was never [`load`][Self::load]ed w/
    /// [`MqlError::ProjectNotLoaded`].
    pub fn execute(
        &self,
        project_id: i64,
        selection: Selection,
        statement: Option<&Statement>,
    ) -> Result<QueryResults, MqlError> {
        if project_id == 0 {
            return Err(MqlError::UnknownProject(project_id));
        }
        let snapshot = self
            .get(project_id)
            .ok_or(MqlError::ProjectNotLoaded(project_id))?;
        Ok(eval_statement(&snapshot, selection, statement))
    }

    fn publish(&self, project_id: i64, snapshot: Arc<Snapshot>) {
        self.snapshots
            .write()
            .expect("snapshot registry poisoned")
            .insert(project_id, snapshot);
    }
}
