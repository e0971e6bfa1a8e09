// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Builds a [`Snapshot`] from a [`SnapshotSource`].
//!

use crate::{
    MqlError,
    ds::{AttributableKind, AttributeValueRow, SnapshotSource},
    snapshot::{Attribute, AttributeValue, Snapshot, SnapshotBuilder},
};
use std::collections::HashMap;
use tracing::debug;

/// Pull one project's rows and assemble the in-memory graph.
///
/// Fails w/ [`MqlError::ProjectNotFound`] when the project row is absent and
/// w/ [`MqlError::Sql`] on store trouble; everything else degrades (dangling
/// attribute rows and edges are dropped, unknown value types are skipped).
pub async fn load_project<S>(source: &S, project_id: i64) -> Result<Snapshot, MqlError>
where
    S: SnapshotSource + Sync,
{
    if !source.project_exists(project_id).await? {
        return Err(MqlError::ProjectNotFound(project_id));
    }

    let mut builder = SnapshotBuilder::new(project_id);

    // processes + their attributes...
    let processes = source.processes(project_id).await?;
    debug!("project {project_id}: {} processes", processes.len());
    for row in &processes {
        builder.add_process(row.id, &row.name);
    }
    let attrs = source
        .attributes(project_id, AttributableKind::Process)
        .await?;
    let mut values = group_values(
        source
            .attribute_values(project_id, AttributableKind::Process)
            .await?,
    );
    for row in attrs {
        let attr = Attribute::new(&row.name, values.remove(&row.id).unwrap_or_default());
        builder.set_process_attr(row.attributable_id, attr);
    }

    // samples + their states...
    let samples = source.samples(project_id).await?;
    let states = source.sample_states(project_id).await?;
    debug!(
        "project {project_id}: {} samples, {} states",
        samples.len(),
        states.len()
    );
    let mut states_by_sample: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut sample_by_state: HashMap<i64, i64> = HashMap::new();
    for row in &states {
        states_by_sample.entry(row.sample_id).or_default().push(row.id);
        sample_by_state.insert(row.id, row.sample_id);
    }
    for row in &samples {
        let state_ids = states_by_sample.remove(&row.id).unwrap_or_default();
        builder.add_sample(row.id, &row.name, &state_ids);
    }

    // sample attributes hang off entity states; map each one back to the
    // sample its state belongs to...
    let attrs = source
        .attributes(project_id, AttributableKind::SampleState)
        .await?;
    let mut values = group_values(
        source
            .attribute_values(project_id, AttributableKind::SampleState)
            .await?,
    );
    for row in attrs {
        let Some(&sample_id) = sample_by_state.get(&row.attributable_id) else {
            debug!(
                "dropping attribute '{}' of unknown state {}",
                row.name, row.attributable_id
            );
            continue;
        };
        let attr = Attribute::new(&row.name, values.remove(&row.id).unwrap_or_default());
        builder.set_sample_attr(sample_id, row.attributable_id, attr);
    }

    // the join table fills both edge directions in one pass...
    for row in source.links(project_id).await? {
        builder.link(row.process_id, row.sample_id);
    }

    Ok(builder.build())
}

// Group value rows by owning attribute, skipping rows w/ unknown type codes.
fn group_values(rows: Vec<AttributeValueRow>) -> HashMap<i64, Vec<AttributeValue>> {
    let mut grouped: HashMap<i64, Vec<AttributeValue>> = HashMap::new();
    for row in rows {
        match row.to_value() {
            Some(value) => grouped.entry(row.attribute_id).or_default().push(value),
            None => debug!(
                "skipping value of attribute {} w/ unknown type {}",
                row.attribute_id, row.value_type
            ),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::MemSource;

    fn source() -> MemSource {
        let mut src = MemSource::new(7);
        src.add_process(1, "EBSD")
            .add_process(2, "Texture")
            .add_sample(1, "S1", &[10, 11])
            .add_process_attr(1, "frames per second", vec![AttributeValue::Int(5)])
            .add_sample_attr(11, "zn", vec![AttributeValue::Float(0.5)])
            .add_link(1, 1)
            .add_link(2, 1);
        src
    }

    #[tokio::test]
    async fn test_load_project() {
        let snap = load_project(&source(), 7).await.expect("load failed");
        assert_eq!(snap.project_id, 7);
        assert_eq!(snap.processes().len(), 2);
        assert_eq!(snap.samples().len(), 1);

        // index-level access...
        assert!(snap.process_attrs(1).unwrap().contains_key("frames per second"));
        assert!(snap.sample_state_attrs(1, 11).unwrap().contains_key("zn"));
        // ...and object-level access to the same attributes.
        assert_eq!(snap.process(1).unwrap().attributes.len(), 1);
        let sample = snap.sample(1).unwrap();
        assert!(sample.states[0].attributes.is_empty());
        assert_eq!(sample.states[1].attributes.len(), 1);

        // both edge directions...
        assert_eq!(snap.processes_of(1), &[1, 2]);
        assert_eq!(snap.samples_of(1), &[1]);
        assert_eq!(snap.samples_of(2), &[1]);
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let err = load_project(&source(), 99).await.unwrap_err();
        assert!(matches!(err, MqlError::ProjectNotFound(99)));
    }
}
