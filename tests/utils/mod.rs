// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

//! Test harnesses and artifacts shared by the integration tests: the
//! reference project graph (3 samples w/ 2 states each, 4 processes) and
//! helpers to run queries against it.
//!

use mc_mql::prelude::*;

pub(crate) const PROJECT_ID: i64 = 1;

/// Row-level version of the reference dataset, for exercising the loader.
pub(crate) fn reference_source() -> MemSource {
    let mut src = MemSource::new(PROJECT_ID);

    src.add_process(1, "EBSD")
        .add_process(2, "EBSD")
        .add_process(3, "Texture")
        .add_process(4, "Texture");

    // first EBSD process attributes...
    src.add_process_attr(1, "Beam Type", vec![AttributeValue::Str("Wide".into())])
        .add_process_attr(1, "frames per second", vec![AttributeValue::Int(5)])
        .add_process_attr(
            1,
            "note",
            vec![AttributeValue::Str("ignore these results".into())],
        );

    // second EBSD process attributes...
    src.add_process_attr(2, "Beam Type", vec![AttributeValue::Str("Thin".into())])
        .add_process_attr(2, "frames per second", vec![AttributeValue::Int(3)]);

    // first Texture process attributes...
    src.add_process_attr(3, "PF scale max", vec![AttributeValue::Int(2)])
        .add_process_attr(
            3,
            "note",
            vec![AttributeValue::Str("ignore these results".into())],
        );

    // second Texture process attributes...
    src.add_process_attr(4, "PF scale max", vec![AttributeValue::Int(3)]);

    // samples + their per-state attributes...
    src.add_sample(1, "S1", &[1, 2]);
    src.add_sample_attr(1, "zn", vec![AttributeValue::Float(0.5)])
        .add_sample_attr(1, "mg", vec![AttributeValue::Float(0.4)]);
    src.add_sample_attr(2, "zn", vec![AttributeValue::Float(0.5)])
        .add_sample_attr(2, "mg", vec![AttributeValue::Float(0.5)])
        .add_sample_attr(2, "hardness", vec![AttributeValue::Int(1)]);

    src.add_sample(2, "S2", &[3, 4]);
    src.add_sample_attr(3, "zn", vec![AttributeValue::Float(0.5)])
        .add_sample_attr(3, "mg", vec![AttributeValue::Float(0.4)])
        .add_sample_attr(3, "ductility", vec![AttributeValue::Float(0.81)])
        .add_sample_attr(3, "alloy", vec![AttributeValue::Str("zn45".into())]);
    src.add_sample_attr(4, "zn", vec![AttributeValue::Float(0.6)])
        .add_sample_attr(4, "mg", vec![AttributeValue::Float(0.3)])
        .add_sample_attr(4, "bend", vec![AttributeValue::Str("Right".into())]);

    src.add_sample(3, "S3", &[5, 6]);
    src.add_sample_attr(5, "zn", vec![AttributeValue::Float(0.68)])
        .add_sample_attr(5, "mg", vec![AttributeValue::Float(0.32)]);
    src.add_sample_attr(6, "zn", vec![AttributeValue::Float(0.45)])
        .add_sample_attr(6, "mg", vec![AttributeValue::Float(0.45)]);

    // process <-> sample edges...
    src.add_link(1, 1).add_link(1, 2); // EBSD #1
    src.add_link(2, 3); //                EBSD #2
    src.add_link(3, 1).add_link(3, 2); // Texture #1
    src.add_link(4, 3); //                Texture #2

    src
}

/// The reference graph, loaded through the loader.
pub(crate) async fn reference_snapshot() -> Snapshot {
    load_project(&reference_source(), PROJECT_ID)
        .await
        .expect("failed loading the reference dataset")
}

/// Parse + lower an MQL query and run it against a snapshot.
pub(crate) fn eval_mql(snapshot: &Snapshot, input: &str) -> QueryResults {
    let query = Query::try_from_mql(input).expect("query failed to parse");
    eval_statement(snapshot, query.selection, query.statement.as_ref())
}

/// Matching process ids, sorted (result order is unspecified).
pub(crate) fn process_ids(results: &QueryResults) -> Vec<i64> {
    let mut ids: Vec<i64> = results.processes.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}

/// Matching sample ids, sorted (result order is unspecified).
pub(crate) fn sample_ids(results: &QueryResults) -> Vec<i64> {
    let mut ids: Vec<i64> = results.samples.iter().map(|s| s.id).collect();
    ids.sort_unstable();
    ids
}
