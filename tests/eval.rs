// SPDX-License-Identifier: Apache-2.0

//! Evaluator conformance over the reference dataset using hand-built IR
//! trees (the JSON-path shape of a query).
//!

mod utils;

use mc_mql::prelude::*;
use utils::{process_ids, reference_snapshot, sample_ids};

fn leaf(field: FieldKind, name: &str, op: MatchOp, value: Scalar) -> Statement {
    Statement::matching(field, name, op, value)
}

#[tokio::test]
async fn test_simple_process_queries() {
    let snap = reference_snapshot().await;

    let by_name = leaf(
        FieldKind::ProcessField,
        "name",
        MatchOp::Eq,
        Scalar::Str("Texture".into()),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&by_name));
    assert_eq!(process_ids(&results), [3, 4], "name = 'Texture'");

    let by_attr = leaf(
        FieldKind::ProcessAttribute,
        "frames per second",
        MatchOp::Gt,
        Scalar::Int(3),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&by_attr));
    assert_eq!(process_ids(&results), [1], "'frames per second' > 3");

    let either = Statement::Or(Box::new(by_name.clone()), Box::new(by_attr.clone()));
    let results = eval_statement(&snap, Selection::processes(), Some(&either));
    assert_eq!(process_ids(&results), [1, 3, 4]);

    let noted_textures = Statement::And(
        Box::new(leaf(
            FieldKind::ProcessAttribute,
            "note",
            MatchOp::Eq,
            Scalar::Str("ignore these results".into()),
        )),
        Box::new(by_name.clone()),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&noted_textures));
    assert_eq!(process_ids(&results), [3]);

    let or = Statement::Or(
        Box::new(noted_textures),
        Box::new(leaf(
            FieldKind::ProcessAttribute,
            "Beam Type",
            MatchOp::Eq,
            Scalar::Str("Wide".into()),
        )),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&or));
    assert_eq!(process_ids(&results), [1, 3]);
}

#[tokio::test]
async fn test_complex_and_or_process_query() {
    let snap = reference_snapshot().await;

    let left = Statement::And(
        Box::new(leaf(
            FieldKind::ProcessAttribute,
            "note",
            MatchOp::Eq,
            Scalar::Str("ignore these results".into()),
        )),
        Box::new(leaf(
            FieldKind::ProcessField,
            "name",
            MatchOp::Eq,
            Scalar::Str("Texture".into()),
        )),
    );
    let right = Statement::Or(
        Box::new(leaf(
            FieldKind::ProcessAttribute,
            "Beam Type",
            MatchOp::Eq,
            Scalar::Str("Wide".into()),
        )),
        Box::new(leaf(
            FieldKind::ProcessAttribute,
            "frames per second",
            MatchOp::Eq,
            Scalar::Int(3),
        )),
    );
    let or = Statement::Or(Box::new(left), Box::new(right));

    let results = eval_statement(&snap, Selection::processes(), Some(&or));
    assert_eq!(process_ids(&results), [1, 2, 3]);
}

#[tokio::test]
async fn test_simple_sample_queries() {
    let snap = reference_snapshot().await;

    let by_name = leaf(
        FieldKind::SampleField,
        "name",
        MatchOp::Eq,
        Scalar::Str("S1".into()),
    );
    let results = eval_statement(&snap, Selection::samples(), Some(&by_name));
    assert_eq!(sample_ids(&results), [1], "name = 'S1'");

    let by_attr = leaf(
        FieldKind::SampleAttribute,
        "alloy",
        MatchOp::Eq,
        Scalar::Str("zn45".into()),
    );
    let results = eval_statement(&snap, Selection::samples(), Some(&by_attr));
    assert_eq!(sample_ids(&results), [2], "'alloy' = 'zn45'");

    let either = Statement::Or(Box::new(by_name), Box::new(by_attr));
    let results = eval_statement(&snap, Selection::samples(), Some(&either));
    assert_eq!(sample_ids(&results), [1, 2]);
}

#[tokio::test]
async fn test_complex_and_or_sample_query() {
    let snap = reference_snapshot().await;

    // matches S1 in its second state...
    let left = Statement::And(
        Box::new(leaf(
            FieldKind::SampleAttribute,
            "zn",
            MatchOp::Eq,
            Scalar::Float(0.5),
        )),
        Box::new(leaf(
            FieldKind::SampleAttribute,
            "mg",
            MatchOp::Eq,
            Scalar::Float(0.5),
        )),
    );
    // matches S2 in its first state on the left, nothing on the right...
    let right = Statement::Or(
        Box::new(leaf(
            FieldKind::SampleAttribute,
            "ductility",
            MatchOp::Eq,
            Scalar::Float(0.81),
        )),
        Box::new(leaf(
            FieldKind::SampleAttribute,
            "no-such",
            MatchOp::Eq,
            Scalar::Float(0.5),
        )),
    );
    let or = Statement::Or(Box::new(left), Box::new(right));

    let results = eval_statement(&snap, Selection::samples(), Some(&or));
    assert_eq!(sample_ids(&results), [1, 2]);
}

#[tokio::test]
async fn test_select_processes_through_samples() {
    let snap = reference_snapshot().await;

    let stmt = leaf(
        FieldKind::SampleAttribute,
        "alloy",
        MatchOp::Eq,
        Scalar::Str("zn45".into()),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&stmt));
    assert!(results.samples.is_empty());
    // every process linked to S2...
    assert_eq!(process_ids(&results), [1, 3]);
}

#[tokio::test]
async fn test_select_samples_through_processes() {
    let snap = reference_snapshot().await;

    let stmt = leaf(
        FieldKind::ProcessAttribute,
        "Beam Type",
        MatchOp::Eq,
        Scalar::Str("Wide".into()),
    );
    let results = eval_statement(&snap, Selection::samples(), Some(&stmt));
    assert!(results.processes.is_empty());
    // every sample linked to P1...
    assert_eq!(sample_ids(&results), [1, 2]);
}

#[tokio::test]
async fn test_both_categories_evaluated_independently() {
    let snap = reference_snapshot().await;

    let stmt = leaf(
        FieldKind::ProcessField,
        "name",
        MatchOp::Eq,
        Scalar::Str("EBSD".into()),
    );
    let results = eval_statement(&snap, Selection::both(), Some(&stmt));
    assert_eq!(process_ids(&results), [1, 2]);
    // the samples of both EBSD processes...
    assert_eq!(sample_ids(&results), [1, 2, 3]);
}

#[tokio::test]
async fn test_empty_selection_yields_nothing() {
    let snap = reference_snapshot().await;
    let stmt = leaf(
        FieldKind::ProcessField,
        "name",
        MatchOp::Eq,
        Scalar::Str("EBSD".into()),
    );
    let results = eval_statement(&snap, Selection::default(), Some(&stmt));
    assert!(results.processes.is_empty());
    assert!(results.samples.is_empty());
}

#[tokio::test]
async fn test_functions_over_the_reference_graph() {
    let snap = reference_snapshot().await;

    // processes that touched S3...
    let stmt = leaf(
        FieldKind::ProcessFunc,
        "",
        MatchOp::HasSample,
        Scalar::Str("S3".into()),
    );
    let results = eval_statement(&snap, Selection::processes(), Some(&stmt));
    assert_eq!(process_ids(&results), [2, 4]);

    // samples that went through a Texture process (all of them)...
    let stmt = leaf(
        FieldKind::SampleFunc,
        "",
        MatchOp::HasProcess,
        Scalar::Str("Texture".into()),
    );
    let results = eval_statement(&snap, Selection::samples(), Some(&stmt));
    assert_eq!(sample_ids(&results), [1, 2, 3]);

    // samples w/ a 'ductility' attribute in some state...
    let stmt = leaf(
        FieldKind::SampleFunc,
        "",
        MatchOp::HasAttribute,
        Scalar::Str("ductility".into()),
    );
    let results = eval_statement(&snap, Selection::samples(), Some(&stmt));
    assert_eq!(sample_ids(&results), [2]);
}
