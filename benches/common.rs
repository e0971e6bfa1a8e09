// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

//! Common artifacts for benchmarking.
//!

use mc_mql::prelude::*;
use tokio::runtime::{Builder, Runtime};

/// MQL queries of increasing shape complexity.
pub(crate) const MQL_SAMPLES: [&str; 8] = [
    r#"select samples where sample:alloy = "zn45""#,
    r#"select processes where process:name = "Texture""#,
    r#"select processes where process-attr:'frames per second' > 3"#,
    r#"select samples where s:zn = 0.5 and s:mg = 0.5"#,
    r#"select processes where (process-attr:note = "ignore these results" and process:name = "Texture") or process-attr:'Beam Type' = "Wide""#,
    r#"select processes, samples where process:name = "EBSD" or sample:alloy = "zn45""#,
    r#"select samples where s-has-process:Texture and s:mg >= 0.3"#,
    r#"select processes where p-has-attribute:'PF scale max' or p-has-sample:"S3""#,
];

/// The same predicates, JSON-encoded (where expressible).
pub(crate) const JSON_SAMPLES: [&str; 4] = [
    r#"{ "field_type": 4, "field_name": "alloy", "operation": "=", "value": "zn45" }"#,
    r#"{ "field_type": 1, "field_name": "name", "operation": "=", "value": "Texture" }"#,
    r#"{ "and": 0,
         "left":  { "field_type": 4, "field_name": "zn", "operation": "=", "value": 0.5 },
         "right": { "field_type": 4, "field_name": "mg", "operation": "=", "value": 0.5 } }"#,
    r#"{ "or": 0,
         "left":  { "and": 0,
                    "left":  { "field_type": 3, "field_name": "note", "operation": "=", "value": "ignore these results" },
                    "right": { "field_type": 1, "field_name": "name", "operation": "=", "value": "Texture" } },
         "right": { "field_type": 3, "field_name": "Beam Type", "operation": "=", "value": "Wide" } }"#,
];

pub(crate) fn async_runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .expect("failed building the bench runtime")
}

// The reference graph scaled up: `scale` copies of the 4-process/3-sample
// cluster, distinct ids per copy.
pub(crate) fn scaled_source(scale: i64) -> MemSource {
    let mut src = MemSource::new(1);
    for k in 0..scale {
        let p = k * 10;
        let s = k * 10;
        let st = k * 10;
        src.add_process(p + 1, "EBSD")
            .add_process(p + 2, "EBSD")
            .add_process(p + 3, "Texture")
            .add_process(p + 4, "Texture");
        src.add_process_attr(p + 1, "Beam Type", vec![AttributeValue::Str("Wide".into())])
            .add_process_attr(p + 1, "frames per second", vec![AttributeValue::Int(5)])
            .add_process_attr(
                p + 1,
                "note",
                vec![AttributeValue::Str("ignore these results".into())],
            )
            .add_process_attr(p + 2, "Beam Type", vec![AttributeValue::Str("Thin".into())])
            .add_process_attr(p + 2, "frames per second", vec![AttributeValue::Int(3)])
            .add_process_attr(p + 3, "PF scale max", vec![AttributeValue::Int(2)])
            .add_process_attr(
                p + 3,
                "note",
                vec![AttributeValue::Str("ignore these results".into())],
            )
            .add_process_attr(p + 4, "PF scale max", vec![AttributeValue::Int(3)]);

        src.add_sample(s + 1, "S1", &[st + 1, st + 2]);
        src.add_sample_attr(st + 1, "zn", vec![AttributeValue::Float(0.5)])
            .add_sample_attr(st + 1, "mg", vec![AttributeValue::Float(0.4)])
            .add_sample_attr(st + 2, "zn", vec![AttributeValue::Float(0.5)])
            .add_sample_attr(st + 2, "mg", vec![AttributeValue::Float(0.5)]);
        src.add_sample(s + 2, "S2", &[st + 3, st + 4]);
        src.add_sample_attr(st + 3, "alloy", vec![AttributeValue::Str("zn45".into())])
            .add_sample_attr(st + 4, "zn", vec![AttributeValue::Float(0.6)]);
        src.add_sample(s + 3, "S3", &[st + 5, st + 6]);
        src.add_sample_attr(st + 5, "zn", vec![AttributeValue::Float(0.68)])
            .add_sample_attr(st + 6, "mg", vec![AttributeValue::Float(0.45)]);

        src.add_link(p + 1, s + 1)
            .add_link(p + 1, s + 2)
            .add_link(p + 2, s + 3)
            .add_link(p + 3, s + 1)
            .add_link(p + 3, s + 2)
            .add_link(p + 4, s + 3);
    }
    src
}

pub(crate) fn scaled_snapshot(scale: i64) -> Snapshot {
    async_runtime()
        .block_on(load_project(&scaled_source(scale), 1))
        .expect("failed loading the bench dataset")
}
