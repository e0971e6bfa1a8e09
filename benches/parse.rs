// SPDX-License-Identifier: Apache-2.0

//! Benchmarks parsing MQL text and JSON-encoded statements.
//!

mod common;

use common::{JSON_SAMPLES, MQL_SAMPLES};
use criterion::{Criterion, criterion_group, criterion_main};
use mc_mql::{MqlError, Query, Selection};

fn do_mql() -> Result<(), MqlError> {
    let mut count = 0;
    for src in MQL_SAMPLES {
        let _ = Query::try_from_mql(src)?;
        count += 1;
    }
    assert_eq!(count, MQL_SAMPLES.len());
    Ok(())
}

fn do_json() -> Result<(), MqlError> {
    let mut count = 0;
    for src in JSON_SAMPLES {
        let _ = Query::try_from_json(src, Selection::both())?;
        count += 1;
    }
    assert_eq!(count, JSON_SAMPLES.len());
    Ok(())
}

fn parse_mql(c: &mut Criterion) {
    c.bench_function("Parse MQL", |b| b.iter(do_mql));
}

fn parse_json(c: &mut Criterion) {
    c.bench_function("Parse JSON", |b| b.iter(do_json));
}

criterion_group!(benchmarks, parse_mql, parse_json);
criterion_main!(benchmarks);
