// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Runs IR statements against a [`Snapshot`] and returns matching entity
//! sets.
//!
//! Two passes per selected category: a direct pass scans the category's own
//! entities w/ the matching context filled in, a cross pass (only when the
//! predicate mentions the other category) evaluates that category first and
//! maps the winners back through the relationship indices. The final result
//! is the union of both, deduplicated by primary id. Result ordering is
//! unspecified.
//!
//! Evaluation never raises. A type mismatch, a missing attribute or a
//! missing edge is simply "no match" for that leaf.
//!

use crate::{
    op::MatchOp,
    snapshot::{Attribute, AttributeValue, Process, Sample, Snapshot},
    statement::{FieldKind, Match, Scalar, Selection, Statement},
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// What a query hands back: matching processes and/or samples.
#[derive(Debug, Default, Serialize)]
pub struct QueryResults {
    /// Matching processes; empty unless processes were selected.
    pub processes: Vec<Process>,
    /// Matching samples; empty unless samples were selected.
    pub samples: Vec<Sample>,
}

/// Evaluate a statement against a snapshot, dispatching on the selection
/// flags. A `None` statement (select w/o a usable where clause) yields
/// empty sets.
pub fn eval_statement(
    snapshot: &Snapshot,
    selection: Selection,
    statement: Option<&Statement>,
) -> QueryResults {
    let Some(stmt) = statement else {
        return QueryResults::default();
    };

    let mut results = QueryResults::default();
    if selection.select_processes {
        results.processes = eval_processes(snapshot, stmt);
    }
    if selection.select_samples {
        results.samples = eval_samples(snapshot, stmt);
    }
    results
}

// Direct pass over processes + cross pass through matching samples.
fn eval_processes(snapshot: &Snapshot, stmt: &Statement) -> Vec<Process> {
    let mut seen = HashSet::new();
    let mut winners = vec![];

    if stmt.has_process_match() {
        for process in snapshot.processes() {
            if eval(snapshot, Some(process), None, stmt) && seen.insert(process.id) {
                winners.push(process.clone());
            }
        }
    }

    if stmt.has_sample_match() {
        for sample in matching_samples(snapshot, stmt) {
            for &pid in snapshot.processes_of(sample.id) {
                if !seen.insert(pid) {
                    continue;
                }
                if let Some(process) = snapshot.process(pid) {
                    winners.push(process.clone());
                }
            }
        }
    }

    winners
}

// Direct pass over samples + cross pass through matching processes.
fn eval_samples(snapshot: &Snapshot, stmt: &Statement) -> Vec<Sample> {
    let mut seen = HashSet::new();
    let mut winners = vec![];

    if stmt.has_sample_match() {
        for sample in matching_samples(snapshot, stmt) {
            if seen.insert(sample.id) {
                winners.push(sample.clone());
            }
        }
    }

    if stmt.has_process_match() {
        for process in snapshot.processes() {
            if !eval(snapshot, Some(process), None, stmt) {
                continue;
            }
            for &sid in snapshot.samples_of(process.id) {
                if !seen.insert(sid) {
                    continue;
                }
                if let Some(sample) = snapshot.sample(sid) {
                    winners.push(sample.clone());
                }
            }
        }
    }

    winners
}

// Scan samples state by state; the first matching state wins the sample (a
// sample is its own match unit, not a sample-state).
fn matching_samples<'a>(snapshot: &'a Snapshot, stmt: &Statement) -> Vec<&'a Sample> {
    let mut winners = vec![];
    for sample in snapshot.samples() {
        for state in &sample.states {
            let ctx = StateCtx {
                sample,
                state_id: state.id,
            };
            if eval(snapshot, None, Some(&ctx), stmt) {
                winners.push(sample);
                break;
            }
        }
    }
    winners
}

// Sample-state evaluation context: the sample plus which of its states is
// current.
#[derive(Debug, Clone, Copy)]
struct StateCtx<'a> {
    sample: &'a Sample,
    state_id: i64,
}

// The recursive interpreter. `process` and `state` are the two optional
// contexts carried down the tree.
fn eval(
    snapshot: &Snapshot,
    process: Option<&Process>,
    state: Option<&StateCtx>,
    stmt: &Statement,
) -> bool {
    match stmt {
        Statement::Match(m) => eval_match(snapshot, process, state, m),
        Statement::And(left, right) => {
            eval(snapshot, process, state, left) && eval(snapshot, process, state, right)
        }
        Statement::Or(left, right) => {
            eval(snapshot, process, state, left) || eval(snapshot, process, state, right)
        }
    }
}

fn eval_match(
    snapshot: &Snapshot,
    process: Option<&Process>,
    state: Option<&StateCtx>,
    m: &Match,
) -> bool {
    match m.field {
        FieldKind::ProcessField => match (process, state) {
            (Some(p), _) => eval_process_field(p, m),
            // "sample where one of its processes has P"...
            (None, Some(ctx)) => each_process_of(snapshot, ctx.sample, |p| {
                eval_process_field(p, m)
            }),
            (None, None) => false,
        },
        FieldKind::ProcessAttribute => match (process, state) {
            (Some(p), _) => eval_process_attr(snapshot, p, m),
            (None, Some(ctx)) => each_process_of(snapshot, ctx.sample, |p| {
                eval_process_attr(snapshot, p, m)
            }),
            (None, None) => false,
        },
        FieldKind::SampleField => match (state, process) {
            (Some(ctx), _) => eval_sample_field(ctx.sample, m),
            // symmetric: "process where one of its samples has P"...
            (None, Some(p)) => each_sample_of(snapshot, p, |s| eval_sample_field(s, m)),
            (None, None) => false,
        },
        FieldKind::SampleAttribute => match (state, process) {
            (Some(ctx), _) => eval_sample_attr(snapshot, ctx.sample, ctx.state_id, m),
            (None, Some(p)) => each_sample_of(snapshot, p, |s| {
                s.states
                    .iter()
                    .any(|st| eval_sample_attr(snapshot, s, st.id, m))
            }),
            (None, None) => false,
        },
        FieldKind::ProcessFunc => match process {
            Some(p) => eval_process_func(snapshot, p, m),
            None => false,
        },
        FieldKind::SampleFunc => match state {
            Some(ctx) => eval_sample_func(snapshot, ctx, m),
            None => false,
        },
    }
}

// Iterate the processes a sample took part in; TRUE on the first hit.
fn each_process_of(snapshot: &Snapshot, sample: &Sample, f: impl Fn(&Process) -> bool) -> bool {
    snapshot
        .processes_of(sample.id)
        .iter()
        .filter_map(|&pid| snapshot.process(pid))
        .any(|p| f(p))
}

// Likewise for the samples of a process.
fn each_sample_of(snapshot: &Snapshot, process: &Process, f: impl Fn(&Sample) -> bool) -> bool {
    snapshot
        .samples_of(process.id)
        .iter()
        .filter_map(|&sid| snapshot.sample(sid))
        .any(|s| f(s))
}

fn eval_process_field(process: &Process, m: &Match) -> bool {
    match m.field_name.as_str() {
        "name" => match m.value.as_str() {
            Some(v) => string_match(&process.name, v, m.op),
            None => false,
        },
        "id" => match m.value.coerce_i64() {
            Some(v) => int_match(process.id, v, m.op),
            None => false,
        },
        _ => false,
    }
}

fn eval_sample_field(sample: &Sample, m: &Match) -> bool {
    match m.field_name.as_str() {
        "name" => match m.value.as_str() {
            Some(v) => string_match(&sample.name, v, m.op),
            None => false,
        },
        "id" => match m.value.coerce_i64() {
            Some(v) => int_match(sample.id, v, m.op),
            None => false,
        },
        _ => false,
    }
}

fn eval_process_attr(snapshot: &Snapshot, process: &Process, m: &Match) -> bool {
    let Some(attrs) = snapshot.process_attrs(process.id) else {
        debug!("process {}/{} has no attributes", process.id, process.name);
        return false;
    };
    match attrs.get(&m.field_name) {
        Some(attr) => attr_matches(attr, m.op, &m.value),
        None => false,
    }
}

fn eval_sample_attr(snapshot: &Snapshot, sample: &Sample, state_id: i64, m: &Match) -> bool {
    let Some(attrs) = snapshot.sample_state_attrs(sample.id, state_id) else {
        debug!(
            "sample {}/{} state {state_id} has no attributes",
            sample.id, sample.name
        );
        return false;
    };
    match attrs.get(&m.field_name) {
        Some(attr) => attr_matches(attr, m.op, &m.value),
        None => false,
    }
}

fn eval_process_func(snapshot: &Snapshot, process: &Process, m: &Match) -> bool {
    let Some(name) = m.value.as_str() else {
        return false;
    };
    match m.op {
        MatchOp::HasSample => each_sample_of(snapshot, process, |s| s.name == name),
        MatchOp::HasAttribute => snapshot
            .process_attrs(process.id)
            .is_some_and(|attrs| attrs.contains_key(name)),
        _ => false,
    }
}

fn eval_sample_func(snapshot: &Snapshot, ctx: &StateCtx, m: &Match) -> bool {
    let Some(name) = m.value.as_str() else {
        return false;
    };
    match m.op {
        MatchOp::HasProcess => each_process_of(snapshot, ctx.sample, |p| p.name == name),
        MatchOp::HasAttribute => snapshot
            .sample_state_attrs(ctx.sample.id, ctx.state_id)
            .is_some_and(|attrs| attrs.contains_key(name)),
        _ => false,
    }
}

// A leaf succeeds when ANY of the attribute's values satisfies it.
fn attr_matches(attr: &Attribute, op: MatchOp, value: &Scalar) -> bool {
    attr.values.iter().any(|v| value_matches(v, op, value))
}

// Per-value dispatch: coerce the query scalar to the stored value's type;
// a failed coercion is a non-match, never an error.
fn value_matches(stored: &AttributeValue, op: MatchOp, value: &Scalar) -> bool {
    match stored {
        AttributeValue::Int(x) => match value.coerce_i64() {
            Some(v) => int_match(*x, v, op),
            None => false,
        },
        AttributeValue::Float(x) => match value.coerce_f64() {
            Some(v) => float_match(*x, v, op),
            None => false,
        },
        AttributeValue::Str(x) => match value.as_str() {
            Some(v) if op.applies_to_strings() => string_match(x, v, op),
            _ => false,
        },
    }
}

fn string_match(stored: &str, value: &str, op: MatchOp) -> bool {
    match op {
        MatchOp::Eq => stored == value,
        MatchOp::Ne => stored != value,
        _ => false,
    }
}

fn int_match(stored: i64, value: i64, op: MatchOp) -> bool {
    match op {
        MatchOp::Eq => stored == value,
        MatchOp::Ne => stored != value,
        MatchOp::Lt => stored < value,
        MatchOp::Le => stored <= value,
        MatchOp::Gt => stored > value,
        MatchOp::Ge => stored >= value,
        _ => false,
    }
}

fn float_match(stored: f64, value: f64, op: MatchOp) -> bool {
    match op {
        MatchOp::Eq => stored == value,
        MatchOp::Ne => stored != value,
        MatchOp::Lt => stored < value,
        MatchOp::Le => stored <= value,
        MatchOp::Gt => stored > value,
        MatchOp::Ge => stored >= value,
        _ => false,
    }
}
