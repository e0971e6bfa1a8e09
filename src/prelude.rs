// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! Group imports of many common traits and types by adding a glob import
//! for use by clients of this library.
//!

pub use super::config::*;
pub use super::ds::*;
pub use super::error::*;
pub use super::evaluator::*;
pub use super::json::*;
pub use super::loader::*;
pub use super::lower::*;
pub use super::op::*;
pub use super::snapshot::*;
pub use super::statement::*;
pub use super::store::*;

pub use super::Query;
