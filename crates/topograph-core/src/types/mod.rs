//! Shared data structures for Topograph.
//! FxHashMap/FxHashSet, SmallVec aliases, typed string identifiers.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet};
pub use identifiers::{FunctionId, TestId};
