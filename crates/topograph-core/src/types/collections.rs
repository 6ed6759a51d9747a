//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec optimized for resolved call candidates (usually 1, polymorphic sites a few more).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec optimized for per-function tags (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
