//! Graph intelligence built on top of the call graph.

pub mod test_topology;
