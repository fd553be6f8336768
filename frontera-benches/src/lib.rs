//! Benchmark support crate for frontera.
//!
//! Provides seeded synthetic graphs and parameter types used by the
//! Criterion benchmarks for breadth-first search, betweenness centrality and
//! connected components.

pub mod error;
pub mod params;
pub mod synthetic;
