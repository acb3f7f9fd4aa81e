//! Core types for graphport.

mod graph;

pub use graph::*;
