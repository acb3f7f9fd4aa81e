//! Core traits for graphport.

mod graph_client;

pub use graph_client::*;
