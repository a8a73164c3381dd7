//! Integration tests for the asset graph

mod cli;
mod graph_resolution;
mod targets;
