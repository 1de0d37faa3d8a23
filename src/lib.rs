//! Content graph service and CLI for a fact-checking site.
//!
//! The graph itself lives in `factgraph-core`; this crate loads content files
//! into it and exposes it over HTTP and the command line.

pub mod api;
pub mod config;
pub mod loader;
pub mod render;
