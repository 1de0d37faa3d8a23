//! Domain models for the content graph.
//!
//! - [`Tag`]: category-prefixed topic label (`actor:russia`, `era:cold-war`).
//! - [`ContentNode`]: a report, timeline event or glossary entry with tags and
//!   one-directional connection references to other nodes.
//! - [`ConnectionType`]: legend vocabulary for future typed edges.
//!
//! The `*Definition` types mirror the JSON content document, where every
//! entity is keyed by its identifier.

mod connection;
mod node;
mod tag;

pub use connection::*;
pub use node::*;
pub use tag::*;
