//! Scene graph nodes and transforms for the Lumite engine.
//!
//! Uses hecs as the node storage backend. Nodes are referenced by
//! [`NodeId`], a generational index, so a stale reference held by an
//! animation channel resolves to `None` instead of dangling.

pub mod node;
pub mod transform;

pub use node::{NodeId, Scene};
pub use transform::Transform;
