//! Graph capability consumed by the difference engine.
//!
//! The trait defines the abstract read interface over the concept
//! graph; an in-memory implementation backs tests and embedded use.

mod memory;
mod traits;

pub use memory::InMemoryGraph;
pub use traits::{GraphError, GraphQuery};
