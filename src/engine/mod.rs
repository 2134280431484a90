// Engine module - the surface-constrained walk engine and its ECS glue.

pub mod components;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod systems;
pub mod walkmesh;

// Re-export commonly used items
pub use components::*;
pub use error::{WalkError, WalkResult};
pub use walkmesh::{WalkMesh, WalkOutcome, WalkPoint};
