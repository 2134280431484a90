// Error type shared by walkmesh construction and blob loading.
//
// Runtime walk conditions (boundary clamps, crossing-budget exhaustion)
// are not errors; see `WalkOutcome` in walkmesh.rs.

use thiserror::Error;

/// Anything that can go wrong while loading or validating a walkmesh.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunk tag in the blob did not match the expected tag.
    #[error("expected chunk '{expected}', found '{found}'")]
    ChunkTag { expected: String, found: String },

    /// Chunk payload is not a whole number of elements.
    #[error("chunk '{tag}' length {len} is not a multiple of element size {elem_size}")]
    ChunkSize {
        tag: String,
        len: u64,
        elem_size: usize,
    },

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("{positions} vertex positions but {normals} vertex normals")]
    NormalCountMismatch { positions: usize, normals: usize },

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A triangle lists the same vertex twice.
    #[error("triangle {triangle} repeats a vertex index")]
    DegenerateTriangle { triangle: usize },

    /// The same directed edge appears in two triangles: the mesh is
    /// non-manifold or inconsistently wound.
    #[error("directed edge {from}->{to} appears in more than one triangle")]
    NonManifoldEdge { from: u32, to: u32 },
}

/// Convenience alias for `Result<T, WalkError>`.
pub type WalkResult<T> = Result<T, WalkError>;
