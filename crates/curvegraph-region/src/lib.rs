//! # curvegraph Region
//!
//! Turns tessellated curved outlines into an indexed vertex/triangle mesh
//! ready for GPU submission.
//!
//! ## Features
//! - Incremental accumulation of many shapes into one vertex/index buffer pair
//! - Reuse of raw outline vertices by aliased triangles
//! - Running bounding box of all emitted geometry
//! - Optional frustum culling of whole shapes
//! - Index ceiling matching the backend's index width
//! - Render mode bits for consumers choosing a pipeline

pub mod config;
pub mod error;
pub mod geometry;
pub mod modes;
pub mod region;
pub mod shape;
pub mod sink;

pub use config::{IndexWidth, RegionConfig, DEFAULT_MAX_VERTICES};
pub use error::{RegionError, RegionResult};
pub use geometry::{Triangle, Vertex, VertexId};
pub use modes::{CurveWeighting, RenderModes, TWO_PASS_DEFAULT_TEXTURE_UNIT};
pub use region::{BatchStats, IngestStats, RegionAccumulator, ShapeOutcome, SharedCullVolume};
pub use shape::{OutlineShape, TessellatedShape, VerticesState};
pub use sink::{MeshBuffers, RegionVertex, VertexSink};
