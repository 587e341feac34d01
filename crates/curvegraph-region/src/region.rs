//! Region Accumulator
//!
//! Collects tessellated outline shapes into one indexed vertex/triangle
//! mesh while tracking the bounds of everything emitted.
//!
//! Ingestion of a shape works in three steps:
//! - the shape is dropped if its (transformed) bounds are outside the frustum
//! - its raw vertices are appended as a block starting at the current vertex count
//! - each triangle either references that block (aliased vertices) or
//!   appends its own three vertices (fresh vertices)

use std::fmt;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use curvegraph_core::{Aabb, CullVolume, ShapeTransform};

use crate::config::RegionConfig;
use crate::error::{RegionError, RegionResult};
use crate::geometry::{Triangle, Vertex, VertexId};
use crate::modes::RenderModes;
use crate::shape::{OutlineShape, VerticesState};
use crate::sink::{MeshBuffers, VertexSink};

/// Frustum or other volume shared with a region for culling
pub type SharedCullVolume = Arc<dyn CullVolume + Send + Sync>;

/// Counters for geometry added by one or more shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStats {
    /// Triangles indexed
    pub triangles: usize,
    /// Raw outline vertices appended
    pub raw_vertices: usize,
    /// Vertices appended for fresh triangles
    pub fresh_vertices: usize,
    /// Indices that reference the raw vertex block
    pub aliased_indices: usize,
}

impl IngestStats {
    /// Total vertices appended
    pub fn vertices(&self) -> usize {
        self.raw_vertices + self.fresh_vertices
    }
}

impl Add for IngestStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for IngestStats {
    fn add_assign(&mut self, rhs: Self) {
        self.triangles += rhs.triangles;
        self.raw_vertices += rhs.raw_vertices;
        self.fresh_vertices += rhs.fresh_vertices;
        self.aliased_indices += rhs.aliased_indices;
    }
}

/// What happened to a shape handed to [`RegionAccumulator::add_shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeOutcome {
    /// Bounds were outside the frustum, nothing changed
    Culled,
    /// Shape was ingested
    Added(IngestStats),
}

impl ShapeOutcome {
    pub fn is_culled(&self) -> bool {
        matches!(self, Self::Culled)
    }

    pub fn stats(&self) -> Option<IngestStats> {
        match self {
            Self::Culled => None,
            Self::Added(stats) => Some(*stats),
        }
    }
}

/// Result of [`RegionAccumulator::add_shapes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchStats {
    /// Sum over all ingested shapes
    pub added: IngestStats,
    /// Shapes ingested
    pub shapes_added: usize,
    /// Shapes dropped by frustum culling
    pub shapes_culled: usize,
}

/// Work a shape will do, computed before any state changes
#[derive(Debug, Clone, Copy, Default)]
struct IngestPlan {
    raw_vertices: usize,
    fresh_triangles: usize,
    triangles: usize,
}

impl IngestPlan {
    fn new_vertices(&self) -> usize {
        self.raw_vertices + 3 * self.fresh_triangles
    }
}

/// Accumulates outline shapes into an indexed mesh
///
/// The accumulator is single-threaded: every call runs to completion and
/// shapes are appended in call order. Indices written to the sink always
/// reference a vertex already written and stay valid until [`reset`].
///
/// [`reset`]: RegionAccumulator::reset
#[derive(Debug)]
pub struct RegionAccumulator<S: VertexSink = MeshBuffers> {
    render_modes: RenderModes,
    bounds: Aabb,
    frustum: Option<SharedCullVolume>,
    vertex_count: u32,
    max_vertices: u32,
    dirty: bool,
    sink: S,
}

impl RegionAccumulator<MeshBuffers> {
    /// Create a region backed by CPU mesh buffers
    pub fn new(render_modes: RenderModes, config: RegionConfig) -> Self {
        Self::with_sink(render_modes, config, MeshBuffers::new())
    }
}

impl<S: VertexSink> RegionAccumulator<S> {
    /// Create a region writing into `sink`
    ///
    /// The sink is cleared so vertex numbering starts at zero.
    pub fn with_sink(render_modes: RenderModes, config: RegionConfig, mut sink: S) -> Self {
        sink.clear();
        Self {
            render_modes,
            bounds: Aabb::EMPTY,
            frustum: None,
            vertex_count: 0,
            max_vertices: config.vertex_limit(),
            dirty: true,
            sink,
        }
    }

    /// Render modes this region was created for
    pub fn render_modes(&self) -> RenderModes {
        self.render_modes
    }

    pub fn is_two_pass_aa(&self) -> bool {
        self.render_modes.is_two_pass_aa()
    }

    pub fn is_multisample_aa(&self) -> bool {
        self.render_modes.is_multisample_aa()
    }

    pub fn is_non_uniform_weight(&self) -> bool {
        self.render_modes.is_non_uniform_weight()
    }

    /// Bounds of every vertex emitted since the last reset
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Number of vertices emitted since the last reset
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices emitted since the last reset
    pub fn index_count(&self) -> usize {
        self.sink.index_count()
    }

    /// Vertex ceiling enforced by this region
    pub fn max_vertices(&self) -> u32 {
        self.max_vertices
    }

    /// Backend storage holding the emitted geometry
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give up the region and keep its storage
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whether geometry was added since the consumer last marked the region clean
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge the current geometry
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Volume used to cull shapes, if any
    pub fn frustum(&self) -> Option<&(dyn CullVolume + Send + Sync)> {
        self.frustum.as_deref()
    }

    /// Enable culling against `frustum`, or disable it with `None`
    pub fn set_frustum(&mut self, frustum: Option<SharedCullVolume>) {
        self.frustum = frustum;
    }

    /// Discard all geometry and bounds
    ///
    /// The region is left dirty so consumers resynchronize with the now
    /// empty buffers.
    pub fn reset(&mut self) {
        self.sink.clear();
        self.vertex_count = 0;
        self.bounds.reset();
        self.dirty = true;
    }

    /// Add one outline shape, optionally transformed
    ///
    /// Fails atomically: on error nothing is appended and neither the
    /// bounds nor the dirty flag change.
    pub fn add_shape<O: OutlineShape + ?Sized>(
        &mut self,
        shape: &O,
        transform: Option<&dyn ShapeTransform>,
    ) -> RegionResult<ShapeOutcome> {
        if let Some(frustum) = &self.frustum {
            let shape_box = match transform {
                Some(transform) => transform.transform_aabb(&shape.bounds()),
                None => shape.bounds(),
            };
            // Empty boxes are never culled.
            if !shape_box.is_empty() && frustum.is_outside(&shape_box) {
                log::debug!("Dropping shape outside frustum: {}", shape_box);
                return Ok(ShapeOutcome::Culled);
            }
        }

        let vertices = shape.vertices();
        let triangles = shape.triangles(VerticesState::QuadraticNurbs);
        let plan = self.plan(vertices, triangles)?;

        let idx_offset = self.vertex_count;
        let mut stats = IngestStats::default();

        if plan.raw_vertices > 0 {
            self.sink.reserve(plan.new_vertices(), 3 * plan.triangles);

            for vertex in vertices {
                self.push_new_vertex(vertex, transform);
            }
            stats.raw_vertices = vertices.len();

            for (i, triangle) in triangles.iter().enumerate() {
                match triangle.lead_id() {
                    VertexId::Aliased(_) => {
                        for vertex in &triangle.vertices {
                            // Validated by plan()
                            let relative = vertex.id.relative_index().unwrap_or_default();
                            self.sink.push_index(idx_offset + relative);
                        }
                        log::trace!("T[{}]: moved by {}", i, idx_offset);
                        stats.aliased_indices += 3;
                    }
                    VertexId::Fresh => {
                        log::trace!("T[{}]: new indices from {}", i, self.vertex_count);
                        for vertex in &triangle.vertices {
                            self.push_new_indexed_vertex(vertex, transform);
                        }
                        stats.fresh_vertices += 3;
                    }
                }
                stats.triangles += 1;
            }
        }

        tracing::debug!(
            target: "region",
            idx_offset,
            triangles = stats.triangles,
            raw_vertices = stats.raw_vertices,
            fresh_vertices = stats.fresh_vertices,
            aliased_indices = stats.aliased_indices,
            vertex_count = self.vertex_count,
            "Shape added"
        );

        self.dirty = true;
        Ok(ShapeOutcome::Added(stats))
    }

    /// Add shapes in order
    ///
    /// Stops at the first error; shapes added before it stay in the region.
    pub fn add_shapes<O, I>(
        &mut self,
        shapes: I,
        transform: Option<&dyn ShapeTransform>,
    ) -> RegionResult<BatchStats>
    where
        O: OutlineShape,
        I: IntoIterator<Item = O>,
    {
        let mut batch = BatchStats::default();
        for shape in shapes {
            match self.add_shape(&shape, transform)? {
                ShapeOutcome::Culled => batch.shapes_culled += 1,
                ShapeOutcome::Added(stats) => {
                    batch.added += stats;
                    batch.shapes_added += 1;
                }
            }
        }
        Ok(batch)
    }

    fn plan(&self, vertices: &[Vertex], triangles: &[Triangle]) -> RegionResult<IngestPlan> {
        // Outlines with fewer than three raw vertices contribute nothing
        if vertices.len() < 3 {
            return Ok(IngestPlan::default());
        }

        let mut plan = IngestPlan {
            raw_vertices: vertices.len(),
            fresh_triangles: 0,
            triangles: triangles.len(),
        };
        for (i, triangle) in triangles.iter().enumerate() {
            if triangle.lead_id().is_fresh() {
                plan.fresh_triangles += 1;
                continue;
            }
            for vertex in &triangle.vertices {
                let relative = vertex
                    .id
                    .relative_index()
                    .ok_or(RegionError::MixedTriangle { triangle: i })?;
                if relative as usize >= vertices.len() {
                    return Err(RegionError::AliasOutOfRange {
                        relative,
                        available: vertices.len(),
                    });
                }
            }
        }

        let requested = u64::from(self.vertex_count) + plan.new_vertices() as u64;
        if requested > u64::from(self.max_vertices) {
            log::warn!(
                "Index overflow: {} + {} vertices exceeds {}",
                self.vertex_count,
                plan.new_vertices(),
                self.max_vertices
            );
            return Err(RegionError::IndexOverflow {
                requested,
                limit: self.max_vertices,
            });
        }
        Ok(plan)
    }

    fn push_new_vertex(&mut self, vertex: &Vertex, transform: Option<&dyn ShapeTransform>) {
        let position = match transform {
            Some(transform) => transform.transform_point(vertex.position),
            None => vertex.position,
        };
        self.bounds.expand_to_include(position);
        self.sink.push_vertex(position, vertex.tex_coord);
        self.vertex_count += 1;
    }

    fn push_new_indexed_vertex(&mut self, vertex: &Vertex, transform: Option<&dyn ShapeTransform>) {
        self.push_new_vertex(vertex, transform);
        self.sink.push_index(self.vertex_count - 1);
    }
}

impl<S: VertexSink> fmt::Display for RegionAccumulator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region[{}, dirty {}, vertices {}, box {}]",
            self.render_modes, self.dirty, self.vertex_count, self.bounds
        )
    }
}
