//! Vertex Sinks
//!
//! Append-only destinations for region geometry. A backend may write
//! straight into mapped GPU memory; [`MeshBuffers`] keeps everything in
//! CPU vectors ready for upload.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::{RegionError, RegionResult};

/// Vertex record as laid out for the GPU
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RegionVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl RegionVertex {
    pub fn new(position: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from_array(self.tex_coord)
    }
}

/// Backend storage a region appends into
pub trait VertexSink {
    /// Append one vertex record
    fn push_vertex(&mut self, position: Vec3, tex_coord: Vec2);

    /// Append one index
    fn push_index(&mut self, index: u32);

    /// Drop all records, keeping capacity where possible
    fn clear(&mut self);

    /// Number of indices appended since the last clear
    fn index_count(&self) -> usize;

    /// Prepare room for `vertices` and `indices` more records
    fn reserve(&mut self, _vertices: usize, _indices: usize) {}
}

/// CPU-side vertex and index buffers
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    vertices: Vec<RegionVertex>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices in emission order
    pub fn vertices(&self) -> &[RegionVertex] {
        &self.vertices
    }

    /// Indices in emission order
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw vertex bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw 32-bit index bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Indices narrowed for a 16-bit index buffer
    pub fn indices_u16(&self) -> RegionResult<Vec<u16>> {
        self.indices
            .iter()
            .map(|&index| {
                u16::try_from(index).map_err(|_| RegionError::IndexOverflow {
                    requested: u64::from(index) + 1,
                    limit: crate::config::DEFAULT_MAX_VERTICES,
                })
            })
            .collect()
    }
}

impl VertexSink for MeshBuffers {
    fn push_vertex(&mut self, position: Vec3, tex_coord: Vec2) {
        self.vertices.push(RegionVertex::new(position, tex_coord));
    }

    fn push_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn reserve(&mut self, vertices: usize, indices: usize) {
        self.vertices.reserve(vertices);
        self.indices.reserve(indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<RegionVertex>(), 20);
    }

    #[test]
    fn test_push_and_clear_keeps_capacity() {
        let mut buffers = MeshBuffers::new();
        buffers.push_vertex(Vec3::ONE, Vec2::new(0.5, 1.0));
        buffers.push_index(0);
        assert_eq!(buffers.vertices()[0].position(), Vec3::ONE);
        assert_eq!(buffers.vertices()[0].tex_coord(), Vec2::new(0.5, 1.0));
        assert_eq!(buffers.index_count(), 1);
        assert_eq!(buffers.vertex_bytes().len(), 20);
        assert_eq!(buffers.index_bytes().len(), 4);

        buffers.clear();
        assert!(buffers.vertices().is_empty());
        assert!(buffers.indices().is_empty());
        assert!(buffers.vertices.capacity() >= 1);
    }

    #[test]
    fn test_indices_u16_narrowing() {
        let mut buffers = MeshBuffers::new();
        buffers.push_index(0);
        buffers.push_index(65_535);
        assert_eq!(buffers.indices_u16().unwrap(), vec![0, 65_535]);

        buffers.push_index(65_536);
        assert!(matches!(
            buffers.indices_u16(),
            Err(RegionError::IndexOverflow { requested: 65_537, .. })
        ));
    }
}
