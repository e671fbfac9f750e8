// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Point3, Vector3};

/// Origin subtracted from map coordinates before f32 conversion
///
/// Every building is meshed relative to its own origin so that projected
/// map coordinates (often millions of metres) keep sub-millimetre precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateShift {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CoordinateShift {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array(origin: [f64; 3]) -> Self {
        Self::new(origin[0], origin[1], origin[2])
    }

    /// Express a map-space point relative to this origin
    #[inline]
    pub fn apply(&self, position: Point3<f64>) -> Point3<f64> {
        Point3::new(position.x - self.x, position.y - self.y, position.z - self.z)
    }
}

/// Indexed triangle mesh with three index-aligned vertex streams
///
/// Vertex `i` is `positions[3i..3i+3]`, `normals[3i..3i+3]` and
/// `uvs[2i..2i+2]`. Every mutation keeps the three streams aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal and texture coordinate
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>, uv: [f64; 2]) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);

        self.uvs.push(uv[0] as f32);
        self.uvs.push(uv[1] as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one, offsetting its indices by the
    /// current vertex count
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.uvs.reserve(other.uvs.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);

        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position, normal and UV streams describe the same number of vertices
    #[inline]
    pub fn is_aligned(&self) -> bool {
        let n = self.vertex_count();
        self.positions.len() == n * 3 && self.normals.len() == n * 3 && self.uvs.len() == n * 2
    }

    /// Every index addresses an existing vertex
    pub fn indices_in_range(&self) -> bool {
        let n = self.vertex_count();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        let p = &self.positions[index * 3..index * 3 + 3];
        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Texture coordinate of vertex `index`
    #[inline]
    pub fn uv(&self, index: usize) -> [f32; 2] {
        [self.uvs[index * 2], self.uvs[index * 2 + 1]]
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
