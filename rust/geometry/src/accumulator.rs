// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared roof mesh accumulated across every building of a run

use crate::error::Result;
use crate::finalize::check_index_range;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// Append-only mesh that every finalized roof is merged into
///
/// There is no removal operation: a roof is appended only once it has been
/// triangulated, wound and UV-mapped successfully, and append order fixes
/// the index offsets, so a run must have a single appender.
#[derive(Debug, Clone, Default)]
pub struct SharedMeshAccumulator {
    mesh: Mesh,
}

impl SharedMeshAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            mesh: Mesh::with_capacity(vertex_count, index_count),
        }
    }

    /// Number of vertices appended so far; the offset the next roof gets
    #[inline]
    pub fn len(&self) -> usize {
        self.mesh.vertex_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Read-only view of the accumulated mesh
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Append roof vertices with their UVs and already-offset indices
    ///
    /// Callers guarantee `vertices.len() == uvs.len()` and that every index
    /// fits in `u32` and addresses a vertex at or after the current length.
    pub(crate) fn append_roof(
        &mut self,
        vertices: &[Point3<f64>],
        uvs: &[[f64; 2]],
        offset_indices: &[usize],
    ) {
        debug_assert_eq!(vertices.len(), uvs.len());

        let up = Vector3::y();
        for (v, uv) in vertices.iter().zip(uvs) {
            self.mesh.add_vertex(*v, up, *uv);
        }
        self.mesh
            .indices
            .extend(offset_indices.iter().map(|&i| i as u32));
    }

    /// Append another roof mesh, offsetting its indices by the current
    /// length
    ///
    /// Returns the offset the mesh was appended at. Fails with the fatal
    /// [`crate::Error::IndexOverflow`] when the result would not be addressable by
    /// `u32` indices; nothing is appended in that case.
    pub fn append_mesh(&mut self, other: &Mesh) -> Result<usize> {
        let offset = self.len();
        check_index_range(offset, other.vertex_count())?;
        self.mesh.merge(other);
        Ok(offset)
    }
}
