// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof winding correction, UV projection and merge into the shared mesh
//!
//! Every check runs before the first append, so a roof that fails here
//! leaves the shared mesh exactly as it was.

use crate::accumulator::SharedMeshAccumulator;
use crate::error::{Error, Result};
use crate::roof::RoofScratch;
use nalgebra::{Point3, Vector3};

/// Smallest bounding-box extent UVs can be normalized against
const MIN_UV_EXTENT: f64 = 1e-9;

/// What a successful roof merge added to the shared mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoofMerge {
    /// Shared vertex count before the roof was appended
    pub offset: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Whether the index list was reversed to face up
    pub reversed: bool,
}

/// Ground-plane (x, z) bounds of a roof
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofBounds {
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
}

impl RoofBounds {
    pub fn from_vertices(vertices: &[Point3<f64>]) -> Self {
        let mut bounds = Self {
            min_x: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_z: f64::MIN,
        };
        for v in vertices {
            bounds.min_x = bounds.min_x.min(v.x);
            bounds.min_z = bounds.min_z.min(v.z);
            bounds.max_x = bounds.max_x.max(v.x);
            bounds.max_z = bounds.max_z.max(v.z);
        }
        bounds
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

/// Face normal of the first triangle: `(V[T1] - V[T0]) x (V[T2] - V[T0])`
#[inline]
pub fn first_triangle_normal(vertices: &[Point3<f64>], triangles: &[usize]) -> Vector3<f64> {
    let side1 = vertices[triangles[1]] - vertices[triangles[0]];
    let side2 = vertices[triangles[2]] - vertices[triangles[0]];
    side1.cross(&side2)
}

/// Reverse the whole index list when the first triangle faces down
///
/// Returns whether the list was reversed.
pub fn correct_winding(vertices: &[Point3<f64>], triangles: &mut [usize]) -> bool {
    let perp = first_triangle_normal(vertices, triangles);
    let reversed = perp.y < 0.0;
    if reversed {
        triangles.reverse();
    }
    reversed
}

/// Project every roof vertex onto its (x, z) bounding box
///
/// Fails with [`Error::DegenerateBoundingBox`] when either extent is too
/// small to divide by or not finite.
pub fn project_roof_uvs(vertices: &[Point3<f64>], uvs: &mut Vec<[f64; 2]>) -> Result<RoofBounds> {
    let bounds = RoofBounds::from_vertices(vertices);
    let (off_x, off_z) = (bounds.width(), bounds.depth());

    // is_finite also rejects NaN extents
    let usable = |extent: f64| extent.is_finite() && extent > MIN_UV_EXTENT;
    if !(usable(off_x) && usable(off_z)) {
        return Err(Error::DegenerateBoundingBox {
            width: off_x,
            depth: off_z,
        });
    }

    uvs.clear();
    uvs.extend(
        vertices
            .iter()
            .map(|v| [(v.x - bounds.min_x) / off_x, (v.z - bounds.min_z) / off_z]),
    );
    Ok(bounds)
}

fn validate_triangles(triangles: &[usize], vertex_count: usize) -> Result<()> {
    if triangles.is_empty() {
        return Err(Error::EmptyTriangulation {
            vertices: vertex_count,
        });
    }
    if triangles.len() % 3 != 0 {
        return Err(Error::InvalidTriangulation(format!(
            "{} indices is not a whole number of triangles",
            triangles.len()
        )));
    }
    if let Some(&bad) = triangles.iter().find(|&&i| i >= vertex_count) {
        return Err(Error::InvalidTriangulation(format!(
            "index {} out of range for {} roof vertices",
            bad, vertex_count
        )));
    }
    Ok(())
}

/// Fail unless `vertices` appended after `offset` stay addressable by
/// `u32` indices
pub(crate) fn check_index_range(offset: usize, vertices: usize) -> Result<()> {
    match offset.checked_add(vertices).map(u32::try_from) {
        Some(Ok(_)) => Ok(()),
        _ => Err(Error::IndexOverflow { offset, vertices }),
    }
}

/// Wind, UV-map, offset and append the roof held in `scratch`
///
/// On success the scratch triangle list holds shared-mesh indices (offset
/// applied exactly once) and the roof is appended to `shared`.
pub fn finalize_roof(
    scratch: &mut RoofScratch,
    shared: &mut SharedMeshAccumulator,
) -> Result<RoofMerge> {
    let vertex_count = scratch.vertices.len();
    validate_triangles(&scratch.triangles, vertex_count)?;

    let reversed = correct_winding(&scratch.vertices, &mut scratch.triangles);
    project_roof_uvs(&scratch.vertices, &mut scratch.uvs)?;

    let offset = shared.len();
    check_index_range(offset, vertex_count)?;

    for index in scratch.triangles.iter_mut() {
        *index += offset;
    }
    shared.append_roof(&scratch.vertices, &scratch.uvs, &scratch.triangles);

    Ok(RoofMerge {
        offset,
        vertex_count,
        triangle_count: scratch.triangles.len() / 3,
        reversed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn roof_scratch(vertices: Vec<Point3<f64>>, triangles: Vec<usize>) -> RoofScratch {
        let mut scratch = RoofScratch::new();
        scratch.vertices = vertices;
        scratch.triangles = triangles;
        scratch
    }

    fn square_at(y: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, y, 0.0),
            Point3::new(10.0, y, 0.0),
            Point3::new(10.0, y, 20.0),
            Point3::new(0.0, y, 20.0),
        ]
    }

    #[test]
    fn test_downward_winding_is_reversed() {
        // (0,1,2) over x-then-z turns clockwise seen from +Y
        let mut scratch = roof_scratch(square_at(5.0), vec![0, 1, 2, 0, 2, 3]);
        let mut shared = SharedMeshAccumulator::new();

        let merge = finalize_roof(&mut scratch, &mut shared).unwrap();

        assert!(merge.reversed);
        assert_eq!(scratch.triangles, vec![3, 2, 0, 2, 1, 0]);
        let normal = first_triangle_normal(&scratch.vertices, &scratch.triangles);
        assert!(normal.y >= 0.0);
    }

    #[test]
    fn test_upward_winding_is_kept() {
        let mut scratch = roof_scratch(square_at(5.0), vec![0, 2, 1, 0, 3, 2]);
        let mut shared = SharedMeshAccumulator::new();

        let merge = finalize_roof(&mut scratch, &mut shared).unwrap();
        assert!(!merge.reversed);
        assert_eq!(scratch.triangles, vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_uvs_normalized_to_bounds() {
        let mut vertices = square_at(0.0);
        vertices.push(Point3::new(5.0, 0.0, 5.0));
        let mut uvs = Vec::new();

        let bounds = project_roof_uvs(&vertices, &mut uvs).unwrap();

        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.depth(), 20.0);
        assert_eq!(uvs[0], [0.0, 0.0]);
        assert_eq!(uvs[2], [1.0, 1.0]);
        assert_relative_eq!(uvs[4][0], 0.5);
        assert_relative_eq!(uvs[4][1], 0.25);
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ];
        let mut uvs = Vec::new();
        let err = project_roof_uvs(&vertices, &mut uvs).unwrap_err();
        assert_eq!(err, Error::DegenerateBoundingBox { width: 10.0, depth: 0.0 });
        assert!(uvs.is_empty());
    }

    #[test]
    fn test_infinite_bounds_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::INFINITY, 0.0, 0.0),
            Point3::new(0.0, 0.0, 10.0),
        ];
        let mut uvs = Vec::new();
        let err = project_roof_uvs(&vertices, &mut uvs).unwrap_err();
        assert!(matches!(err, Error::DegenerateBoundingBox { .. }));
        assert!(!err.is_fatal());
        assert!(uvs.is_empty());
    }

    #[test]
    fn test_index_range_guard() {
        assert!(check_index_range(0, 4).is_ok());
        assert!(check_index_range(u32::MAX as usize - 4, 4).is_ok());
        assert_eq!(
            check_index_range(u32::MAX as usize - 3, 4).unwrap_err(),
            Error::IndexOverflow {
                offset: u32::MAX as usize - 3,
                vertices: 4
            }
        );
        assert!(check_index_range(usize::MAX, 1).unwrap_err().is_fatal());
    }

    #[test]
    fn test_degenerate_roof_appends_nothing() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(5.0, 0.0, 3.0),
            Point3::new(10.0, 0.0, 3.0),
        ];
        let mut scratch = roof_scratch(vertices, vec![0, 1, 2]);
        let mut shared = SharedMeshAccumulator::new();

        let err = finalize_roof(&mut scratch, &mut shared).unwrap_err();
        assert!(matches!(err, Error::DegenerateBoundingBox { .. }));
        assert!(shared.is_empty());
        // Indices stay roof-local when nothing was merged
        assert_eq!(scratch.triangles, vec![0, 1, 2]);
    }

    #[test]
    fn test_offset_applied_once() {
        let mut shared = SharedMeshAccumulator::new();

        let mut first = roof_scratch(square_at(1.0), vec![0, 2, 1, 0, 3, 2]);
        finalize_roof(&mut first, &mut shared).unwrap();

        let mut second = roof_scratch(square_at(2.0), vec![0, 2, 1, 0, 3, 2]);
        let merge = finalize_roof(&mut second, &mut shared).unwrap();

        assert_eq!(merge.offset, 4);
        assert_eq!(shared.len(), 8);
        assert_eq!(&shared.mesh().indices[6..], &[4, 6, 5, 4, 7, 6]);
        for &i in &second.triangles {
            assert!(i - merge.offset < merge.vertex_count);
        }
        assert!(shared.mesh().indices_in_range());
        assert!(shared.mesh().is_aligned());
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut scratch = roof_scratch(square_at(0.0), vec![0, 1, 7]);
        let mut shared = SharedMeshAccumulator::new();
        let err = finalize_roof(&mut scratch, &mut shared).unwrap_err();
        assert!(matches!(err, Error::InvalidTriangulation(_)));
        assert!(!err.is_fatal());
        assert!(shared.is_empty());
    }

    #[test]
    fn test_empty_triangles_rejected() {
        let mut scratch = roof_scratch(square_at(0.0), Vec::new());
        let mut shared = SharedMeshAccumulator::new();
        assert_eq!(
            finalize_roof(&mut scratch, &mut shared).unwrap_err(),
            Error::EmptyTriangulation { vertices: 4 }
        );
    }
}
