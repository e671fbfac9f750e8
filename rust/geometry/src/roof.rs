// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof synthesis: vertex collection, flat or dome triangulation, and the
//! soft-failure boundary around merging a roof into the shared mesh

use crate::accumulator::SharedMeshAccumulator;
use crate::error::{Error, Result};
use crate::finalize::{finalize_roof, RoofMerge};
use crate::triangulation::FlatTriangulator;
use nalgebra::{Point3, Vector3};

/// Roof shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoofKind {
    /// Cap the footprint outline with a flat triangulated polygon
    #[default]
    Flat,
    /// Fan every outline edge to an apex above the outline centroid
    Dome,
}

impl RoofKind {
    /// Parse a roof shape tag ("flat", "dome", "onion"), case-insensitive
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "flat" => Some(RoofKind::Flat),
            "dome" | "onion" => Some(RoofKind::Dome),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoofKind::Flat => "flat",
            RoofKind::Dome => "dome",
        }
    }
}

/// Per-roof parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofParams {
    pub kind: RoofKind,
    /// Height of the roof outline, relative to the building origin
    pub base_y: f64,
    /// Dome apex rise above `base_y`; unused for flat roofs
    pub roof_height: f64,
    /// Skip outline points whose (x, z) repeats an earlier one
    pub dedupe: bool,
}

/// Reusable roof working set
///
/// Owned by the caller and handed to every roof build so that buffers are
/// cleared, not reallocated, between buildings. One scratch must never be
/// shared by two buildings under construction at the same time.
#[derive(Debug, Clone, Default)]
pub struct RoofScratch {
    /// Outline the next roof is built from (building-relative)
    pub(crate) base: Vec<Point3<f64>>,
    /// Roof vertices, plus the apex for domes
    pub vertices: Vec<Point3<f64>>,
    /// Interleaved (x, z) pairs fed to the triangulator
    pub flat_coords: Vec<f64>,
    /// Triangle indices, roof-local until finalized
    pub triangles: Vec<usize>,
    /// One UV per roof vertex
    pub uvs: Vec<[f64; 2]>,
}

impl RoofScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every buffer and size the coordinate buffer for `base_len`
    /// outline points
    pub fn prepare(&mut self, base_len: usize) {
        self.vertices.clear();
        self.triangles.clear();
        self.uvs.clear();
        self.flat_coords.clear();
        self.flat_coords.resize(base_len * 2, 0.0);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Copy the outline into the scratch as roof vertices at `roof_y`
///
/// Each kept point is also written as (x, z) into `flat_coords`. Without
/// `dedupe` every outline point becomes a roof vertex, including a repeated
/// closing point. Expects a prepared scratch; returns the number of roof
/// vertices.
pub fn collect_roof_vertices(
    base: &[Point3<f64>],
    roof_y: f64,
    dedupe: bool,
    scratch: &mut RoofScratch,
) -> Result<usize> {
    let required = base.len() * 2;
    if scratch.flat_coords.len() < required {
        return Err(Error::UndersizedScratchBuffer {
            required,
            available: scratch.flat_coords.len(),
        });
    }

    let mut count = 0usize;
    for p in base {
        let (px, pz) = (p.x, p.z);

        if dedupe {
            let seen = scratch.flat_coords[..count * 2]
                .chunks_exact(2)
                .any(|c| (c[0] - px).abs() < f64::EPSILON && (c[1] - pz).abs() < f64::EPSILON);
            if seen {
                continue;
            }
        }

        let cv2 = count * 2;
        scratch.flat_coords[cv2] = px;
        scratch.flat_coords[cv2 + 1] = pz;
        scratch.vertices.push(Point3::new(px, roof_y, pz));
        count += 1;
    }

    Ok(count)
}

/// Fan the roof outline to an apex at `apex_y` above its centroid
///
/// Emits `(i, i + 1, apex)` for every outline vertex, wrapping around, then
/// appends the apex. Fewer than three vertices produce nothing.
pub fn build_dome(apex_y: f64, vertices: &mut Vec<Point3<f64>>, triangles: &mut Vec<usize>) {
    let n = vertices.len();
    if n < 3 {
        return;
    }

    let sum = vertices
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    let mut apex = Point3::from(sum / n as f64);
    apex.y = apex_y;

    triangles.reserve(n * 3);
    for i in 0..n {
        triangles.push(i);
        triangles.push((i + 1) % n);
        triangles.push(n);
    }

    vertices.push(apex);
}

/// Triangulate the collected roof (roof-local indices)
pub fn triangulate_roof<T: FlatTriangulator + ?Sized>(
    kind: RoofKind,
    count: usize,
    apex_y: f64,
    triangulator: &T,
    scratch: &mut RoofScratch,
) -> Result<()> {
    match kind {
        RoofKind::Flat => {
            let coords = &scratch.flat_coords[..count * 2];
            triangulator.triangulate(coords, count, &mut scratch.triangles);
        }
        RoofKind::Dome => build_dome(apex_y, &mut scratch.vertices, &mut scratch.triangles),
    }

    if scratch.triangles.is_empty() {
        return Err(Error::EmptyTriangulation { vertices: count });
    }
    Ok(())
}

/// Result of one roof build
#[derive(Debug, Clone, PartialEq)]
pub enum RoofOutcome {
    Merged(RoofMerge),
    /// Soft failure; nothing was appended to the shared mesh
    Skipped(Error),
}

impl RoofOutcome {
    #[inline]
    pub fn is_merged(&self) -> bool {
        matches!(self, RoofOutcome::Merged(_))
    }
}

/// Build one roof from `base` and merge it into `shared`
///
/// Soft failures are logged and returned as [`RoofOutcome::Skipped`] with
/// the shared mesh untouched; fatal errors propagate.
pub fn build_roof<T: FlatTriangulator + ?Sized>(
    base: &[Point3<f64>],
    params: &RoofParams,
    triangulator: &T,
    scratch: &mut RoofScratch,
    shared: &mut SharedMeshAccumulator,
) -> Result<RoofOutcome> {
    scratch.prepare(base.len());

    match try_build_roof(base, params, triangulator, scratch, shared) {
        Ok(merge) => Ok(RoofOutcome::Merged(merge)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!(
                roof_kind = params.kind.as_str(),
                base_vertices = base.len(),
                roof_vertices = scratch.vertex_count(),
                roof_triangles = scratch.triangle_count(),
                error = %e,
                "Roof skipped"
            );
            Ok(RoofOutcome::Skipped(e))
        }
    }
}

fn try_build_roof<T: FlatTriangulator + ?Sized>(
    base: &[Point3<f64>],
    params: &RoofParams,
    triangulator: &T,
    scratch: &mut RoofScratch,
    shared: &mut SharedMeshAccumulator,
) -> Result<RoofMerge> {
    let count = collect_roof_vertices(base, params.base_y, params.dedupe, scratch)?;
    if count < 3 {
        return Err(Error::UnderspecifiedFootprint {
            points: count,
            required: 3,
        });
    }

    let apex_y = params.base_y + params.roof_height;
    triangulate_roof(params.kind, count, apex_y, triangulator, scratch)?;

    finalize_roof(scratch, shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::EarcutTriangulator;

    fn square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(0.0, 0.0, 10.0),
        ]
    }

    fn flat(base_y: f64) -> RoofParams {
        RoofParams {
            kind: RoofKind::Flat,
            base_y,
            roof_height: 0.0,
            dedupe: false,
        }
    }

    #[test]
    fn test_parse_roof_kind() {
        assert_eq!(RoofKind::parse("flat"), Some(RoofKind::Flat));
        assert_eq!(RoofKind::parse(" Dome "), Some(RoofKind::Dome));
        assert_eq!(RoofKind::parse("onion"), Some(RoofKind::Dome));
        assert_eq!(RoofKind::parse("gabled"), None);
    }

    #[test]
    fn test_collect_without_dedupe_keeps_every_point() {
        let mut base = square();
        base.push(base[0]);

        let mut scratch = RoofScratch::new();
        scratch.prepare(base.len());
        let count = collect_roof_vertices(&base, 12.0, false, &mut scratch).unwrap();

        assert_eq!(count, 5);
        assert!(scratch.vertices.iter().all(|v| v.y == 12.0));
        assert_eq!(&scratch.flat_coords[2..4], &[10.0, 0.0]);
    }

    #[test]
    fn test_collect_with_dedupe() {
        let mut base = square();
        base.push(base[0]);
        base.push(base[1]);

        let mut scratch = RoofScratch::new();
        scratch.prepare(base.len());
        let count = collect_roof_vertices(&base, 0.0, true, &mut scratch).unwrap();

        assert_eq!(count, 4);
        assert_eq!(scratch.vertex_count(), 4);
    }

    #[test]
    fn test_collect_undersized_scratch_is_fatal() {
        let mut scratch = RoofScratch::new();
        scratch.prepare(2);
        let err = collect_roof_vertices(&square(), 0.0, false, &mut scratch).unwrap_err();

        assert_eq!(err, Error::UndersizedScratchBuffer { required: 8, available: 4 });
        assert!(err.is_fatal());
    }

    #[test]
    fn test_dome_fan() {
        let mut vertices = vec![
            Point3::new(0.0, 3.0, 0.0),
            Point3::new(6.0, 3.0, 0.0),
            Point3::new(0.0, 3.0, 6.0),
        ];
        let mut triangles = Vec::new();
        build_dome(8.0, &mut vertices, &mut triangles);

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[3], Point3::new(2.0, 8.0, 2.0));
        assert_eq!(triangles, vec![0, 1, 3, 1, 2, 3, 2, 0, 3]);
    }

    #[test]
    fn test_dome_needs_three_vertices() {
        let mut vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let mut triangles = Vec::new();
        build_dome(5.0, &mut vertices, &mut triangles);

        assert!(triangles.is_empty());
        assert_eq!(vertices.len(), 2);
    }

    #[test]
    fn test_build_flat_roof() {
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let outcome =
            build_roof(&square(), &flat(10.0), &EarcutTriangulator, &mut scratch, &mut shared)
                .unwrap();

        match outcome {
            RoofOutcome::Merged(merge) => {
                assert_eq!(merge.offset, 0);
                assert_eq!(merge.vertex_count, 4);
                assert_eq!(merge.triangle_count, 2);
            }
            RoofOutcome::Skipped(e) => panic!("roof skipped: {}", e),
        }
        assert_eq!(shared.len(), 4);
    }

    #[test]
    fn test_collinear_roof_is_skipped() {
        let base = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ];
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let outcome =
            build_roof(&base, &flat(3.0), &EarcutTriangulator, &mut scratch, &mut shared).unwrap();

        assert_eq!(outcome, RoofOutcome::Skipped(Error::EmptyTriangulation { vertices: 3 }));
        assert!(shared.is_empty());
    }

    #[test]
    fn test_two_point_roof_is_underspecified() {
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let outcome = build_roof(
            &square()[..2],
            &flat(3.0),
            &EarcutTriangulator,
            &mut scratch,
            &mut shared,
        )
        .unwrap();

        assert_eq!(
            outcome,
            RoofOutcome::Skipped(Error::UnderspecifiedFootprint { points: 2, required: 3 })
        );
        assert!(shared.is_empty());
    }

    #[test]
    fn test_scratch_reuse_leaves_no_residue() {
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        build_roof(&square(), &flat(1.0), &EarcutTriangulator, &mut scratch, &mut shared).unwrap();
        assert_eq!(scratch.vertex_count(), 4);

        let triangle = &square()[..3];
        let outcome =
            build_roof(triangle, &flat(1.0), &EarcutTriangulator, &mut scratch, &mut shared)
                .unwrap();

        assert!(outcome.is_merged());
        assert_eq!(scratch.vertex_count(), 3);
        assert_eq!(scratch.triangle_count(), 1);
        assert_eq!(shared.len(), 7);
    }
}
