// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-building construction: walls into the building's own mesh, roof
//! into the shared mesh

use crate::accumulator::SharedMeshAccumulator;
use crate::error::{Error, Result};
use crate::finalize::RoofMerge;
use crate::mesh::{CoordinateShift, Mesh};
use crate::roof::{build_roof, RoofKind, RoofOutcome, RoofParams, RoofScratch};
use crate::triangulation::{EarcutTriangulator, FlatTriangulator};
use crate::walls::{extrude_wall_edge, extrude_walls, DEFAULT_WALL_NORMAL};
use nalgebra::{Point3, Vector3};
use roofline_core::Footprint;

/// Height the roof outline sits at
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RoofBase {
    /// On top of the walls (the footprint height)
    #[default]
    WallTop,
    /// A fixed height above the building origin
    Fixed(f64),
}

impl RoofBase {
    #[inline]
    pub fn resolve(&self, wall_height: f64) -> f64 {
        match self {
            RoofBase::WallTop => wall_height,
            RoofBase::Fixed(h) => *h,
        }
    }
}

/// When the roof is built relative to the wall loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoofPass {
    /// Once, from the footprint outline, after all walls
    #[default]
    PerFootprint,
    /// After every wall edge, from all wall vertices emitted so far; each
    /// pass merges its own roof into the shared mesh
    PerEdge,
}

/// Knobs for building construction
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingOptions {
    /// Dome apex rise above the roof base
    pub roof_height: f64,
    pub roof_base: RoofBase,
    /// Drop repeated outline points before triangulating the roof
    pub dedupe: bool,
    pub roof_pass: RoofPass,
    /// Normal written for every wall vertex
    pub wall_normal: Vector3<f64>,
}

impl Default for BuildingOptions {
    fn default() -> Self {
        Self {
            roof_height: 0.0,
            roof_base: RoofBase::WallTop,
            dedupe: false,
            roof_pass: RoofPass::PerFootprint,
            wall_normal: DEFAULT_WALL_NORMAL,
        }
    }
}

impl BuildingOptions {
    pub fn with_roof_height(mut self, roof_height: f64) -> Self {
        self.roof_height = roof_height;
        self
    }

    pub fn with_roof_base(mut self, roof_base: RoofBase) -> Self {
        self.roof_base = roof_base;
        self
    }

    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn with_roof_pass(mut self, roof_pass: RoofPass) -> Self {
        self.roof_pass = roof_pass;
        self
    }
}

/// What happened while constructing one building
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingReport {
    pub way_id: u64,
    /// Wall edges extruded
    pub edges: usize,
    /// Roofs merged into the shared mesh (more than one only with
    /// [`RoofPass::PerEdge`])
    pub roof_merges: Vec<RoofMerge>,
    pub roof_failures: usize,
    /// Set when any part of the building was skipped
    pub has_errors: bool,
    pub last_error: Option<Error>,
}

impl BuildingReport {
    fn new(way_id: u64) -> Self {
        Self {
            way_id,
            ..Default::default()
        }
    }

    fn fail(&mut self, error: Error) {
        self.has_errors = true;
        self.last_error = Some(error);
    }

    fn record(&mut self, outcome: RoofOutcome) {
        match outcome {
            RoofOutcome::Merged(merge) => self.roof_merges.push(merge),
            RoofOutcome::Skipped(e) => {
                self.roof_failures += 1;
                self.fail(e);
            }
        }
    }

    pub fn roof_vertices(&self) -> usize {
        self.roof_merges.iter().map(|m| m.vertex_count).sum()
    }

    pub fn roof_triangles(&self) -> usize {
        self.roof_merges.iter().map(|m| m.triangle_count).sum()
    }
}

/// Builds walls and roofs for one footprint at a time
#[derive(Debug, Clone)]
pub struct BuildingBuilder<T = EarcutTriangulator> {
    options: BuildingOptions,
    triangulator: T,
}

impl BuildingBuilder<EarcutTriangulator> {
    pub fn new(options: BuildingOptions) -> Self {
        Self::with_triangulator(options, EarcutTriangulator)
    }
}

impl<T: FlatTriangulator> BuildingBuilder<T> {
    pub fn with_triangulator(options: BuildingOptions, triangulator: T) -> Self {
        Self {
            options,
            triangulator,
        }
    }

    #[inline]
    pub fn options(&self) -> &BuildingOptions {
        &self.options
    }

    /// Construct one building
    ///
    /// Walls go into `out`, relative to `origin`. The roof is merged into
    /// `shared`. Bad input (too few points, untriangulable or degenerate
    /// outline) only sets the report's error flag and keeps whatever wall
    /// geometry was already written; fatal errors propagate.
    pub fn build(
        &self,
        footprint: &Footprint,
        origin: [f64; 3],
        roof_kind: RoofKind,
        out: &mut Mesh,
        scratch: &mut RoofScratch,
        shared: &mut SharedMeshAccumulator,
    ) -> Result<BuildingReport> {
        let mut report = BuildingReport::new(footprint.way_id);

        if footprint.points.len() < 2 {
            report.fail(Error::UnderspecifiedFootprint {
                points: footprint.points.len(),
                required: 2,
            });
            tracing::warn!(way_id = footprint.way_id, "Footprint too short for walls");
            return Ok(report);
        }

        let shift = CoordinateShift::from_array(origin);
        let outline: Vec<Point3<f64>> = footprint.points.iter().map(|&p| Point3::from(p)).collect();
        let params = RoofParams {
            kind: roof_kind,
            base_y: self.options.roof_base.resolve(footprint.height),
            roof_height: self.options.roof_height,
            dedupe: self.options.dedupe,
        };

        let mut base = std::mem::take(&mut scratch.base);
        base.clear();
        let result = match self.options.roof_pass {
            RoofPass::PerFootprint => self.build_per_footprint(
                &outline,
                footprint.height,
                &shift,
                &params,
                &mut base,
                out,
                scratch,
                shared,
                &mut report,
            ),
            RoofPass::PerEdge => self.build_per_edge(
                &outline,
                footprint.height,
                &shift,
                &params,
                &mut base,
                out,
                scratch,
                shared,
                &mut report,
            ),
        };
        scratch.base = base;
        result?;

        tracing::debug!(
            way_id = report.way_id,
            edges = report.edges,
            roofs = report.roof_merges.len(),
            roof_vertices = report.roof_vertices(),
            has_errors = report.has_errors,
            "Building constructed"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_per_footprint(
        &self,
        outline: &[Point3<f64>],
        height: f64,
        shift: &CoordinateShift,
        params: &RoofParams,
        base: &mut Vec<Point3<f64>>,
        out: &mut Mesh,
        scratch: &mut RoofScratch,
        shared: &mut SharedMeshAccumulator,
        report: &mut BuildingReport,
    ) -> Result<()> {
        report.edges = extrude_walls(outline, height, shift, &self.options.wall_normal, out)?;

        base.extend(outline.iter().map(|p| shift.apply(*p)));
        let outcome = build_roof(base, params, &self.triangulator, scratch, shared)?;
        report.record(outcome);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn build_per_edge(
        &self,
        outline: &[Point3<f64>],
        height: f64,
        shift: &CoordinateShift,
        params: &RoofParams,
        base: &mut Vec<Point3<f64>>,
        out: &mut Mesh,
        scratch: &mut RoofScratch,
        shared: &mut SharedMeshAccumulator,
        report: &mut BuildingReport,
    ) -> Result<()> {
        for pair in outline.windows(2) {
            let quad =
                extrude_wall_edge(pair[0], pair[1], height, shift, &self.options.wall_normal, out);
            report.edges += 1;

            base.extend_from_slice(&quad);
            let outcome = build_roof(base, params, &self.triangulator, scratch, shared)?;
            report.record(outcome);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footprint(points: Vec<[f64; 3]>, height: f64) -> Footprint {
        Footprint {
            way_id: 1,
            points,
            height,
            roof_shape: None,
        }
    }

    fn square() -> Vec<[f64; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [10.0, 0.0, 10.0],
            [0.0, 0.0, 10.0],
        ]
    }

    #[test]
    fn test_roof_base_resolve() {
        assert_eq!(RoofBase::WallTop.resolve(12.0), 12.0);
        assert_eq!(RoofBase::Fixed(15.0).resolve(12.0), 15.0);
    }

    #[test]
    fn test_flat_building() {
        let builder = BuildingBuilder::new(BuildingOptions::default());
        let mut out = Mesh::new();
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let fp = footprint(square(), 10.0);
        let report = builder
            .build(&fp, fp.origin(), RoofKind::Flat, &mut out, &mut scratch, &mut shared)
            .unwrap();

        assert!(!report.has_errors);
        assert_eq!(report.edges, 3);
        assert_eq!(out.vertex_count(), 12);
        assert_eq!(out.triangle_count(), 6);
        assert_eq!(report.roof_vertices(), 4);
        assert_eq!(report.roof_triangles(), 2);

        // Roof caps the walls
        let (min, max) = shared.mesh().bounds();
        assert_eq!(min.y, 10.0);
        assert_eq!(max.y, 10.0);
    }

    #[test]
    fn test_single_point_footprint_is_flagged() {
        let builder = BuildingBuilder::new(BuildingOptions::default());
        let mut out = Mesh::new();
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let fp = footprint(vec![[1.0, 0.0, 1.0]], 10.0);
        let report = builder
            .build(&fp, fp.origin(), RoofKind::Flat, &mut out, &mut scratch, &mut shared)
            .unwrap();

        assert!(report.has_errors);
        assert!(out.is_empty());
        assert!(shared.is_empty());
    }

    #[test]
    fn test_per_edge_rebuilds_roof() {
        let options = BuildingOptions::default()
            .with_roof_pass(RoofPass::PerEdge)
            .with_roof_base(RoofBase::Fixed(15.0));
        let builder = BuildingBuilder::new(options);
        let mut out = Mesh::new();
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let fp = footprint(square(), 10.0);
        let report = builder
            .build(&fp, fp.origin(), RoofKind::Flat, &mut out, &mut scratch, &mut shared)
            .unwrap();

        assert_eq!(report.edges, 3);
        // One attempt per edge; each roof sees every wall vertex so far
        assert_eq!(report.roof_merges.len() + report.roof_failures, 3);
        let sizes: Vec<usize> = report.roof_merges.iter().map(|m| m.vertex_count).collect();
        assert!(sizes.iter().all(|&n| n % 4 == 0));
        assert_eq!(shared.len(), report.roof_vertices());
    }

    #[test]
    fn test_dome_building() {
        let options = BuildingOptions::default().with_roof_height(5.0);
        let builder = BuildingBuilder::new(options);
        let mut out = Mesh::new();
        let mut scratch = RoofScratch::new();
        let mut shared = SharedMeshAccumulator::new();

        let fp = footprint(square(), 10.0);
        let report = builder
            .build(&fp, fp.origin(), RoofKind::Dome, &mut out, &mut scratch, &mut shared)
            .unwrap();

        assert_eq!(report.roof_vertices(), 5);
        assert_eq!(report.roof_triangles(), 4);
        let (_, max) = shared.mesh().bounds();
        assert_eq!(max.y, 15.0);
    }
}
