// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequential building pipeline: wait for the map, then construct one
//! footprint at a time, yielding to the runtime between footprints.

use crate::config::Config;
use crate::error::Result;
use crate::hook::{on_object_created, BuildContext};
use roofline_core::{Footprint, MapData, MapHandle, Way};
use roofline_geometry::{BuildingReport, EarcutTriangulator, FlatTriangulator, Mesh};
use serde::Serialize;
use tokio::sync::watch;

/// One constructed building: its wall mesh (relative to `origin`) and report
#[derive(Debug, Clone)]
pub struct BuildingMesh {
    pub way_id: u64,
    pub origin: [f64; 3],
    pub mesh: Mesh,
    pub report: BuildingReport,
}

/// Counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    /// Buildings constructed (including those with errors)
    pub buildings: usize,
    /// Buildings whose error flag is set
    pub errored: usize,
    /// Ways that could not be resolved into a footprint
    pub skipped: usize,
    pub wall_vertices: usize,
    pub wall_triangles: usize,
    pub roof_vertices: usize,
    pub roof_triangles: usize,
    pub elapsed_ms: u64,
}

impl BatchStats {
    pub(crate) fn record(&mut self, mesh: &Mesh, report: &BuildingReport) {
        self.buildings += 1;
        if report.has_errors {
            self.errored += 1;
        }
        self.wall_vertices += mesh.vertex_count();
        self.wall_triangles += mesh.triangle_count();
        self.roof_vertices += report.roof_vertices();
        self.roof_triangles += report.roof_triangles();
    }
}

/// Everything a batch produced
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub buildings: Vec<BuildingMesh>,
    /// Roofs of every building, merged
    pub shared: Mesh,
    pub stats: BatchStats,
    /// The run stopped early on request
    pub cancelled: bool,
}

/// Create a cancellation pair; send `true` to stop a running pipeline at
/// the next footprint boundary
pub fn cancellation() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Resolve `way` into a footprint, logging ways that cannot be resolved
pub(crate) fn resolve_footprint(map: &MapData, way: &Way) -> Option<Footprint> {
    match Footprint::from_way(map, way) {
        Ok(footprint) => Some(footprint),
        Err(e) => {
            tracing::warn!(way_id = way.id, error = %e, "Skipping building way");
            None
        }
    }
}

/// Builds every qualifying footprint of a map in order
pub struct BuildingPipeline<T = EarcutTriangulator> {
    ctx: BuildContext<T>,
}

impl BuildingPipeline<EarcutTriangulator> {
    pub fn new(config: &Config) -> Self {
        Self {
            ctx: BuildContext::new(config),
        }
    }
}

impl<T: FlatTriangulator> BuildingPipeline<T> {
    pub fn with_context(ctx: BuildContext<T>) -> Self {
        Self { ctx }
    }

    /// Wait for the map, then construct every building
    ///
    /// Control returns to the runtime after each footprint, and `cancel` is
    /// checked there. A cancelled run returns what was built so far.
    pub async fn run(
        mut self,
        handle: &MapHandle,
        cancel: &watch::Receiver<bool>,
    ) -> Result<BatchOutput> {
        let map = handle.ready().await?;
        let start = std::time::Instant::now();

        let bounds = map.bounds();
        tracing::info!(
            ways = map.ways.len(),
            buildings = map.building_count(),
            nodes = map.nodes.len(),
            large_coordinates = bounds.has_large_coordinates(),
            "Starting building construction"
        );

        let mut buildings = Vec::with_capacity(map.building_count());
        let mut stats = BatchStats::default();
        let mut cancelled = false;

        for way in map.ways.iter().filter(|w| w.qualifies()) {
            if *cancel.borrow() {
                cancelled = true;
                break;
            }

            let Some(footprint) = resolve_footprint(&map, way) else {
                stats.skipped += 1;
                continue;
            };

            let origin = footprint.origin();
            let edges = footprint.edge_count();
            let mut mesh = Mesh::with_capacity(edges * 4, edges * 6);
            let report = on_object_created(&footprint, origin, &mut mesh, &mut self.ctx)?;

            stats.record(&mesh, &report);
            buildings.push(BuildingMesh {
                way_id: footprint.way_id,
                origin,
                mesh,
                report,
            });

            tokio::task::yield_now().await;
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            buildings = stats.buildings,
            errored = stats.errored,
            skipped = stats.skipped,
            roof_vertices = stats.roof_vertices,
            roof_triangles = stats.roof_triangles,
            elapsed_ms = stats.elapsed_ms,
            cancelled,
            "Building construction complete"
        );

        Ok(BatchOutput {
            buildings,
            shared: self.ctx.into_shared().into_mesh(),
            stats,
            cancelled,
        })
    }
}
