// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel building construction.
//!
//! Each rayon worker owns its own roof scratch and a private roof mesh.
//! Results come back in way order and a single appender merges the private
//! roof meshes into the shared one, so indices and offsets match a
//! sequential run exactly.

use crate::config::RoofSelection;
use crate::error::Result;
use crate::pipeline::{resolve_footprint, BatchOutput, BatchStats, BuildingMesh};
use rayon::prelude::*;
use roofline_core::{FootprintSource, MapData, Way};
use roofline_geometry::{
    BuildingBuilder, BuildingOptions, Mesh, RoofScratch, SharedMeshAccumulator,
};

/// One worker's output for one way
struct WorkerResult {
    building: BuildingMesh,
    /// Roofs of this building only, indices local to this mesh
    roof: Mesh,
}

fn build_one(
    map: &MapData,
    way: &Way,
    builder: &BuildingBuilder,
    selection: &RoofSelection,
    scratch: &mut RoofScratch,
) -> roofline_geometry::Result<Option<WorkerResult>> {
    let Some(footprint) = resolve_footprint(map, way) else {
        return Ok(None);
    };

    let origin = footprint.origin();
    let edges = footprint.edge_count();
    let mut mesh = Mesh::with_capacity(edges * 4, edges * 6);
    let mut roof = SharedMeshAccumulator::new();

    let report = builder.build(
        &footprint,
        origin,
        selection.select(&footprint),
        &mut mesh,
        scratch,
        &mut roof,
    )?;

    Ok(Some(WorkerResult {
        building: BuildingMesh {
            way_id: footprint.way_id,
            origin,
            mesh,
            report,
        },
        roof: roof.into_mesh(),
    }))
}

/// Build every qualifying footprint of `map` on `worker_threads` threads
pub fn build_parallel(
    map: &MapData,
    options: &BuildingOptions,
    selection: RoofSelection,
    worker_threads: usize,
) -> Result<BatchOutput> {
    let start = std::time::Instant::now();
    let ways: Vec<&Way> = map.buildings().collect();

    tracing::info!(
        buildings = ways.len(),
        worker_threads,
        "Starting parallel building construction"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads.max(1))
        .build()?;

    let results: Vec<Option<WorkerResult>> = pool.install(|| {
        ways.par_iter()
            .map_init(
                || (BuildingBuilder::new(options.clone()), RoofScratch::new()),
                |(builder, scratch), way| build_one(map, way, builder, &selection, scratch),
            )
            .collect::<roofline_geometry::Result<Vec<_>>>()
    })?;

    // Single appender: way order fixes every roof offset
    let (roof_vertices, roof_indices) = results
        .iter()
        .flatten()
        .fold((0, 0), |(v, i), r| (v + r.roof.vertex_count(), i + r.roof.indices.len()));
    let mut shared = SharedMeshAccumulator::with_capacity(roof_vertices, roof_indices);
    let mut buildings = Vec::with_capacity(results.len());
    let mut stats = BatchStats::default();

    for result in results {
        let Some(WorkerResult { mut building, roof }) = result else {
            stats.skipped += 1;
            continue;
        };

        let base = shared.append_mesh(&roof)?;
        for merge in building.report.roof_merges.iter_mut() {
            merge.offset += base;
        }

        stats.record(&building.mesh, &building.report);
        buildings.push(building);
    }

    stats.elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        buildings = stats.buildings,
        errored = stats.errored,
        skipped = stats.skipped,
        roof_vertices = stats.roof_vertices,
        elapsed_ms = stats.elapsed_ms,
        "Parallel building construction complete"
    );

    Ok(BatchOutput {
        buildings,
        shared: shared.into_mesh(),
        stats,
        cancelled: false,
    })
}
