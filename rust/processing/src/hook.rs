// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-building construction hook and the state it reuses across buildings.

use crate::config::{Config, RoofSelection};
use roofline_core::Footprint;
use roofline_geometry::{
    BuildingBuilder, BuildingOptions, BuildingReport, EarcutTriangulator, FlatTriangulator, Mesh,
    RoofScratch, SharedMeshAccumulator,
};

/// Everything one sequential run reuses between buildings: the builder,
/// the roof scratch and the shared roof mesh
#[derive(Debug)]
pub struct BuildContext<T = EarcutTriangulator> {
    builder: BuildingBuilder<T>,
    selection: RoofSelection,
    scratch: RoofScratch,
    shared: SharedMeshAccumulator,
}

impl BuildContext<EarcutTriangulator> {
    pub fn new(config: &Config) -> Self {
        Self::with_triangulator(config.building_options(), config.roof_selection, EarcutTriangulator)
    }
}

impl<T: FlatTriangulator> BuildContext<T> {
    pub fn with_triangulator(
        options: BuildingOptions,
        selection: RoofSelection,
        triangulator: T,
    ) -> Self {
        Self {
            builder: BuildingBuilder::with_triangulator(options, triangulator),
            selection,
            scratch: RoofScratch::new(),
            shared: SharedMeshAccumulator::new(),
        }
    }

    #[inline]
    pub fn shared(&self) -> &SharedMeshAccumulator {
        &self.shared
    }

    #[inline]
    pub fn selection(&self) -> RoofSelection {
        self.selection
    }

    pub fn into_shared(self) -> SharedMeshAccumulator {
        self.shared
    }
}

/// Construct one building into `out` and the context's shared roof mesh
///
/// Called once per qualifying footprint. Malformed footprints come back as
/// a report with `has_errors` set and whatever walls were built; only
/// invariant violations return `Err`.
pub fn on_object_created<T: FlatTriangulator>(
    footprint: &Footprint,
    origin: [f64; 3],
    out: &mut Mesh,
    ctx: &mut BuildContext<T>,
) -> roofline_geometry::Result<BuildingReport> {
    let roof_kind = ctx.selection.select(footprint);
    ctx.builder.build(
        footprint,
        origin,
        roof_kind,
        out,
        &mut ctx.scratch,
        &mut ctx.shared,
    )
}
