// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roofline Geometry
//!
//! Wall extrusion and roof synthesis for building footprints, using
//! earcutr triangulation and nalgebra for vector math.
//!
//! Walls are written into a per-building [`Mesh`]; roofs are merged into a
//! [`SharedMeshAccumulator`] with their indices offset by the shared
//! vertex count at merge time.

pub mod accumulator;
pub mod building;
pub mod error;
pub mod finalize;
pub mod mesh;
pub mod roof;
pub mod triangulation;
pub mod walls;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use accumulator::SharedMeshAccumulator;
pub use building::{BuildingBuilder, BuildingOptions, BuildingReport, RoofBase, RoofPass};
pub use error::{Error, Result};
pub use finalize::{correct_winding, finalize_roof, project_roof_uvs, RoofBounds, RoofMerge};
pub use mesh::{CoordinateShift, Mesh};
pub use roof::{
    build_dome, build_roof, collect_roof_vertices, triangulate_roof, RoofKind, RoofOutcome,
    RoofParams, RoofScratch,
};
pub use triangulation::{EarcutTriangulator, FlatTriangulator};
pub use walls::{extrude_wall_edge, extrude_walls, DEFAULT_WALL_NORMAL};
