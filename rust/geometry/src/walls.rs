// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall extrusion - one vertical quad per footprint edge

use crate::error::{Error, Result};
use crate::mesh::{CoordinateShift, Mesh};
use nalgebra::{Point3, Vector3};

/// Normal shared by every wall vertex
///
/// Walls do not get per-edge normals; all of them face the same axis.
pub const DEFAULT_WALL_NORMAL: Vector3<f64> = Vector3::new(0.0, 0.0, -1.0);

/// Fixed wall UVs for (bottom-start, bottom-end, top-start, top-end)
const WALL_UVS: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Extrude one footprint edge `p1 -> p2` into a wall quad
///
/// Appends four vertices `v1 = p1`, `v2 = p2`, `v3 = p1 + h`, `v4 = p2 + h`
/// (relative to `shift`) and the two triangles `(v1, v3, v2)` and
/// `(v3, v4, v2)`. Only those two triangles are emitted, so each quad is
/// covered along one diagonal strip rather than in full.
///
/// Returns the four relative vertex positions that were written.
#[inline]
pub fn extrude_wall_edge(
    p1: Point3<f64>,
    p2: Point3<f64>,
    height: f64,
    shift: &CoordinateShift,
    normal: &Vector3<f64>,
    out: &mut Mesh,
) -> [Point3<f64>; 4] {
    let rise = Vector3::new(0.0, height, 0.0);

    let v1 = shift.apply(p1);
    let v2 = shift.apply(p2);
    let v3 = v1 + rise;
    let v4 = v2 + rise;

    let quad = [v1, v2, v3, v4];
    for (v, uv) in quad.iter().zip(WALL_UVS.iter()) {
        out.add_vertex(*v, *normal, *uv);
    }

    let idx4 = out.vertex_count() as u32 - 1;
    let idx3 = idx4 - 1;
    let idx2 = idx4 - 2;
    let idx1 = idx4 - 3;

    // v1, v3, v2
    out.add_triangle(idx1, idx3, idx2);
    // v3, v4, v2
    out.add_triangle(idx3, idx4, idx2);

    quad
}

/// Extrude every consecutive point pair of `points` to `height`
///
/// Points are map-space positions; the emitted vertices are relative to
/// `shift`. Height is not validated: zero gives flat quads and a negative
/// value extrudes below the footprint. Returns the number of edges.
pub fn extrude_walls(
    points: &[Point3<f64>],
    height: f64,
    shift: &CoordinateShift,
    normal: &Vector3<f64>,
    out: &mut Mesh,
) -> Result<usize> {
    if points.len() < 2 {
        return Err(Error::UnderspecifiedFootprint {
            points: points.len(),
            required: 2,
        });
    }

    let edges = points.len() - 1;
    out.positions.reserve(edges * 12);
    out.normals.reserve(edges * 12);
    out.uvs.reserve(edges * 8);
    out.indices.reserve(edges * 6);

    for pair in points.windows(2) {
        extrude_wall_edge(pair[0], pair[1], height, shift, normal, out);
    }

    Ok(edges)
}
