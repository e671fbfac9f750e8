// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat polygon triangulation
//!
//! The roof builder only talks to the [`FlatTriangulator`] seam; the
//! default implementation wraps earcutr.

/// Triangulates a simple polygon given as interleaved 2D coordinates
///
/// Implementations clear `indices` and fill it with triangle vertex
/// indices into the first `vertex_count` points of `flat_coords`. An empty
/// result means the polygon could not be triangulated.
pub trait FlatTriangulator {
    fn triangulate(&self, flat_coords: &[f64], vertex_count: usize, indices: &mut Vec<usize>);
}

impl<T: FlatTriangulator + ?Sized> FlatTriangulator for &T {
    #[inline]
    fn triangulate(&self, flat_coords: &[f64], vertex_count: usize, indices: &mut Vec<usize>) {
        (**self).triangulate(flat_coords, vertex_count, indices)
    }
}

/// Ear-clipping triangulator backed by earcutr, with a fan fast path for
/// small convex outlines
///
/// Ear clipping always terminates, so a malformed outline yields an empty
/// index list instead of a hang.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTriangulator;

impl FlatTriangulator for EarcutTriangulator {
    fn triangulate(&self, flat_coords: &[f64], vertex_count: usize, indices: &mut Vec<usize>) {
        indices.clear();

        let n = vertex_count.min(flat_coords.len() / 2);
        if n < 3 {
            return;
        }
        let coords = &flat_coords[..n * 2];

        // FAST PATH: small strictly convex outline - fan
        if n <= 8 && is_strictly_convex(coords) {
            fan_triangulate(n, indices);
            return;
        }

        match earcutr::earcut(coords, &[], 2) {
            Ok(result) => indices.extend(result),
            Err(e) => {
                tracing::debug!(vertices = n, error = ?e, "earcut rejected roof outline");
            }
        }
    }
}

#[inline]
fn point(coords: &[f64], i: usize) -> (f64, f64) {
    (coords[i * 2], coords[i * 2 + 1])
}

/// Check if a polygon is strictly convex: every turn has the same
/// non-zero sign. Repeated or collinear points fail, since fanning them
/// yields zero-area triangles.
#[inline]
fn is_strictly_convex(coords: &[f64]) -> bool {
    let n = coords.len() / 2;
    if n < 3 {
        return false;
    }

    let mut sign = 0i8;

    for i in 0..n {
        let p0 = point(coords, i);
        let p1 = point(coords, (i + 1) % n);
        let p2 = point(coords, (i + 2) % n);

        let cross = (p1.0 - p0.0) * (p2.1 - p1.1) - (p1.1 - p0.1) * (p2.0 - p1.0);
        if cross.abs() <= 1e-10 {
            return false;
        }

        let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
        if sign == 0 {
            sign = current_sign;
        } else if sign != current_sign {
            return false;
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize, indices: &mut Vec<usize>) {
    indices.reserve((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
}
