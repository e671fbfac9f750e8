// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building footprints resolved from ways

use crate::error::{Error, Result};
use crate::map::{FootprintSource, Way};

/// Ground outline of one building, in map coordinates
///
/// Points keep the way's node order, including a repeated closing point
/// for closed ways. Footprints are read once per building and never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub way_id: u64,
    pub points: Vec<[f64; 3]>,
    pub height: f64,
    pub roof_shape: Option<String>,
}

impl Footprint {
    /// Resolve every node of `way` through `source`
    pub fn from_way<S: FootprintSource + ?Sized>(source: &S, way: &Way) -> Result<Self> {
        if way.node_ids.len() < 2 {
            return Err(Error::TooFewNodes {
                way_id: way.id,
                nodes: way.node_ids.len(),
            });
        }

        let points = way
            .node_ids
            .iter()
            .map(|&node_id| {
                source
                    .node(node_id)
                    .map(|n| n.position())
                    .ok_or(Error::MissingNode {
                        way_id: way.id,
                        node_id,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            way_id: way.id,
            points,
            height: way.height,
            roof_shape: way.roof_shape.clone(),
        })
    }

    /// Number of wall edges (consecutive point pairs)
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Per-building origin: the first point of the outline
    #[inline]
    pub fn origin(&self) -> [f64; 3] {
        self.points.first().copied().unwrap_or([0.0, 0.0, 0.0])
    }
}
