// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map data model: nodes, ways and the footprint source interface

use crate::bounds::MapBounds;
use rustc_hash::FxHashMap;

/// A map node with a projected 3D position (y is up)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    #[inline]
    pub fn new(id: u64, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// An outline way, open or closed, referencing nodes by id
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    pub id: u64,
    pub node_ids: Vec<u64>,
    pub is_building: bool,
    /// Wall height above the ground
    pub height: f64,
    /// Roof shape hint carried by the source, e.g. "flat" or "dome"
    #[cfg_attr(feature = "serde", serde(default))]
    pub roof_shape: Option<String>,
}

impl Way {
    /// Create a way that is not a building
    pub fn new(id: u64, node_ids: Vec<u64>) -> Self {
        Self {
            id,
            node_ids,
            is_building: false,
            height: 0.0,
            roof_shape: None,
        }
    }

    /// Create a building way
    pub fn building(id: u64, node_ids: Vec<u64>, height: f64) -> Self {
        Self {
            id,
            node_ids,
            is_building: true,
            height,
            roof_shape: None,
        }
    }

    /// Attach a roof shape hint
    pub fn with_roof_shape(mut self, shape: impl Into<String>) -> Self {
        self.roof_shape = Some(shape.into());
        self
    }

    /// Whether the builders should process this way
    #[inline]
    pub fn qualifies(&self) -> bool {
        self.is_building && self.node_ids.len() > 1
    }
}

/// Where footprints come from
///
/// Builders only start reading once `is_ready` is true; see
/// [`crate::map_channel`] for an awaitable version of that flag.
pub trait FootprintSource {
    fn is_ready(&self) -> bool;

    fn ways(&self) -> &[Way];

    fn node(&self, id: u64) -> Option<&Node>;

    /// Ways that describe buildings with at least two nodes
    fn buildings(&self) -> Box<dyn Iterator<Item = &Way> + '_> {
        Box::new(self.ways().iter().filter(|w| w.qualifies()))
    }
}

/// In-memory map, fully loaded and therefore always ready
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapData {
    pub nodes: FxHashMap<u64, Node>,
    pub ways: Vec<Way>,
}

impl MapData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same id
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    pub fn push_way(&mut self, way: Way) {
        self.ways.push(way);
    }

    /// Bounds over every node in the map
    pub fn bounds(&self) -> MapBounds {
        let mut bounds = MapBounds::new();
        for node in self.nodes.values() {
            bounds.expand(node.x, node.y, node.z);
        }
        bounds
    }

    /// Number of ways that qualify as buildings
    pub fn building_count(&self) -> usize {
        self.ways.iter().filter(|w| w.qualifies()).count()
    }
}

impl FootprintSource for MapData {
    #[inline]
    fn is_ready(&self) -> bool {
        true
    }

    #[inline]
    fn ways(&self) -> &[Way] {
        &self.ways
    }

    #[inline]
    fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.get(&id)
    }
}
