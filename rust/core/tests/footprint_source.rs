// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint resolution through a source that is not `MapData`

use roofline_core::{Error, Footprint, FootprintSource, Node, Way};

/// Nodes stored densely by id, with an explicit loading flag
struct StreamingSource {
    loaded: bool,
    nodes: Vec<Node>,
    ways: Vec<Way>,
}

impl FootprintSource for StreamingSource {
    fn is_ready(&self) -> bool {
        self.loaded
    }

    fn ways(&self) -> &[Way] {
        &self.ways
    }

    fn node(&self, id: u64) -> Option<&Node> {
        self.nodes.get(id as usize).filter(|n| n.id == id)
    }
}

fn source() -> StreamingSource {
    StreamingSource {
        loaded: false,
        nodes: vec![
            Node::new(0, 0.0, 0.0, 0.0),
            Node::new(1, 4.0, 0.0, 0.0),
            Node::new(2, 4.0, 0.0, 4.0),
        ],
        ways: vec![
            Way::building(10, vec![0, 1, 2, 0], 3.0).with_roof_shape("dome"),
            Way::new(11, vec![0, 1]),
            Way::building(12, vec![2], 3.0),
            Way::building(13, vec![0, 7], 3.0),
        ],
    }
}

#[test]
fn test_buildings_filter() {
    let source = source();
    let ids: Vec<u64> = source.buildings().map(|w| w.id).collect();
    assert_eq!(ids, vec![10, 13]);
}

#[test]
fn test_resolve_closed_way() {
    let mut source = source();
    source.loaded = true;
    assert!(source.is_ready());

    let way = &source.ways[0];
    let footprint = Footprint::from_way(&source, way).unwrap();
    assert_eq!(footprint.points.len(), 4);
    assert_eq!(footprint.points[0], footprint.points[3]);
    assert_eq!(footprint.edge_count(), 3);
    assert_eq!(footprint.roof_shape.as_deref(), Some("dome"));
}

#[test]
fn test_resolve_errors() {
    let source = source();

    let err = Footprint::from_way(&source, &source.ways[2]).unwrap_err();
    assert_eq!(err, Error::TooFewNodes { way_id: 12, nodes: 1 });

    let err = Footprint::from_way(&source, &source.ways[3]).unwrap_err();
    assert_eq!(err, Error::MissingNode { way_id: 13, node_id: 7 });
}

#[test]
fn test_resolve_through_trait_object() {
    let source = source();
    let dyn_source: &dyn FootprintSource = &source;
    let footprint = Footprint::from_way(dyn_source, &source.ways[0]).unwrap();
    assert_eq!(footprint.height, 3.0);
}
