// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for map operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading footprints from a map source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Way #{way_id} references unknown node #{node_id}")]
    MissingNode { way_id: u64, node_id: u64 },

    #[error("Way #{way_id} has {nodes} node(s), need at least 2")]
    TooFewNodes { way_id: u64, nodes: usize },

    #[error("Map source closed before it became ready")]
    SourceClosed,
}
