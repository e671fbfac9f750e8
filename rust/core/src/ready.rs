// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Readiness signal between the map loader and the building pipeline
//!
//! The loader publishes a finished [`MapData`] exactly once; consumers
//! await [`MapHandle::ready`] instead of polling a flag every frame.

use crate::error::{Error, Result};
use crate::map::MapData;
use std::sync::Arc;
use tokio::sync::watch;

type Slot = Option<Arc<MapData>>;

/// Create a connected publisher/handle pair with no map yet
pub fn map_channel() -> (MapPublisher, MapHandle) {
    let (tx, rx) = watch::channel(None);
    (MapPublisher { tx }, MapHandle { rx })
}

/// Loader side of the readiness signal
#[derive(Debug)]
pub struct MapPublisher {
    tx: watch::Sender<Slot>,
}

impl MapPublisher {
    /// Publish the loaded map and wake every waiting handle
    pub fn publish(&self, map: MapData) -> Arc<MapData> {
        let map = Arc::new(map);
        self.tx.send_replace(Some(map.clone()));
        map
    }
}

/// Consumer side of the readiness signal; cheap to clone
#[derive(Debug, Clone)]
pub struct MapHandle {
    rx: watch::Receiver<Slot>,
}

impl MapHandle {
    /// A handle that is ready from the start
    pub fn from_map(map: MapData) -> Self {
        let (_tx, rx) = watch::channel(Some(Arc::new(map)));
        Self { rx }
    }

    /// Non-blocking readiness check
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until a map is published
    ///
    /// Resolves immediately when the map is already available. Fails with
    /// [`Error::SourceClosed`] if the publisher goes away without publishing.
    pub async fn ready(&self) -> Result<Arc<MapData>> {
        let mut rx = self.rx.clone();
        let slot = rx
            .wait_for(|slot| slot.is_some())
            .await
            .map_err(|_| Error::SourceClosed)?;
        slot.as_ref().cloned().ok_or(Error::SourceClosed)
    }
}
