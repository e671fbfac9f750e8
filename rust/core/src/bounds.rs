// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Map bounds in f64 precision
//!
//! Projected map coordinates are often hundreds of kilometres from the
//! origin. Buildings are meshed relative to a per-building origin, and the
//! bounds tell the host whether it should also shift the whole scene.

/// Axis-aligned bounds of a set of map nodes
#[derive(Debug, Clone, PartialEq)]
pub struct MapBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
    /// Number of points folded in
    pub sample_count: usize,
}

impl MapBounds {
    /// Create new bounds initialized to invalid state
    pub fn new() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            min_z: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
            max_z: f64::MIN,
            sample_count: 0,
        }
    }

    /// Check if bounds are valid (at least one point added)
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.sample_count > 0
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.min_z = self.min_z.min(z);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.max_z = self.max_z.max(z);
        self.sample_count += 1;
    }

    /// Center of the bounding box, origin when empty
    #[inline]
    pub fn center(&self) -> [f64; 3] {
        if !self.is_valid() {
            return [0.0, 0.0, 0.0];
        }
        [
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        ]
    }

    /// Ground-plane extent (x, z)
    #[inline]
    pub fn ground_extent(&self) -> (f64, f64) {
        if !self.is_valid() {
            return (0.0, 0.0);
        }
        (self.max_x - self.min_x, self.max_z - self.min_z)
    }

    /// Check if bounds contain large coordinates (>10km from origin)
    #[inline]
    pub fn has_large_coordinates(&self) -> bool {
        const THRESHOLD: f64 = 10000.0; // 10km
        if !self.is_valid() {
            return false;
        }
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
        .iter()
        .any(|v| v.abs() > THRESHOLD)
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new()
    }
}
