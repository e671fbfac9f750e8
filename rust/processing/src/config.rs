// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.

use roofline_core::Footprint;
use roofline_geometry::{BuildingOptions, RoofBase, RoofKind, RoofPass};

/// How each building's roof shape is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofSelection {
    /// Every building gets the same roof
    Always(RoofKind),
    /// Use the way's roof shape hint, `fallback` when absent or unknown
    ByTag { fallback: RoofKind },
}

impl RoofSelection {
    pub fn select(&self, footprint: &Footprint) -> RoofKind {
        match self {
            RoofSelection::Always(kind) => *kind,
            RoofSelection::ByTag { fallback } => footprint
                .roof_shape
                .as_deref()
                .and_then(RoofKind::parse)
                .unwrap_or(*fallback),
        }
    }

    /// "flat", "dome" or "tag"
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tag" | "by-tag" => Some(RoofSelection::ByTag {
                fallback: RoofKind::Flat,
            }),
            other => RoofKind::parse(other).map(RoofSelection::Always),
        }
    }
}

impl Default for RoofSelection {
    fn default() -> Self {
        RoofSelection::Always(RoofKind::Flat)
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Roof shape policy.
    pub roof_selection: RoofSelection,
    /// Dome apex rise above the roof base.
    pub roof_height: f64,
    /// Where the roof outline sits ("wall" or a fixed height).
    pub roof_base: RoofBase,
    /// Drop repeated outline points before roof triangulation.
    pub dedupe: bool,
    /// Build the roof once per footprint or after every wall edge.
    pub roof_pass: RoofPass,
    /// Number of worker threads for parallel construction.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            roof_selection: lookup("ROOFLINE_ROOF_KIND")
                .and_then(|v| RoofSelection::parse(&v))
                .unwrap_or_default(),
            roof_height: lookup("ROOFLINE_ROOF_HEIGHT")
                .unwrap_or_else(|| "0".into())
                .parse()
                .unwrap_or(0.0),
            roof_base: lookup("ROOFLINE_ROOF_BASE")
                .and_then(|v| parse_roof_base(&v))
                .unwrap_or_default(),
            dedupe: lookup("ROOFLINE_DEDUPE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            roof_pass: lookup("ROOFLINE_ROOF_PASS")
                .and_then(|v| parse_roof_pass(&v))
                .unwrap_or_default(),
            worker_threads: lookup("ROOFLINE_WORKER_THREADS")
                .unwrap_or_else(|| num_cpus::get().to_string())
                .parse()
                .unwrap_or_else(|_| num_cpus::get()),
        }
    }

    /// Geometry options derived from this configuration.
    pub fn building_options(&self) -> BuildingOptions {
        BuildingOptions::default()
            .with_roof_height(self.roof_height)
            .with_roof_base(self.roof_base)
            .with_dedupe(self.dedupe)
            .with_roof_pass(self.roof_pass)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_roof_base(value: &str) -> Option<RoofBase> {
    match value.trim() {
        "wall" | "wall-top" => Some(RoofBase::WallTop),
        other => other.parse().ok().map(RoofBase::Fixed),
    }
}

fn parse_roof_pass(value: &str) -> Option<RoofPass> {
    match value.trim() {
        "footprint" => Some(RoofPass::PerFootprint),
        "edge" => Some(RoofPass::PerEdge),
        _ => None,
    }
}
