use serde::{Deserialize, Serialize};
use stagefit_protocol::RailGeometry;

use crate::error::ConfigError;
use crate::registry::MeasurementRegistry;

/// Rail geometry used from `min_viewport_width` up to the next band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailBand {
    pub min_viewport_width: f64,
    pub rail: RailGeometry,
}

impl RailBand {
    pub fn new(min_viewport_width: f64, width: f64, right_padding: f64) -> Self {
        Self {
            min_viewport_width,
            rail: RailGeometry::new(width, right_padding),
        }
    }
}

/// Responsive rail sizes, keyed by viewport width.
///
/// Below the first band there is no rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RailBand>", into = "Vec<RailBand>")]
pub struct RailBreakpoints {
    bands: Vec<RailBand>,
}

impl RailBreakpoints {
    pub fn new(bands: Vec<RailBand>) -> Result<Self, ConfigError> {
        let length = |v: f64| v.is_finite() && v >= 0.0;
        for (index, band) in bands.iter().enumerate() {
            if !length(band.min_viewport_width) {
                return Err(ConfigError::Breakpoint {
                    index,
                    reason: "min viewport width must be finite and non-negative",
                });
            }
            if !length(band.rail.width) || !length(band.rail.right_padding) {
                return Err(ConfigError::Breakpoint {
                    index,
                    reason: "rail width and padding must be finite and non-negative",
                });
            }
            if index > 0 && band.min_viewport_width <= bands[index - 1].min_viewport_width {
                return Err(ConfigError::Breakpoint {
                    index,
                    reason: "bands must be in strictly ascending order",
                });
            }
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[RailBand] {
        &self.bands
    }

    /// Index of the band active at `viewport_width`.
    pub fn band_index(&self, viewport_width: f64) -> Option<usize> {
        self.bands
            .iter()
            .rposition(|b| viewport_width >= b.min_viewport_width)
    }

    pub fn rail_for(&self, viewport_width: f64) -> RailGeometry {
        self.band_index(viewport_width)
            .map_or(RailGeometry::NONE, |i| self.bands[i].rail)
    }

    /// Whether going from `old_width` to `new_width` changes band.
    pub fn crosses(&self, old_width: f64, new_width: f64) -> bool {
        self.band_index(old_width) != self.band_index(new_width)
    }

    /// Publish the rail for `viewport_width` into `registry`.
    pub fn register_for(&self, registry: &MeasurementRegistry, viewport_width: f64) {
        registry.register_rail(self.rail_for(viewport_width));
    }
}

impl Default for RailBreakpoints {
    /// Hidden on phones, compact on tablets, full width on desktop.
    fn default() -> Self {
        Self {
            bands: vec![RailBand::new(768.0, 56.0, 16.0), RailBand::new(1280.0, 80.0, 40.0)],
        }
    }
}

impl TryFrom<Vec<RailBand>> for RailBreakpoints {
    type Error = ConfigError;

    fn try_from(bands: Vec<RailBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

impl From<RailBreakpoints> for Vec<RailBand> {
    fn from(breakpoints: RailBreakpoints) -> Self {
        breakpoints.bands
    }
}
