use std::time::Duration;

use serde::{Deserialize, Serialize};
use stagefit_protocol::Size;

use crate::error::ConfigError;

/// Design resolution that all absolute pixel values are authored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Size", into = "Size")]
pub struct ReferenceCanvas {
    width: f64,
    height: f64,
}

impl ReferenceCanvas {
    /// 1920×1080, the canvas most full-viewport sections are designed on.
    pub const FULL_HD: Self = Self {
        width: 1920.0,
        height: 1080.0,
    };

    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::ReferenceCanvas { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for ReferenceCanvas {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl TryFrom<Size> for ReferenceCanvas {
    type Error = ConfigError;

    fn try_from(size: Size) -> Result<Self, Self::Error> {
        Self::new(size.width, size.height)
    }
}

impl From<ReferenceCanvas> for Size {
    fn from(canvas: ReferenceCanvas) -> Self {
        Size::new(canvas.width, canvas.height)
    }
}

/// Inclusive range the uniform scale is clamped to.
///
/// Always contains 1.0, so an unscaled layout (portrait, degenerate
/// viewport) is inside the bounds too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct ScaleBounds {
    min: f64,
    max: f64,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawBounds {
    min: f64,
    max: f64,
}

impl ScaleBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        let ordered = min > 0.0 && min <= 1.0 && 1.0 <= max;
        if !(min.is_finite() && max.is_finite() && ordered) {
            return Err(ConfigError::ScaleBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 1.0 }
    }
}

impl TryFrom<RawBounds> for ScaleBounds {
    type Error = ConfigError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl From<ScaleBounds> for RawBounds {
    fn from(bounds: ScaleBounds) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
        }
    }
}

/// Per-section layout settings.
///
/// Safety margin and reference content width differ between sections
/// (15 vs 30 px, 1920 vs 1600 px), so they live here rather than as
/// crate constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayoutConfigFile", into = "LayoutConfigFile")]
pub struct LayoutConfig {
    reference: ReferenceCanvas,
    bounds: ScaleBounds,
    safety_margin: f64,
    reference_content_width: f64,
    header_inset: bool,
}

pub const DEFAULT_SAFETY_MARGIN: f64 = 30.0;

/// On-disk / over-the-wire form. Every field is optional.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LayoutConfigFile {
    reference: ReferenceCanvas,
    bounds: ScaleBounds,
    safety_margin: f64,
    reference_content_width: f64,
    header_inset: bool,
}

impl Default for LayoutConfigFile {
    fn default() -> Self {
        LayoutConfig::default().into()
    }
}

impl LayoutConfig {
    pub fn new(
        reference: ReferenceCanvas,
        bounds: ScaleBounds,
        safety_margin: f64,
        reference_content_width: f64,
    ) -> Result<Self, ConfigError> {
        if !safety_margin.is_finite() || safety_margin < 0.0 {
            return Err(ConfigError::SafetyMargin(safety_margin));
        }
        if !reference_content_width.is_finite() {
            return Err(ConfigError::ContentWidth(reference_content_width));
        }
        Ok(Self {
            reference,
            bounds,
            safety_margin,
            reference_content_width,
            header_inset: false,
        })
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Fit against the area below the header instead of the full viewport.
    pub fn with_header_inset(mut self, enabled: bool) -> Self {
        self.header_inset = enabled;
        self
    }

    pub fn reference(&self) -> ReferenceCanvas {
        self.reference
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn safety_margin(&self) -> f64 {
        self.safety_margin
    }

    /// Width of the content box in reference pixels. A non-positive value
    /// disables rail-driven shrinking; the rail then only clamps width.
    pub fn reference_content_width(&self) -> f64 {
        self.reference_content_width
    }

    pub fn header_inset(&self) -> bool {
        self.header_inset
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference: ReferenceCanvas::FULL_HD,
            bounds: ScaleBounds::default(),
            safety_margin: DEFAULT_SAFETY_MARGIN,
            reference_content_width: ReferenceCanvas::FULL_HD.width,
            header_inset: false,
        }
    }
}

impl TryFrom<LayoutConfigFile> for LayoutConfig {
    type Error = ConfigError;

    fn try_from(file: LayoutConfigFile) -> Result<Self, Self::Error> {
        Ok(Self::new(
            file.reference,
            file.bounds,
            file.safety_margin,
            file.reference_content_width,
        )?
        .with_header_inset(file.header_inset))
    }
}

impl From<LayoutConfig> for LayoutConfigFile {
    fn from(config: LayoutConfig) -> Self {
        Self {
            reference: config.reference,
            bounds: config.bounds,
            safety_margin: config.safety_margin,
            reference_content_width: config.reference_content_width,
            header_inset: config.header_inset,
        }
    }
}

pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Settings for [`crate::viewport::ViewportMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Quiet period after the last resize before it is applied.
    #[serde(with = "millis")]
    pub resize_debounce: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
