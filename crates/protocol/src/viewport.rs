use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Snapshot of the host viewport.
///
/// Orientation is always derived from the dimensions: landscape means
/// strictly wider than tall, so a square viewport is portrait. The JSON
/// form carries `isLandscape` for consumers, but it is recomputed, never
/// trusted, when a state is read back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ViewportFile", into = "ViewportFile")]
pub struct ViewportState {
    pub width: f64,
    pub height: f64,
}

impl ViewportState {
    /// The state reported when there is no interactive host to measure.
    /// Degenerate, so every resolver falls back to an unscaled layout.
    pub const NEUTRAL: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self::from_size(Size::new(width, height))
    }

    pub fn from_size(size: Size) -> Self {
        let size = size.sanitized();
        Self {
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Pre-hydration or hidden-host state where either side is not a
    /// usable positive length.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub fn is_portrait(&self) -> bool {
        !self.is_landscape()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewportFile {
    width: f64,
    height: f64,
    #[serde(default, skip_deserializing)]
    is_landscape: bool,
}

impl From<ViewportFile> for ViewportState {
    fn from(file: ViewportFile) -> Self {
        Self::new(file.width, file.height)
    }
}

impl From<ViewportState> for ViewportFile {
    fn from(state: ViewportState) -> Self {
        Self {
            width: state.width,
            height: state.height,
            is_landscape: state.is_landscape(),
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Raw viewport notifications delivered by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewportEvent {
    /// A window resize. Bursts are coalesced by the monitor.
    Resize { width: f64, height: f64 },
    /// A device rotation. Applied without debouncing.
    OrientationChange { width: f64, height: f64 },
}

impl ViewportEvent {
    pub fn size(&self) -> Size {
        match *self {
            Self::Resize { width, height } | Self::OrientationChange { width, height } => {
                Size::new(width, height)
            }
        }
    }
}
