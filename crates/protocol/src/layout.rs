use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect, Size};
use crate::viewport::ViewportState;

/// Footprint of the navigation rail pinned to the right edge of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailGeometry {
    pub width: f64,
    pub right_padding: f64,
}

impl RailGeometry {
    /// No rail mounted.
    pub const NONE: Self = Self {
        width: 0.0,
        right_padding: 0.0,
    };

    pub fn new(width: f64, right_padding: f64) -> Self {
        Self {
            width,
            right_padding,
        }
    }

    /// Horizontal band the rail reserves, measured from the right edge.
    pub fn reserved(&self) -> f64 {
        self.width + self.right_padding
    }

    pub fn is_absent(&self) -> bool {
        self.reserved() <= 0.0
    }
}

/// Chrome measurements as seen by the resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAreaMetrics {
    pub header_height: f64,
    pub rail: RailGeometry,
}

/// How far centered content may extend before it reaches the rail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    Unconstrained,
    #[serde(rename_all = "camelCase")]
    Constrained {
        /// Widest on-screen (post-scale) extent that stays clear of the rail.
        max_scaled_content_width: f64,
        /// Width clamp for the content box before the scale is applied.
        max_content_width_before_scale: f64,
    },
}

impl Constraint {
    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::Constrained { .. })
    }

    pub fn max_content_width_before_scale(&self) -> Option<f64> {
        match *self {
            Self::Unconstrained => None,
            Self::Constrained {
                max_content_width_before_scale,
                ..
            } => Some(max_content_width_before_scale),
        }
    }
}

/// What presentation components apply: a uniform scale transform and an
/// optional width clamp on the unscaled content box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTransform {
    pub scale: f64,
    pub max_content_width: Option<f64>,
}

impl LayoutTransform {
    /// Content drawn at its reference size.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        max_content_width: None,
    };

    /// Width the content box actually takes once the clamp is applied.
    pub fn rendered_width(&self, reference_content_width: f64) -> f64 {
        match self.max_content_width {
            Some(max) => reference_content_width.min(max),
            None => reference_content_width,
        }
    }

    /// Where content of the given reference-space size ends up when it is
    /// centered on the viewport and scaled about the viewport center.
    pub fn placement(&self, viewport: &ViewportState, content: Size) -> ContentPlacement {
        let rendered_width = self.rendered_width(content.width);
        let w = rendered_width * self.scale;
        let h = content.height * self.scale;
        let origin = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        ContentPlacement {
            rect: Rect::new(origin.x - w / 2.0, origin.y - h / 2.0, w, h),
            origin,
            rendered_width,
            scale: self.scale,
        }
    }
}

impl Default for LayoutTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// On-screen box of scaled, centered content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlacement {
    /// Post-scale bounds in viewport coordinates.
    pub rect: Rect,
    /// Transform origin.
    pub origin: Point,
    /// Pre-scale width after the clamp.
    pub rendered_width: f64,
    pub scale: f64,
}
