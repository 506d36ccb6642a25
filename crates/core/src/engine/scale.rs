use stagefit_protocol::{SafeAreaMetrics, ViewportState};

use crate::config::{ReferenceCanvas, ScaleBounds};

/// Factor that fits the reference canvas inside the viewport on both axes,
/// before clamping. `None` for a degenerate viewport.
///
/// Non-decreasing in each viewport dimension.
pub fn raw_uniform_scale(viewport: &ViewportState, reference: ReferenceCanvas) -> Option<f64> {
    if viewport.is_degenerate() {
        return None;
    }
    Some(fit(viewport.width, viewport.height, reference))
}

/// Largest factor at which `reference` fits inside `width` x `height`.
fn fit(width: f64, height: f64, reference: ReferenceCanvas) -> f64 {
    (width / reference.width()).min(height / reference.height())
}

/// Uniform scale for full-viewport content designed on `reference`.
///
/// Missing, degenerate, and portrait viewports render unscaled.
pub fn compute_uniform_scale(
    viewport: Option<&ViewportState>,
    reference: ReferenceCanvas,
    bounds: ScaleBounds,
) -> f64 {
    let Some(viewport) = viewport else {
        return 1.0;
    };
    if viewport.is_portrait() {
        return 1.0;
    }
    match raw_uniform_scale(viewport, reference) {
        Some(raw) => bounds.clamp(raw),
        None => {
            log::debug!("degenerate viewport {}x{}, unscaled", viewport.width, viewport.height);
            1.0
        }
    }
}

/// Like [`compute_uniform_scale`], but fits against the area below the
/// fixed header. Orientation is still decided by the full viewport.
pub fn compute_safe_area_scale(
    viewport: Option<&ViewportState>,
    safe_area: &SafeAreaMetrics,
    reference: ReferenceCanvas,
    bounds: ScaleBounds,
) -> f64 {
    let Some(viewport) = viewport else {
        return 1.0;
    };
    if viewport.is_portrait() || viewport.is_degenerate() {
        return 1.0;
    }
    let usable_height = (viewport.height - safe_area.header_height).max(0.0);
    if usable_height <= 0.0 {
        return 1.0;
    }
    bounds.clamp(fit(viewport.width, usable_height, reference))
}
