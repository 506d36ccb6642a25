use stagefit_protocol::{Constraint, RailGeometry, ViewportState};

/// X coordinate of the rail's left edge in viewport pixels.
pub fn rail_left_edge(viewport: &ViewportState, rail: &RailGeometry) -> f64 {
    viewport.width - rail.right_padding - rail.width
}

/// Widest centered content that keeps `safety_margin` pixels clear of the
/// rail.
///
/// Content is centered on the viewport, so its half-width may reach from
/// the center to the rail's left edge minus the margin. The same band is
/// mirrored on the left, which gives the pre-scale width clamp.
///
/// Only landscape viewports with a mounted rail are constrained.
pub fn compute_constraint(
    viewport: &ViewportState,
    rail: &RailGeometry,
    safety_margin: f64,
) -> Constraint {
    if viewport.is_degenerate() || viewport.is_portrait() || rail.is_absent() {
        return Constraint::Unconstrained;
    }
    let margin = safety_margin.max(0.0);
    let left_edge = rail_left_edge(viewport, rail);
    let center_x = viewport.width / 2.0;

    let max_scaled_content_width = (2.0 * (left_edge - margin - center_x)).max(0.0);
    let max_content_width_before_scale =
        (viewport.width - 2.0 * (rail.width + rail.right_padding + margin)).max(0.0);

    Constraint::Constrained {
        max_scaled_content_width,
        max_content_width_before_scale,
    }
}
