use stagefit_protocol::{Constraint, LayoutTransform, SafeAreaMetrics, ViewportState};

use crate::config::LayoutConfig;
use crate::engine::collision::compute_constraint;
use crate::engine::scale::{compute_safe_area_scale, compute_uniform_scale};

/// Combine the viewport fit and the rail constraint into one transform.
///
/// The final scale is the smaller of the fit scale and the scale at which
/// the reference content width just reaches the rail, clamped to the
/// configured bounds. The content box is clamped to the pre-scale width
/// from the constraint, so neither distortion nor overlap can occur.
pub fn resolve_layout(
    viewport: &ViewportState,
    config: &LayoutConfig,
    safe_area: &SafeAreaMetrics,
) -> LayoutTransform {
    if viewport.is_degenerate() || viewport.is_portrait() {
        return LayoutTransform::IDENTITY;
    }
    let bounds = config.bounds();
    let uniform_scale = if config.header_inset() {
        compute_safe_area_scale(Some(viewport), safe_area, config.reference(), bounds)
    } else {
        compute_uniform_scale(Some(viewport), config.reference(), bounds)
    };

    let constraint = compute_constraint(viewport, &safe_area.rail, config.safety_margin());
    let content_width = config.reference_content_width();
    let scale_by_rail = match constraint {
        Constraint::Constrained {
            max_scaled_content_width,
            ..
        } if content_width > 0.0 => max_scaled_content_width / content_width,
        _ => uniform_scale,
    };

    LayoutTransform {
        scale: bounds.clamp(uniform_scale.min(scale_by_rail)),
        max_content_width: constraint.max_content_width_before_scale(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolveInput {
    viewport: ViewportState,
    config: LayoutConfig,
    safe_area: SafeAreaMetrics,
}

/// [`resolve_layout`] with the last input tuple memoized.
#[derive(Debug, Default)]
pub struct LayoutTransformResolver {
    last: Option<(ResolveInput, LayoutTransform)>,
    computations: u64,
}

impl LayoutTransformResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        viewport: &ViewportState,
        config: &LayoutConfig,
        safe_area: &SafeAreaMetrics,
    ) -> LayoutTransform {
        let input = ResolveInput {
            viewport: *viewport,
            config: *config,
            safe_area: *safe_area,
        };
        if let Some((last_input, last_output)) = &self.last
            && *last_input == input
        {
            return *last_output;
        }
        let output = resolve_layout(viewport, config, safe_area);
        self.computations += 1;
        log::trace!(
            "resolved {}x{} -> scale {} max width {:?}",
            viewport.width,
            viewport.height,
            output.scale,
            output.max_content_width
        );
        self.last = Some((input, output));
        output
    }

    /// Number of times the transform was actually recomputed.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn last(&self) -> Option<LayoutTransform> {
        self.last.map(|(_, output)| output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReferenceCanvas, ScaleBounds};
    use stagefit_protocol::RailGeometry;

    fn with_rail(width: f64, right_padding: f64) -> SafeAreaMetrics {
        SafeAreaMetrics {
            header_height: 0.0,
            rail: RailGeometry::new(width, right_padding),
        }
    }

    #[test]
    fn full_hd_without_rail() {
        let t = resolve_layout(
            &ViewportState::new(1920.0, 1080.0),
            &LayoutConfig::default(),
            &SafeAreaMetrics::default(),
        );
        assert_eq!(t, LayoutTransform::IDENTITY);
    }

    #[test]
    fn rail_shrinks_scale_below_fit() {
        // Fit alone would be 1.0; the rail leaves 1620px for 1920px content.
        let t = resolve_layout(
            &ViewportState::new(1920.0, 1080.0),
            &LayoutConfig::default(),
            &with_rail(80.0, 40.0),
        );
        assert!((t.scale - 1620.0 / 1920.0).abs() < 1e-12);
        assert_eq!(t.max_content_width, Some(1620.0));
    }

    #[test]
    fn fit_wins_when_more_conservative() {
        // 1280x720: fit is 0.667, rail allows 1040/1600 = 0.65 -> rail wins.
        // 1280x540: fit is 0.5 -> fit wins.
        let config = LayoutConfig::new(
            ReferenceCanvas::FULL_HD,
            ScaleBounds::new(0.3, 1.0).unwrap(),
            30.0,
            1600.0,
        )
        .unwrap();
        let rail = with_rail(70.0, 20.0);

        let t = resolve_layout(&ViewportState::new(1280.0, 720.0), &config, &rail);
        assert!((t.scale - 1040.0 / 1600.0).abs() < 1e-12);

        let t = resolve_layout(&ViewportState::new(1280.0, 540.0), &config, &rail);
        assert!((t.scale - 0.5).abs() < 1e-12);
        assert_eq!(t.max_content_width, Some(1040.0));
    }

    #[test]
    fn rail_scale_respects_lower_bound() {
        let t = resolve_layout(
            &ViewportState::new(500.0, 400.0),
            &LayoutConfig::default(),
            &with_rail(100.0, 40.0),
        );
        assert_eq!(t.scale, 0.5);
        assert_eq!(t.max_content_width, Some(160.0));
    }

    #[test]
    fn non_positive_content_width_only_clamps_width() {
        let config = LayoutConfig::new(
            ReferenceCanvas::FULL_HD,
            ScaleBounds::default(),
            30.0,
            0.0,
        )
        .unwrap();
        let t = resolve_layout(&ViewportState::new(1920.0, 1080.0), &config, &with_rail(80.0, 40.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.max_content_width, Some(1620.0));
    }

    #[test]
    fn portrait_ignores_rail() {
        let t = resolve_layout(
            &ViewportState::new(800.0, 1200.0),
            &LayoutConfig::default(),
            &with_rail(80.0, 40.0),
        );
        assert_eq!(t, LayoutTransform::IDENTITY);
    }

    #[test]
    fn header_inset_uses_safe_area() {
        let config = LayoutConfig::default().with_header_inset(true);
        let safe = SafeAreaMetrics {
            header_height: 270.0,
            rail: RailGeometry::NONE,
        };
        let t = resolve_layout(&ViewportState::new(1920.0, 1080.0), &config, &safe);
        assert!((t.scale - 0.75).abs() < 1e-12);

        // Ignored unless opted into.
        let t = resolve_layout(&ViewportState::new(1920.0, 1080.0), &LayoutConfig::default(), &safe);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn memoizes_last_input() {
        let mut resolver = LayoutTransformResolver::new();
        let vp = ViewportState::new(1600.0, 900.0);
        let config = LayoutConfig::default();
        let safe = with_rail(64.0, 24.0);

        let a = resolver.resolve(&vp, &config, &safe);
        let b = resolver.resolve(&vp, &config, &safe);
        assert_eq!(a, b);
        assert_eq!(resolver.computations(), 1);

        let c = resolver.resolve(&ViewportState::new(1280.0, 720.0), &config, &safe);
        assert_ne!(a, c);
        assert_eq!(resolver.computations(), 2);
        assert_eq!(resolver.last(), Some(c));
    }
}
