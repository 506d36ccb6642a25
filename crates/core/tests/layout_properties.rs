//! Integration test: sweep viewport, rail and config grids through the pure
//! engine and check the layout guarantees hold everywhere.

use stagefit_core::engine::{rail_left_edge, raw_uniform_scale};
use stagefit_core::protocol::{LayoutTransform, RailGeometry, SafeAreaMetrics, Size, ViewportState};
use stagefit_core::{
    LayoutConfig, LayoutTransformResolver, RailBreakpoints, ReferenceCanvas, ScaleBounds,
    SectionRevealTracker, compute_constraint, compute_uniform_scale, resolve_layout,
};

const SIDES: &[f64] = &[
    0.0, 1.0, 240.0, 320.0, 540.0, 600.0, 720.0, 768.0, 800.0, 900.0, 960.0, 1024.0, 1080.0,
    1200.0, 1280.0, 1366.0, 1440.0, 1600.0, 1920.0, 2160.0, 2560.0, 3840.0,
];

fn viewports() -> impl Iterator<Item = ViewportState> {
    SIDES
        .iter()
        .flat_map(|&w| SIDES.iter().map(move |&h| ViewportState::new(w, h)))
}

fn references() -> Vec<ReferenceCanvas> {
    vec![
        ReferenceCanvas::FULL_HD,
        ReferenceCanvas::new(1600.0, 900.0).expect("valid canvas"),
        ReferenceCanvas::new(1280.0, 1024.0).expect("valid canvas"),
    ]
}

fn bounds() -> Vec<ScaleBounds> {
    vec![
        ScaleBounds::default(),
        ScaleBounds::new(0.25, 1.5).expect("valid bounds"),
        ScaleBounds::new(1.0, 1.0).expect("valid bounds"),
        ScaleBounds::new(0.8, 2.0).expect("valid bounds"),
    ]
}

fn rails() -> Vec<RailGeometry> {
    vec![
        RailGeometry::NONE,
        RailGeometry::new(56.0, 16.0),
        RailGeometry::new(80.0, 40.0),
        RailGeometry::new(120.0, 0.0),
        RailGeometry::new(400.0, 60.0),
    ]
}

fn configs() -> Vec<LayoutConfig> {
    let mut out = Vec::new();
    for reference in references() {
        for b in bounds() {
            for margin in [0.0, 15.0, 30.0] {
                for content_width in [1600.0, 1920.0] {
                    let config = LayoutConfig::new(reference, b, margin, content_width)
                        .expect("valid config");
                    out.push(config);
                    out.push(config.with_header_inset(true));
                }
            }
        }
    }
    out
}

#[test]
fn uniform_scale_stays_within_bounds() {
    for vp in viewports() {
        for reference in references() {
            for b in bounds() {
                let s = compute_uniform_scale(Some(&vp), reference, b);
                assert!(b.contains(s), "{vp:?} {b:?} -> {s}");
            }
        }
    }
}

#[test]
fn portrait_is_always_unscaled() {
    for vp in viewports().filter(|vp| vp.height > vp.width) {
        for reference in references() {
            for b in bounds() {
                assert_eq!(compute_uniform_scale(Some(&vp), reference, b), 1.0);
            }
        }
        for config in configs() {
            for rail in rails() {
                let safe = SafeAreaMetrics {
                    header_height: 80.0,
                    rail,
                };
                assert_eq!(resolve_layout(&vp, &config, &safe), LayoutTransform::IDENTITY);
            }
        }
    }
}

#[test]
fn raw_scale_is_monotone_in_each_dimension() {
    for reference in references() {
        for &fixed in SIDES.iter().filter(|&&s| s > 0.0) {
            let mut prev_w = f64::NEG_INFINITY;
            let mut prev_h = f64::NEG_INFINITY;
            for &grow in SIDES.iter().filter(|&&s| s > 0.0) {
                let by_width = raw_uniform_scale(&ViewportState::new(grow, fixed), reference)
                    .expect("non-degenerate");
                let by_height = raw_uniform_scale(&ViewportState::new(fixed, grow), reference)
                    .expect("non-degenerate");
                assert!(by_width >= prev_w);
                assert!(by_height >= prev_h);
                prev_w = by_width;
                prev_h = by_height;
            }
        }
    }
}

#[test]
fn resolved_scale_stays_within_bounds() {
    for vp in viewports() {
        for config in configs() {
            for rail in rails() {
                let safe = SafeAreaMetrics {
                    header_height: 120.0,
                    rail,
                };
                let t = resolve_layout(&vp, &config, &safe);
                assert!(config.bounds().contains(t.scale), "{vp:?} {rail:?} -> {t:?}");
            }
        }
    }
}

#[test]
fn scaled_content_never_reaches_the_rail() {
    let mut checked = 0;
    for vp in viewports() {
        for config in configs() {
            for rail in rails() {
                let safe = SafeAreaMetrics {
                    header_height: 0.0,
                    rail,
                };
                let t = resolve_layout(&vp, &config, &safe);
                let Some(max_width) = t.max_content_width else {
                    continue;
                };
                if max_width <= 0.0 {
                    continue;
                }
                let content = Size::new(config.reference_content_width(), 1080.0);
                let placement = t.placement(&vp, content);
                let limit = rail_left_edge(&vp, &rail) - config.safety_margin();
                assert!(
                    placement.rect.right() <= limit + 1e-9,
                    "{vp:?} {rail:?} {config:?}: right {} > {limit}",
                    placement.rect.right()
                );
                checked += 1;
            }
        }
    }
    assert!(checked > 1_000, "only {checked} constrained cases exercised");
}

#[test]
fn max_content_width_only_in_landscape_with_rail() {
    for vp in viewports() {
        for rail in rails() {
            let c = compute_constraint(&vp, &rail, 30.0);
            let expect = vp.is_landscape() && !vp.is_degenerate() && !rail.is_absent();
            assert_eq!(c.is_constrained(), expect, "{vp:?} {rail:?}");
        }
    }
}

#[test]
fn resolve_is_idempotent() {
    let mut resolver = LayoutTransformResolver::new();
    for vp in viewports().step_by(7) {
        for config in configs().into_iter().step_by(5) {
            let safe = SafeAreaMetrics {
                header_height: 64.0,
                rail: RailBreakpoints::default().rail_for(vp.width),
            };
            let first = resolve_layout(&vp, &config, &safe);
            assert_eq!(first, resolve_layout(&vp, &config, &safe));
            assert_eq!(first, resolver.resolve(&vp, &config, &safe));
            assert_eq!(first, resolver.resolve(&vp, &config, &safe));
        }
    }
}

#[test]
fn zero_viewport_is_unscaled_and_unconstrained() {
    let vp = ViewportState::new(0.0, 0.0);
    let safe = SafeAreaMetrics {
        header_height: 90.0,
        rail: RailGeometry::new(80.0, 40.0),
    };
    for config in configs() {
        assert_eq!(resolve_layout(&vp, &config, &safe), LayoutTransform::IDENTITY);
    }
}

#[test]
fn scenario_half_size_landscape() {
    let vp = ViewportState::new(960.0, 540.0);
    let b = ScaleBounds::new(0.5, 1.0).expect("valid bounds");
    assert_eq!(compute_uniform_scale(Some(&vp), ReferenceCanvas::FULL_HD, b), 0.5);
}

#[test]
fn scenario_full_hd_without_rail() {
    let t = resolve_layout(
        &ViewportState::new(1920.0, 1080.0),
        &LayoutConfig::default(),
        &SafeAreaMetrics::default(),
    );
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.max_content_width, None);
}

#[test]
fn scenario_portrait_ignores_everything() {
    let vp = ViewportState::new(800.0, 1200.0);
    for config in configs() {
        for rail in rails() {
            let safe = SafeAreaMetrics {
                header_height: 0.0,
                rail,
            };
            assert_eq!(resolve_layout(&vp, &config, &safe).scale, 1.0);
        }
    }
}

#[test]
fn scenario_reveal_latch() {
    let mut tracker = SectionRevealTracker::new();
    let mut revealed_two = Vec::new();
    for active in [0, 1, 2, 0] {
        revealed_two.push(tracker.is_revealed(2, active));
    }
    assert_eq!(revealed_two, vec![false, false, true, true]);
}
