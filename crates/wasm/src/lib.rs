use std::time::Duration;

use serde::Serialize;
use stagefit_core::{
    FixedWindow, LayoutConfig, LayoutController, MeasurementRegistry, MonitorConfig,
    ReferenceCanvas, ScaleBounds, SectionRevealTracker, ViewportMonitor, compute_uniform_scale,
};
use stagefit_protocol::{RailGeometry, SafeAreaMetrics, Size, ViewportEvent, ViewportState};
use wasm_bindgen::prelude::*;

fn js_err(e: anyhow::Error) -> JsError {
    JsError::new(&format!("{e:#}"))
}

fn parse_config(config_json: &str) -> anyhow::Result<LayoutConfig> {
    if config_json.trim().is_empty() {
        return Ok(LayoutConfig::default());
    }
    Ok(LayoutConfig::from_json(config_json)?)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn resolve_json(
    config_json: &str,
    viewport: ViewportState,
    safe_area: SafeAreaMetrics,
) -> anyhow::Result<String> {
    let config = parse_config(config_json)?;
    to_json(&stagefit_core::resolve_layout(&viewport, &config, &safe_area))
}

/// Resolve `{scale, maxContentWidth}` for one section. Returns JSON.
///
/// An empty `config_json` uses the defaults.
#[wasm_bindgen]
pub fn resolve_layout(
    config_json: &str,
    width: f64,
    height: f64,
    rail_width: f64,
    rail_right_padding: f64,
    header_height: f64,
) -> Result<String, JsError> {
    let safe_area = SafeAreaMetrics {
        header_height,
        rail: RailGeometry::new(rail_width, rail_right_padding),
    };
    resolve_json(config_json, ViewportState::new(width, height), safe_area).map_err(js_err)
}

fn uniform_scale_inner(
    viewport: ViewportState,
    reference: (f64, f64),
    bounds: (f64, f64),
) -> anyhow::Result<f64> {
    let reference = ReferenceCanvas::new(reference.0, reference.1)?;
    let bounds = ScaleBounds::new(bounds.0, bounds.1)?;
    Ok(compute_uniform_scale(Some(&viewport), reference, bounds))
}

/// Clamped uniform fit of a reference canvas into the viewport.
#[wasm_bindgen]
pub fn uniform_scale(
    width: f64,
    height: f64,
    reference_width: f64,
    reference_height: f64,
    min_scale: f64,
    max_scale: f64,
) -> Result<f64, JsError> {
    uniform_scale_inner(
        ViewportState::new(width, height),
        (reference_width, reference_height),
        (min_scale, max_scale),
    )
    .map_err(js_err)
}

/// Reveal latches for the sections of one page.
#[wasm_bindgen]
#[derive(Default)]
pub struct RevealTracker {
    inner: SectionRevealTracker,
}

#[wasm_bindgen]
impl RevealTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the active section. Returns `true` if it revealed anything new.
    pub fn observe(&mut self, active_index: usize) -> bool {
        self.inner.observe(active_index).is_some()
    }

    pub fn is_revealed(&mut self, section_index: usize, current_active_index: usize) -> bool {
        self.inner.is_revealed(section_index, current_active_index)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

/// A viewport, a measurement registry and one section's controller.
///
/// The page feeds window events and chrome measurements in, schedules
/// `poll` at `next_deadline_ms`, and reads `transform()` when told the
/// layout changed.
#[wasm_bindgen]
pub struct LayoutSession {
    controller: LayoutController,
    monitor: ViewportMonitor,
    registry: MeasurementRegistry,
}

impl LayoutSession {
    fn build(config_json: &str, width: f64, height: f64) -> anyhow::Result<Self> {
        let config = parse_config(config_json)?;
        let monitor = ViewportMonitor::new(FixedWindow(Size::new(width, height)), MonitorConfig::default());
        let registry = MeasurementRegistry::new();
        let controller = LayoutController::new(config, &monitor, &registry);
        Ok(Self {
            controller,
            monitor,
            registry,
        })
    }

    fn transform_json(&self) -> anyhow::Result<String> {
        to_json(&self.controller.current())
    }
}

#[wasm_bindgen]
impl LayoutSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f64, height: f64) -> Result<LayoutSession, JsError> {
        Self::build(config_json, width, height).map_err(js_err)
    }

    /// Feed a `resize` event. Returns `true` if the layout may have changed.
    pub fn resize(&self, width: f64, height: f64, now_ms: f64) -> bool {
        self.monitor
            .handle_event(ViewportEvent::Resize { width, height }, millis(now_ms))
    }

    /// Feed an `orientationchange` event. Applied immediately.
    pub fn orientation_change(&self, width: f64, height: f64, now_ms: f64) -> bool {
        self.monitor
            .handle_event(ViewportEvent::OrientationChange { width, height }, millis(now_ms))
    }

    pub fn poll(&self, now_ms: f64) -> bool {
        self.monitor.poll(millis(now_ms))
    }

    /// When to call `poll` next, or `undefined` if nothing is pending.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.monitor
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1e3)
    }

    pub fn register_metric(&self, name: &str, value: f64) {
        self.registry.register_metric(name, value);
    }

    pub fn unregister_metric(&self, name: &str) -> bool {
        self.registry.unregister_metric(name)
    }

    /// Current `{scale, maxContentWidth}` as JSON.
    pub fn transform(&self) -> Result<String, JsError> {
        self.transform_json().map_err(js_err)
    }
}

/// `performance.now()` style milliseconds to a monotonic offset. Negative
/// and non-finite stamps clamp to zero.
fn millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_nanos((ms * 1e6).round() as u64)
    } else {
        Duration::ZERO
    }
}
