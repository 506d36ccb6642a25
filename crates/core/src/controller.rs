use std::cell::RefCell;
use std::rc::Rc;

use stagefit_protocol::{ContentPlacement, LayoutTransform, SafeAreaMetrics, Size, ViewportState};

use crate::config::LayoutConfig;
use crate::engine::LayoutTransformResolver;
use crate::observe::{Subscribers, Subscription};
use crate::registry::MeasurementRegistry;
use crate::viewport::ViewportMonitor;

struct ControllerState {
    config: LayoutConfig,
    viewport: ViewportState,
    safe_area: SafeAreaMetrics,
    resolver: LayoutTransformResolver,
    current: LayoutTransform,
}

/// Keeps one section's [`LayoutTransform`] in sync with the viewport and
/// the chrome measurements.
///
/// Listens to a [`ViewportMonitor`] and a [`MeasurementRegistry`],
/// re-resolves on every change, and republishes only when the transform
/// itself changes. Dropping the controller detaches it from both sources.
pub struct LayoutController {
    state: Rc<RefCell<ControllerState>>,
    listeners: Subscribers<LayoutTransform>,
    _viewport: Subscription,
    _metrics: Subscription,
}

impl LayoutController {
    pub fn new(
        config: LayoutConfig,
        monitor: &ViewportMonitor,
        registry: &MeasurementRegistry,
    ) -> Self {
        let state = Rc::new(RefCell::new(ControllerState {
            config,
            viewport: monitor.current(),
            safe_area: registry.safe_area(),
            resolver: LayoutTransformResolver::new(),
            current: LayoutTransform::IDENTITY,
        }));
        let listeners = Subscribers::new();

        let viewport_sub = {
            let state = Rc::downgrade(&state);
            let listeners = listeners.clone();
            monitor.subscribe(move |viewport| {
                if let Some(state) = state.upgrade() {
                    recompute(&state, &listeners, |s| s.viewport = *viewport);
                }
            })
        };
        let metrics_sub = {
            let state = Rc::downgrade(&state);
            let listeners = listeners.clone();
            let reader = registry.clone();
            registry.subscribe(move |_| {
                if let Some(state) = state.upgrade() {
                    recompute(&state, &listeners, |s| s.safe_area = reader.safe_area());
                }
            })
        };

        // Subscribing re-reads the host, so take the settled values.
        recompute(&state, &listeners, |s| {
            s.viewport = monitor.current();
            s.safe_area = registry.safe_area();
        });

        Self {
            state,
            listeners,
            _viewport: viewport_sub,
            _metrics: metrics_sub,
        }
    }

    pub fn current(&self) -> LayoutTransform {
        self.state.borrow().current
    }

    pub fn config(&self) -> LayoutConfig {
        self.state.borrow().config
    }

    pub fn viewport(&self) -> ViewportState {
        self.state.borrow().viewport
    }

    pub fn safe_area(&self) -> SafeAreaMetrics {
        self.state.borrow().safe_area
    }

    /// Where the section's content box currently lands on screen.
    pub fn placement(&self, content: Size) -> ContentPlacement {
        let state = self.state.borrow();
        state.current.placement(&state.viewport, content)
    }

    /// Register for transform changes. The current value is available from
    /// [`current`](Self::current); only later changes are delivered.
    pub fn subscribe(&self, callback: impl FnMut(&LayoutTransform) + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }
}

fn recompute(
    state: &RefCell<ControllerState>,
    listeners: &Subscribers<LayoutTransform>,
    update: impl FnOnce(&mut ControllerState),
) {
    let changed = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        update(s);
        let next = s.resolver.resolve(&s.viewport, &s.config, &s.safe_area);
        if next == s.current {
            None
        } else {
            s.current = next;
            Some(next)
        }
    };
    if let Some(transform) = changed {
        listeners.notify(&transform);
    }
}
