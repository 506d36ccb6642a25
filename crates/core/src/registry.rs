use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use stagefit_protocol::metric::{HEADER_HEIGHT, RAIL_RIGHT_PADDING, RAIL_WIDTH};
use stagefit_protocol::{MetricName, RailGeometry, SafeAreaMetrics};

use crate::observe::{Subscribers, Subscription};

/// Published to registry listeners on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricUpdate {
    pub name: MetricName,
    pub value: f64,
}

/// Shared store of measurements contributed by page chrome.
///
/// Cloning yields another handle to the same store. Construct one per page
/// (or per test) and pass it to whatever needs it; there is no global
/// instance. Metrics that were never registered read as `0.0`, so a page
/// without a rail simply resolves unconstrained.
#[derive(Clone, Default)]
pub struct MeasurementRegistry {
    values: Rc<RefCell<HashMap<MetricName, f64>>>,
    listeners: Subscribers<MetricUpdate>,
}

impl MeasurementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name` and notify every listener.
    ///
    /// Measurements are lengths: non-finite values are stored as 0 and
    /// negative ones clamp to 0.
    pub fn register_metric(&self, name: impl Into<MetricName>, value: f64) {
        let name = name.into();
        let value = sanitize(&name, value);
        self.values.borrow_mut().insert(name.clone(), value);
        log::trace!("metric {name} = {value}");
        self.listeners.notify(&MetricUpdate { name, value });
    }

    /// Remove a metric, e.g. when the chrome that measured it unmounts.
    /// Listeners see the metric fall back to 0.
    pub fn unregister_metric(&self, name: &str) -> bool {
        let removed = self.values.borrow_mut().remove_entry(name);
        match removed {
            Some((name, _)) => {
                log::trace!("metric {name} removed");
                self.listeners.notify(&MetricUpdate { name, value: 0.0 });
                true
            }
            None => false,
        }
    }

    pub fn metric(&self, name: &str) -> f64 {
        self.values.borrow().get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    pub fn subscribe(&self, callback: impl FnMut(&MetricUpdate) + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }

    pub fn register_rail(&self, rail: RailGeometry) {
        self.register_metric(RAIL_WIDTH, rail.width);
        self.register_metric(RAIL_RIGHT_PADDING, rail.right_padding);
    }

    pub fn register_header_height(&self, height: f64) {
        self.register_metric(HEADER_HEIGHT, height);
    }

    pub fn rail_geometry(&self) -> RailGeometry {
        RailGeometry::new(self.metric(RAIL_WIDTH), self.metric(RAIL_RIGHT_PADDING))
    }

    pub fn header_height(&self) -> f64 {
        self.metric(HEADER_HEIGHT)
    }

    pub fn safe_area(&self) -> SafeAreaMetrics {
        SafeAreaMetrics {
            header_height: self.header_height(),
            rail: self.rail_geometry(),
        }
    }
}

impl fmt::Debug for MeasurementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementRegistry")
            .field("values", &self.values.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn sanitize(name: &MetricName, value: f64) -> f64 {
    if !value.is_finite() {
        log::warn!("metric {name}: non-finite value {value}, storing 0");
        return 0.0;
    }
    if value < 0.0 {
        log::warn!("metric {name}: negative value {value}, clamping to 0");
        return 0.0;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn missing_metric_reads_zero() {
        let reg = MeasurementRegistry::new();
        assert_eq!(reg.metric(RAIL_WIDTH), 0.0);
        assert!(!reg.contains(RAIL_WIDTH));
        assert!(reg.rail_geometry().is_absent());
        assert_eq!(reg.safe_area(), SafeAreaMetrics::default());
    }

    #[test]
    fn registries_are_independent() {
        let a = MeasurementRegistry::new();
        let b = MeasurementRegistry::new();
        a.register_header_height(80.0);
        assert_eq!(a.header_height(), 80.0);
        assert_eq!(b.header_height(), 0.0);

        // Clones share storage.
        let a2 = a.clone();
        a2.register_header_height(64.0);
        assert_eq!(a.header_height(), 64.0);
    }

    #[test]
    fn every_write_fans_out() {
        let reg = MeasurementRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            reg.subscribe(move |u| seen.borrow_mut().push(u.clone()))
        };

        reg.register_rail(RailGeometry::new(72.0, 24.0));
        reg.register_metric(RAIL_WIDTH, 72.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].name, RAIL_WIDTH);
        assert_eq!(seen[1].name, RAIL_RIGHT_PADDING);
        assert_eq!(seen[1].value, 24.0);
        assert_eq!(seen[2].value, 72.0);
    }

    #[test]
    fn garbage_values_are_stored_as_zero() {
        let reg = MeasurementRegistry::new();
        reg.register_metric(RAIL_WIDTH, f64::NAN);
        reg.register_metric(RAIL_RIGHT_PADDING, -12.0);
        assert!(reg.contains(RAIL_WIDTH));
        assert_eq!(reg.rail_geometry(), RailGeometry::NONE);
    }

    #[test]
    fn unregister_notifies_with_zero() {
        let reg = MeasurementRegistry::new();
        reg.register_header_height(90.0);
        let last = Rc::new(Cell::new(-1.0));
        let _sub = {
            let last = Rc::clone(&last);
            reg.subscribe(move |u| last.set(u.value))
        };

        assert!(reg.unregister_metric(HEADER_HEIGHT));
        assert_eq!(last.get(), 0.0);
        assert_eq!(reg.header_height(), 0.0);
        assert!(!reg.unregister_metric(HEADER_HEIGHT));
    }

    #[test]
    fn listener_can_read_registry() {
        let reg = MeasurementRegistry::new();
        let observed = Rc::new(Cell::new(0.0));
        let _sub = {
            let reader = reg.clone();
            let observed = Rc::clone(&observed);
            reg.subscribe(move |_| observed.set(reader.rail_geometry().reserved()))
        };
        reg.register_rail(RailGeometry::new(60.0, 20.0));
        assert_eq!(observed.get(), 80.0);
    }
}
