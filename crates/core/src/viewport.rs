use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use stagefit_protocol::{Size, ViewportEvent, ViewportState};

use crate::config::MonitorConfig;
use crate::observe::{Subscribers, Subscription};

/// Source of the current viewport size.
pub trait HostWindow {
    /// Inner size in CSS pixels, or `None` when there is nothing to
    /// measure (server render, headless run).
    fn inner_size(&self) -> Option<Size>;
}

/// A host without a window. The monitor stays at [`ViewportState::NEUTRAL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl HostWindow for Headless {
    fn inner_size(&self) -> Option<Size> {
        None
    }
}

/// A host of known, fixed size.
#[derive(Debug, Clone, Copy)]
pub struct FixedWindow(pub Size);

impl HostWindow for FixedWindow {
    fn inner_size(&self) -> Option<Size> {
        Some(self.0)
    }
}

impl<F> HostWindow for F
where
    F: Fn() -> Option<Size>,
{
    fn inner_size(&self) -> Option<Size> {
        self()
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    size: Size,
    due: Duration,
}

#[derive(Debug)]
struct MonitorState {
    current: ViewportState,
    pending: Option<PendingResize>,
    /// What the host reported the last time it was read.
    host_reading: Option<Size>,
}

/// Tracks the viewport and publishes settled changes.
///
/// Resizes are debounced: each one replaces the pending size and pushes the
/// deadline back, so a drag publishes once with the final size. Orientation
/// changes bypass the debounce and drop any pending resize.
///
/// The monitor owns no timer. Hosts pass a monotonic `now` with each event,
/// ask [`next_deadline`](Self::next_deadline) when to call back, and call
/// [`poll`](Self::poll) then. Once the last subscriber is gone nothing is
/// pending and there is no deadline.
pub struct ViewportMonitor {
    host: Box<dyn HostWindow>,
    config: MonitorConfig,
    state: Rc<RefCell<MonitorState>>,
    listeners: Subscribers<ViewportState>,
}

impl ViewportMonitor {
    pub fn new(host: impl HostWindow + 'static, config: MonitorConfig) -> Self {
        let host_reading = read_host(&host);
        Self {
            host: Box::new(host),
            config,
            state: Rc::new(RefCell::new(MonitorState {
                current: state_for(host_reading),
                pending: None,
                host_reading,
            })),
            listeners: Subscribers::new(),
        }
    }

    /// A monitor for contexts with no interactive viewport. Always neutral.
    pub fn detached() -> Self {
        Self::new(Headless, MonitorConfig::default())
    }

    pub fn current(&self) -> ViewportState {
        self.state.borrow().current
    }

    /// Re-read the host, then register `callback` for future changes.
    ///
    /// When the returned handle of the last subscriber is dropped, any
    /// pending resize is discarded.
    pub fn subscribe(&self, callback: impl FnMut(&ViewportState) + 'static) -> Subscription {
        self.refresh();
        let inner = self.listeners.subscribe(callback);
        let listeners = self.listeners.clone();
        let state = Rc::downgrade(&self.state);
        Subscription::new(move || {
            drop(inner);
            if !listeners.is_empty() {
                return;
            }
            let Some(state) = state.upgrade() else {
                return;
            };
            let dropped = state.borrow_mut().pending.take();
            if dropped.is_some() {
                log::debug!("last viewport subscriber gone, pending resize dropped");
            }
        })
    }

    /// Re-read the host and adopt its size if it reports something new
    /// since the last read. A host whose reading never changes, such as
    /// [`FixedWindow`], leaves sizes applied from events in place.
    ///
    /// Returns `true` if a new state was published.
    pub fn refresh(&self) -> bool {
        let reading = read_host(self.host.as_ref());
        {
            let mut state = self.state.borrow_mut();
            if state.host_reading == reading {
                return false;
            }
            state.host_reading = reading;
            if state.pending.take().is_some() {
                log::debug!("host reports a new size, pending resize dropped");
            }
        }
        self.apply(state_for(reading))
    }

    /// Feed a host event observed at `now`.
    ///
    /// Returns `true` if the event was applied (and published) immediately.
    pub fn handle_event(&self, event: ViewportEvent, now: Duration) -> bool {
        match event {
            ViewportEvent::OrientationChange { .. } => {
                self.cancel_pending();
                self.apply(ViewportState::from_size(event.size()))
            }
            ViewportEvent::Resize { .. } if self.listeners.is_empty() => {
                // Nobody is waiting on a settled size.
                self.cancel_pending();
                self.apply(ViewportState::from_size(event.size()))
            }
            ViewportEvent::Resize { .. } => {
                let due = now + self.config.resize_debounce;
                self.state.borrow_mut().pending = Some(PendingResize {
                    size: event.size(),
                    due,
                });
                false
            }
        }
    }

    /// Apply the pending resize if its quiet period has elapsed.
    ///
    /// Returns `true` if a new state was published.
    pub fn poll(&self, now: Duration) -> bool {
        let due = {
            let mut state = self.state.borrow_mut();
            let ready = state.pending.is_some_and(|p| now >= p.due);
            if ready { state.pending.take() } else { None }
        };
        match due {
            Some(p) => self.apply(ViewportState::from_size(p.size)),
            None => false,
        }
    }

    /// When the host should next call [`poll`](Self::poll), if ever.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().pending.map(|p| p.due)
    }

    pub fn has_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Forget a pending resize without applying it.
    pub fn cancel_pending(&self) {
        self.state.borrow_mut().pending = None;
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn apply(&self, next: ViewportState) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.current == next {
                return false;
            }
            state.current = next;
        }
        log::debug!(
            "viewport {}x{} ({})",
            next.width,
            next.height,
            if next.is_landscape() { "landscape" } else { "portrait" }
        );
        self.listeners.notify(&next);
        true
    }
}

fn read_host(host: &dyn HostWindow) -> Option<Size> {
    host.inner_size().map(Size::sanitized)
}

fn state_for(reading: Option<Size>) -> ViewportState {
    reading.map_or(ViewportState::NEUTRAL, ViewportState::from_size)
}
