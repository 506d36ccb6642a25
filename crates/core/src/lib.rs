//! Uniform viewport scaling for fixed-design sections, with collision
//! avoidance against a floating navigation rail.
//!
//! ```text
//!   host window ─▶ ViewportMonitor ──┐
//!                                    ├─▶ LayoutController ─▶ { scale, maxContentWidth }
//!   page chrome ─▶ MeasurementRegistry ┘        │
//!                                       resolve_layout
//!                                 (uniform fit ∧ rail constraint)
//! ```
//!
//! The arithmetic in [`engine`] is pure and usable on its own. The monitor,
//! registry and controller are single-threaded publishers for hosts that
//! want change notification.

pub mod breakpoints;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod observe;
pub mod registry;
pub mod reveal;
pub mod viewport;

pub use breakpoints::{RailBand, RailBreakpoints};
pub use config::{LayoutConfig, MonitorConfig, ReferenceCanvas, ScaleBounds};
pub use controller::LayoutController;
pub use engine::{LayoutTransformResolver, compute_constraint, compute_uniform_scale, resolve_layout};
pub use error::ConfigError;
pub use observe::{Subscribers, Subscription};
pub use registry::{MeasurementRegistry, MetricUpdate};
pub use reveal::SectionRevealTracker;
pub use viewport::{FixedWindow, Headless, HostWindow, ViewportMonitor};

pub use stagefit_protocol as protocol;
