pub mod layout;
pub mod metric;
pub mod types;
pub mod viewport;

pub use layout::{Constraint, ContentPlacement, LayoutTransform, RailGeometry, SafeAreaMetrics};
pub use metric::MetricName;
pub use types::{Point, Rect, Size};
pub use viewport::{ViewportEvent, ViewportState};
