//! Pure layout arithmetic. Nothing in here holds state beyond the
//! resolver's last-input memo.

pub mod collision;
pub mod resolver;
pub mod scale;

pub use collision::{compute_constraint, rail_left_edge};
pub use resolver::{LayoutTransformResolver, resolve_layout};
pub use scale::{compute_safe_area_scale, compute_uniform_scale, raw_uniform_scale};
