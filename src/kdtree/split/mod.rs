//! Policies for dividing a range of points into two subtrees.

mod bounded_midpoint;
mod median;
mod midpoint;
mod r#trait;
pub(crate) mod util;

pub use bounded_midpoint::BoundedMidpointSplit;
pub use median::MedianSplit;
pub use midpoint::MidpointSplit;
pub use r#trait::{Split, SplitParams, SplitStrategy};
