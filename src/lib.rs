#![doc = include_str!("../README.md")]

mod accessor;
mod distance;
mod error;
pub mod kdtree;
mod neighbor;
mod search;
mod select;
pub mod small;
mod stats;
mod r#type;

pub use accessor::{FlatPoints, PointAccessor};
pub use distance::{
    Metric, MinkowskiPartial, PartialDistance, PartialEuclidean, PartialLpNorm, PartialManhattan,
    PartialSquaredEuclidean,
};
pub use error::{KdIndexError, Result};
pub use neighbor::Neighbor;
pub use r#type::Coordinate;
pub use search::{KnnSearch, RangeSearch};
pub use stats::StatisticsSnapshot;

#[cfg(test)]
pub(crate) mod test;
