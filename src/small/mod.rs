//! A static k-d tree stored implicitly in its id array.
//!
//! Compared to [`kdtree`][crate::kdtree], this variant allocates no nodes and always splits at
//! the median, cycling through the axes. It supports kNN search ([`SmallKnnSearcher`]) and
//! radius search ([`SmallRangeSearcher`]).

#![warn(missing_docs)]

mod builder;
mod index;
mod knn;
mod range;

pub use builder::{SmallKDTreeBuilder, DEFAULT_SMALL_LEAF_SIZE};
pub use index::SmallKDTree;
pub use knn::SmallKnnSearcher;
pub use range::SmallRangeSearcher;

#[cfg(test)]
mod test;
