//! A static k-d tree with explicit split nodes and pluggable split strategies.
//!
//! The tree supports bounded kNN search ([`KnnSearcher`]), radius search ([`RangeSearcher`]) and
//! resumable best-first search ([`PrioritySearcher`]) under the Minkowski family of distances.

#![warn(missing_docs)]

mod builder;
mod index;
mod knn;
mod node;
mod priority;
mod range;
pub mod split;

pub use builder::{KDTreeBuilder, DEFAULT_LEAF_SIZE};
pub use index::KDTree;
pub(crate) use knn::Bounds;
pub use knn::KnnSearcher;
pub use node::Node;
pub use priority::PrioritySearcher;
pub use range::RangeSearcher;
