use std::marker::PhantomData;
use std::ops::Range;

use crate::accessor::PointAccessor;
use crate::distance::{Metric, MinkowskiPartial, PartialDistance};
use crate::kdtree::{KnnSearcher, Node, PrioritySearcher, RangeSearcher};
use crate::r#type::Coordinate;
use crate::stats::{Statistics, StatisticsSnapshot};

/// A static k-d tree with explicit split nodes.
///
/// The tree owns a permutation of the point ids and an arena of [`Node`]s, and borrows the
/// points themselves. It is immutable once built, so any number of searchers may read it
/// concurrently.
///
/// Usually this will be created via [`KDTreeBuilder`][crate::kdtree::KDTreeBuilder].
#[derive(Debug)]
pub struct KDTree<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    pub(crate) points: &'a P,
    pub(crate) ids: Vec<u32>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) dims: usize,
    pub(crate) leaf_size: usize,
    pub(crate) stats: Statistics,
    pub(crate) phantom: PhantomData<N>,
}

impl<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> KDTree<'a, N, P> {
    /// The points this tree indexes.
    pub fn points(&self) -> &'a P {
        self.points
    }

    /// The number of indexed points.
    pub fn num_items(&self) -> usize {
        self.ids.len()
    }

    /// The dimensionality of the indexed points.
    pub fn dimensionality(&self) -> usize {
        self.dims
    }

    /// The maximum number of points in a leaf this tree was built with.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The point ids in tree order. Every leaf covers a contiguous range of this slice.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// The node arena. Children of split nodes are positions into this slice.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The root node of the tree.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// The ranges of [`KDTree::ids`] covered by each leaf, in depth-first order.
    pub fn leaves(&self) -> Vec<Range<usize>> {
        let mut leaves = vec![];
        let mut stack = vec![0];
        while let Some(index) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { start, end } => leaves.push(start..end),
                Node::Split { left, right, .. } => {
                    // Note: these are pushed in backwards order to what gets popped
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        leaves
    }

    /// Create a kNN searcher for the given metric, or `None` if this tree cannot accelerate it.
    ///
    /// `k` is kept as the searcher's nominal neighbor count, see [`KnnSearcher::k`]. Each query
    /// passes its own count.
    pub fn knn_searcher(
        &self,
        metric: Metric,
        k: usize,
    ) -> Option<KnnSearcher<'_, N, P, MinkowskiPartial>> {
        let distance = MinkowskiPartial::for_metric(metric)?;
        Some(self.knn_searcher_with(distance, k))
    }

    /// Create a kNN searcher for a statically known partial distance.
    pub fn knn_searcher_with<D: PartialDistance>(
        &self,
        distance: D,
        k: usize,
    ) -> KnnSearcher<'_, N, P, D> {
        KnnSearcher::new(self, distance, k)
    }

    /// Create a range searcher for the given metric and default radius, or `None` if this tree
    /// cannot accelerate the metric.
    pub fn range_searcher(
        &self,
        metric: Metric,
        radius: f64,
    ) -> Option<RangeSearcher<'_, N, P, MinkowskiPartial>> {
        let distance = MinkowskiPartial::for_metric(metric)?;
        Some(self.range_searcher_with(distance, radius))
    }

    /// Create a range searcher for a statically known partial distance.
    pub fn range_searcher_with<D: PartialDistance>(
        &self,
        distance: D,
        radius: f64,
    ) -> RangeSearcher<'_, N, P, D> {
        RangeSearcher::new(self, distance, radius)
    }

    /// Create a best-first searcher for the given metric, or `None` if this tree cannot
    /// accelerate it.
    pub fn priority_searcher(
        &self,
        metric: Metric,
    ) -> Option<PrioritySearcher<'_, N, P, MinkowskiPartial>> {
        let distance = MinkowskiPartial::for_metric(metric)?;
        Some(self.priority_searcher_with(distance))
    }

    /// Create a best-first searcher for a statically known partial distance.
    pub fn priority_searcher_with<D: PartialDistance>(
        &self,
        distance: D,
    ) -> PrioritySearcher<'_, N, P, D> {
        PrioritySearcher::new(self, distance)
    }

    /// The instrumentation counters of this tree.
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    /// Reset the instrumentation counters of this tree.
    pub fn reset_statistics(&self) {
        self.stats.reset()
    }

    /// Log the instrumentation counters at info level, if they are enabled.
    pub fn log_statistics(&self) {
        self.stats.log("kd_index::kdtree::KDTree")
    }

    /// Read a point, counting the access.
    #[inline]
    pub(crate) fn point(&self, id: u32) -> &'a [N] {
        self.stats.count_object_access();
        self.points.point(id)
    }

    /// Compute the distance from `query` to a point, counting the access.
    #[inline]
    pub(crate) fn distance_to<D: PartialDistance>(&self, distance: &D, query: &[N], id: u32) -> f64 {
        let point = self.point(id);
        self.stats.count_distance_computation();
        distance.distance(query, point)
    }
}
