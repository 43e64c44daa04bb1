use std::marker::PhantomData;

use crate::accessor::PointAccessor;
use crate::distance::{Metric, MinkowskiPartial, PartialDistance};
use crate::r#type::Coordinate;
use crate::small::{SmallKnnSearcher, SmallRangeSearcher};
use crate::stats::{Statistics, StatisticsSnapshot};

/// A subtree of a [`SmallKDTree`]: the range `left..right` of the id array, split on `axis`.
///
/// The split point is the point at `middle()`. Points before it are not greater on `axis`,
/// points after it are not smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subtree {
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) axis: usize,
}

impl Subtree {
    #[inline]
    pub(crate) fn middle(&self) -> usize {
        (self.left + self.right) >> 1
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.right - self.left
    }

    /// The subtree before the split point, if not empty.
    #[inline]
    pub(crate) fn lower(&self, dims: usize) -> Option<Subtree> {
        let middle = self.middle();
        (self.left < middle).then(|| Subtree {
            left: self.left,
            right: middle,
            axis: (self.axis + 1) % dims,
        })
    }

    /// The subtree after the split point, if not empty.
    #[inline]
    pub(crate) fn upper(&self, dims: usize) -> Option<Subtree> {
        let middle = self.middle();
        (middle + 1 < self.right).then(|| Subtree {
            left: middle + 1,
            right: self.right,
            axis: (self.axis + 1) % dims,
        })
    }
}

/// A memory-light static k-d tree without node objects.
///
/// The tree is implicit in the order of its id array: every range is split at its middle
/// position, which holds the median point along the range's axis, and axes cycle with depth.
/// Besides the ids, the only per-point storage is the cached coordinate of each point on the
/// axis it was last split on.
///
/// Usually this will be created via [`SmallKDTreeBuilder`][crate::small::SmallKDTreeBuilder].
#[derive(Debug)]
pub struct SmallKDTree<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    pub(crate) points: &'a P,
    pub(crate) ids: Vec<u32>,
    pub(crate) projections: Vec<f64>,
    pub(crate) dims: usize,
    pub(crate) leaf_size: usize,
    pub(crate) stats: Statistics,
    pub(crate) phantom: PhantomData<N>,
}

impl<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> SmallKDTree<'a, N, P> {
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

    /// The point ids in kd-sorted order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// The cached coordinate of each position of [`SmallKDTree::ids`] on its split axis.
    pub fn projections(&self) -> &[f64] {
        &self.projections
    }

    pub(crate) fn root(&self) -> Option<Subtree> {
        (!self.ids.is_empty()).then_some(Subtree {
            left: 0,
            right: self.ids.len(),
            axis: 0,
        })
    }

    /// Create a kNN searcher for the given metric, or `None` if this tree cannot accelerate it.
    ///
    /// `k` is kept as the searcher's nominal neighbor count, see [`SmallKnnSearcher::k`]. Each
    /// query passes its own count.
    pub fn knn_searcher(
        &self,
        metric: Metric,
        k: usize,
    ) -> Option<SmallKnnSearcher<'_, N, P, MinkowskiPartial>> {
        let distance = MinkowskiPartial::for_metric(metric)?;
        Some(self.knn_searcher_with(distance, k))
    }

    /// Create a kNN searcher for a statically known partial distance.
    pub fn knn_searcher_with<D: PartialDistance>(
        &self,
        distance: D,
        k: usize,
    ) -> SmallKnnSearcher<'_, N, P, D> {
        SmallKnnSearcher::new(self, distance, k)
    }

    /// Create a range searcher for the given metric and default radius, or `None` if this tree
    /// cannot accelerate the metric.
    pub fn range_searcher(
        &self,
        metric: Metric,
        radius: f64,
    ) -> Option<SmallRangeSearcher<'_, N, P, MinkowskiPartial>> {
        let distance = MinkowskiPartial::for_metric(metric)?;
        Some(self.range_searcher_with(distance, radius))
    }

    /// Create a range searcher for a statically known partial distance.
    pub fn range_searcher_with<D: PartialDistance>(
        &self,
        distance: D,
        radius: f64,
    ) -> SmallRangeSearcher<'_, N, P, D> {
        SmallRangeSearcher::new(self, distance, radius)
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
        self.stats.log("kd_index::small::SmallKDTree")
    }

    /// Read a point, counting the access.
    #[inline]
    pub(crate) fn point(&self, id: u32) -> &'a [N] {
        self.stats.count_object_access();
        self.points.point(id)
    }

    /// Compute the distance from `query` to the point at `pos` of the id array, counting the
    /// access.
    #[inline]
    pub(crate) fn distance_at<D: PartialDistance>(
        &self,
        distance: &D,
        query: &[N],
        pos: usize,
    ) -> f64 {
        let point = self.point(self.ids[pos]);
        self.stats.count_distance_computation();
        distance.distance(query, point)
    }
}
