use std::marker::PhantomData;
use std::time::Instant;

use crate::accessor::{CountingPoints, PointAccessor};
use crate::error::{KdIndexError, Result};
use crate::r#type::Coordinate;
use crate::select::select;
use crate::small::SmallKDTree;
use crate::stats::Statistics;

/// The default maximum number of points in a leaf, used by [`SmallKDTreeBuilder::new`].
pub const DEFAULT_SMALL_LEAF_SIZE: usize = 1;

/// A builder to create a [`SmallKDTree`].
///
/// ```
/// use kd_index::small::SmallKDTreeBuilder;
/// use kd_index::Metric;
///
/// let points = vec![[0., 0.], [1., 0.], [0., 1.], [5., 5.]];
/// let tree = SmallKDTreeBuilder::new(&points).finish().unwrap();
/// let range = tree.range_searcher(Metric::Euclidean, 1.5).unwrap();
/// let mut ids: Vec<u32> = range.range(&[0., 0.]).iter().map(|n| n.id).collect();
/// ids.sort();
/// assert_eq!(ids, vec![0, 1, 2]);
/// ```
pub struct SmallKDTreeBuilder<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    points: &'a P,
    leaf_size: usize,
    statistics: bool,
    phantom: PhantomData<N>,
}

impl<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> SmallKDTreeBuilder<'a, N, P> {
    /// Create a new builder over the given points with the default leaf size.
    pub fn new(points: &'a P) -> Self {
        Self::new_with_leaf_size(points, DEFAULT_SMALL_LEAF_SIZE)
    }

    /// Create a new builder over the given points with the provided maximum leaf size.
    pub fn new_with_leaf_size(points: &'a P, leaf_size: usize) -> Self {
        Self {
            points,
            leaf_size,
            statistics: false,
            phantom: PhantomData,
        }
    }

    /// Count point accesses and distance computations of the built tree.
    pub fn with_statistics(mut self, statistics: bool) -> Self {
        self.statistics = statistics;
        self
    }

    /// Consume this builder, kd-sorting the point ids and generating a SmallKDTree ready for
    /// queries.
    pub fn finish(self) -> Result<SmallKDTree<'a, N, P>> {
        if self.leaf_size == 0 {
            return Err(KdIndexError::InvalidLeafSize(self.leaf_size));
        }
        let num_items = self.points.num_items();
        if u32::try_from(num_items).is_err() {
            return Err(KdIndexError::General(format!(
                "Cannot index {} points, at most {} are supported.",
                num_items,
                u32::MAX
            )));
        }
        let dims = self.points.dimensionality();
        if dims == 0 && num_items > 0 {
            return Err(KdIndexError::General(
                "Points must have at least one dimension.".to_string(),
            ));
        }

        let mut ids: Vec<u32> = self.points.ids().collect();
        for id in ids.iter() {
            let actual = self.points.point(*id).len();
            if actual != dims {
                return Err(KdIndexError::DimensionMismatch {
                    id: *id,
                    expected: dims,
                    actual,
                });
            }
        }

        let start = Instant::now();
        let stats = Statistics::new(self.statistics);
        let mut projections = vec![f64::NAN; ids.len()];
        if !ids.is_empty() {
            let points = CountingPoints::new(self.points, &stats);
            let len = ids.len();
            sort(
                &points,
                &mut ids,
                &mut projections,
                self.leaf_size,
                0,
                len,
                0,
            );
        }
        log::debug!(
            "Built implicit k-d tree over {} points in {:?}",
            ids.len(),
            start.elapsed()
        );

        Ok(SmallKDTree {
            points: self.points,
            ids,
            projections,
            dims,
            leaf_size: self.leaf_size,
            stats,
            phantom: PhantomData,
        })
    }
}

/// Recursively kd-sort `ids[left..right]`, splitting at the median on `axis`.
///
/// Every position receives the coordinate of its point on the axis of the subtree it was last
/// part of, so the split point of each subtree keeps its own projection.
fn sort<N: Coordinate, P: PointAccessor<N> + ?Sized>(
    points: &P,
    ids: &mut [u32],
    projections: &mut [f64],
    leaf_size: usize,
    left: usize,
    right: usize,
    axis: usize,
) {
    debug_assert!(left < right);
    for i in left..right {
        projections[i] = points.coord(ids[i], axis);
    }
    if right - left <= leaf_size {
        return;
    }

    // middle index
    let middle = (left + right) >> 1;
    select(projections, ids, middle, left, right - 1);

    // recursively kd-sort both halves on the next axis
    let next = (axis + 1) % points.dimensionality();
    if left < middle {
        sort(points, ids, projections, leaf_size, left, middle, next);
    }
    if middle + 1 < right {
        sort(points, ids, projections, leaf_size, middle + 1, right, next);
    }
}
