use std::marker::PhantomData;
use std::time::Instant;

use crate::accessor::{CountingPoints, PointAccessor};
use crate::error::{KdIndexError, Result};
use crate::kdtree::split::{SplitParams, SplitStrategy};
use crate::kdtree::{KDTree, Node};
use crate::r#type::Coordinate;
use crate::stats::Statistics;

/// The default maximum number of points in a leaf, used by [`KDTreeBuilder::new`].
pub const DEFAULT_LEAF_SIZE: usize = 2;

/// A builder to create a [`KDTree`].
///
/// ```
/// use kd_index::kdtree::split::BoundedMidpointSplit;
/// use kd_index::kdtree::KDTreeBuilder;
/// use kd_index::Metric;
///
/// let points = vec![[0., 0.], [1., 0.], [0., 1.], [5., 5.]];
/// let tree = KDTreeBuilder::new(&points)
///     .finish::<BoundedMidpointSplit>()
///     .unwrap();
/// let knn = tree.knn_searcher(Metric::Euclidean, 2).unwrap();
/// let ids: Vec<u32> = knn.knn(&[0., 0.], 1).iter().map(|n| n.id).collect();
/// assert_eq!(ids, vec![0]);
/// ```
pub struct KDTreeBuilder<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    points: &'a P,
    leaf_size: usize,
    statistics: bool,
    phantom: PhantomData<N>,
}

impl<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> KDTreeBuilder<'a, N, P> {
    /// Create a new builder over the given points with the default leaf size.
    pub fn new(points: &'a P) -> Self {
        Self::new_with_leaf_size(points, DEFAULT_LEAF_SIZE)
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

    /// Consume this builder, partitioning the points with split strategy `S` and generating a
    /// KDTree ready for queries.
    pub fn finish<S: SplitStrategy>(self) -> Result<KDTree<'a, N, P>> {
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
        let ids: Vec<u32> = self.points.ids().collect();
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
        let mut state = BuildState {
            points: CountingPoints::new(self.points, &stats),
            ids,
            nodes: vec![],
            leaf_size: self.leaf_size,
            dims,
            depth: 0,
        };
        let len = state.ids.len();
        state.build_tree::<S>(0, len, 1)?;

        let BuildState {
            ids, nodes, depth, ..
        } = state;
        log::debug!(
            "Built k-d tree over {} points: {} nodes, {} leaves, depth {} in {:?}",
            len,
            nodes.len(),
            nodes.iter().filter(|n| n.is_leaf()).count(),
            depth,
            start.elapsed()
        );

        Ok(KDTree {
            points: self.points,
            ids,
            nodes,
            dims,
            leaf_size: self.leaf_size,
            stats,
            phantom: PhantomData,
        })
    }
}

struct BuildState<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    points: CountingPoints<'a, N, P>,
    ids: Vec<u32>,
    nodes: Vec<Node>,
    leaf_size: usize,
    dims: usize,
    depth: usize,
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized> BuildState<'_, N, P> {
    /// Build the subtree over `ids[left..right]`, returning its position in the node arena.
    fn build_tree<S: SplitStrategy>(
        &mut self,
        left: usize,
        right: usize,
        depth: usize,
    ) -> Result<usize> {
        self.depth = self.depth.max(depth);
        let index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            start: left,
            end: right,
        });
        if right - left <= self.leaf_size {
            return Ok(index);
        }

        let params = SplitParams {
            left,
            right,
            dims: self.dims,
        };
        let split = match S::find_split(&self.points, &params, &mut self.ids) {
            Some(split) if split.pos == right => None,
            Some(split) if split.pos <= left || split.pos > right || split.dim >= self.dims => {
                return Err(KdIndexError::InvalidSplit {
                    left,
                    right,
                    pos: split.pos,
                });
            }
            split => split,
        };
        let Some(split) = split else {
            log::trace!(
                "No split for range [{}, {}), keeping {} points in one leaf",
                left,
                right,
                right - left
            );
            return Ok(index);
        };
        debug_assert!(self.split_is_consistent(left, split.pos, right, split.dim, split.threshold));

        let left_child = self.build_tree::<S>(left, split.pos, depth + 1)?;
        let right_child = self.build_tree::<S>(split.pos, right, depth + 1)?;
        self.nodes[index] = Node::Split {
            dim: split.dim,
            threshold: split.threshold,
            left: left_child,
            right: right_child,
        };
        Ok(index)
    }

    fn split_is_consistent(
        &self,
        left: usize,
        pos: usize,
        right: usize,
        dim: usize,
        threshold: f64,
    ) -> bool {
        let points = self.points.inner();
        self.ids[left..pos]
            .iter()
            .all(|id| points.coord(*id, dim) <= threshold)
            && self.ids[pos..right]
                .iter()
                .all(|id| points.coord(*id, dim) >= threshold)
    }
}
