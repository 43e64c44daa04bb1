use tinyvec::TinyVec;

use crate::accessor::PointAccessor;
use crate::distance::PartialDistance;
use crate::kdtree::Bounds;
use crate::neighbor::{KnnHeap, Neighbor};
use crate::r#type::Coordinate;
use crate::search::KnnSearch;
use crate::small::index::Subtree;
use crate::small::SmallKDTree;

/// Bounded k-nearest-neighbor search on a [`SmallKDTree`].
#[derive(Debug)]
pub struct SmallKnnSearcher<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
{
    tree: &'t SmallKDTree<'t, N, P>,
    distance: D,
    k: usize,
}

impl<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
    SmallKnnSearcher<'t, N, P, D>
{
    pub(crate) fn new(tree: &'t SmallKDTree<'t, N, P>, distance: D, k: usize) -> Self {
        Self { tree, distance, k }
    }

    /// The number of neighbors this searcher was created for.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Find the `k` nearest neighbors of `query`, sorted by ascending distance with ties broken
    /// by id.
    pub fn knn(&self, query: &[N], k: usize) -> Vec<Neighbor> {
        debug_assert_eq!(query.len(), self.tree.dims, "query has wrong dimensionality");
        let Some(root) = self.tree.root() else {
            return vec![];
        };
        if k == 0 {
            return vec![];
        }
        let mut heap = KnnHeap::new(k);
        let mut bounds: Bounds = TinyVec::new();
        bounds.resize(self.tree.dims, 0.0);
        self.knn_search(root, query, &mut heap, &mut bounds, 0.0, f64::INFINITY);
        heap.into_sorted_vec()
    }

    /// Find the `k` nearest neighbors of the indexed point `id`. The point itself is part of the
    /// result, at distance zero.
    pub fn knn_by_id(&self, id: u32, k: usize) -> Vec<Neighbor> {
        self.knn(self.tree.point(id), k)
    }

    /// Check the point at `pos` against the heap, returning the updated k-th neighbor distance.
    #[inline]
    fn visit(&self, pos: usize, query: &[N], heap: &mut KnnHeap, maxdist: f64) -> f64 {
        let dist = self.tree.distance_at(&self.distance, query, pos);
        if dist <= maxdist {
            heap.insert(dist, self.tree.ids[pos]);
            return heap.knn_distance();
        }
        maxdist
    }

    fn knn_search(
        &self,
        subtree: Subtree,
        query: &[N],
        heap: &mut KnnHeap,
        bounds: &mut [f64],
        rawdist: f64,
        mut maxdist: f64,
    ) -> f64 {
        let tree = self.tree;
        if subtree.len() <= tree.leaf_size {
            for pos in subtree.left..subtree.right {
                maxdist = self.visit(pos, query, heap, maxdist);
            }
            return maxdist;
        }

        let middle = subtree.middle();
        let axis = subtree.axis;
        let lower = subtree.lower(tree.dims);
        let upper = subtree.upper(tree.dims);
        let delta = tree.projections[middle] - query[axis].as_f64();

        // The split point coincides with the query on this axis
        if delta == 0.0 {
            maxdist = self.visit(middle, query, heap, maxdist);
            if let Some(lower) = lower {
                maxdist = self.knn_search(lower, query, heap, bounds, rawdist, maxdist);
            }
            if let Some(upper) = upper {
                maxdist = self.knn_search(upper, query, heap, bounds, rawdist, maxdist);
            }
            return maxdist;
        }

        let (near, far) = if delta > 0.0 {
            (lower, upper)
        } else {
            (upper, lower)
        };
        if let Some(near) = near {
            maxdist = self.knn_search(near, query, heap, bounds, rawdist, maxdist);
        }
        let prevdelta = bounds[axis];
        let mindist = self.distance.combine_raw(rawdist, delta, prevdelta);
        if self.distance.compare_raw_regular(mindist, maxdist) {
            maxdist = self.visit(middle, query, heap, maxdist);
        }
        if let Some(far) = far {
            if self.distance.compare_raw_regular(mindist, maxdist) {
                bounds[axis] = delta;
                maxdist = self.knn_search(far, query, heap, bounds, mindist, maxdist);
                bounds[axis] = prevdelta;
            }
        }
        maxdist
    }
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> KnnSearch<N>
    for SmallKnnSearcher<'_, N, P, D>
{
    fn knn(&self, query: &[N], k: usize) -> Vec<Neighbor> {
        SmallKnnSearcher::knn(self, query, k)
    }
}
