use tinyvec::TinyVec;

use crate::accessor::PointAccessor;
use crate::distance::PartialDistance;
use crate::kdtree::{KDTree, Node};
use crate::neighbor::{KnnHeap, Neighbor};
use crate::r#type::Coordinate;
use crate::search::KnnSearch;

/// Per-axis offsets to the splitting planes crossed so far. Stays on the stack for up to eight
/// dimensions.
pub(crate) type Bounds = TinyVec<[f64; 8]>;

/// Bounded k-nearest-neighbor search on a [`KDTree`].
///
/// This is the branch-and-bound search of Arya and Mount: the distance from the query to the
/// cell of every visited subtree is maintained incrementally, one axis at a time, and subtrees
/// whose cell is farther than the current k-th neighbor are skipped.
#[derive(Debug)]
pub struct KnnSearcher<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> {
    tree: &'t KDTree<'t, N, P>,
    distance: D,
    k: usize,
}

impl<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> KnnSearcher<'t, N, P, D> {
    pub(crate) fn new(tree: &'t KDTree<'t, N, P>, distance: D, k: usize) -> Self {
        Self { tree, distance, k }
    }

    /// The number of neighbors this searcher was created for.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Find the `k` nearest neighbors of `query`, sorted by ascending distance with ties broken
    /// by id. Returns fewer than `k` results only if the tree holds fewer than `k` points.
    pub fn knn(&self, query: &[N], k: usize) -> Vec<Neighbor> {
        debug_assert_eq!(query.len(), self.tree.dims, "query has wrong dimensionality");
        if k == 0 {
            return vec![];
        }
        let mut heap = KnnHeap::new(k);
        let mut bounds: Bounds = TinyVec::new();
        bounds.resize(self.tree.dims, 0.0);
        self.knn_search(0, query, &mut heap, &mut bounds, 0.0, f64::INFINITY);
        heap.into_sorted_vec()
    }

    /// Find the `k` nearest neighbors of the indexed point `id`. The point itself is part of the
    /// result, at distance zero.
    pub fn knn_by_id(&self, id: u32, k: usize) -> Vec<Neighbor> {
        self.knn(self.tree.point(id), k)
    }

    /// Search the subtree at `node`, returning the updated k-th neighbor distance.
    ///
    /// `bounds` must be restored to its state on entry before returning.
    fn knn_search(
        &self,
        node: usize,
        query: &[N],
        heap: &mut KnnHeap,
        bounds: &mut [f64],
        rawdist: f64,
        mut maxdist: f64,
    ) -> f64 {
        let tree = self.tree;
        match tree.nodes[node] {
            Node::Leaf { start, end } => {
                for id in tree.ids[start..end].iter() {
                    let dist = tree.distance_to(&self.distance, query, *id);
                    if dist <= maxdist {
                        heap.insert(dist, *id);
                        maxdist = heap.knn_distance();
                    }
                }
                maxdist
            }
            Node::Split {
                dim,
                threshold,
                left,
                right,
            } => {
                let delta = threshold - query[dim].as_f64();
                if delta == 0.0 {
                    maxdist = self.knn_search(left, query, heap, bounds, rawdist, maxdist);
                    return self.knn_search(right, query, heap, bounds, rawdist, maxdist);
                }
                let (near, far) = if delta > 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                maxdist = self.knn_search(near, query, heap, bounds, rawdist, maxdist);
                let prevdelta = bounds[dim];
                let mindist = self.distance.combine_raw(rawdist, delta, prevdelta);
                if self.distance.compare_raw_regular(mindist, maxdist) {
                    bounds[dim] = delta;
                    maxdist = self.knn_search(far, query, heap, bounds, mindist, maxdist);
                    bounds[dim] = prevdelta;
                }
                maxdist
            }
        }
    }
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> KnnSearch<N>
    for KnnSearcher<'_, N, P, D>
{
    fn knn(&self, query: &[N], k: usize) -> Vec<Neighbor> {
        KnnSearcher::knn(self, query, k)
    }
}
