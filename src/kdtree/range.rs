use tinyvec::TinyVec;

use crate::accessor::PointAccessor;
use crate::distance::PartialDistance;
use crate::kdtree::Bounds;
use crate::kdtree::{KDTree, Node};
use crate::neighbor::Neighbor;
use crate::r#type::Coordinate;
use crate::search::RangeSearch;

/// Radius search on a [`KDTree`].
///
/// Traverses the tree like [`KnnSearcher`][crate::kdtree::KnnSearcher], but prunes against the
/// fixed query radius and collects every point within it. Results are unordered.
#[derive(Debug)]
pub struct RangeSearcher<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> {
    tree: &'t KDTree<'t, N, P>,
    distance: D,
    radius: f64,
}

impl<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
    RangeSearcher<'t, N, P, D>
{
    pub(crate) fn new(tree: &'t KDTree<'t, N, P>, distance: D, radius: f64) -> Self {
        Self {
            tree,
            distance,
            radius,
        }
    }

    /// The radius used by [`RangeSearcher::range`].
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Find all points within the default radius of `query`.
    pub fn range(&self, query: &[N]) -> Vec<Neighbor> {
        self.range_with_radius(query, self.radius)
    }

    /// Find all points within the default radius of the indexed point `id`, including the point
    /// itself.
    pub fn range_by_id(&self, id: u32) -> Vec<Neighbor> {
        self.range(self.tree.point(id))
    }

    /// Find all points with a distance of at most `radius` to `query`.
    pub fn range_with_radius(&self, query: &[N], radius: f64) -> Vec<Neighbor> {
        debug_assert_eq!(query.len(), self.tree.dims, "query has wrong dimensionality");
        let mut result = vec![];
        let mut bounds: Bounds = TinyVec::new();
        bounds.resize(self.tree.dims, 0.0);
        self.range_search(0, query, &mut result, &mut bounds, 0.0, radius);
        result
    }

    fn range_search(
        &self,
        node: usize,
        query: &[N],
        result: &mut Vec<Neighbor>,
        bounds: &mut [f64],
        rawdist: f64,
        radius: f64,
    ) {
        let tree = self.tree;
        match tree.nodes[node] {
            Node::Leaf { start, end } => {
                for id in tree.ids[start..end].iter() {
                    let dist = tree.distance_to(&self.distance, query, *id);
                    if dist <= radius {
                        result.push(Neighbor::new(dist, *id));
                    }
                }
            }
            Node::Split {
                dim,
                threshold,
                left,
                right,
            } => {
                let delta = threshold - query[dim].as_f64();
                if delta == 0.0 {
                    self.range_search(left, query, result, bounds, rawdist, radius);
                    self.range_search(right, query, result, bounds, rawdist, radius);
                    return;
                }
                let (near, far) = if delta > 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                self.range_search(near, query, result, bounds, rawdist, radius);
                let prevdelta = bounds[dim];
                let mindist = self.distance.combine_raw(rawdist, delta, prevdelta);
                if self.distance.compare_raw_regular(mindist, radius) {
                    bounds[dim] = delta;
                    self.range_search(far, query, result, bounds, mindist, radius);
                    bounds[dim] = prevdelta;
                }
            }
        }
    }
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> RangeSearch<N>
    for RangeSearcher<'_, N, P, D>
{
    fn radius(&self) -> f64 {
        self.radius
    }

    fn range_with_radius(&self, query: &[N], radius: f64) -> Vec<Neighbor> {
        RangeSearcher::range_with_radius(self, query, radius)
    }
}
