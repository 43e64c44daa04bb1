use tinyvec::TinyVec;

use crate::accessor::PointAccessor;
use crate::distance::PartialDistance;
use crate::kdtree::Bounds;
use crate::neighbor::Neighbor;
use crate::r#type::Coordinate;
use crate::search::RangeSearch;
use crate::small::index::Subtree;
use crate::small::SmallKDTree;

/// Radius search on a [`SmallKDTree`]. Results are unordered.
#[derive(Debug)]
pub struct SmallRangeSearcher<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
{
    tree: &'t SmallKDTree<'t, N, P>,
    distance: D,
    radius: f64,
}

impl<'t, N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance>
    SmallRangeSearcher<'t, N, P, D>
{
    pub(crate) fn new(tree: &'t SmallKDTree<'t, N, P>, distance: D, radius: f64) -> Self {
        Self {
            tree,
            distance,
            radius,
        }
    }

    /// The radius used by [`SmallRangeSearcher::range`].
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
        if let Some(root) = self.tree.root() {
            let mut bounds: Bounds = TinyVec::new();
            bounds.resize(self.tree.dims, 0.0);
            self.range_search(root, query, &mut result, &mut bounds, 0.0, radius);
        }
        result
    }

    #[inline]
    fn visit(&self, pos: usize, query: &[N], result: &mut Vec<Neighbor>, radius: f64) {
        let dist = self.tree.distance_at(&self.distance, query, pos);
        if dist <= radius {
            result.push(Neighbor::new(dist, self.tree.ids[pos]));
        }
    }

    fn range_search(
        &self,
        subtree: Subtree,
        query: &[N],
        result: &mut Vec<Neighbor>,
        bounds: &mut [f64],
        rawdist: f64,
        radius: f64,
    ) {
        let tree = self.tree;
        if subtree.len() <= tree.leaf_size {
            for pos in subtree.left..subtree.right {
                self.visit(pos, query, result, radius);
            }
            return;
        }

        let middle = subtree.middle();
        let axis = subtree.axis;
        let lower = subtree.lower(tree.dims);
        let upper = subtree.upper(tree.dims);
        let delta = tree.projections[middle] - query[axis].as_f64();

        if delta == 0.0 {
            self.visit(middle, query, result, radius);
            if let Some(lower) = lower {
                self.range_search(lower, query, result, bounds, rawdist, radius);
            }
            if let Some(upper) = upper {
                self.range_search(upper, query, result, bounds, rawdist, radius);
            }
            return;
        }

        let (near, far) = if delta > 0.0 {
            (lower, upper)
        } else {
            (upper, lower)
        };
        if let Some(near) = near {
            self.range_search(near, query, result, bounds, rawdist, radius);
        }
        let prevdelta = bounds[axis];
        let mindist = self.distance.combine_raw(rawdist, delta, prevdelta);
        if !self.distance.compare_raw_regular(mindist, radius) {
            return;
        }
        self.visit(middle, query, result, radius);
        if let Some(far) = far {
            bounds[axis] = delta;
            self.range_search(far, query, result, bounds, mindist, radius);
            bounds[axis] = prevdelta;
        }
    }
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized, D: PartialDistance> RangeSearch<N>
    for SmallRangeSearcher<'_, N, P, D>
{
    fn radius(&self) -> f64 {
        self.radius
    }

    fn range_with_radius(&self, query: &[N], radius: f64) -> Vec<Neighbor> {
        SmallRangeSearcher::range_with_radius(self, query, radius)
    }
}
