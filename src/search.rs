//! Search traits shared by the index variants.

use geo_traits::CoordTrait;
#[cfg(feature = "rayon")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::neighbor::Neighbor;
use crate::r#type::Coordinate;

/// Collect the coordinates of a geo-traits coordinate into a query vector.
fn coord_to_vec<N: Coordinate>(coord: &impl CoordTrait<T = N>) -> Vec<N> {
    (0..coord.dim().size())
        .map(|axis| coord.nth_or_panic(axis))
        .collect()
}

/// A searcher answering k-nearest-neighbor queries.
pub trait KnnSearch<N: Coordinate> {
    /// Find the `k` nearest neighbors of `query`, sorted by ascending distance with ties broken
    /// by id.
    fn knn(&self, query: &[N], k: usize) -> Vec<Neighbor>;

    /// Find the `k` nearest neighbors of a geo-traits coordinate.
    fn knn_coord(&self, coord: &impl CoordTrait<T = N>, k: usize) -> Vec<Neighbor> {
        self.knn(&coord_to_vec(coord), k)
    }

    /// Answer one kNN query per entry of `queries`.
    ///
    /// With the `rayon` feature the queries run in parallel, each with its own scratch state.
    fn knn_batch<Q: AsRef<[N]> + Sync>(&self, queries: &[Q], k: usize) -> Vec<Vec<Neighbor>>
    where
        Self: Sync,
    {
        #[cfg(feature = "rayon")]
        {
            queries.par_iter().map(|q| self.knn(q.as_ref(), k)).collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            queries.iter().map(|q| self.knn(q.as_ref(), k)).collect()
        }
    }
}

/// A searcher answering radius queries.
pub trait RangeSearch<N: Coordinate> {
    /// The radius used by [`RangeSearch::range`].
    fn radius(&self) -> f64;

    /// Find all points with a distance of at most `radius` to `query`, in no particular order.
    fn range_with_radius(&self, query: &[N], radius: f64) -> Vec<Neighbor>;

    /// Find all points within the default radius of `query`.
    fn range(&self, query: &[N]) -> Vec<Neighbor> {
        self.range_with_radius(query, self.radius())
    }

    /// Find all points within the default radius of a geo-traits coordinate.
    fn range_coord(&self, coord: &impl CoordTrait<T = N>) -> Vec<Neighbor> {
        self.range(&coord_to_vec(coord))
    }

    /// Answer one range query with the default radius per entry of `queries`.
    ///
    /// With the `rayon` feature the queries run in parallel, each with its own scratch state.
    fn range_batch<Q: AsRef<[N]> + Sync>(&self, queries: &[Q]) -> Vec<Vec<Neighbor>>
    where
        Self: Sync,
    {
        #[cfg(feature = "rayon")]
        {
            queries.par_iter().map(|q| self.range(q.as_ref())).collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            queries.iter().map(|q| self.range(q.as_ref())).collect()
        }
    }
}
