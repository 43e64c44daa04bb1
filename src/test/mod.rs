//! Helpers shared by the index tests: seeded point generators and linear-scan reference
//! queries.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Metric, Neighbor, PointAccessor};

/// The metrics the trees accelerate, covering every partial distance variant.
pub(crate) const SUPPORTED_METRICS: [Metric; 6] = [
    Metric::SquaredEuclidean,
    Metric::Euclidean,
    Metric::Manhattan,
    Metric::LpNorm(1.0),
    Metric::LpNorm(3.0),
    Metric::LpNorm(0.5),
];

/// Metrics whose distances are computed exactly on small integer coordinates, so that ties and
/// points lying exactly on a query radius can be checked by id.
pub(crate) const EXACT_METRICS: [Metric; 5] = [
    Metric::SquaredEuclidean,
    Metric::Euclidean,
    Metric::Manhattan,
    Metric::LpNorm(1.0),
    Metric::LpNorm(3.0),
];

/// The four points of the worked examples: A=(0,0), B=(1,0), C=(0,1), D=(5,5).
pub(crate) fn abcd() -> Vec<[f64; 2]> {
    vec![[0., 0.], [1., 0.], [0., 1.], [5., 5.]]
}

/// `n` points drawn uniformly from `[-100, 100)^D`.
pub(crate) fn random_points<const D: usize>(n: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| std::array::from_fn(|_| rng.gen_range(-100.0..100.0)))
        .collect()
}

/// `n` points on a coarse integer grid, so that duplicates and coordinates equal to split
/// thresholds are common.
pub(crate) fn grid_points<const D: usize>(n: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| std::array::from_fn(|_| rng.gen_range(0..8) as f64))
        .collect()
}

/// The `k` nearest neighbors by linear scan, sorted by distance then id.
pub(crate) fn brute_force_knn<P: PointAccessor<f64> + ?Sized>(
    points: &P,
    metric: Metric,
    query: &[f64],
    k: usize,
) -> Vec<Neighbor> {
    let mut all: Vec<Neighbor> = points
        .ids()
        .map(|id| Neighbor::new(metric.distance(query, points.point(id)), id))
        .collect();
    all.sort();
    all.truncate(k);
    all
}

/// All points within `radius` by linear scan, sorted by id.
pub(crate) fn brute_force_range<P: PointAccessor<f64> + ?Sized>(
    points: &P,
    metric: Metric,
    query: &[f64],
    radius: f64,
) -> Vec<u32> {
    points
        .ids()
        .filter(|id| metric.distance(query, points.point(*id)) <= radius)
        .collect()
}

/// Assert that a kNN result matches the linear scan up to the order of ties.
pub(crate) fn assert_knn_matches<P: PointAccessor<f64> + ?Sized>(
    points: &P,
    metric: Metric,
    query: &[f64],
    actual: &[Neighbor],
    expected: &[Neighbor],
) {
    assert_eq!(actual.len(), expected.len(), "{:?} at {:?}", metric, query);
    for (a, e) in actual.iter().zip(expected) {
        assert_relative_eq!(a.distance, e.distance, max_relative = 1e-9);
        assert_relative_eq!(
            a.distance,
            metric.distance(query, points.point(a.id)),
            max_relative = 1e-9
        );
    }
    let mut ids: Vec<u32> = actual.iter().map(|n| n.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), actual.len(), "duplicate ids in {:?}", actual);
}

/// The ids of a result, in result order.
pub(crate) fn ids(result: &[Neighbor]) -> Vec<u32> {
    result.iter().map(|n| n.id).collect()
}

/// The ids of a result, sorted.
pub(crate) fn sorted_ids(result: &[Neighbor]) -> Vec<u32> {
    let mut ids: Vec<u32> = result.iter().map(|n| n.id).collect();
    ids.sort();
    ids
}

/// A 2-D coordinate for exercising the geo-traits query helpers.
pub(crate) struct TestCoord {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl geo_traits::CoordTrait for TestCoord {
    type T = f64;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}
