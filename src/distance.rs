//! Distance functions and the partial-distance strategies used for branch-and-bound search.
//!
//! A k-d tree bounds the distance from a query to a subtree by accumulating per-axis offsets to
//! the splitting hyperplanes on the way down. For Minkowski norms this bound can be maintained
//! incrementally in a "raw" domain (for example the squared distance for Euclidean), which is
//! only converted back to a regular distance when reported. [`PartialDistance`] captures the
//! four primitives needed for this.

use crate::r#type::Coordinate;

/// A distance function requested by a caller.
///
/// Only the Minkowski family can be accelerated by the k-d trees in this crate. Requesting a
/// searcher for any other metric returns `None`, and the caller is expected to fall back to a
/// linear scan using [`Metric::distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Sum of squared coordinate differences.
    SquaredEuclidean,
    /// The L2 norm.
    Euclidean,
    /// The L1 norm.
    Manhattan,
    /// The Lp norm for a finite `p > 0`.
    LpNorm(f64),
    /// The L-infinity norm. Not supported by the k-d trees.
    Maximum,
    /// One minus the cosine similarity. Not supported by the k-d trees.
    Cosine,
}

impl Metric {
    /// Compute the distance between two points under this metric.
    pub fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        match *self {
            Metric::SquaredEuclidean => PartialSquaredEuclidean.distance(a, b),
            Metric::Euclidean => PartialEuclidean.distance(a, b),
            Metric::Manhattan => PartialManhattan.distance(a, b),
            Metric::LpNorm(p) => PartialLpNorm::new(p).distance(a, b),
            Metric::Maximum => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x.as_f64() - y.as_f64()).abs())
                .fold(0.0, f64::max),
            Metric::Cosine => {
                let mut dot = 0.0;
                let mut norm_a = 0.0;
                let mut norm_b = 0.0;
                for (x, y) in a.iter().zip(b) {
                    let (x, y) = (x.as_f64(), y.as_f64());
                    dot += x * y;
                    norm_a += x * x;
                    norm_b += y * y;
                }
                if norm_a == 0.0 && norm_b == 0.0 {
                    return 0.0;
                }
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                (1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())).max(0.0)
            }
        }
    }

    /// Returns `true` if the k-d trees in this crate can answer queries under this metric.
    pub fn is_supported(&self) -> bool {
        MinkowskiPartial::for_metric(*self).is_some()
    }
}

/// Per-metric primitives for reasoning about distances in a "raw" domain.
///
/// Implementations must be monotonic: for a fixed query, the raw bound grows with every axis
/// offset and [`PartialDistance::transform_out`] preserves order, otherwise pruning is unsound.
pub trait PartialDistance {
    /// Update a raw bound when the offset on one axis changes from `prev_delta` to `delta`.
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64;

    /// Returns `true` if a subtree at raw distance `raw` may still hold points within the
    /// regular distance `external`.
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool;

    /// The true distance between two points.
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64;

    /// Convert a raw bound to a regular distance.
    fn transform_out(&self, raw: f64) -> f64;
}

/// Partial distance for [`Metric::SquaredEuclidean`]. The raw and regular domains coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialSquaredEuclidean;

impl PartialDistance for PartialSquaredEuclidean {
    #[inline]
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64 {
        raw + delta * delta - prev_delta * prev_delta
    }

    #[inline]
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool {
        raw <= external
    }

    #[inline]
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| {
                let d = x.as_f64() - y.as_f64();
                d * d
            })
            .sum()
    }

    #[inline]
    fn transform_out(&self, raw: f64) -> f64 {
        raw
    }
}

/// Partial distance for [`Metric::Euclidean`], with squared distances as the raw domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialEuclidean;

impl PartialDistance for PartialEuclidean {
    #[inline]
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64 {
        raw + delta * delta - prev_delta * prev_delta
    }

    #[inline]
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool {
        // Squaring the external value rounds, e.g. sqrt(3)^2 < 3
        raw.sqrt() <= external
    }

    #[inline]
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        PartialSquaredEuclidean.distance(a, b).sqrt()
    }

    #[inline]
    fn transform_out(&self, raw: f64) -> f64 {
        raw.sqrt()
    }
}

/// Partial distance for [`Metric::Manhattan`]. The raw and regular domains coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialManhattan;

impl PartialDistance for PartialManhattan {
    #[inline]
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64 {
        raw + delta.abs() - prev_delta.abs()
    }

    #[inline]
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool {
        raw <= external
    }

    #[inline]
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x.as_f64() - y.as_f64()).abs())
            .sum()
    }

    #[inline]
    fn transform_out(&self, raw: f64) -> f64 {
        raw
    }
}

/// Partial distance for [`Metric::LpNorm`], with the p-th power of the distance as raw domain.
#[derive(Debug, Clone, Copy)]
pub struct PartialLpNorm {
    p: f64,
    inv_p: f64,
}

impl PartialLpNorm {
    /// Create a new partial Lp distance. `p` must be finite and positive.
    pub fn new(p: f64) -> Self {
        debug_assert!(p.is_finite() && p > 0.0, "invalid Lp exponent {}", p);
        Self { p, inv_p: 1.0 / p }
    }

    /// The exponent of this norm.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl PartialDistance for PartialLpNorm {
    #[inline]
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64 {
        raw + delta.abs().powf(self.p) - prev_delta.abs().powf(self.p)
    }

    #[inline]
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool {
        self.transform_out(raw) <= external
    }

    #[inline]
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        let sum: f64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| (x.as_f64() - y.as_f64()).abs().powf(self.p))
            .sum();
        sum.powf(self.inv_p)
    }

    #[inline]
    fn transform_out(&self, raw: f64) -> f64 {
        raw.powf(self.inv_p)
    }
}

/// The closed set of partial distances supported by the k-d trees.
///
/// This is what [`Metric`]-based searcher constructors use. Callers who know their metric at
/// compile time can pass one of the concrete strategies instead.
#[derive(Debug, Clone, Copy)]
pub enum MinkowskiPartial {
    SquaredEuclidean(PartialSquaredEuclidean),
    Euclidean(PartialEuclidean),
    Manhattan(PartialManhattan),
    LpNorm(PartialLpNorm),
}

impl MinkowskiPartial {
    /// Select the partial distance for a metric, or `None` if the metric is not supported.
    pub fn for_metric(metric: Metric) -> Option<Self> {
        match metric {
            Metric::SquaredEuclidean => Some(Self::SquaredEuclidean(PartialSquaredEuclidean)),
            Metric::Euclidean => Some(Self::Euclidean(PartialEuclidean)),
            Metric::Manhattan => Some(Self::Manhattan(PartialManhattan)),
            Metric::LpNorm(p) if p == 1.0 => Some(Self::Manhattan(PartialManhattan)),
            Metric::LpNorm(p) if p == 2.0 => Some(Self::Euclidean(PartialEuclidean)),
            Metric::LpNorm(p) if p.is_finite() && p > 0.0 => {
                Some(Self::LpNorm(PartialLpNorm::new(p)))
            }
            Metric::LpNorm(_) | Metric::Maximum | Metric::Cosine => None,
        }
    }
}

impl PartialDistance for MinkowskiPartial {
    #[inline]
    fn combine_raw(&self, raw: f64, delta: f64, prev_delta: f64) -> f64 {
        match self {
            Self::SquaredEuclidean(d) => d.combine_raw(raw, delta, prev_delta),
            Self::Euclidean(d) => d.combine_raw(raw, delta, prev_delta),
            Self::Manhattan(d) => d.combine_raw(raw, delta, prev_delta),
            Self::LpNorm(d) => d.combine_raw(raw, delta, prev_delta),
        }
    }

    #[inline]
    fn compare_raw_regular(&self, raw: f64, external: f64) -> bool {
        match self {
            Self::SquaredEuclidean(d) => d.compare_raw_regular(raw, external),
            Self::Euclidean(d) => d.compare_raw_regular(raw, external),
            Self::Manhattan(d) => d.compare_raw_regular(raw, external),
            Self::LpNorm(d) => d.compare_raw_regular(raw, external),
        }
    }

    #[inline]
    fn distance<N: Coordinate>(&self, a: &[N], b: &[N]) -> f64 {
        match self {
            Self::SquaredEuclidean(d) => d.distance(a, b),
            Self::Euclidean(d) => d.distance(a, b),
            Self::Manhattan(d) => d.distance(a, b),
            Self::LpNorm(d) => d.distance(a, b),
        }
    }

    #[inline]
    fn transform_out(&self, raw: f64) -> f64 {
        match self {
            Self::SquaredEuclidean(d) => d.transform_out(raw),
            Self::Euclidean(d) => d.transform_out(raw),
            Self::Manhattan(d) => d.transform_out(raw),
            Self::LpNorm(d) => d.transform_out(raw),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn metric_distances() {
        let a = [0.0f64, 0.0];
        let b = [3.0f64, 4.0];
        assert_relative_eq!(Metric::Euclidean.distance(&a, &b), 5.0);
        assert_relative_eq!(Metric::SquaredEuclidean.distance(&a, &b), 25.0);
        assert_relative_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
        assert_relative_eq!(Metric::Maximum.distance(&a, &b), 4.0);
        assert_relative_eq!(Metric::LpNorm(3.0).distance(&a, &b), 91f64.powf(1.0 / 3.0));
        assert_relative_eq!(Metric::Cosine.distance(&b, &[6.0, 8.0]), 0.0, epsilon = 1e-12);
        assert_relative_eq!(Metric::Cosine.distance(&a, &b), 1.0);
    }

    #[test]
    fn unsupported_metrics() {
        assert!(Metric::Euclidean.is_supported());
        assert!(Metric::LpNorm(0.5).is_supported());
        assert!(!Metric::Maximum.is_supported());
        assert!(!Metric::Cosine.is_supported());
        assert!(!Metric::LpNorm(f64::INFINITY).is_supported());
        assert!(!Metric::LpNorm(0.0).is_supported());
        assert!(!Metric::LpNorm(-2.0).is_supported());
    }

    #[test]
    fn lp_norm_special_cases() {
        assert!(matches!(
            MinkowskiPartial::for_metric(Metric::LpNorm(2.0)),
            Some(MinkowskiPartial::Euclidean(_))
        ));
        assert!(matches!(
            MinkowskiPartial::for_metric(Metric::LpNorm(1.0)),
            Some(MinkowskiPartial::Manhattan(_))
        ));
    }

    #[test]
    fn combine_raw_replaces_axis_contribution() {
        // Offsets of 3 on axis 0 and then 4 on axis 1, then axis 0 tightens to 1.
        let d = PartialEuclidean;
        let raw = d.combine_raw(0.0, 3.0, 0.0);
        let raw = d.combine_raw(raw, -4.0, 0.0);
        assert_relative_eq!(d.transform_out(raw), 5.0);
        let raw = d.combine_raw(raw, 1.0, 3.0);
        assert_relative_eq!(raw, 17.0);

        let d = PartialManhattan;
        let raw = d.combine_raw(d.combine_raw(0.0, -3.0, 0.0), 4.0, 0.0);
        assert_relative_eq!(d.combine_raw(raw, 1.0, -3.0), 5.0);

        let d = PartialLpNorm::new(3.0);
        let raw = d.combine_raw(d.combine_raw(0.0, 1.0, 0.0), 2.0, 0.0);
        assert_relative_eq!(raw, 9.0);
        assert_relative_eq!(d.transform_out(raw), 9f64.powf(1.0 / 3.0));
    }

    #[test]
    fn compare_raw_regular_handles_infinity() {
        assert!(PartialEuclidean.compare_raw_regular(1e300, f64::INFINITY));
        assert!(PartialEuclidean.compare_raw_regular(4.0, 2.0));
        assert!(!PartialEuclidean.compare_raw_regular(4.01, 2.0));
        assert!(PartialSquaredEuclidean.compare_raw_regular(4.0, 4.0));
        assert!(PartialLpNorm::new(3.0).compare_raw_regular(f64::MAX, f64::INFINITY));
        assert!(!PartialManhattan.compare_raw_regular(3.0, 2.5));
    }

    #[test]
    fn compare_raw_regular_accepts_exact_distances() {
        // A bound equal to the distance of a point must never prune that point
        let d = PartialEuclidean;
        for raw in [2.0, 3.0, 5.0, 6.0, 7.0] {
            assert!(d.compare_raw_regular(raw, raw.sqrt()));
        }
        assert!(d.compare_raw_regular(3.0, d.distance(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])));

        let d = PartialLpNorm::new(3.0);
        for raw in [2.0, 3.0, 10.0, 17.0] {
            assert!(d.compare_raw_regular(raw, d.transform_out(raw)));
        }
        assert!(d.compare_raw_regular(3.0, d.distance(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])));
        assert!(!d.compare_raw_regular(3.5, d.distance(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0])));
    }
}
