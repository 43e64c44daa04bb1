//! Random access to the points being indexed.
//!
//! Index structures in this crate never own their points. They hold a reference to a
//! [`PointAccessor`] and only store a permutation of point ids.

use std::marker::PhantomData;

use crate::error::{KdIndexError, Result};
use crate::r#type::Coordinate;
use crate::stats::Statistics;

/// Random access from a point id to its coordinates.
///
/// Ids are dense: a collection of `num_items()` points is addressed by `0..num_items()`. The
/// accessor must return the same coordinates for the lifetime of any index built on it.
pub trait PointAccessor<N: Coordinate> {
    /// The number of coordinates of every point.
    fn dimensionality(&self) -> usize;

    /// The number of points in this collection.
    fn num_items(&self) -> usize;

    /// The coordinates of the point with the given id.
    fn point(&self, id: u32) -> &[N];

    /// Iterate over the ids of all points.
    fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.num_items()).map(|id| id as u32)
    }

    /// A single coordinate of the point with the given id, widened to `f64`.
    #[inline]
    fn coord(&self, id: u32, axis: usize) -> f64 {
        self.point(id)[axis].as_f64()
    }
}

/// Points stored as one interleaved coordinate buffer, `dims` values per point.
///
/// ```
/// use kd_index::FlatPoints;
/// use kd_index::PointAccessor;
///
/// let coords = [0., 0., 1., 0., 0., 1.];
/// let points = FlatPoints::try_new(&coords, 2).unwrap();
/// assert_eq!(points.num_items(), 3);
/// assert_eq!(points.point(1), &[1., 0.]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatPoints<'a, N: Coordinate> {
    coords: &'a [N],
    dims: usize,
}

impl<'a, N: Coordinate> FlatPoints<'a, N> {
    /// Wrap an interleaved coordinate buffer.
    pub fn try_new(coords: &'a [N], dims: usize) -> Result<Self> {
        if dims == 0 {
            return Err(KdIndexError::General(
                "Points must have at least one dimension.".to_string(),
            ));
        }
        if coords.len() % dims != 0 {
            return Err(KdIndexError::General(format!(
                "Coordinate buffer of length {} is not a multiple of {} dimensions.",
                coords.len(),
                dims
            )));
        }
        Ok(Self { coords, dims })
    }

    /// The underlying coordinate buffer.
    pub fn coords(&self) -> &'a [N] {
        self.coords
    }
}

impl<N: Coordinate> PointAccessor<N> for FlatPoints<'_, N> {
    #[inline]
    fn dimensionality(&self) -> usize {
        self.dims
    }

    #[inline]
    fn num_items(&self) -> usize {
        self.coords.len() / self.dims
    }

    #[inline]
    fn point(&self, id: u32) -> &[N] {
        let start = id as usize * self.dims;
        &self.coords[start..start + self.dims]
    }
}

impl<N: Coordinate, const D: usize> PointAccessor<N> for [[N; D]] {
    #[inline]
    fn dimensionality(&self) -> usize {
        D
    }

    #[inline]
    fn num_items(&self) -> usize {
        self.len()
    }

    #[inline]
    fn point(&self, id: u32) -> &[N] {
        &self[id as usize]
    }
}

impl<N: Coordinate, const D: usize> PointAccessor<N> for Vec<[N; D]> {
    #[inline]
    fn dimensionality(&self) -> usize {
        D
    }

    #[inline]
    fn num_items(&self) -> usize {
        self.len()
    }

    #[inline]
    fn point(&self, id: u32) -> &[N] {
        &self[id as usize]
    }
}

/// Accessor proxy that counts every point read.
pub(crate) struct CountingPoints<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> {
    inner: &'a P,
    stats: &'a Statistics,
    phantom: PhantomData<N>,
}

impl<'a, N: Coordinate, P: PointAccessor<N> + ?Sized> CountingPoints<'a, N, P> {
    pub(crate) fn new(inner: &'a P, stats: &'a Statistics) -> Self {
        Self {
            inner,
            stats,
            phantom: PhantomData,
        }
    }

    /// The wrapped accessor, for reads that should not be counted.
    pub(crate) fn inner(&self) -> &'a P {
        self.inner
    }
}

impl<N: Coordinate, P: PointAccessor<N> + ?Sized> PointAccessor<N> for CountingPoints<'_, N, P> {
    #[inline]
    fn dimensionality(&self) -> usize {
        self.inner.dimensionality()
    }

    #[inline]
    fn num_items(&self) -> usize {
        self.inner.num_items()
    }

    #[inline]
    fn point(&self, id: u32) -> &[N] {
        self.stats.count_object_access();
        self.inner.point(id)
    }
}
