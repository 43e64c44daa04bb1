use crate::accessor::PointAccessor;
use crate::r#type::Coordinate;

/// The half-open range of the permuted id array a split strategy is asked to divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitParams {
    /// First position of the range.
    pub left: usize,
    /// One past the last position of the range.
    pub right: usize,
    /// The dimensionality of the indexed points.
    pub dims: usize,
}

/// A split chosen by a [`SplitStrategy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    /// The axis the range is divided on.
    pub dim: usize,
    /// Points in `[left, pos)` have `coord[dim] <= threshold`, points in `[pos, right)` have
    /// `coord[dim] >= threshold`.
    pub threshold: f64,
    /// The first position of the right half.
    pub pos: usize,
}

/// A policy choosing how to divide a range of points into two subtrees.
///
/// Implementations reorder `ids[params.left..params.right]` in place so that the invariant
/// documented on [`Split`] holds, and must return a position strictly inside the range. Returning
/// `None` turns the whole range into a single leaf.
pub trait SplitStrategy {
    /// Choose a split for `ids[params.left..params.right]`, reordering that range in place.
    fn find_split<N: Coordinate, P: PointAccessor<N> + ?Sized>(
        points: &P,
        params: &SplitParams,
        ids: &mut [u32],
    ) -> Option<Split>;
}
