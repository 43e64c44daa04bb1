use crate::accessor::PointAccessor;
use crate::kdtree::split::util::{extreme_position, partition, widest_dimension};
use crate::kdtree::split::{Split, SplitParams, SplitStrategy};
use crate::r#type::Coordinate;

/// Midpoint split that never leaves one side empty.
///
/// The widest dimension is split at the middle of its extent. Should all points end up on one
/// side, the threshold slides to the extreme value on that side and that single point is moved
/// across. This only declines when all points coincide.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedMidpointSplit;

impl SplitStrategy for BoundedMidpointSplit {
    fn find_split<N: Coordinate, P: PointAccessor<N> + ?Sized>(
        points: &P,
        params: &SplitParams,
        ids: &mut [u32],
    ) -> Option<Split> {
        let SplitParams { left, right, dims } = *params;
        let range = &mut ids[left..right];
        let (dim, min, max) = widest_dimension(points, range, dims)?;
        let mut threshold = (min + max) / 2.0;
        let mut k = partition(points, range, dim, threshold);

        if k == 0 {
            let i = extreme_position(points, range, dim, true);
            range.swap(0, i);
            threshold = min;
            k = 1;
        } else if k == range.len() {
            let i = extreme_position(points, range, dim, false);
            range.swap(range.len() - 1, i);
            threshold = max;
            k = range.len() - 1;
        }

        Some(Split {
            dim,
            threshold,
            pos: left + k,
        })
    }
}
