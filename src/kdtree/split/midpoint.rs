use crate::accessor::PointAccessor;
use crate::kdtree::split::util::{partition, widest_dimension};
use crate::kdtree::split::{Split, SplitParams, SplitStrategy};
use crate::r#type::Coordinate;

/// Split the dimension with the largest spread at the middle of its extent.
///
/// Declines to split when all points fall on one side of the midpoint, which can only happen
/// through floating point rounding on extremely narrow ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidpointSplit;

impl SplitStrategy for MidpointSplit {
    fn find_split<N: Coordinate, P: PointAccessor<N> + ?Sized>(
        points: &P,
        params: &SplitParams,
        ids: &mut [u32],
    ) -> Option<Split> {
        let SplitParams { left, right, dims } = *params;
        let range = &mut ids[left..right];
        let (dim, min, max) = widest_dimension(points, range, dims)?;
        let threshold = (min + max) / 2.0;
        let k = partition(points, range, dim, threshold);
        if k == 0 || k == range.len() {
            return None;
        }
        Some(Split {
            dim,
            threshold,
            pos: left + k,
        })
    }
}
