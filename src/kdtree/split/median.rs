use crate::accessor::PointAccessor;
use crate::kdtree::split::util::widest_dimension;
use crate::kdtree::split::{Split, SplitParams, SplitStrategy};
use crate::r#type::Coordinate;
use crate::select::select;

/// Split at the median of the dimension with the largest spread.
///
/// This yields a balanced tree, at the cost of a selection pass per node.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianSplit;

impl SplitStrategy for MedianSplit {
    fn find_split<N: Coordinate, P: PointAccessor<N> + ?Sized>(
        points: &P,
        params: &SplitParams,
        ids: &mut [u32],
    ) -> Option<Split> {
        let SplitParams { left, right, dims } = *params;
        if right - left < 2 {
            return None;
        }
        let range = &mut ids[left..right];
        let (dim, _, _) = widest_dimension(points, range, dims)?;

        let mut values: Vec<f64> = range.iter().map(|id| points.coord(*id, dim)).collect();
        let k = range.len() >> 1;
        let last = range.len() - 1;
        select(&mut values, range, k, 0, last);

        Some(Split {
            dim,
            threshold: values[k],
            pos: left + k,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_at_median() {
        let points = vec![[0., 9.], [0., 1.], [0., 5.], [0., 3.], [0., 7.]];
        let mut ids: Vec<u32> = (0..5).collect();
        let params = SplitParams {
            left: 0,
            right: 5,
            dims: 2,
        };
        let split = MedianSplit::find_split(&points, &params, &mut ids).unwrap();
        assert_eq!(split.dim, 1);
        assert_eq!(split.threshold, 5.);
        assert_eq!(split.pos, 2);
        assert!(ids[..2].iter().all(|id| points[*id as usize][1] <= 5.));
        assert!(ids[2..].iter().all(|id| points[*id as usize][1] >= 5.));
    }

    #[test]
    fn declines_on_duplicates() {
        let points = vec![[1., 1.]; 4];
        let mut ids: Vec<u32> = (0..4).collect();
        let params = SplitParams {
            left: 0,
            right: 4,
            dims: 2,
        };
        assert!(MedianSplit::find_split(&points, &params, &mut ids).is_none());
    }
}
