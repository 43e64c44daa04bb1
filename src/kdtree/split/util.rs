use crate::accessor::PointAccessor;
use crate::r#type::Coordinate;

/// The axis with the largest spread over `ids`, with its minimum and maximum value.
///
/// Returns `None` if the points coincide in every dimension.
pub(crate) fn widest_dimension<N: Coordinate, P: PointAccessor<N> + ?Sized>(
    points: &P,
    ids: &[u32],
    dims: usize,
) -> Option<(usize, f64, f64)> {
    let mut min = vec![f64::INFINITY; dims];
    let mut max = vec![f64::NEG_INFINITY; dims];
    for id in ids {
        let point = points.point(*id);
        for axis in 0..dims {
            let v = point[axis].as_f64();
            if v < min[axis] {
                min[axis] = v;
            }
            if v > max[axis] {
                max[axis] = v;
            }
        }
    }

    let mut best: Option<(usize, f64, f64)> = None;
    let mut best_extent = 0.0;
    for axis in 0..dims {
        let extent = max[axis] - min[axis];
        if extent > best_extent {
            best_extent = extent;
            best = Some((axis, min[axis], max[axis]));
        }
    }
    best
}

/// Move all ids with `coord[dim] < threshold` to the front of `ids`, returning their count.
pub(crate) fn partition<N: Coordinate, P: PointAccessor<N> + ?Sized>(
    points: &P,
    ids: &mut [u32],
    dim: usize,
    threshold: f64,
) -> usize {
    if ids.is_empty() {
        return 0;
    }
    let mut i = 0;
    let mut j = ids.len() - 1;
    loop {
        while i <= j && points.coord(ids[i], dim) < threshold {
            i += 1;
        }
        while j > i && points.coord(ids[j], dim) >= threshold {
            j -= 1;
        }
        if i >= j {
            return i;
        }
        ids.swap(i, j);
        i += 1;
        j -= 1;
    }
}

/// Position of the id with the smallest (`smallest = true`) or largest coordinate on `dim`.
pub(crate) fn extreme_position<N: Coordinate, P: PointAccessor<N> + ?Sized>(
    points: &P,
    ids: &[u32],
    dim: usize,
    smallest: bool,
) -> usize {
    let mut best = 0;
    let mut best_value = points.coord(ids[0], dim);
    for (i, id) in ids.iter().enumerate().skip(1) {
        let v = points.coord(*id, dim);
        if (smallest && v < best_value) || (!smallest && v > best_value) {
            best = i;
            best_value = v;
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partitions_around_threshold() {
        let points = vec![[5.], [1.], [4.], [2.], [3.], [3.]];
        let mut ids: Vec<u32> = (0..6).collect();
        let pos = partition(&points, &mut ids, 0, 3.0);
        assert_eq!(pos, 2);
        assert!(ids[..pos].iter().all(|id| points[*id as usize][0] < 3.0));
        assert!(ids[pos..].iter().all(|id| points[*id as usize][0] >= 3.0));
    }

    #[test]
    fn partition_all_on_one_side() {
        let points = vec![[1.], [2.]];
        let mut ids = vec![0, 1];
        assert_eq!(partition(&points, &mut ids, 0, 0.0), 0);
        assert_eq!(partition(&points, &mut ids, 0, 10.0), 2);
    }

    #[test]
    fn widest() {
        let points = vec![[0., 0.], [1., 10.], [2., 5.]];
        let ids = [0, 1, 2];
        assert_eq!(widest_dimension(&points, &ids, 2), Some((1, 0., 10.)));
        let same = vec![[1., 1.], [1., 1.]];
        assert_eq!(widest_dimension(&same, &[0, 1], 2), None);
    }
}
