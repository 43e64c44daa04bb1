use std::cmp;

/// Floyd-Rivest selection over parallel value and id arrays.
///
/// Reorders `values[left..=right]` (and `ids` alongside) so that the `k`-th item holds the
/// value it would have after a full sort, items in `[left, k)` are not greater than it, and
/// items in `(k, right]` are not smaller.
pub(crate) fn select(
    values: &mut [f64],
    ids: &mut [u32],
    k: usize,
    mut left: usize,
    mut right: usize,
) {
    debug_assert_eq!(values.len(), ids.len());
    debug_assert!(left <= k && k <= right);

    while right > left {
        if right - left > 600 {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = f64::ln(n);
            let s = 0.5 * f64::exp((2.0 * z) / 3.0);
            let sd = 0.5
                * f64::sqrt((z * s * (n - s)) / n)
                * (if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 });
            let new_left = cmp::max(left, f64::floor(k as f64 - (m * s) / n + sd) as usize);
            let new_right = cmp::min(
                right,
                f64::floor(k as f64 + ((n - m) * s) / n + sd) as usize,
            );
            select(values, ids, k, new_left, new_right);
        }

        let t = values[k];
        let mut i = left;
        let mut j = right;

        swap_item(values, ids, left, k);
        if values[right] > t {
            swap_item(values, ids, left, right);
        }

        while i < j {
            swap_item(values, ids, i, j);
            i += 1;
            j -= 1;
            while values[i] < t {
                i += 1;
            }
            while values[j] > t {
                j -= 1;
            }
        }

        if values[left] == t {
            swap_item(values, ids, left, j);
        } else {
            j += 1;
            swap_item(values, ids, j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            if j == 0 {
                break;
            }
            right = j - 1;
        }
    }
}

#[inline]
fn swap_item(values: &mut [f64], ids: &mut [u32], i: usize, j: usize) {
    values.swap(i, j);
    ids.swap(i, j);
}
