use num_traits::ToPrimitive;

/// Returns the median from a sorted slice
///
/// # Arguments
///
/// * `ss` - The sorted slice
///
/// # Returns
///
/// * `Option<f64>` - The median, or `None` if the slice is empty or holds a
///   value that has no `f64` representation
#[inline]
pub fn median_from_sorted_slice<T: ToPrimitive>(ss: &[T]) -> Option<f64> {
    let len = ss.len();
    if len == 0 {
        return None;
    }

    let mid = len / 2;
    if len % 2 == 0 {
        Some((ss[mid - 1].to_f64()? + ss[mid].to_f64()?) / 2.0)
    } else {
        ss[mid].to_f64()
    }
}
