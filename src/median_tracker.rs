use num_traits::ToPrimitive;

use core::cmp::Ordering;

use crate::{Heap, HeapKind};

/// A running median over an unbounded stream, backed by two linked heaps.
///
/// The lower half of the values lives in a max-heap and the upper half in a
/// min-heap. Every insertion keeps two properties:
///
/// - every value in the lower half is `<=` every value in the upper half
/// - the halves differ in size by at most one
///
/// so the median is always read off the heap roots in O(1), while an
/// insertion costs O(log n).
///
/// # Type Parameters
///
/// * `T` - The stream's value type; `median` additionally needs `ToPrimitive`
///
/// # Examples
///
/// ```
/// use running_median::MedianTracker;
///
/// let mut tracker = MedianTracker::new();
/// let mut medians = vec![];
/// for v in [4, 8, 12, 3, 1] {
///     tracker.insert(v);
///     medians.extend(tracker.median());
/// }
/// assert_eq!(medians, vec![4.0, 6.0, 8.0, 6.0, 4.0]);
/// ```
#[derive(Debug, Clone)]
pub struct MedianTracker<T> {
    /// Max heap for the lower half of values
    lower: Heap<T>,
    /// Min heap for the upper half of values
    upper: Heap<T>,
}

impl<T: PartialOrd> Default for MedianTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialOrd> MedianTracker<T> {
    /// Creates an empty tracker
    pub const fn new() -> Self {
        Self {
            lower: Heap::new_max(),
            upper: Heap::new_min(),
        }
    }

    /// Creates an empty tracker with room for `capacity` values
    ///
    /// # Arguments
    ///
    /// * `capacity` - The expected number of values in the stream
    pub fn with_capacity(capacity: usize) -> Self {
        let half = capacity.div_ceil(2);
        Self {
            lower: Heap::with_capacity(HeapKind::Max, half),
            upper: Heap::with_capacity(HeapKind::Min, half),
        }
    }

    /// Returns the number of values seen
    #[inline]
    pub fn len(&self) -> usize {
        self.lower.len() + self.upper.len()
    }

    /// Returns `true` if no value has been inserted
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty() && self.upper.is_empty()
    }

    /// Returns the max-heap holding the lower half
    #[inline]
    pub const fn lower(&self) -> &Heap<T> {
        &self.lower
    }

    /// Returns the min-heap holding the upper half
    #[inline]
    pub const fn upper(&self) -> &Heap<T> {
        &self.upper
    }

    /// Clears all values.
    pub fn reset(&mut self) {
        self.lower.clear();
        self.upper.clear();
    }

    /// Adds a value to the stream.
    ///
    /// The value goes to the half it belongs to. When that half is already
    /// the larger one, its root crosses over to the other half first.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    pub fn insert(&mut self, value: T) {
        if self.lower.is_empty() {
            self.lower.insert(value);
            return;
        }

        if self.upper.is_empty() {
            if self.lower.peek().is_some_and(|top| value < *top) {
                self.rebuild_singletons(value);
            } else {
                self.upper.insert(value);
            }
            return;
        }

        match self.lower.len().cmp(&self.upper.len()) {
            Ordering::Equal => {
                if self.upper.peek().is_some_and(|top| value <= *top) {
                    self.lower.insert(value);
                } else {
                    self.upper.insert(value);
                }
            }
            Ordering::Less => {
                if self.upper.peek().is_some_and(|top| value <= *top) {
                    self.lower.insert(value);
                } else {
                    self.move_upper_root_to_lower();
                    self.upper.insert(value);
                }
            }
            Ordering::Greater => {
                if self.lower.peek().is_some_and(|top| value >= *top) {
                    self.upper.insert(value);
                } else {
                    self.move_lower_root_to_upper();
                    self.lower.insert(value);
                }
            }
        }
    }

    /// Makes `value` the only lower value and the previous lower root the only upper value
    fn rebuild_singletons(&mut self, value: T) {
        tracing::trace!("new value below the only lower value, rebuilding both halves");
        let previous = self.lower.pop();
        self.lower.clear();
        self.upper.clear();

        self.lower.insert(value);
        if let Some(previous) = previous {
            self.upper.insert(previous);
        }
    }

    #[inline]
    fn move_upper_root_to_lower(&mut self) {
        if let Some(moved) = self.upper.pop() {
            tracing::trace!(
                lower = self.lower.len(),
                upper = self.upper.len(),
                "moving upper root into the lower half"
            );
            self.lower.insert(moved);
        }
    }

    #[inline]
    fn move_lower_root_to_upper(&mut self) {
        if let Some(moved) = self.lower.pop() {
            tracing::trace!(
                lower = self.lower.len(),
                upper = self.upper.len(),
                "moving lower root into the upper half"
            );
            self.upper.insert(moved);
        }
    }
}

impl<T: PartialOrd + ToPrimitive> MedianTracker<T> {
    /// Calculates the current median of the values.
    ///
    /// # Returns
    ///
    /// * `Some(median)` - The root of the larger half, or the mean of both
    ///   roots when the halves are the same size
    /// * `None` - If there are no values, or a root has no `f64` representation
    pub fn median(&self) -> Option<f64> {
        match self.lower.len().cmp(&self.upper.len()) {
            Ordering::Equal => {
                let lower = self.lower.peek()?.to_f64()?;
                let upper = self.upper.peek()?.to_f64()?;
                Some((lower + upper) / 2.0)
            }
            Ordering::Greater => self.lower.peek()?.to_f64(),
            Ordering::Less => self.upper.peek()?.to_f64(),
        }
    }
}

impl<T: PartialOrd> Extend<T> for MedianTracker<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| self.insert(value));
    }
}

impl<T: PartialOrd> FromIterator<T> for MedianTracker<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tracker = Self::new();
        tracker.extend(iter);
        tracker
    }
}

/// Streams `values` through a [`MedianTracker`] and returns the final median
///
/// # Examples
///
/// ```
/// use running_median::median_of;
///
/// assert_eq!(median_of([1.0, 3.0, 2.0, 4.0]), Some(2.5));
/// assert_eq!(median_of(Vec::<i64>::new()), None);
/// ```
pub fn median_of<T, I>(values: I) -> Option<f64>
where
    T: PartialOrd + ToPrimitive,
    I: IntoIterator<Item = T>,
{
    values.into_iter().collect::<MedianTracker<T>>().median()
}
