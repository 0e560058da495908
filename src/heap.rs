use alloc::{string::ToString, vec::Vec};

use core::{fmt, str::FromStr};

use crate::{
    HeapError,
    utils::{NodeArena, NodeId},
};

/// Ordering of a [`Heap`], fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapKind {
    /// Smallest value at the root
    Min,
    /// Largest value at the root
    Max,
}

impl HeapKind {
    /// Returns `true` if `a` belongs strictly above `b` under this ordering
    ///
    /// # Arguments
    ///
    /// * `a` - The candidate for the higher position
    /// * `b` - The value it is compared against
    #[inline]
    pub fn prefers<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            HeapKind::Min => a < b,
            HeapKind::Max => a > b,
        }
    }

    /// Returns the textual name of the kind, `"min"` or `"max"`
    pub const fn as_str(self) -> &'static str {
        match self {
            HeapKind::Min => "min",
            HeapKind::Max => "max",
        }
    }
}

impl fmt::Display for HeapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeapKind {
    type Err = HeapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(HeapKind::Min),
            "max" => Ok(HeapKind::Max),
            other => Err(HeapError::UnknownHeapKind(other.to_string())),
        }
    }
}

impl TryFrom<&str> for HeapKind {
    type Error = HeapError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A binary heap built from linked, size-balanced nodes.
///
/// Nodes live in a [`NodeArena`] and never move once placed: sifting
/// exchanges values between nodes instead of relinking them. New nodes are
/// placed by descending toward the lighter subtree, which keeps the tree as
/// shallow as an array-backed heap of the same size.
///
/// Alongside the tree the heap keeps `order`, every live node in the
/// sequence it was placed. Because placement only depends on subtree sizes,
/// the last entry is always a leaf, and it is exactly the node that has to
/// leave the tree on the next [`Heap::pop`].
///
/// # Examples
///
/// ```
/// use running_median::{Heap, HeapKind};
///
/// let mut heap = Heap::new(HeapKind::Min);
/// for v in [5, 3, 8, 1] {
///     heap.insert(v);
/// }
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.pop(), Some(3));
/// assert_eq!(heap.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Heap<T> {
    /// Min or Max ordering
    kind: HeapKind,
    /// Storage for every node of the tree
    nodes: NodeArena<T>,
    /// Top of the tree, `None` iff the heap is empty
    root: Option<NodeId>,
    /// Live nodes in placement order, the last one is popped next
    order: Vec<NodeId>,
}

impl<T: PartialOrd> Heap<T> {
    /// Creates an empty heap of the given kind
    pub const fn new(kind: HeapKind) -> Self {
        Self {
            kind,
            nodes: NodeArena::new(),
            root: None,
            order: Vec::new(),
        }
    }

    /// Creates an empty min-heap
    pub const fn new_min() -> Self {
        Self::new(HeapKind::Min)
    }

    /// Creates an empty max-heap
    pub const fn new_max() -> Self {
        Self::new(HeapKind::Max)
    }

    /// Creates an empty heap with room for `capacity` values
    ///
    /// # Arguments
    ///
    /// * `kind` - The ordering of the heap
    /// * `capacity` - The number of values to pre-allocate space for
    pub fn with_capacity(kind: HeapKind, capacity: usize) -> Self {
        Self {
            kind,
            nodes: NodeArena::with_capacity(capacity),
            root: None,
            order: Vec::with_capacity(capacity),
        }
    }

    /// Creates an empty heap from a textual kind.
    ///
    /// # Arguments
    ///
    /// * `name` - Either `"min"` or `"max"`
    ///
    /// # Returns
    ///
    /// * `Result<Self, HeapError>` - The heap, or `HeapError::UnknownHeapKind`
    ///   for any other name
    ///
    /// # Examples
    ///
    /// ```
    /// use running_median::{Heap, HeapError};
    ///
    /// assert!(Heap::<i32>::from_kind_name("max").is_ok());
    /// assert_eq!(
    ///     Heap::<i32>::from_kind_name("median").err(),
    ///     Some(HeapError::UnknownHeapKind("median".into()))
    /// );
    /// ```
    pub fn from_kind_name(name: &str) -> Result<Self, HeapError> {
        Ok(Self::new(name.parse()?))
    }

    /// Returns the ordering of the heap
    #[inline]
    pub const fn kind(&self) -> HeapKind {
        self.kind
    }

    /// Returns the number of values in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the heap holds no value
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the root node, `None` when empty
    #[inline]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the node storage, for walking the tree
    #[inline]
    pub const fn nodes(&self) -> &NodeArena<T> {
        &self.nodes
    }

    /// Returns the value at the root: the minimum of a min-heap, the maximum of a max-heap
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.root.and_then(|root| self.nodes.value(root))
    }

    /// Returns `true` if `id` is a node of this heap's tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.root.is_some_and(|root| self.nodes.contains(root, id))
    }

    /// Returns an iterator over the values in placement order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|&id| self.nodes.value(id))
    }

    /// Removes every value
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.root = None;
    }

    /// Inserts a value and restores heap order.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert
    ///
    /// # Returns
    ///
    /// * `NodeId` - The node placed in the tree. Sifting moves values, not
    ///   nodes, so the returned node does not necessarily hold `value`
    ///   afterwards.
    pub fn insert(&mut self, value: T) -> NodeId {
        let id = self.nodes.alloc(value);
        self.order.push(id);

        match self.root {
            None => self.root = Some(id),
            Some(root) => {
                self.nodes.insert(root, id);
                self.sift_up(id);
            }
        }

        debug_assert_eq!(self.root.map_or(0, |r| self.nodes.size(r)), self.order.len());
        id
    }

    /// Removes and returns the root value.
    ///
    /// The value of the last placed node is swapped into the root, that node
    /// leaves the tree and the new root value is sifted down.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The root value, or `None` if the heap is empty
    ///
    /// # Panics
    ///
    /// Panics if the last placed node is not a leaf, which means the tree
    /// shape was corrupted.
    pub fn pop(&mut self) -> Option<T> {
        let root = self.root?;
        let last = self.order.pop()?;

        if last == root {
            self.root = None;
            return self.nodes.release(last);
        }

        self.nodes.swap_values(root, last);
        if let Err(err) = self.nodes.remove(last) {
            panic!("heap shape corrupted while popping: {err}");
        }
        self.sift_down(root);

        debug_assert_eq!(self.nodes.size(root), self.order.len());
        self.nodes.release(last)
    }

    #[inline]
    fn prefers(&self, a: NodeId, b: NodeId) -> bool {
        match (self.nodes.value(a), self.nodes.value(b)) {
            (Some(a), Some(b)) => self.kind.prefers(a, b),
            _ => false,
        }
    }

    fn sift_up(&mut self, mut cursor: NodeId) {
        while let Some(parent) = self.nodes.parent(cursor) {
            if !self.prefers(cursor, parent) {
                break;
            }
            self.nodes.swap_values(cursor, parent);
            cursor = parent;
        }
    }

    // On a two-way violation the left child wins unless the right one is strictly better.
    fn sift_down(&mut self, mut cursor: NodeId) {
        loop {
            let left = self.nodes.left(cursor).filter(|&l| self.prefers(l, cursor));
            let right = self.nodes.right(cursor).filter(|&r| self.prefers(r, cursor));

            let next = match (left, right) {
                (Some(l), Some(r)) => {
                    if self.prefers(r, l) {
                        r
                    } else {
                        l
                    }
                }
                (Some(l), None) => l,
                (None, Some(r)) => r,
                (None, None) => break,
            };

            self.nodes.swap_values(cursor, next);
            cursor = next;
        }
    }
}

impl<T: PartialOrd> Extend<T> for Heap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
