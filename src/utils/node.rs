use alloc::vec::Vec;

use crate::HeapError;

/// Handle to a node cell stored in a [`NodeArena`].
///
/// Handles are plain indices. A handle stays valid until the node is
/// released, after which its slot may be reused by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the slot index of this node inside its arena
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A tree cell holding a value and its structural links.
#[derive(Debug, Clone)]
struct Node<T> {
    /// The stored value, moved between cells only by value swaps
    value: T,

    /// Back-link to the parent cell (None for a root or a detached node)
    parent: Option<NodeId>,

    /// Left child, owned by this node
    left: Option<NodeId>,

    /// Right child, owned by this node
    right: Option<NodeId>,

    /// Number of nodes in the subtree rooted here, including this one
    size: usize,
}

/// Growable storage for linked binary-tree nodes.
///
/// Nodes refer to each other through [`NodeId`] indices instead of
/// pointers: children are owned by their parent in the tree sense, parent
/// links are non-owning back-references. Released cells go on a free list
/// and are reused by later allocations.
///
/// Insertion descends into the child with the smaller-or-equal subtree
/// size, so a tree grown only through [`NodeArena::insert`] keeps every
/// leaf within one level of every other leaf without any rotations.
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    /// Node cells, `None` marks a released slot
    slots: Vec<Option<Node<T>>>,

    /// Stack of released slot indices available for reuse
    free_list: Vec<usize>,

    /// Number of live nodes
    len: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    /// Creates an empty arena
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes
    ///
    /// # Arguments
    ///
    /// * `capacity` - The number of nodes to pre-allocate space for
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live nodes, linked or detached
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live node
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node and invalidates all handles
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Allocates a detached node holding `value`
    ///
    /// # Arguments
    ///
    /// * `value` - The value stored in the new node
    ///
    /// # Returns
    ///
    /// * `NodeId` - Handle to a singleton node (size 1, no links)
    pub fn alloc(&mut self, value: T) -> NodeId {
        let node = Node {
            value,
            parent: None,
            left: None,
            right: None,
            size: 1,
        };
        self.len += 1;

        match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Frees a detached node and hands its value back.
    ///
    /// # Arguments
    ///
    /// * `id` - The node to release
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The node's value, or `None` if the handle is stale or
    ///   the node is still linked to a parent or a child
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        let node = self.get(id)?;
        if node.parent.is_some() || node.left.is_some() || node.right.is_some() {
            return None;
        }

        let node = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    #[inline]
    fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn node_at(&self, id: NodeId) -> &Node<T> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {}", id.0),
        }
    }

    #[inline]
    fn node_at_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node id {}", id.0),
        }
    }

    /// Returns the value held by a node, `None` for a stale handle
    #[inline]
    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(|node| &node.value)
    }

    /// Returns the parent of a node
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Returns the left child of a node
    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.left)
    }

    /// Returns the right child of a node
    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.right)
    }

    /// Returns the size of the subtree rooted at a node, 0 for a stale handle
    #[inline]
    pub fn size(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |node| node.size)
    }

    /// Attaches `child` as a descendant of `at`.
    ///
    /// Every node on the way down gains one in size. The child lands in the
    /// first free slot of the current node (left before right); when both
    /// are taken the descent continues into the child whose subtree is
    /// smaller, preferring the left one on ties. The result fills the tree
    /// level by level.
    ///
    /// `child` must be a detached singleton, e.g. fresh from [`NodeArena::alloc`].
    ///
    /// # Arguments
    ///
    /// * `at` - Root of the subtree receiving the node
    /// * `child` - The node to attach
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn insert(&mut self, at: NodeId, child: NodeId) {
        debug_assert!(self.node_at(child).parent.is_none());
        debug_assert_eq!(self.node_at(child).size, 1);

        let mut current = at;
        loop {
            let node = self.node_at_mut(current);
            node.size += 1;
            match (node.left, node.right) {
                (None, _) => {
                    node.left = Some(child);
                    break;
                }
                (Some(_), None) => {
                    node.right = Some(child);
                    break;
                }
                (Some(left), Some(right)) => {
                    current = if self.node_at(left).size <= self.node_at(right).size {
                        left
                    } else {
                        right
                    };
                }
            }
        }
        self.node_at_mut(child).parent = Some(current);
    }

    /// Structurally removes a leaf from its tree.
    ///
    /// Every ancestor loses one in size, the leaf is unlinked from its
    /// parent's matching side and its own parent link is cleared. The node
    /// itself stays allocated; see [`NodeArena::release`].
    ///
    /// # Arguments
    ///
    /// * `id` - The leaf to remove
    ///
    /// # Returns
    ///
    /// * `Err(HeapError::NonLeafRemoval)` - The node has a child
    /// * `Err(HeapError::RootRemoval)` - The node has no parent
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: NodeId) -> Result<(), HeapError> {
        let node = self.node_at(id);
        if node.left.is_some() || node.right.is_some() {
            return Err(HeapError::NonLeafRemoval);
        }
        let Some(parent) = node.parent else {
            return Err(HeapError::RootRemoval);
        };

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            let node = self.node_at_mut(current);
            node.size -= 1;
            ancestor = node.parent;
        }

        let parent_node = self.node_at_mut(parent);
        if parent_node.left == Some(id) {
            parent_node.left = None;
        } else {
            parent_node.right = None;
        }
        self.node_at_mut(id).parent = None;

        Ok(())
    }

    /// Returns `true` if `target` is `at` or one of its descendants.
    ///
    /// Membership is by identity, not by value. The check climbs the
    /// parent chain from `target`, so it costs the depth of `target`.
    pub fn contains(&self, at: NodeId, target: NodeId) -> bool {
        if self.get(at).is_none() {
            return false;
        }

        let mut current = Some(target);
        while let Some(id) = current {
            if id == at {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Exchanges the values of two nodes, leaving every link and size intact.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn swap_values(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }

        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head.get_mut(lo), tail.first_mut()) {
            (Some(Some(x)), Some(Some(y))) => core::mem::swap(&mut x.value, &mut y.value),
            _ => panic!("stale node id in value swap ({lo}, {hi})"),
        }
    }
}
