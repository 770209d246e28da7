extern crate alloc;

use std::cmp::Ordering;

use alloc::vec::Vec;

use thiserror::Error;

mod iter;
mod render;

pub use iter::{BloodwoodPostorderIterator, BloodwoodPreorderIterator, BloodwoodSortedIterator};

/*
deletion is not implemented. when it is, freed cells should go into a linked free list
threaded through the parent field: head stored on the Bloodwood structure, allocation
pops the head, freeing pushes the cell. until then the arena only ever grows.
*/

/// Arena slot of the shared black sentinel. Every absent child and the parent
/// of the root point here.
pub(crate) const BLACK_NIL: NodeIndex = NodeIndex(0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// The root of a red-black tree is always black; a caller-supplied red
    /// root cannot bootstrap a valid tree.
    #[error("a red node cannot be the root of a red-black tree")]
    RedRoot,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Position of a node inside the tree's arena storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeIndex(pub(crate) usize);

#[derive(Debug)]
pub struct BloodwoodNode<K> {
    pub(crate) key: K,
    color: NodeColor,
    parent: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
    height: usize,
}

impl<K> BloodwoodNode<K> {
    /// Creates a detached node with sentinel children and no parent.
    pub fn new(key: K, color: NodeColor) -> Self {
        Self {
            key,
            color,
            parent: BLACK_NIL,
            left: BLACK_NIL,
            right: BLACK_NIL,
            height: 1,
        }
    }

    fn new_isolated(key: K) -> Self {
        Self::new(key, NodeColor::default())
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn color(&self) -> NodeColor {
        self.color
    }

    /// Cached subtree height: 1 for a leaf, 0 for the sentinel.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn toggle_color(&mut self) {
        self.color = match self.color {
            NodeColor::Red => NodeColor::Black,
            NodeColor::Black => NodeColor::Red,
        };
    }

    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }

    fn is_red(&self) -> bool {
        self.color == NodeColor::Red
    }
}

impl<K: Default> BloodwoodNode<K> {
    fn sentinel() -> Self {
        Self {
            key: K::default(),
            color: NodeColor::Black,
            parent: BLACK_NIL,
            left: BLACK_NIL,
            right: BLACK_NIL,
            height: 0,
        }
    }
}

/// A red-black tree over arena storage.
///
/// Child links own their subtree conceptually, the parent link is a plain
/// back-index; slot 0 holds the shared black sentinel so that fixup code can
/// read the color of an absent uncle or parent without branching.
#[derive(Debug)]
pub struct Bloodwood<K: PartialEq + Ord> {
    storage: Vec<BloodwoodNode<K>>,
    root: NodeIndex,
    length: usize,
}

impl<K: PartialEq + Ord> Bloodwood<K> {
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Height of the tree: 0 when empty, 1 for a lone root.
    pub fn height(&self) -> usize {
        self.storage[self.root.0].height
    }

    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    pub fn root(&self) -> Option<&BloodwoodNode<K>> {
        (self.root != BLACK_NIL).then(|| self.get_node_by_idx(self.root))
    }

    /// Looks up `key`, returning the matching node or [`None`] when the
    /// descent reaches the sentinel. Among duplicates, the topmost
    /// occurrence on the descent path is returned.
    pub fn find(&self, key: &K) -> Option<&BloodwoodNode<K>> {
        let idx = self.locate(key);

        (idx != BLACK_NIL).then(|| self.get_node_by_idx(idx))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.locate(key) != BLACK_NIL
    }

    fn locate(&self, key: &K) -> NodeIndex {
        let mut current_node = self.root;

        while current_node != BLACK_NIL {
            let curr_node_storage = &self.storage[current_node.0];

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => {
                    current_node = curr_node_storage.left;
                }
                Ordering::Equal => {
                    return current_node;
                }
                Ordering::Greater => {
                    current_node = curr_node_storage.right;
                }
            }
        }

        BLACK_NIL
    }

    /// Inserts `key`. Duplicates are allowed and accumulate in the right
    /// subtree of their equal keys.
    pub fn insert(&mut self, key: K) {
        let mut current_node = self.root;
        let mut parent_node = BLACK_NIL;

        while current_node != BLACK_NIL {
            parent_node = current_node;
            let curr_node_storage = &self.storage[current_node.0];

            if key < curr_node_storage.key {
                current_node = curr_node_storage.left;
            } else {
                current_node = curr_node_storage.right;
            }
        }

        let new_node_pos = NodeIndex(self.storage.len());

        if parent_node == BLACK_NIL {
            self.root = new_node_pos;
        } else if key < self.storage[parent_node.0].key {
            self.storage[parent_node.0].left = new_node_pos;
        } else {
            self.storage[parent_node.0].right = new_node_pos;
        }

        self.storage.push(BloodwoodNode::new_isolated(key));
        self.storage[new_node_pos.0].parent = parent_node;
        self.length += 1;

        self.fix_red_violation(new_node_pos);
        // idempotent, and covers the fixup having recolored up to the root
        self.storage[self.root.0].color = NodeColor::Black;
        self.refresh_heights_from(new_node_pos);
    }

    /// Restores the no-red-red invariant after `start_node_idx` was inserted
    /// red. At every loop entry the only possible violation is between the
    /// current node and its parent.
    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        while self.storage[self.parent_of(curr_node).0].is_red() {
            let parent_idx = self.parent_of(curr_node);
            // the parent is red, hence not the root, hence the grandparent
            // is a real node
            let grandparent_idx = self.grandparent_of(curr_node);
            let uncle_idx = self.uncle_of(curr_node);

            if self.storage[uncle_idx.0].is_red() {
                // red uncle: recolor and push the violation up two levels
                self.storage[parent_idx.0].color = NodeColor::Black;
                self.storage[uncle_idx.0].color = NodeColor::Black;
                self.storage[grandparent_idx.0].color = NodeColor::Red;

                curr_node = grandparent_idx;
                continue;
            }

            if self.storage[grandparent_idx.0].left == parent_idx {
                if self.storage[parent_idx.0].right == curr_node {
                    // inner child: rotate into the left-left shape first
                    curr_node = parent_idx;
                    self.rotate_left(curr_node);
                }

                let parent_idx = self.parent_of(curr_node);
                let grandparent_idx = self.grandparent_of(curr_node);
                self.storage[parent_idx.0].color = NodeColor::Black;
                self.storage[grandparent_idx.0].color = NodeColor::Red;
                self.rotate_right(grandparent_idx);
            } else {
                if self.storage[parent_idx.0].left == curr_node {
                    curr_node = parent_idx;
                    self.rotate_right(curr_node);
                }

                let parent_idx = self.parent_of(curr_node);
                let grandparent_idx = self.grandparent_of(curr_node);
                self.storage[parent_idx.0].color = NodeColor::Black;
                self.storage[grandparent_idx.0].color = NodeColor::Red;
                self.rotate_left(grandparent_idx);
            }
            // the rotation branch leaves the parent black, so the loop
            // condition fails and no violation propagates further
        }
    }

    pub(crate) fn parent_of(&self, idx: NodeIndex) -> NodeIndex {
        self.storage[idx.0].parent
    }

    pub(crate) fn grandparent_of(&self, idx: NodeIndex) -> NodeIndex {
        self.parent_of(self.parent_of(idx))
    }

    /// The grandparent's child that is not the parent; may be the sentinel.
    pub(crate) fn uncle_of(&self, idx: NodeIndex) -> NodeIndex {
        let parent_idx = self.parent_of(idx);
        let grandparent = &self.storage[self.parent_of(parent_idx).0];

        if grandparent.left == parent_idx {
            grandparent.right
        } else {
            grandparent.left
        }
    }

    fn rotate_left(&mut self, center: NodeIndex) {
        let pivot = self.storage[center.0].right;
        debug_assert_ne!(pivot, BLACK_NIL);

        let inner = self.storage[pivot.0].left;
        self.storage[center.0].right = inner;
        if inner != BLACK_NIL {
            self.storage[inner.0].parent = center;
        }

        let old_parent = self.storage[center.0].parent;
        self.storage[pivot.0].parent = old_parent;

        if old_parent == BLACK_NIL {
            self.root = pivot;
        } else if self.storage[old_parent.0].left == center {
            self.storage[old_parent.0].left = pivot;
        } else {
            self.storage[old_parent.0].right = pivot;
        }

        self.storage[pivot.0].left = center;
        self.storage[center.0].parent = pivot;

        // a subtree moved out from under the center node
        self.refresh_height(center);
        self.refresh_height(pivot);
    }

    fn rotate_right(&mut self, center: NodeIndex) {
        let pivot = self.storage[center.0].left;
        debug_assert_ne!(pivot, BLACK_NIL);

        let inner = self.storage[pivot.0].right;
        self.storage[center.0].left = inner;
        if inner != BLACK_NIL {
            self.storage[inner.0].parent = center;
        }

        let old_parent = self.storage[center.0].parent;
        self.storage[pivot.0].parent = old_parent;

        if old_parent == BLACK_NIL {
            self.root = pivot;
        } else if self.storage[old_parent.0].left == center {
            self.storage[old_parent.0].left = pivot;
        } else {
            self.storage[old_parent.0].right = pivot;
        }

        self.storage[pivot.0].right = center;
        self.storage[center.0].parent = pivot;

        self.refresh_height(center);
        self.refresh_height(pivot);
    }

    fn refresh_height(&mut self, idx: NodeIndex) {
        if idx == BLACK_NIL {
            return;
        }

        let left_height = self.storage[self.storage[idx.0].left.0].height;
        let right_height = self.storage[self.storage[idx.0].right.0].height;
        self.storage[idx.0].height = 1 + left_height.max(right_height);
    }

    fn refresh_heights_from(&mut self, start: NodeIndex) {
        let mut curr_node = start;

        while curr_node != BLACK_NIL {
            self.refresh_height(curr_node);
            curr_node = self.storage[curr_node.0].parent;
        }
    }

    /// AVL-style probe: sibling subtree heights differ by at most 1
    /// everywhere. Weaker than the black-height invariant, diagnostic only.
    pub fn is_balanced(&self) -> bool {
        self.subtree_balanced(self.root)
    }

    fn subtree_balanced(&self, idx: NodeIndex) -> bool {
        if idx == BLACK_NIL {
            return true;
        }

        let node = &self.storage[idx.0];
        let left_height = self.storage[node.left.0].height;
        let right_height = self.storage[node.right.0].height;

        left_height.abs_diff(right_height) <= 1
            && self.subtree_balanced(node.left)
            && self.subtree_balanced(node.right)
    }

    /// In-order traversal, yielding keys in non-decreasing order.
    pub fn iter(&self) -> BloodwoodSortedIterator<'_, K> {
        BloodwoodSortedIterator {
            tree: self,
            curr: self.root,
            stack: Vec::new(),
        }
    }

    pub fn preorder(&self) -> BloodwoodPreorderIterator<'_, K> {
        let stack = if self.root != BLACK_NIL {
            alloc::vec![self.root]
        } else {
            Vec::new()
        };

        BloodwoodPreorderIterator { tree: self, stack }
    }

    pub fn postorder(&self) -> BloodwoodPostorderIterator<'_, K> {
        let stack = if self.root != BLACK_NIL {
            alloc::vec![(self.root, false)]
        } else {
            Vec::new()
        };

        BloodwoodPostorderIterator { tree: self, stack }
    }

    pub(crate) fn get_node_by_idx(&self, idx: NodeIndex) -> &BloodwoodNode<K> {
        &self.storage[idx.0]
    }

    pub(crate) fn root_idx(&self) -> NodeIndex {
        self.root
    }
}

impl<K: Default + PartialEq + Ord> Bloodwood<K> {
    pub fn new() -> Self {
        Self {
            storage: alloc::vec![BloodwoodNode::sentinel()],
            root: BLACK_NIL,
            length: 0,
        }
    }

    /// Builds a tree around a caller-supplied root node.
    ///
    /// Fails with [`TreeError::RedRoot`] when the node is red, before any
    /// tree is created.
    pub fn with_root(root: BloodwoodNode<K>) -> Result<Self, TreeError> {
        if root.color != NodeColor::Black {
            return Err(TreeError::RedRoot);
        }

        let mut tree = Self::new();
        tree.storage.push(root);
        tree.root = NodeIndex(1);
        tree.length = 1;

        Ok(tree)
    }
}

impl<K: Default + PartialEq + Ord> Default for Bloodwood<K> {
    fn default() -> Self {
        Self::new()
    }
}
