use alloc::vec::Vec;

use crate::{BLACK_NIL, Bloodwood, NodeIndex};

/// In-order iterator, yielding keys in non-decreasing order.
pub struct BloodwoodSortedIterator<'a, K: PartialEq + Ord> {
    pub(crate) tree: &'a Bloodwood<K>,
    pub(crate) curr: NodeIndex,
    pub(crate) stack: Vec<NodeIndex>,
}

impl<'a, K: PartialEq + Ord> Iterator for BloodwoodSortedIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr != BLACK_NIL {
            self.stack.push(self.curr);
            self.curr = self.tree.get_node_by_idx(self.curr).left_child();
        }

        if let Some(node) = self.stack.pop() {
            self.curr = self.tree.get_node_by_idx(node).right_child();

            return Some(&self.tree.get_node_by_idx(node).key);
        }

        None
    }
}

/// Pre-order iterator: node before either subtree.
pub struct BloodwoodPreorderIterator<'a, K: PartialEq + Ord> {
    pub(crate) tree: &'a Bloodwood<K>,
    pub(crate) stack: Vec<NodeIndex>,
}

impl<'a, K: PartialEq + Ord> Iterator for BloodwoodPreorderIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node_idx = self.stack.pop()?;
        let node = self.tree.get_node_by_idx(node_idx);

        if node.right_child() != BLACK_NIL {
            self.stack.push(node.right_child());
        }
        if node.left_child() != BLACK_NIL {
            self.stack.push(node.left_child());
        }

        Some(&node.key)
    }
}

/// Post-order iterator: both subtrees before the node.
///
/// Stack entries carry an expansion flag; a node is yielded the second time
/// it is popped, after its children were pushed above it.
pub struct BloodwoodPostorderIterator<'a, K: PartialEq + Ord> {
    pub(crate) tree: &'a Bloodwood<K>,
    pub(crate) stack: Vec<(NodeIndex, bool)>,
}

impl<'a, K: PartialEq + Ord> Iterator for BloodwoodPostorderIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node_idx, expanded)) = self.stack.pop() {
            if expanded {
                return Some(&self.tree.get_node_by_idx(node_idx).key);
            }

            self.stack.push((node_idx, true));

            let node = self.tree.get_node_by_idx(node_idx);
            if node.right_child() != BLACK_NIL {
                self.stack.push((node.right_child(), false));
            }
            if node.left_child() != BLACK_NIL {
                self.stack.push((node.left_child(), false));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use crate::Bloodwood;

    fn sample_tree() -> Bloodwood<usize> {
        // shape: 35 at the root, 28/120 below, 19 under 28, 44 under 120
        let mut tree = Bloodwood::new();
        for key in [35, 28, 120, 44, 19] {
            tree.insert(key);
        }

        tree
    }

    #[test]
    pub fn inorder_is_sorted() {
        let tree = sample_tree();

        let keys: Vec<usize> = tree.iter().copied().collect();
        assert_eq!(keys, [19, 28, 35, 44, 120]);
    }

    #[test]
    pub fn preorder_visits_node_first() {
        let tree = sample_tree();

        let keys: Vec<usize> = tree.preorder().copied().collect();
        assert_eq!(keys, [35, 28, 19, 120, 44]);
    }

    #[test]
    pub fn postorder_visits_node_last() {
        let tree = sample_tree();

        let keys: Vec<usize> = tree.postorder().copied().collect();
        assert_eq!(keys, [19, 28, 44, 120, 35]);
    }

    #[test]
    pub fn empty_tree_traversals() {
        let tree = Bloodwood::<usize>::new();

        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.preorder().next(), None);
        assert_eq!(tree.postorder().next(), None);
    }
}
