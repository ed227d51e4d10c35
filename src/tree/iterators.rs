//! Lazy iterators over the tree's keys.
//!
//! Both iterators borrow the tree immutably, so a traversal can be
//! restarted at any time by asking the tree for a fresh one. The walks
//! are iterative, over an explicit stack or queue: no recursion, so deep
//! trees cannot overflow the call stack.

use std::collections::VecDeque;

use generational_arena::Index;

use super::RbTree;

/// In-order iterator: yields the keys in sorted (non-decreasing) order.
///
/// The stack holds the nodes whose left subtree has been exhausted but
/// whose own key has not been yielded yet.
pub struct InOrderIter<'a, K> {
    tree: &'a RbTree<K>,
    stack: Vec<Index>,
}

impl<'a, K: Ord> InOrderIter<'a, K> {
    pub(super) fn new(tree: &'a RbTree<K>) -> Self {
        let mut iter = InOrderIter {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut x: Index) {
        while !self.tree.is_nil(x) {
            self.stack.push(x);
            x = self.tree.left(x);
        }
    }
}

impl<'a, K: Ord> Iterator for InOrderIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.push_left_spine(self.tree.right(x));
        Some(self.tree.key(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.tree.len()))
    }
}

/// Breadth-first iterator: yields the keys level by level, left to right
/// within a level.
pub struct LevelOrderIter<'a, K> {
    tree: &'a RbTree<K>,
    queue: VecDeque<Index>,
}

impl<'a, K: Ord> LevelOrderIter<'a, K> {
    pub(super) fn new(tree: &'a RbTree<K>) -> Self {
        let mut queue = VecDeque::new();
        if !tree.is_nil(tree.root) {
            queue.push_back(tree.root);
        }
        LevelOrderIter { tree, queue }
    }
}

impl<'a, K: Ord> Iterator for LevelOrderIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.queue.pop_front()?;
        for child in [self.tree.left(x), self.tree.right(x)] {
            if !self.tree.is_nil(child) {
                self.queue.push_back(child);
            }
        }
        Some(self.tree.key(x))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.tree.len()))
    }
}
