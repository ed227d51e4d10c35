//! This module implements the standard library traits for [`RbTree`].
//! It is a separate file from the main module file since its contents are
//! mechanical; the tree logic itself lives in the module root.

use std::fmt;

use super::iterators::InOrderIter;
use super::RbTree;

impl<K: Ord> Default for RbTree<K> {
    fn default() -> Self {
        RbTree::new()
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for RbTree<K> {
    /// Formats the keys in sorted order. The node colors and the tree
    /// shape are deliberately not part of the output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RbTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RbTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Ord> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = InOrderIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
