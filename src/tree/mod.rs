//! The red-black tree module.
//!
//! Balance is maintained by the red/black coloring discipline: every
//! mutation re-establishes the coloring invariants with a bottom-up pass
//! of recolorings and at most a constant number of rotations, so search,
//! insertion and deletion all run in `O(log n)`.
//!
//! Nodes live in a [`generational_arena::Arena`] owned by the tree, so
//! releasing a node frees its slot for reuse instead of going through the
//! global allocator, and a stale [`NodeRef`] can never reach a slot that
//! was handed to a different key.

mod implementations;
mod iterators;

pub use iterators::{InOrderIter, LevelOrderIter};

use std::cmp::Ordering;
use std::collections::HashMap;

use generational_arena::{Arena, Index};

const SENTINEL_KEY_ERROR: &str = "invariant violated: the sentinel's key is never read";
const MISSING_NODE_ERROR: &str = "invariant violated: a linked node is missing from the arena";

/// The color tag carried by every node, including the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone)]
struct Node<K> {
    /// `None` only for the sentinel.
    key: Option<K>,
    parent: Index,
    left: Index,
    right: Index,
    color: Color,
}

/// An opaque handle to a node inside a [`RbTree`].
///
/// Handles stay valid until the node they name is deleted; reading a stale
/// handle through [`RbTree::get`] returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(Index);

/// A red-black tree storing keys of type `K`.
///
/// Keys only need a total order. Duplicates are kept: inserting an already
/// present key adds another node, and deleting removes one node at a time.
#[derive(Clone)]
pub struct RbTree<K> {
    nodes: Arena<Node<K>>,
    /// The shared external leaf, allocated once per tree. Black for the
    /// tree's whole lifetime; its parent field is scratch space rewritten
    /// by [`RbTree::transplant`].
    sentinel: Index,
    root: Index,
    len: usize,
}

impl<K: Ord> RbTree<K> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        // the sentinel is its own parent and child until something links to it
        let sentinel = nodes.insert_with(|nil| Node {
            key: None,
            parent: nil,
            left: nil,
            right: nil,
            color: Color::Black,
        });
        RbTree {
            nodes,
            sentinel,
            root: sentinel,
            len: 0,
        }
    }

    /// Creates an empty tree with room for `capacity` keys before the
    /// arena reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.nodes.reserve(capacity);
        tree
    }

    /// Returns the number of keys in the tree, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the key behind a handle, or `None` if the handle is stale.
    pub fn get(&self, node: NodeRef) -> Option<&K> {
        self.nodes.get(node.0).and_then(|node| node.key.as_ref())
    }

    /// Finds a node holding `key` by iterative descent.
    ///
    /// If several nodes hold an equal key, the one closest to the root is
    /// returned. Absence is a normal negative result, not an error.
    pub fn search(&self, key: &K) -> Option<NodeRef> {
        let mut x = self.root;
        while !self.is_nil(x) {
            match key.cmp(self.key(x)) {
                Ordering::Less => x = self.left(x),
                Ordering::Greater => x = self.right(x),
                Ordering::Equal => return Some(NodeRef(x)),
            }
        }
        None
    }

    /// Returns `true` if at least one node holds `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Returns a handle to the node with the smallest key, or `None` if
    /// the tree is empty.
    pub fn minimum(&self) -> Option<NodeRef> {
        if self.is_nil(self.root) {
            None
        } else {
            Some(NodeRef(self.min_from(self.root)))
        }
    }

    /// Returns a handle to the node with the largest key, or `None` if
    /// the tree is empty.
    pub fn maximum(&self) -> Option<NodeRef> {
        if self.is_nil(self.root) {
            return None;
        }
        let mut x = self.root;
        while !self.is_nil(self.right(x)) {
            x = self.right(x);
        }
        Some(NodeRef(x))
    }

    /// Inserts `key` into the tree. Always succeeds; a key equal to one
    /// already present descends into the right subtree.
    pub fn insert(&mut self, key: K) {
        let nil = self.sentinel;
        let mut y = nil;
        let mut x = self.root;
        while !self.is_nil(x) {
            y = x;
            x = if key < *self.key(x) {
                self.left(x)
            } else {
                self.right(x)
            };
        }
        let z = self.nodes.insert(Node {
            key: Some(key),
            parent: y,
            left: nil,
            right: nil,
            color: Color::Red,
        });
        if self.is_nil(y) {
            self.root = z;
        } else if *self.key(z) < *self.key(y) {
            self.node_mut(y).left = z;
        } else {
            self.node_mut(y).right = z;
        }
        self.len += 1;
        self.insert_fixup(z);
    }

    /// Removes one node holding `key` and returns the evicted key.
    ///
    /// A silent no-op returning `None` when the key is absent.
    pub fn delete(&mut self, key: &K) -> Option<K> {
        let z = self.search(key)?.0;
        let mut removed_color = self.color(z);
        let x;
        if self.is_nil(self.left(z)) {
            x = self.right(z);
            self.transplant(z, x);
        } else if self.is_nil(self.right(z)) {
            x = self.left(z);
            self.transplant(z, x);
        } else {
            // two children: the in-order successor takes z's place and color
            let y = self.min_from(self.right(z));
            removed_color = self.color(y);
            x = self.right(y);
            if self.parent(y) == z {
                // x may be the sentinel; its parent field must point at y
                // so that the fixup can walk up from x's position
                self.node_mut(x).parent = y;
            } else {
                self.transplant(y, x);
                let z_right = self.right(z);
                self.node_mut(y).right = z_right;
                self.node_mut(z_right).parent = y;
            }
            self.transplant(z, y);
            let z_left = self.left(z);
            self.node_mut(y).left = z_left;
            self.node_mut(z_left).parent = y;
            let z_color = self.color(z);
            self.node_mut(y).color = z_color;
        }
        if removed_color == Color::Black {
            self.delete_fixup(x);
        }
        self.len -= 1;
        let node = self.nodes.remove(z).expect(MISSING_NODE_ERROR);
        Some(node.key.expect(SENTINEL_KEY_ERROR))
    }

    /// Iterates over the keys in sorted (in-order) order.
    pub fn iter(&self) -> InOrderIter<'_, K> {
        InOrderIter::new(self)
    }

    /// Iterates over the keys in breadth-first (level) order.
    pub fn iter_bfs(&self) -> LevelOrderIter<'_, K> {
        LevelOrderIter::new(self)
    }

    // ---- node field accessors ----

    fn node(&self, x: Index) -> &Node<K> {
        self.nodes.get(x).expect(MISSING_NODE_ERROR)
    }

    fn node_mut(&mut self, x: Index) -> &mut Node<K> {
        self.nodes.get_mut(x).expect(MISSING_NODE_ERROR)
    }

    fn key(&self, x: Index) -> &K {
        self.node(x).key.as_ref().expect(SENTINEL_KEY_ERROR)
    }

    fn is_nil(&self, x: Index) -> bool {
        x == self.sentinel
    }

    fn left(&self, x: Index) -> Index {
        self.node(x).left
    }

    fn right(&self, x: Index) -> Index {
        self.node(x).right
    }

    fn parent(&self, x: Index) -> Index {
        self.node(x).parent
    }

    fn color(&self, x: Index) -> Color {
        self.node(x).color
    }

    // ---- structural primitives ----

    /// Promotes `x`'s right child into `x`'s position. Pure pointer
    /// surgery: colors are untouched and the in-order sequence of the
    /// affected subtree is preserved.
    fn rotate_left(&mut self, x: Index) {
        let y = self.right(x);
        debug_assert!(!self.is_nil(y), "rotate_left needs a right child");
        let y_left = self.left(y);
        self.node_mut(x).right = y_left;
        if !self.is_nil(y_left) {
            self.node_mut(y_left).parent = x;
        }
        let x_parent = self.parent(x);
        self.node_mut(y).parent = x_parent;
        if self.is_nil(x_parent) {
            self.root = y;
        } else if self.left(x_parent) == x {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }
        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;
    }

    /// Mirror image of [`RbTree::rotate_left`]: promotes the left child.
    fn rotate_right(&mut self, x: Index) {
        let y = self.left(x);
        debug_assert!(!self.is_nil(y), "rotate_right needs a left child");
        let y_right = self.right(y);
        self.node_mut(x).left = y_right;
        if !self.is_nil(y_right) {
            self.node_mut(y_right).parent = x;
        }
        let x_parent = self.parent(x);
        self.node_mut(y).parent = x_parent;
        if self.is_nil(x_parent) {
            self.root = y;
        } else if self.left(x_parent) == x {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }
        self.node_mut(y).right = x;
        self.node_mut(x).parent = y;
    }

    /// Rewires `u`'s parent to point at `v` instead, and `v`'s parent link
    /// back at it.
    ///
    /// The parent link is written even when `v` is the sentinel: the
    /// delete fixup walks up from `v`'s position, so the sentinel's parent
    /// field serves as scratch space for the duration of that call.
    fn transplant(&mut self, u: Index, v: Index) {
        let p = self.parent(u);
        if self.is_nil(p) {
            self.root = v;
        } else if self.left(p) == u {
            self.node_mut(p).left = v;
        } else {
            self.node_mut(p).right = v;
        }
        self.node_mut(v).parent = p;
    }

    /// Leftmost node of the subtree rooted at `x`. `x` must not be the
    /// sentinel.
    fn min_from(&self, mut x: Index) -> Index {
        debug_assert!(!self.is_nil(x));
        while !self.is_nil(self.left(x)) {
            x = self.left(x);
        }
        x
    }

    // ---- fixup passes ----

    /// Restores the no-red-red invariant after linking the red leaf `z`.
    /// Black heights are untouched throughout.
    fn insert_fixup(&mut self, mut z: Index) {
        while self.color(self.parent(z)) == Color::Red {
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    // red uncle: recolor one level up and retry from there
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.right(parent) {
                        // inner grandchild: rotate into the outer shape
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.parent(z);
                    let grandparent = self.parent(parent);
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_right(grandparent);
                }
            } else {
                // mirror image: the parent is a right child
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.left(parent) {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.parent(z);
                    let grandparent = self.parent(parent);
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.node_mut(root).color = Color::Black;
    }

    /// Restores black-height consistency after a black node was unlinked.
    /// `x` marks the position carrying the extra black, possibly the
    /// sentinel; its parent link is valid either way.
    fn delete_fixup(&mut self, mut x: Index) {
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.parent(x);
            if x == self.left(parent) {
                let mut w = self.right(parent);
                if self.color(w) == Color::Red {
                    // red sibling: rotate it above the parent, exposing a
                    // black sibling for the cases below
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_left(parent);
                    w = self.right(parent);
                }
                if self.color(self.left(w)) == Color::Black
                    && self.color(self.right(w)) == Color::Black
                {
                    // both nephews black: push the extra black up
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        // near nephew red, far one black: rotate the red
                        // one into the far position
                        let w_left = self.left(w);
                        self.node_mut(w_left).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_right(w);
                        w = self.right(parent);
                    }
                    let parent_color = self.color(parent);
                    self.node_mut(w).color = parent_color;
                    self.node_mut(parent).color = Color::Black;
                    let w_right = self.right(w);
                    self.node_mut(w_right).color = Color::Black;
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                // mirror image: x is a right child
                let mut w = self.left(parent);
                if self.color(w) == Color::Red {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.rotate_right(parent);
                    w = self.left(parent);
                }
                if self.color(self.left(w)) == Color::Black
                    && self.color(self.right(w)) == Color::Black
                {
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let w_right = self.right(w);
                        self.node_mut(w_right).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.rotate_left(w);
                        w = self.left(parent);
                    }
                    let parent_color = self.color(parent);
                    self.node_mut(w).color = parent_color;
                    self.node_mut(parent).color = Color::Black;
                    let w_left = self.left(w);
                    self.node_mut(w_left).color = Color::Black;
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.node_mut(x).color = Color::Black;
    }

    // ---- correctness checking ----

    /// Asserts the red-black invariants over the whole tree, panicking on
    /// the first violation. Intended for tests; the walk is iterative and
    /// costs `O(n)`.
    ///
    /// Checked: the sentinel is black and keyless, the root is black with
    /// the sentinel as parent, no red node has a red child, every node's
    /// two subtrees have equal black heights (counting the sentinel),
    /// child/parent links agree, in-order keys are non-decreasing, and the
    /// stored length matches both the reachable node count and the arena.
    pub fn assert_invariants(&self) {
        assert_eq!(
            self.color(self.sentinel),
            Color::Black,
            "the sentinel must be black"
        );
        assert!(
            self.node(self.sentinel).key.is_none(),
            "the sentinel must not hold a key"
        );
        if self.is_nil(self.root) {
            assert_eq!(self.len, 0, "an empty tree must have length zero");
            assert_eq!(self.nodes.len(), 1, "an empty arena holds only the sentinel");
            return;
        }
        assert_eq!(self.color(self.root), Color::Black, "the root must be black");
        assert!(
            self.is_nil(self.parent(self.root)),
            "the root's parent must be the sentinel"
        );

        // children are pushed after their parent's re-visit marker, so both
        // black heights are known by the time the parent is re-popped
        let mut black_height: HashMap<Index, u32> = HashMap::new();
        black_height.insert(self.sentinel, 1); // paths count the sentinel
        let mut stack = vec![(self.root, false)];
        let mut visited = 0usize;
        while let Some((x, children_done)) = stack.pop() {
            if self.is_nil(x) {
                continue;
            }
            if !children_done {
                stack.push((x, true));
                stack.push((self.left(x), false));
                stack.push((self.right(x), false));
                continue;
            }
            visited += 1;
            let left = self.left(x);
            let right = self.right(x);
            for child in [left, right] {
                if !self.is_nil(child) {
                    assert_eq!(
                        self.parent(child),
                        x,
                        "child/parent links out of sync"
                    );
                }
            }
            if self.color(x) == Color::Red {
                assert_eq!(
                    self.color(left),
                    Color::Black,
                    "a red node must have black children"
                );
                assert_eq!(
                    self.color(right),
                    Color::Black,
                    "a red node must have black children"
                );
            }
            let left_height = black_height[&left];
            let right_height = black_height[&right];
            assert_eq!(
                left_height, right_height,
                "unequal black heights below one node"
            );
            let own = left_height + u32::from(self.color(x) == Color::Black);
            black_height.insert(x, own);
        }
        assert_eq!(
            visited, self.len,
            "stored length must match the reachable node count"
        );
        assert_eq!(
            self.nodes.len(),
            self.len + 1,
            "the arena must hold exactly the nodes plus the sentinel"
        );

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for key in iter {
                assert!(prev <= key, "in-order traversal must be non-decreasing");
                prev = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(tree: &RbTree<i32>) -> Vec<i32> {
        tree.iter_bfs().copied().collect()
    }

    fn inorder(tree: &RbTree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    #[test]
    fn empty_tree_basics() {
        let mut tree: RbTree<i32> = RbTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.minimum().is_none());
        assert!(tree.maximum().is_none());
        assert!(tree.search(&1).is_none());
        assert_eq!(tree.delete(&1), None);
        tree.assert_invariants();
    }

    #[test]
    fn rotations_are_inverse() {
        let mut tree = RbTree::new();
        for key in [15, 6, 18, 3, 7, 17, 20] {
            tree.insert(key);
        }
        let x = tree.search(&6).unwrap().0;
        assert!(!tree.is_nil(tree.right(x)));

        let shape_before = shape(&tree);
        let inorder_before = inorder(&tree);

        let y = tree.right(x);
        tree.rotate_left(x);
        // shape changed, in-order sequence did not
        assert_ne!(shape(&tree), shape_before);
        assert_eq!(inorder(&tree), inorder_before);

        tree.rotate_right(y);
        assert_eq!(shape(&tree), shape_before);
        assert_eq!(inorder(&tree), inorder_before);
        tree.assert_invariants();
    }

    #[test]
    fn rotating_the_root_moves_the_root() {
        let mut tree = RbTree::new();
        for key in [2, 1, 3] {
            tree.insert(key);
        }
        let root = tree.root;
        let right = tree.right(root);
        tree.rotate_left(root);
        assert_eq!(tree.root, right);
        assert!(tree.is_nil(tree.parent(tree.root)));
        assert_eq!(inorder(&tree), vec![1, 2, 3]);
    }

    #[test]
    fn handles_go_stale_after_deletion() {
        let mut tree = RbTree::new();
        tree.insert(5);
        tree.insert(9);
        let handle = tree.search(&9).unwrap();
        assert_eq!(tree.get(handle), Some(&9));
        tree.delete(&9);
        assert_eq!(tree.get(handle), None);
    }
}
