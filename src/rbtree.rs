//! Module provide ordered key store implemented by [RbTree] type.
//!
//! RbTree is a classic [red-black][wiki-rbt] tree with a shared sentinel
//! and parent back-references. Nodes live in an arena and refer to each
//! other through integer handles, parent handles are used only to walk
//! upward while rebalancing.
//!
//! - Each entry in RbTree is a key, duplicate keys are retained.
//! - Parametrised over `key-type`.
//! - Insert, delete and search via insert(), delete(), search() api.
//! - Full table scan, to iterate over all keys in ascending order.
//! - Range scan, to iterate between a ``low`` and ``high``.
//! - Reverse iteration.
//! - No Durability guarantee.
//! - Not thread safe.
//!
//! Full table scan:
//!
//! ```
//! use rbidx::RbTree;
//!
//! let index: RbTree<u32> = [30, 10, 20].iter().copied().collect();
//! let keys: Vec<u32> = index.iter().copied().collect();
//! assert_eq!(keys, vec![10, 20, 30]);
//! ```
//!
//! Range scan and reverse scan:
//!
//! ```
//! use rbidx::RbTree;
//!
//! let index: RbTree<u32> = (1..=5).collect();
//!
//! let keys: Vec<u32> = index.range(2..4).copied().collect();
//! assert_eq!(keys, vec![2, 3]);
//!
//! let keys: Vec<u32> = index.reverse(2..=4).copied().collect();
//! assert_eq!(keys, vec![4, 3, 2]);
//! ```
//!
//! [wiki-rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use log::{debug, trace};

use std::{
    borrow::Borrow,
    cmp::{self, Ordering},
    fmt,
    iter::FromIterator,
    ops::{Bound, RangeBounds},
};

use crate::{
    iter::{IFlag, Iter, Range, Reverse},
    node::{Arena, Color, NodeId, NIL},
    stats::Stats,
    Error, Result,
};

/// RbTree manage a single instance of in-memory ordered key store using
/// a [red-black][rbt] tree.
///
/// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbTree<K> {
    arena: Arena<K>,
    root: NodeId,
    n_count: usize, // number of keys in the tree.
}

impl<K> Default for RbTree<K> {
    fn default() -> RbTree<K> {
        RbTree::new()
    }
}

impl<K> RbTree<K> {
    /// Create an empty instance of RbTree.
    pub fn new() -> RbTree<K> {
        RbTree {
            arena: Arena::new(),
            root: NIL,
            n_count: Default::default(),
        }
    }
}

/// Maintenance API.
impl<K> RbTree<K> {
    /// Return number of keys in this instance, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Remove all keys.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
        self.n_count = 0;
    }

    /// Number of nodes on the longest path from root to a leaf.
    pub fn height(&self) -> usize {
        self.height_at(self.root)
    }

    fn height_at(&self, node: NodeId) -> usize {
        match node {
            NIL => 0,
            node => {
                let (left, right) = (self.arena.left(node), self.arena.right(node));
                1 + cmp::max(self.height_at(left), self.height_at(right))
            }
        }
    }

    /// Gather statistics by walking the full tree.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            height: self.height(),
            n_slots: self.arena.n_slots(),
            n_free: self.arena.n_free(),
            ..Stats::default()
        };
        self.count_colors(self.root, &mut stats);
        if self.root != NIL {
            // the sentinel at the bottom counts, the root does not.
            stats.black_height = 1;
            let mut node = self.arena.left(self.root);
            while node != NIL {
                if self.arena.is_black(node) {
                    stats.black_height += 1;
                }
                node = self.arena.left(node);
            }
        }
        stats
    }

    fn count_colors(&self, node: NodeId, stats: &mut Stats) {
        if node == NIL {
            return;
        }
        stats.n_count += 1;
        match self.arena.color(node) {
            Color::Red => stats.n_red += 1,
            Color::Black => stats.n_black += 1,
        }
        self.count_colors(self.arena.left(node), stats);
        self.count_colors(self.arena.right(node), stats);
    }
}

/// Read API.
impl<K> RbTree<K> {
    /// Search for key and return a reference to the stored key. If key
    /// is inserted more than once, any one of the copies is returned.
    pub fn search<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.find(key) {
            NIL => None,
            node => Some(self.arena.key(node)),
        }
    }

    /// Check whether key is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key) != NIL
    }

    /// Number of copies of key present in this instance.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.range::<Q, _>((Bound::Included(key), Bound::Included(key)))
            .count()
    }

    /// Return the smallest key.
    pub fn first(&self) -> Option<&K> {
        match self.root {
            NIL => None,
            root => Some(self.arena.key(self.minimum(root))),
        }
    }

    /// Return the largest key.
    pub fn last(&self) -> Option<&K> {
        let mut node = self.root;
        if node == NIL {
            return None;
        }
        while self.arena.right(node) != NIL {
            node = self.arena.right(node);
        }
        Some(self.arena.key(node))
    }

    /// Return an iterator over all keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.arena, self.root, IFlag::Left)
    }

    /// Same as [RbTree::iter], in-order traversal of this instance.
    pub fn traverse(&self) -> Iter<'_, K> {
        self.iter()
    }

    /// Range over all keys from low to high.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        Range::new(&self.arena, self.root, range)
    }

    /// Reverse range over all keys from high to low.
    pub fn reverse<Q, R>(&self, range: R) -> Reverse<'_, K, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        Reverse::new(&self.arena, self.root, range)
    }

    fn find<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root;
        while node != NIL {
            node = match self.arena.key(node).borrow().cmp(key) {
                Ordering::Greater => self.arena.left(node),
                Ordering::Less => self.arena.right(node),
                Ordering::Equal => return node,
            };
        }
        NIL
    }

    fn minimum(&self, mut node: NodeId) -> NodeId {
        while self.arena.left(node) != NIL {
            node = self.arena.left(node);
        }
        node
    }
}

/// Write API.
impl<K> RbTree<K> {
    /// Insert key. Always succeed, a key equal to an existing one is
    /// stored as a separate entry, after the existing ones.
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let mut parent = NIL;
        let mut node = self.root;
        while node != NIL {
            parent = node;
            node = match key.cmp(self.arena.key(node)) {
                Ordering::Less => self.arena.left(node),
                Ordering::Equal | Ordering::Greater => self.arena.right(node),
            };
        }

        let less = parent != NIL && key.lt(self.arena.key(parent));
        let node = self.arena.alloc(key);
        self.arena.set_parent(node, parent);
        match parent {
            NIL => self.root = node,
            parent if less => self.arena.set_left(parent, node),
            parent => self.arena.set_right(parent, node),
        }
        self.n_count += 1;

        self.insert_fixup(node);
    }

    /// Delete one copy of key from this instance. Return false if key is
    /// not present, in which case the tree is left untouched.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).is_ok()
    }

    /// Remove one copy of key from this instance and return it.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let z = match self.find(key) {
            NIL => {
                debug!("remove(): key not found, len:{}", self.n_count);
                return err_at!(KeyNotFound, msg: "key not found");
            }
            z => z,
        };

        let (z_left, z_right) = (self.arena.left(z), self.arena.right(z));
        let (x, removed) = if z_left == NIL {
            let removed = self.arena.color(z);
            self.transplant(z, z_right);
            (z_right, removed)
        } else if z_right == NIL {
            let removed = self.arena.color(z);
            self.transplant(z, z_left);
            (z_left, removed)
        } else {
            let y = self.minimum(z_right);
            let removed = self.arena.color(y);
            let x = self.arena.right(y);
            if self.arena.parent(y) == z {
                self.arena.set_parent(x, y);
            } else {
                self.transplant(y, x);
                self.arena.set_right(y, z_right);
                self.arena.set_parent(z_right, y);
            }
            self.transplant(z, y);
            self.arena.set_left(y, z_left);
            self.arena.set_parent(z_left, y);
            self.arena.set_color(y, self.arena.color(z));
            (x, removed)
        };

        if removed == Color::Black {
            self.delete_fixup(x);
        }
        self.arena.set_parent(NIL, NIL);
        self.n_count -= 1;

        Ok(self.arena.release(z))
    }
}

/// Diagnostics API.
impl<K> RbTree<K> {
    /// Validate red-black tree with following rules:
    ///
    /// * Sentinel and root are black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Parent handles agree with child handles.
    /// * Keys are in sorted order, equal keys allowed on either side.
    /// * Height is within `2 * log2(n+1)`.
    ///
    /// Additionally return full statistics on the tree. Refer to [Stats]
    /// for more information.
    pub fn validate(&self) -> Result<Stats>
    where
        K: Ord + fmt::Debug,
    {
        if self.arena.color(NIL) != Color::Black {
            return err_at!(InvariantViolation, msg: "sentinel is not black");
        }
        if self.arena.parent(NIL) != NIL {
            return err_at!(InvariantViolation, msg: "sentinel parent is set");
        }
        if self.arena.is_red(self.root) {
            return err_at!(InvariantViolation, msg: "root is red");
        }
        if self.root != NIL && self.arena.parent(self.root) != NIL {
            return err_at!(InvariantViolation, msg: "root has a parent");
        }

        let mut n_count = 0;
        self.validate_tree(self.root, false, &mut n_count)?;
        if n_count != self.n_count {
            return err_at!(InvariantViolation, msg: "n_count {} != {}", n_count, self.n_count);
        }

        let mut prev: Option<&K> = None;
        for key in self.iter() {
            if let Some(prev) = prev {
                if prev > key {
                    return err_at!(InvariantViolation, msg: "sort {:?} > {:?}", prev, key);
                }
            }
            prev = Some(key);
        }

        let stats = self.stats();
        if (stats.height as f64) > stats.max_height() {
            return err_at!(InvariantViolation, msg: "height {} for {} keys", stats.height, n_count);
        }

        Ok(stats)
    }

    /// Boolean form of [RbTree::validate].
    pub fn check_invariants(&self) -> bool
    where
        K: Ord + fmt::Debug,
    {
        self.validate().is_ok()
    }

    // return the black-height below node.
    fn validate_tree(&self, node: NodeId, fromred: bool, n_count: &mut usize) -> Result<usize>
    where
        K: Ord + fmt::Debug,
    {
        if node == NIL {
            return Ok(0);
        }
        *n_count += 1;

        let red = self.arena.is_red(node);
        if fromred && red {
            return err_at!(InvariantViolation, msg: "consecutive reds at {:?}", self.arena.key(node));
        }

        let (left, right) = (self.arena.left(node), self.arena.right(node));
        for child in [left, right].iter().copied().filter(|c| *c != NIL) {
            if self.arena.parent(child) != node {
                let key = self.arena.key(child);
                return err_at!(InvariantViolation, msg: "parent link broken at {:?}", key);
            }
        }

        let lblacks = self.validate_tree(left, red, n_count)?;
        let rblacks = self.validate_tree(right, red, n_count)?;
        if lblacks != rblacks {
            return err_at!(InvariantViolation, msg: "unbalanced blacks {} {}", lblacks, rblacks);
        }

        if left != NIL && self.arena.key(left).gt(self.arena.key(node)) {
            let (lkey, key) = (self.arena.key(left), self.arena.key(node));
            return err_at!(InvariantViolation, msg: "sort lkey:{:?} parent:{:?}", lkey, key);
        }
        if right != NIL && self.arena.key(right).lt(self.arena.key(node)) {
            let (rkey, key) = (self.arena.key(right), self.arena.key(node));
            return err_at!(InvariantViolation, msg: "sort rkey:{:?} parent:{:?}", rkey, key);
        }

        Ok(lblacks + if red { 0 } else { 1 })
    }
}

//--------- rebalancing routines ----------------

impl<K> RbTree<K> {
    fn insert_fixup(&mut self, mut k: NodeId) {
        while self.arena.is_red(self.arena.parent(k)) {
            let parent = self.arena.parent(k);
            let g = self.arena.parent(parent);
            let left_side = parent == self.arena.left(g);
            let u = if left_side {
                self.arena.right(g)
            } else {
                self.arena.left(g)
            };

            if self.arena.is_red(u) {
                trace!("insert_fixup(): red uncle, recolor and move up");
                self.arena.set_color(parent, Color::Black);
                self.arena.set_color(u, Color::Black);
                self.arena.set_color(g, Color::Red);
                k = g;
                continue;
            }

            let inner = if left_side {
                k == self.arena.right(parent)
            } else {
                k == self.arena.left(parent)
            };
            if inner {
                trace!("insert_fixup(): black uncle, triangle");
                k = parent;
                if left_side {
                    self.rotate_left(k)
                } else {
                    self.rotate_right(k)
                }
            }

            trace!("insert_fixup(): black uncle, line");
            let parent = self.arena.parent(k);
            let g = self.arena.parent(parent);
            self.arena.set_color(parent, Color::Black);
            self.arena.set_color(g, Color::Red);
            if left_side {
                self.rotate_right(g)
            } else {
                self.rotate_left(g)
            }
        }
        self.arena.set_color(self.root, Color::Black);
    }

    // `x` carries one unit of black deficiency, it may be NIL in which case
    // its parent is the transient parent slot of the sentinel.
    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.arena.is_black(x) {
            let parent = self.arena.parent(x);
            let left_side = x == self.arena.left(parent);
            let sibling = |arena: &Arena<K>| {
                if left_side {
                    arena.right(parent)
                } else {
                    arena.left(parent)
                }
            };

            let mut w = sibling(&self.arena);
            if self.arena.is_red(w) {
                trace!("delete_fixup(): red sibling");
                self.arena.set_color(w, Color::Black);
                self.arena.set_color(parent, Color::Red);
                self.rotate_toward(parent, left_side);
                w = sibling(&self.arena);
            }

            let (near, far) = if left_side {
                (self.arena.left(w), self.arena.right(w))
            } else {
                (self.arena.right(w), self.arena.left(w))
            };

            if self.arena.is_black(near) && self.arena.is_black(far) {
                trace!("delete_fixup(): black nephews, move up");
                self.arena.set_color(w, Color::Red);
                x = parent;
                continue;
            }

            if self.arena.is_black(far) {
                trace!("delete_fixup(): red near nephew");
                self.arena.set_color(near, Color::Black);
                self.arena.set_color(w, Color::Red);
                self.rotate_toward(w, !left_side);
                w = sibling(&self.arena);
            }

            trace!("delete_fixup(): red far nephew");
            let far = if left_side {
                self.arena.right(w)
            } else {
                self.arena.left(w)
            };
            self.arena.set_color(w, self.arena.color(parent));
            self.arena.set_color(parent, Color::Black);
            self.arena.set_color(far, Color::Black);
            self.rotate_toward(parent, left_side);
            x = self.root;
        }
        self.arena.set_color(x, Color::Black);
    }

    // rotate node down toward its left child side if `left` is true.
    #[inline]
    fn rotate_toward(&mut self, node: NodeId, left: bool) {
        if left {
            self.rotate_left(node)
        } else {
            self.rotate_right(node)
        }
    }

    // Replace the subtree rooted at u with the subtree rooted at v. v may
    // be NIL, whose parent slot is then set.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.arena.parent(u);
        if parent == NIL {
            self.root = v;
        } else if u == self.arena.left(parent) {
            self.arena.set_left(parent, v);
        } else {
            self.arena.set_right(parent, v);
        }
        self.arena.set_parent(v, parent);
    }

    //              (p)                       (p)
    //               |                         |
    //               x                         y
    //              / \                       / \
    //             /   \                     /   \
    //            /     \                   /     \
    //          xl       y                 x       yr
    //                  / \               / \
    //                yl   yr           xl   yl
    //
    fn rotate_left(&mut self, x: NodeId) {
        let y = self.arena.right(x);
        if x == NIL || y == NIL {
            panic!("rotate_left(): rotating over NIL ? Call the programmer");
        }

        let yl = self.arena.left(y);
        self.arena.set_right(x, yl);
        if yl != NIL {
            self.arena.set_parent(yl, x);
        }

        let p = self.arena.parent(x);
        self.arena.set_parent(y, p);
        if p == NIL {
            self.root = y;
        } else if x == self.arena.left(p) {
            self.arena.set_left(p, y);
        } else {
            self.arena.set_right(p, y);
        }

        self.arena.set_left(y, x);
        self.arena.set_parent(x, y);
    }

    //              (p)                       (p)
    //               |                         |
    //               y                         x
    //              / \                       / \
    //             /   \                     /   \
    //            /     \                   /     \
    //           x       yr               xl       y
    //          / \                               / \
    //        xl   xr                           xr   yr
    //
    fn rotate_right(&mut self, y: NodeId) {
        let x = self.arena.left(y);
        if y == NIL || x == NIL {
            panic!("rotate_right(): rotating over NIL ? Call the programmer");
        }

        let xr = self.arena.right(x);
        self.arena.set_left(y, xr);
        if xr != NIL {
            self.arena.set_parent(xr, y);
        }

        let p = self.arena.parent(y);
        self.arena.set_parent(x, p);
        if p == NIL {
            self.root = x;
        } else if y == self.arena.right(p) {
            self.arena.set_right(p, x);
        } else {
            self.arena.set_left(p, x);
        }

        self.arena.set_right(x, y);
        self.arena.set_parent(y, x);
    }
}

impl<K> Extend<K> for RbTree<K>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = K>,
    {
        iter.into_iter().for_each(|key| self.insert(key));
    }
}

impl<K> FromIterator<K> for RbTree<K>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> RbTree<K>
    where
        I: IntoIterator<Item = K>,
    {
        let mut index = RbTree::new();
        index.extend(iter);
        index
    }
}

impl<'a, K> IntoIterator for &'a RbTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// List keys in order, each tagged with its node color, like
/// `[5(BLACK), 10(RED)]`.
impl<K> fmt::Debug for RbTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut paths = Vec::default();
        let mut node = self.root;
        let mut items = Vec::with_capacity(self.n_count);
        loop {
            while node != NIL {
                paths.push(node);
                node = self.arena.left(node);
            }
            match paths.pop() {
                Some(n) => {
                    items.push(format!("{:?}({})", self.arena.key(n), self.arena.color(n)));
                    node = self.arena.right(n);
                }
                None => break,
            }
        }
        write!(f, "[{}]", items.join(", "))
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
