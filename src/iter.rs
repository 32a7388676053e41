use std::{
    borrow::Borrow,
    marker,
    ops::{Bound, RangeBounds},
};

use crate::node::{Arena, NodeId, NIL};

// Which spine is pushed on the path stack. `Left` walks keys in ascending
// order, `Right` in descending order.
#[derive(Copy, Clone)]
pub(crate) enum IFlag {
    Left,
    Right,
}

/// In-order iterator over keys of [RbTree](crate::RbTree).
///
/// Created by [RbTree::iter](crate::RbTree::iter). Each call builds a fresh
/// path stack from the root, so iteration can be restarted at any time.
pub struct Iter<'a, K> {
    arena: &'a Arena<K>,
    flag: IFlag,
    paths: Vec<NodeId>,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(arena: &'a Arena<K>, root: NodeId, flag: IFlag) -> Iter<'a, K> {
        let mut paths = Vec::default();
        build_iter(arena, flag, root, &mut paths);
        Iter { arena, flag, paths }
    }

    fn start_from<Q>(arena: &'a Arena<K>, root: NodeId, low: Bound<&Q>) -> Iter<'a, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut paths = Vec::default();
        match low {
            Bound::Unbounded => build_iter(arena, IFlag::Left, root, &mut paths),
            Bound::Included(low) => find_start(arena, root, low, true, &mut paths),
            Bound::Excluded(low) => find_start(arena, root, low, false, &mut paths),
        };
        Iter {
            arena,
            flag: IFlag::Left,
            paths,
        }
    }

    fn end_at<Q>(arena: &'a Arena<K>, root: NodeId, high: Bound<&Q>) -> Iter<'a, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut paths = Vec::default();
        match high {
            Bound::Unbounded => build_iter(arena, IFlag::Right, root, &mut paths),
            Bound::Included(high) => find_end(arena, root, high, true, &mut paths),
            Bound::Excluded(high) => find_end(arena, root, high, false, &mut paths),
        };
        Iter {
            arena,
            flag: IFlag::Right,
            paths,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let node = self.paths.pop()?;
        let next = match self.flag {
            IFlag::Left => arena.right(node),
            IFlag::Right => arena.left(node),
        };
        build_iter(arena, self.flag, next, &mut self.paths);
        Some(arena.key(node))
    }
}

/// Ascending iterator over keys within a range.
///
/// Created by [RbTree::range](crate::RbTree::range).
pub struct Range<'a, K, R, Q>
where
    Q: ?Sized,
{
    range: R,
    iter: Iter<'a, K>,
    fin: bool,
    high: marker::PhantomData<Q>,
}

impl<'a, K, R, Q> Range<'a, K, R, Q>
where
    K: Borrow<Q>,
    R: RangeBounds<Q>,
    Q: Ord + ?Sized,
{
    pub(crate) fn new(arena: &'a Arena<K>, root: NodeId, range: R) -> Self {
        let iter = Iter::start_from(arena, root, range.start_bound());
        Range {
            range,
            iter,
            fin: false,
            high: marker::PhantomData,
        }
    }
}

impl<'a, K, R, Q> Iterator for Range<'a, K, R, Q>
where
    K: Borrow<Q>,
    R: RangeBounds<Q>,
    Q: Ord + ?Sized,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fin {
            return None;
        }
        let key = self.iter.next()?;
        match self.range.end_bound() {
            Bound::Included(high) if key.borrow().le(high) => Some(key),
            Bound::Excluded(high) if key.borrow().lt(high) => Some(key),
            Bound::Unbounded => Some(key),
            Bound::Included(_) | Bound::Excluded(_) => {
                self.fin = true;
                None
            }
        }
    }
}

/// Descending iterator over keys within a range.
///
/// Created by [RbTree::reverse](crate::RbTree::reverse).
pub struct Reverse<'a, K, R, Q>
where
    Q: ?Sized,
{
    range: R,
    iter: Iter<'a, K>,
    fin: bool,
    low: marker::PhantomData<Q>,
}

impl<'a, K, R, Q> Reverse<'a, K, R, Q>
where
    K: Borrow<Q>,
    R: RangeBounds<Q>,
    Q: Ord + ?Sized,
{
    pub(crate) fn new(arena: &'a Arena<K>, root: NodeId, range: R) -> Self {
        let iter = Iter::end_at(arena, root, range.end_bound());
        Reverse {
            range,
            iter,
            fin: false,
            low: marker::PhantomData,
        }
    }
}

impl<'a, K, R, Q> Iterator for Reverse<'a, K, R, Q>
where
    K: Borrow<Q>,
    R: RangeBounds<Q>,
    Q: Ord + ?Sized,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fin {
            return None;
        }
        let key = self.iter.next()?;
        match self.range.start_bound() {
            Bound::Included(low) if key.borrow().ge(low) => Some(key),
            Bound::Excluded(low) if key.borrow().gt(low) => Some(key),
            Bound::Unbounded => Some(key),
            Bound::Included(_) | Bound::Excluded(_) => {
                self.fin = true;
                None
            }
        }
    }
}

fn build_iter<K>(arena: &Arena<K>, flag: IFlag, mut node: NodeId, paths: &mut Vec<NodeId>) {
    while node != NIL {
        paths.push(node);
        node = match flag {
            IFlag::Left => arena.left(node),
            IFlag::Right => arena.right(node),
        };
    }
}

// Push every node on the search path whose key falls at or after `low`.
// Descent does not stop on an equal key, duplicates may sit on either side.
fn find_start<K, Q>(arena: &Arena<K>, mut node: NodeId, low: &Q, incl: bool, paths: &mut Vec<NodeId>)
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while node != NIL {
        let key = arena.key(node).borrow();
        let after = if incl { key.ge(low) } else { key.gt(low) };
        if after {
            paths.push(node);
            node = arena.left(node);
        } else {
            node = arena.right(node);
        }
    }
}

fn find_end<K, Q>(arena: &Arena<K>, mut node: NodeId, high: &Q, incl: bool, paths: &mut Vec<NodeId>)
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while node != NIL {
        let key = arena.key(node).borrow();
        let before = if incl { key.le(high) } else { key.lt(high) };
        if before {
            paths.push(node);
            node = arena.right(node);
        } else {
            node = arena.left(node);
        }
    }
}
