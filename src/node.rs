use std::fmt;

/// Handle to a node slot inside [Arena].
pub type NodeId = usize;

/// The shared sentinel. Stands for every absent child and for the root's
/// parent. It is never allocated and is always black.
pub const NIL: NodeId = usize::MAX;

/// Color of a node in the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

// Node corresponds to a single key in RbTree instance.
pub struct Node<K> {
    pub key: K,
    pub color: Color,
    pub left: NodeId,   // store: left child, or NIL
    pub right: NodeId,  // store: right child, or NIL
    pub parent: NodeId, // upward navigation only, or NIL
}

impl<K> Node<K> {
    /// New nodes are red and detached, with both children pointing to NIL.
    pub fn new(key: K) -> Node<K> {
        Node {
            key,
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

/// Slot storage for tree nodes, addressed by [NodeId].
///
/// All accessors accept [NIL]. Reading from the sentinel yields BLACK for
/// color and NIL for children. The sentinel owns a single parent slot that
/// deletion may set while rebalancing from an empty position, everything
/// else about it is immutable.
pub struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
    nil_parent: NodeId,
}

impl<K> Arena<K> {
    pub fn new() -> Arena<K> {
        Arena {
            slots: Vec::default(),
            free: Vec::default(),
            nil_parent: NIL,
        }
    }

    /// Allocate a new red node for key, reusing a released slot if any.
    pub fn alloc(&mut self, key: K) -> NodeId {
        let node = Some(Node::new(key));
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = node;
                id
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    /// Release a detached node and hand back its key.
    pub fn release(&mut self, id: NodeId) -> K {
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                node.key
            }
            None => panic!("release(): dangling handle {} ? Call the programmer", id),
        }
    }

    /// Drop every node and every released slot.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.nil_parent = NIL;
    }

    /// Number of slots ever handed out, live or released.
    #[inline]
    pub fn n_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of released slots waiting for reuse.
    #[inline]
    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("node(): dangling handle {} ? Call the programmer", id),
        }
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("node_mut(): dangling handle {} ? Call the programmer", id),
        }
    }

    #[inline]
    pub fn key(&self, id: NodeId) -> &K {
        &self.node(id).key
    }

    #[inline]
    pub fn color(&self, id: NodeId) -> Color {
        match id {
            NIL => Color::Black,
            id => self.node(id).color,
        }
    }

    #[inline]
    pub fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    #[inline]
    pub fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    /// Painting the sentinel black is accepted and ignored, painting it
    /// red is a logic error.
    #[inline]
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        match id {
            NIL if color == Color::Black => (),
            NIL => panic!("set_color(): painting NIL red ? Call the programmer"),
            id => self.node_mut(id).color = color,
        }
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> NodeId {
        match id {
            NIL => NIL,
            id => self.node(id).left,
        }
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> NodeId {
        match id {
            NIL => NIL,
            id => self.node(id).right,
        }
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> NodeId {
        match id {
            NIL => self.nil_parent,
            id => self.node(id).parent,
        }
    }

    #[inline]
    pub fn set_left(&mut self, id: NodeId, child: NodeId) {
        match id {
            NIL => panic!("set_left(): NIL has no children ? Call the programmer"),
            id => self.node_mut(id).left = child,
        }
    }

    #[inline]
    pub fn set_right(&mut self, id: NodeId, child: NodeId) {
        match id {
            NIL => panic!("set_right(): NIL has no children ? Call the programmer"),
            id => self.node_mut(id).right = child,
        }
    }

    #[inline]
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        match id {
            NIL => self.nil_parent = parent,
            id => self.node_mut(id).parent = parent,
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
