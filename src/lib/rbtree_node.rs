use std::cmp::Ordering;
use std::fmt;

/// Handle of a node inside the tree's arena.
pub(super) type NodeId = usize;

/// The shared sentinel. Every leaf slot and the root's parent point here.
pub(super) const NIL: NodeId = 0;

/// Color tag of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// Freshly inserted nodes start out red.
    Red,
    /// The sentinel and the root are always black.
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => f.write_str("Red"),
            Color::Black => f.write_str("Black"),
        }
    }
}

/// Which child link of a node is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

impl Side {
    pub(super) fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

// `entry` is `None` only for the sentinel and for slots on the free list.
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) entry: Option<(K, V)>,
    pub(super) color: Color,
    pub(super) parent: NodeId,
    pub(super) left: NodeId,
    pub(super) right: NodeId,
}

impl<K, V> Node<K, V> {
    pub(super) fn new(key: K, value: V) -> Self {
        Node {
            entry: Some((key, value)),
            color: Color::Red,
            parent: NIL,
            left: NIL,
            right: NIL,
        }
    }

    /// A node without an entry, used for the sentinel.
    pub(super) fn scratch() -> Self {
        Node {
            entry: None,
            color: Color::Red,
            parent: NIL,
            left: NIL,
            right: NIL,
        }
    }

    pub(super) fn child(&self, side: Side) -> NodeId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(super) fn set_child(&mut self, side: Side, child: NodeId) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    pub(super) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(super) fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    pub(super) fn key(&self) -> &K {
        &self.pair().0
    }

    pub(super) fn value(&self) -> &V {
        &self.pair().1
    }

    pub(super) fn value_mut(&mut self) -> &mut V {
        match self.entry {
            Some((_, ref mut v)) => v,
            None => unreachable!("value_mut on an entry-less node"),
        }
    }

    pub(super) fn pair(&self) -> &(K, V) {
        match self.entry {
            Some(ref e) => e,
            None => unreachable!("entry access on an entry-less node"),
        }
    }
}

/// Narrow identity: same key and same color. Entry-less nodes only equal
/// other entry-less nodes of the same color. Not a structural comparison.
impl<K: Ord, V> PartialEq for Node<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.color != other.color {
            return false;
        }
        match (&self.entry, &other.entry) {
            (Some((a, _)), Some((b, _))) => a.cmp(b) == Ordering::Equal,
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: fmt::Display, V> fmt::Display for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some((ref k, _)) => write!(f, "{} {}", k, self.color),
            None => write!(f, "nil {}", self.color),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("entry", &self.entry)
            .field("color", &self.color)
            .field("parent", &self.parent)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}
