use crate::rbtree_node::{Node, NodeId, NIL};
use std::iter::FusedIterator;
use std::vec;

/// Ids of all entry-carrying nodes under `root`, in ascending key order.
pub(super) fn in_order<K, V>(nodes: &[Node<K, V>], root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = Vec::new();
    let mut current = root;
    while current != NIL || !stack.is_empty() {
        while current != NIL {
            stack.push(current);
            current = nodes[current].left;
        }
        if let Some(id) = stack.pop() {
            order.push(id);
            current = nodes[id].right;
        }
    }
    order
}

/// An iterator over the entries of an `RBTreeMap`, in ascending key order.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    // Path of nodes whose left subtree is done but which are not yet yielded
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a [Node<K, V>], root: NodeId, len: usize) -> Self {
        let mut iter = Iter {
            nodes,
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_leftmost(root);
        iter
    }

    fn push_leftmost(&mut self, mut id: NodeId) {
        while id != NIL {
            self.stack.push(id);
            id = self.nodes[id].left;
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[id];
        self.push_leftmost(node.right);
        self.remaining -= 1;
        let (k, v) = node.pair();
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K: 'a, V: 'a> FusedIterator for Iter<'a, K, V> {}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable iterator over the entries of an `RBTreeMap`, in ascending key order.
pub struct IterMut<'a, K, V> {
    // One exclusive borrow per arena slot, handed out at most once
    slots: Vec<Option<&'a mut Node<K, V>>>,
    order: vec::IntoIter<NodeId>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(nodes: &'a mut [Node<K, V>], root: NodeId) -> Self {
        let order = in_order(nodes, root).into_iter();
        let slots = nodes.iter_mut().map(Some).collect();
        IterMut { slots, order }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        let node = self.slots[id].take()?;
        let (k, v) = node.entry.as_mut()?;
        Some((&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for IterMut<'a, K, V> {}
impl<'a, K: 'a, V: 'a> FusedIterator for IterMut<'a, K, V> {}

/// An owning iterator over the entries of an `RBTreeMap`, in ascending key order.
pub struct IntoIter<K, V> {
    nodes: Vec<Node<K, V>>,
    order: vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(nodes: Vec<Node<K, V>>, root: NodeId) -> Self {
        let order = in_order(&nodes, root).into_iter();
        IntoIter { nodes, order }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.nodes[id].entry.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of an `RBTreeMap`, in ascending order.
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K: 'a, V: 'a> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Keys<'a, K, V> {}
impl<'a, K: 'a, V: 'a> FusedIterator for Keys<'a, K, V> {}

/// An iterator over the values of an `RBTreeMap`, in ascending key order.
#[derive(Clone)]
pub struct Values<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K: 'a, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Values<'a, K, V> {}
impl<'a, K: 'a, V: 'a> FusedIterator for Values<'a, K, V> {}

/// A mutable iterator over the values of an `RBTreeMap`, in ascending key order.
pub struct ValuesMut<'a, K, V> {
    pub(super) inner: IterMut<'a, K, V>,
}

impl<'a, K: 'a, V: 'a> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for ValuesMut<'a, K, V> {}
impl<'a, K: 'a, V: 'a> FusedIterator for ValuesMut<'a, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbtree_node::Color;

    // Hand-built arena:   2
    //                    / \
    //                   1   3
    fn small_arena() -> Vec<Node<u32, char>> {
        let mut nil = Node::scratch();
        nil.color = Color::Black;
        let mut one = Node::new(1, 'a');
        let mut two = Node::new(2, 'b');
        let mut three = Node::new(3, 'c');
        two.color = Color::Black;
        two.left = 2;
        two.right = 3;
        one.parent = 1;
        three.parent = 1;
        vec![nil, two, one, three]
    }

    #[test]
    fn test_in_order_ids() {
        let nodes = small_arena();
        assert_eq!(in_order(&nodes, 1), vec![2, 1, 3]);
        assert!(in_order(&nodes, NIL).is_empty());
    }

    #[test]
    fn test_iter_yields_ascending_pairs() {
        let nodes = small_arena();
        let iter = Iter::new(&nodes, 1, 3);
        assert_eq!(iter.len(), 3);
        let pairs: Vec<_> = iter.map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
    }

    #[test]
    fn test_iter_mut_and_into_iter() {
        let mut nodes = small_arena();
        for (k, v) in IterMut::new(&mut nodes, 1) {
            if *k == 2 {
                *v = 'z';
            }
        }
        let owned: Vec<_> = IntoIter::new(nodes, 1).collect();
        assert_eq!(owned, vec![(1, 'a'), (2, 'z'), (3, 'c')]);
    }
}
