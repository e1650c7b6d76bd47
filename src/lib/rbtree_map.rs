//! A red-black tree map implementation.
#![warn(missing_docs)]

use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::Index;

mod rbtree_error;
mod rbtree_iter;
mod rbtree_node;

pub use rbtree_error::MapError;
pub use rbtree_iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use rbtree_node::Color;

use rbtree_node::{Node, NodeId, Side, NIL};

/// An ordered map backed by a red-black tree.
///
/// Nodes live in an arena. Slot `0` holds the black sentinel that stands in
/// for every missing child and for the root's parent.
#[derive(Clone)]
pub struct RBTreeMap<K, V> {
    nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    root: NodeId,
    length: usize,
}

impl<K, V> RBTreeMap<K, V> {
    /// Creates a new empty RBTreeMap.
    pub fn new() -> Self {
        let mut sentinel = Node::scratch();
        sentinel.color = Color::Black;
        RBTreeMap {
            nodes: vec![sentinel],
            free: Vec::new(),
            root: NIL,
            length: 0,
        }
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.length
    }
    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Removes every entry. The sentinel is kept.
    pub fn clear(&mut self) {
        debug!("clearing red-black tree with {} entries", self.length);
        self.nodes.truncate(1);
        let sentinel = &mut self.nodes[NIL];
        sentinel.parent = NIL;
        sentinel.left = NIL;
        sentinel.right = NIL;
        sentinel.color = Color::Black;
        self.free.clear();
        self.root = NIL;
        self.length = 0;
    }

    /// Returns the number of black nodes on any path from the root down to a
    /// leaf sentinel, not counting the root itself. Zero for an empty map.
    pub fn black_height(&self) -> usize {
        if self.root == NIL {
            return 0;
        }
        let mut height = 0;
        let mut current = self.nodes[self.root].left;
        loop {
            if self.nodes[current].is_black() {
                height += 1;
            }
            if current == NIL {
                return height;
            }
            current = self.nodes[current].left;
        }
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        if self.root == NIL {
            return None;
        }
        let (k, v) = self.nodes[self.minimum(self.root)].pair();
        Some((k, v))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        if self.root == NIL {
            return None;
        }
        let mut current = self.root;
        while self.nodes[current].right != NIL {
            current = self.nodes[current].right;
        }
        let (k, v) = self.nodes[current].pair();
        Some((k, v))
    }

    fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id].parent
    }

    fn child(&self, id: NodeId, side: Side) -> NodeId {
        self.nodes[id].child(side)
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id].color = color;
    }

    fn is_red(&self, id: NodeId) -> bool {
        self.nodes[id].is_red()
    }

    fn is_black(&self, id: NodeId) -> bool {
        self.nodes[id].is_black()
    }

    /// Which child of its parent `id` is. The parent link of `id` must be current,
    /// which also holds for the sentinel while a deletion is being repaired.
    fn side_of(&self, id: NodeId) -> Side {
        let parent = self.parent(id);
        if self.nodes[parent].left == id {
            Side::Left
        } else {
            Side::Right
        }
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.nodes[id].left != NIL {
            id = self.nodes[id].left;
        }
        id
    }

    // Points `parent`'s link to `old` at `new`, or the root when `parent` is the sentinel.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent == NIL {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            self.nodes[parent].right = new;
        }
    }

    /// Rotates the edge between `x` and its child opposite to `side`, so that
    /// child takes `x`'s place and `x` goes down towards `side`.
    ///
    /// ```text
    ///      x                  y
    ///     / \    Left        / \
    ///    a   y   ---->      x   c
    ///       / \            / \
    ///      b   c          a   b
    /// ```
    fn rotate(&mut self, x: NodeId, side: Side) {
        let other = side.opposite();
        let y = self.child(x, other);
        debug_assert!(y != NIL, "rotation needs a real child to promote");

        let inner = self.child(y, side);
        self.nodes[x].set_child(other, inner);
        if inner != NIL {
            self.nodes[inner].parent = x;
        }

        let parent = self.parent(x);
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, y);

        self.nodes[y].set_child(side, x);
        self.nodes[x].parent = y;
    }

    // Color-blind splice: `v` takes `u`'s place under `u`'s parent.
    // `v` may be the sentinel, whose parent link is then set too.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let parent = self.parent(u);
        self.replace_child(parent, u, v);
        self.nodes[v].parent = parent;
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<(K, V)> {
        let node = mem::replace(&mut self.nodes[id], Node::scratch());
        self.free.push(id);
        node.entry
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.is_red(self.parent(z)) {
            // A red parent is never the root, so the grandparent is a real node.
            let p = self.parent(z);
            let g = self.parent(p);
            let side = self.side_of(p);
            let uncle = self.child(g, side.opposite());

            if self.is_red(uncle) {
                trace!("insert fixup: red uncle, recoloring");
                self.set_color(p, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(g, Color::Red);
                z = g;
            } else {
                if z == self.child(p, side.opposite()) {
                    trace!("insert fixup: inner grandchild, rotating {:?} at parent", side);
                    z = p;
                    self.rotate(z, side);
                }
                trace!("insert fixup: outer grandchild, rotating {:?} at grandparent", side.opposite());
                let p = self.parent(z);
                let g = self.parent(p);
                self.set_color(p, Color::Black);
                self.set_color(g, Color::Red);
                self.rotate(g, side.opposite());
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.is_black(x) {
            let p = self.parent(x);
            let side = self.side_of(x);
            let far = side.opposite();
            let mut w = self.child(p, far);

            if self.is_red(w) {
                trace!("delete fixup: red sibling, rotating {:?} at parent", side);
                self.set_color(w, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, side);
                w = self.child(p, far);
            }
            debug_assert!(w != NIL, "a doubly black node always has a real sibling");

            if self.is_black(self.child(w, side)) && self.is_black(self.child(w, far)) {
                trace!("delete fixup: black nephews, moving deficit up");
                self.set_color(w, Color::Red);
                x = p;
            } else {
                if self.is_black(self.child(w, far)) {
                    trace!("delete fixup: red near nephew, rotating {:?} at sibling", far);
                    let near = self.child(w, side);
                    self.set_color(near, Color::Black);
                    self.set_color(w, Color::Red);
                    self.rotate(w, far);
                    w = self.child(p, far);
                }
                trace!("delete fixup: red far nephew, rotating {:?} at parent", side);
                let parent_color = self.nodes[p].color;
                self.set_color(w, parent_color);
                self.set_color(p, Color::Black);
                let far_nephew = self.child(w, far);
                self.set_color(far_nephew, Color::Black);
                self.rotate(p, side);
                x = self.root;
            }
        }
        self.set_color(x, Color::Black);
    }
}

impl<K, V> Default for RBTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RBTreeMap<K, V>
where
    K: Ord,
{
    fn search<Q: ?Sized + Ord>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
    {
        let mut current = self.root;
        while current != NIL {
            let node = &self.nodes[current];
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return Some(current),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q: ?Sized + Ord>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.search(key).map(|id| self.nodes[id].value())
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q: ?Sized + Ord>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
    {
        let id = self.search(key)?;
        let (k, v) = self.nodes[id].pair();
        Some((k, v))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q: ?Sized + Ord>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        let id = self.search(key)?;
        Some(self.nodes[id].value_mut())
    }

    /// Returns true if the map contains the key.
    pub fn contains_key<Q: ?Sized + Ord>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.search(key).is_some()
    }

    /// Returns true if the map contains the pair's key. The value is not compared.
    pub fn contains(&self, item: &(K, V)) -> bool {
        self.contains_key(&item.0)
    }

    /// Replaces the value stored under an existing key.
    /// Returns false and leaves the map untouched if the key is absent.
    pub fn set<Q: ?Sized + Ord>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
    {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Inserts a key-value pair into the map.
    /// Returns false without touching the map if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut parent = NIL;
        let mut side = Side::Left;
        let mut current = self.root;
        while current != NIL {
            parent = current;
            let node = &self.nodes[current];
            match key.cmp(node.key()) {
                Ordering::Less => {
                    side = Side::Left;
                    current = node.left;
                }
                Ordering::Greater => {
                    side = Side::Right;
                    current = node.right;
                }
                Ordering::Equal => {
                    trace!("insert: duplicate key ignored");
                    return false;
                }
            }
        }

        let z = self.alloc(Node::new(key, value));
        self.nodes[z].parent = parent;
        if parent == NIL {
            self.root = z;
        } else {
            self.nodes[parent].set_child(side, z);
        }

        self.insert_fixup(z);
        self.length += 1;
        true
    }

    /// Removes a key from the map. Returns true if it was present.
    pub fn remove<Q: ?Sized + Ord>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the stored key and value if it was present.
    pub fn remove_entry<Q: ?Sized + Ord>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
    {
        let z = self.search(key)?;

        let mut removed_color = self.nodes[z].color;
        let x;
        if self.nodes[z].left == NIL {
            x = self.nodes[z].right;
            self.transplant(z, x);
        } else if self.nodes[z].right == NIL {
            x = self.nodes[z].left;
            self.transplant(z, x);
        } else {
            let y = self.minimum(self.nodes[z].right);
            removed_color = self.nodes[y].color;
            x = self.nodes[y].right;
            if self.parent(y) == z {
                self.nodes[x].parent = y;
            } else {
                self.transplant(y, x);
                let right = self.nodes[z].right;
                self.nodes[y].right = right;
                self.nodes[right].parent = y;
            }
            self.transplant(z, y);
            let left = self.nodes[z].left;
            self.nodes[y].left = left;
            self.nodes[left].parent = y;
            self.nodes[y].color = self.nodes[z].color;
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }
        self.nodes[NIL].parent = NIL;

        self.length -= 1;
        self.release(z)
    }

    /// Clones every entry into `dest`, starting at `index`, in ascending key order.
    ///
    /// Fails without writing anything if `index` is past the end of `dest` or
    /// the remaining room is smaller than the map.
    pub fn copy_to(&self, dest: &mut [(K, V)], index: usize) -> Result<(), MapError>
    where
        K: Clone,
        V: Clone,
    {
        if index > dest.len() {
            return Err(MapError::IndexOutOfRange {
                index,
                len: dest.len(),
            });
        }
        let available = dest.len() - index;
        if available < self.length {
            return Err(MapError::DestinationTooSmall {
                needed: self.length,
                available,
            });
        }
        for (slot, (k, v)) in dest[index..].iter_mut().zip(self.iter()) {
            *slot = (k.clone(), v.clone());
        }
        Ok(())
    }

    /// Walks the whole tree and checks ordering, coloring, black height,
    /// parent links and the element count.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.nodes[NIL].is_red() {
            return Err(MapError::InvariantViolated("sentinel is red".to_string()));
        }
        if self.root != NIL {
            if self.is_red(self.root) {
                return Err(MapError::InvariantViolated("root is red".to_string()));
            }
            if self.parent(self.root) != NIL {
                return Err(MapError::InvariantViolated(format!(
                    "root {} has parent {}",
                    self.root,
                    self.parent(self.root)
                )));
            }
        }

        let (count, _) = self.validate_subtree(self.root, None, None)?;
        if count != self.length {
            return Err(MapError::InvariantViolated(format!(
                "counted {} nodes but length is {}",
                count, self.length
            )));
        }
        Ok(())
    }

    // Returns the node count and the black height of the subtree, the sentinel counting as one.
    fn validate_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(usize, usize), MapError> {
        if id == NIL {
            return Ok((0, 1));
        }
        let node = &self.nodes[id];
        let key = match node.entry {
            Some((ref k, _)) => k,
            None => {
                return Err(MapError::InvariantViolated(format!(
                    "node {} is linked but has no entry",
                    id
                )))
            }
        };

        if lower.map_or(false, |lo| key <= lo) || upper.map_or(false, |hi| key >= hi) {
            return Err(MapError::InvariantViolated(format!(
                "node {} is out of key order",
                id
            )));
        }
        if node.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(MapError::InvariantViolated(format!(
                "red node {} has a red child",
                id
            )));
        }
        for child in [node.left, node.right] {
            if child != NIL && self.parent(child) != id {
                return Err(MapError::InvariantViolated(format!(
                    "node {} has parent {} but hangs under {}",
                    child,
                    self.parent(child),
                    id
                )));
            }
        }

        let (left_count, left_height) = self.validate_subtree(node.left, lower, Some(key))?;
        let (right_count, right_height) = self.validate_subtree(node.right, Some(key), upper)?;
        if left_height != right_height {
            return Err(MapError::InvariantViolated(format!(
                "black height differs under node {}: {} left, {} right",
                id, left_height, right_height
            )));
        }
        let own = if node.is_black() { 1 } else { 0 };
        Ok((left_count + right_count + 1, left_height + own))
    }
}

impl<K, V> RBTreeMap<K, V> {
    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root, self.length)
    }
    /// Returns a mutable iterator over the key-value pairs.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.nodes, self.root)
    }
    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }
    /// Returns an iterator over the values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
    /// Returns a mutable iterator over the values in ascending key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RBTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RBTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RBTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root)
    }
}

impl<K: Ord, V> Extend<(K, V)> for RBTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RBTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RBTreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K, Q: ?Sized, V> Index<&Q> for RBTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord,
{
    type Output = V;

    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RBTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for RBTreeMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RBTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
