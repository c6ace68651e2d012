//! Sparse coordinate-keyed storage backing the maze grids and frontier.

use std::{collections::HashMap, marker::PhantomData};

use endless_maze_core::{Axis, CellCoord, WallCoord};
use rand::Rng;

/// Fixed-arity integer tuple usable as a sparse key.
pub(crate) trait Coordinates: Copy {
    /// Tuple components, outermost level first.
    type Components: AsRef<[i32]>;

    /// Splits the key into its integer components.
    fn components(&self) -> Self::Components;
}

impl Coordinates for CellCoord {
    type Components = [i32; 2];

    fn components(&self) -> [i32; 2] {
        [self.column(), self.row()]
    }
}

impl Coordinates for WallCoord {
    type Components = [i32; 3];

    fn components(&self) -> [i32; 3] {
        let axis = match self.axis() {
            Axis::Vertical => 0,
            Axis::Horizontal => 1,
        };
        [axis, self.column(), self.row()]
    }
}

#[derive(Clone, Debug)]
enum Node<V> {
    Branch(HashMap<i32, Node<V>>),
    Slot(Option<V>),
}

/// Mapping from a coordinate tuple to a value, nested one level per component.
///
/// Intermediate levels are created on demand and never reclaimed; removing a
/// key only empties its terminal slot.
#[derive(Clone, Debug)]
pub(crate) struct SparseRelation<K, V> {
    root: HashMap<i32, Node<V>>,
    key: PhantomData<fn(K)>,
}

impl<K: Coordinates, V> SparseRelation<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            root: HashMap::new(),
            key: PhantomData,
        }
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub(crate) fn set(&mut self, key: K, value: V) {
        let components = key.components();
        let Some((last, prefix)) = components.as_ref().split_last() else {
            return;
        };

        let mut level = &mut self.root;
        for component in prefix {
            let node = level
                .entry(*component)
                .or_insert_with(|| Node::Branch(HashMap::new()));
            if let Node::Slot(_) = node {
                *node = Node::Branch(HashMap::new());
            }
            level = match node {
                Node::Branch(children) => children,
                Node::Slot(_) => return,
            };
        }

        let _ = level.insert(*last, Node::Slot(Some(value)));
    }

    /// Retrieves the value stored under `key`, if any.
    pub(crate) fn get(&self, key: K) -> Option<&V> {
        let components = key.components();
        let (last, prefix) = components.as_ref().split_last()?;

        let mut level = &self.root;
        for component in prefix {
            match level.get(component)? {
                Node::Branch(children) => level = children,
                Node::Slot(_) => return None,
            }
        }

        match level.get(last)? {
            Node::Slot(value) => value.as_ref(),
            Node::Branch(_) => None,
        }
    }

    fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.slot_mut(key)?.as_mut()
    }

    /// Empties the slot stored under `key`, returning the previous value.
    pub(crate) fn remove(&mut self, key: K) -> Option<V> {
        self.slot_mut(key)?.take()
    }

    pub(crate) fn clear(&mut self) {
        self.root.clear();
    }

    fn slot_mut(&mut self, key: K) -> Option<&mut Option<V>> {
        let components = key.components();
        let (last, prefix) = components.as_ref().split_last()?;

        let mut level = &mut self.root;
        for component in prefix {
            match level.get_mut(component)? {
                Node::Branch(children) => level = children,
                Node::Slot(_) => return None,
            }
        }

        match level.get_mut(last)? {
            Node::Slot(value) => Some(value),
            Node::Branch(_) => None,
        }
    }
}

/// Set of coordinate tuples supporting uniform random removal.
///
/// Members live in a dense list; the relation maps each member to its list
/// index so removal is a swap with the last element.
#[derive(Clone, Debug)]
pub(crate) struct SparseSet<K> {
    indices: SparseRelation<K, usize>,
    members: Vec<K>,
}

impl<K: Coordinates> SparseSet<K> {
    pub(crate) fn new() -> Self {
        Self {
            indices: SparseRelation::new(),
            members: Vec::new(),
        }
    }

    /// Adds `key` to the set. Returns `false` when it was already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        if self.contains(key) {
            return false;
        }
        self.indices.set(key, self.members.len());
        self.members.push(key);
        true
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.indices.get(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes the member stored at `index` of the dense list.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<K> {
        if index >= self.members.len() {
            return None;
        }

        let removed = self.members.swap_remove(index);
        let _ = self.indices.remove(removed);
        if let Some(moved) = self.members.get(index).copied() {
            if let Some(slot) = self.indices.get_mut(moved) {
                *slot = index;
            }
        }
        Some(removed)
    }

    /// Removes a uniformly chosen member, or returns `None` when empty.
    pub(crate) fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<K> {
        if self.members.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.members.len());
        self.remove_at(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.members.iter().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.indices.clear();
        self.members.clear();
    }
}
