/*!
    append-only bounded list, the storage behind every registry

    nodes are never removed nor relinked, so a list is acyclic by construction and its traversal order is always the insertion order
*/

use log::*;
use crate::error::Error;


/// bounded singly-linked sequence of `N` nodes at most
#[derive(Clone, Debug)]
pub struct List<T, const N: usize> {
    nodes: heapless::Vec<T, N>,
}

impl<T, const N: usize> List<T, N> {
    pub const fn new() -> Self {
        Self {nodes: heapless::Vec::new()}
    }
    /// link a new node at the tail, returning its index
    pub fn append(&mut self, payload: T) -> Result<usize, Error> {
        let index = self.nodes.len();
        self.nodes.push(payload).map_err(|_| {
            warn!("list of {} nodes is full", N);
            Error::CapacityExceeded
            })?;
        Ok(index)
    }
    /// first node, if any
    pub fn head(&self) -> Option<Node<'_, T, N>> {
        Node::at(self, 0)
    }
    pub fn get(&self, index: usize) -> Option<&T> {
        self.nodes.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.nodes.get_mut(index)
    }
    pub fn len(&self) -> usize {self.nodes.len()}
    pub fn is_empty(&self) -> bool {self.nodes.is_empty()}
    pub const fn capacity(&self) -> usize {N}

    /// payloads in insertion order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.nodes.iter()
    }
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.nodes.iter_mut()
    }
    /// index and payload of the most recently appended node matching `predicate`
    pub fn find_last(&self, predicate: impl Fn(&T) -> bool) -> Option<(usize, &T)> {
        self.nodes.iter().enumerate().rev()
            .find(|(_, payload)| predicate(*payload))
    }
}

impl<T, const N: usize> Default for List<T, N> {
    fn default() -> Self {Self::new()}
}

impl<'l, T, const N: usize> IntoIterator for &'l List<T, N> {
    type Item = &'l T;
    type IntoIter = core::slice::Iter<'l, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


/// cursor on a list node, following the forward link
pub struct Node<'l, T, const N: usize> {
    list: &'l List<T, N>,
    index: usize,
}
impl<'l, T, const N: usize> Node<'l, T, N> {
    fn at(list: &'l List<T, N>, index: usize) -> Option<Self> {
        (index < list.len()).then_some(Self {list, index})
    }
    /// position of this node from the head
    pub fn index(&self) -> usize {self.index}
    /// node linked after this one, `None` at the tail
    pub fn next(&self) -> Option<Self> {
        Self::at(self.list, self.index + 1)
    }
    pub fn payload(&self) -> &'l T {
        &self.list.nodes[self.index]
    }
}
impl<T, const N: usize> Clone for Node<'_, T, N> {
    fn clone(&self) -> Self {
        Self {list: self.list, index: self.index}
    }
}
impl<T, const N: usize> Copy for Node<'_, T, N> {}

/// payload of a possibly absent node
pub fn payload<'l, T, const N: usize>(node: Option<Node<'l, T, N>>) -> Option<&'l T> {
    node.map(|node| node.payload())
}
