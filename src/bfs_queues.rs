// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Queue + index for breadth-first exploration
//!

use std::hash::Hash;

use indexmap::IndexSet;

///
/// A BfsQueue is a queue that doesn't contain duplicate elements.
/// Every element gets an index, in the order elements are first pushed.
/// - the push operation adds an element at the end of the queue
///   if this element hasn't been seen before. Otherwise, it's a no-op.
/// - the pop operations takes the element at the front of the queue
///   if the queue is not empty.
///
/// Popped elements are remembered: pushing them again has no effect.
///
// Invariant: elements in seen[next ..] are still in the queue
#[derive(Debug)]
pub struct BfsQueue<T> {
    seen: IndexSet<T>,
    next: usize,
}

#[allow(dead_code)]
impl<T: Eq + Hash + Clone> BfsQueue<T> {
    ///
    /// Create a new queue
    ///
    pub fn new() -> Self {
        BfsQueue {
            seen: IndexSet::new(),
            next: 0,
        }
    }

    ///
    /// Add an element at the end of the queue if it's not been seen before
    /// - return (i, true) if this is a new element, and i is its index
    /// - return (i, false) otherwise, where i is the index of the element
    ///
    pub fn push(&mut self, element: T) -> (usize, bool) {
        self.seen.insert_full(element)
    }

    ///
    /// Index of an element, if it's been seen
    ///
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.seen.get_index_of(element)
    }

    ///
    /// Check whether the queue is empty
    ///
    pub fn is_empty(&self) -> bool {
        self.next == self.seen.len()
    }

    ///
    /// Size of the queue
    ///
    pub fn len(&self) -> usize {
        self.seen.len() - self.next
    }

    ///
    /// Number of elements seen so far
    ///
    pub fn num_seen(&self) -> usize {
        self.seen.len()
    }

    ///
    /// Get the first element in the queue with its index
    /// - return None if the queue is empty
    ///
    pub fn pop(&mut self) -> Option<(usize, T)> {
        let i = self.next;
        let element = self.seen.get_index(i)?.clone();
        self.next += 1;
        Some((i, element))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_queue() {
        let mut queue = BfsQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.push("a"), (0, true));
        assert_eq!(queue.push("b"), (1, true));
        assert_eq!(queue.push("a"), (0, false));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(), Some((0, "a")));
        // popped elements are not pushed again
        assert_eq!(queue.push("a"), (0, false));
        assert_eq!(queue.push("c"), (2, true));
        assert_eq!(queue.index_of(&"c"), Some(2));
        assert_eq!(queue.index_of(&"d"), None);

        assert_eq!(queue.pop(), Some((1, "b")));
        assert_eq!(queue.pop(), Some((2, "c")));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
        assert_eq!(queue.num_seen(), 3);
    }
}
