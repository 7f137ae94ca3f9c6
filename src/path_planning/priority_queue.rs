//! Indexed binary min-heap with decrease/increase-key support.
//!
//! Each key appears at most once. A side table maps every key to its current
//! slot in the heap array, so [`PriorityQueue::update`] can restore heap order
//! in O(log n) without scanning.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use ordered_float::OrderedFloat;

/// Ordering key for queued items.
///
/// Items that never received a finite cost sort after every finite item,
/// regardless of magnitude; items of the same finiteness compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Priority {
    infinite: bool,
    value: OrderedFloat<f64>,
}

impl Priority {
    pub fn finite(value: f64) -> Self {
        Priority { infinite: false, value: OrderedFloat(value) }
    }

    pub fn infinite() -> Self {
        Priority { infinite: true, value: OrderedFloat(f64::INFINITY) }
    }

    pub fn is_finite(&self) -> bool {
        !self.infinite
    }

    pub fn value(&self) -> f64 {
        self.value.into_inner()
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        // false < true puts finite items first
        self.infinite
            .cmp(&other.infinite)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary min-heap over `(key, priority)` pairs
#[derive(Debug, Clone)]
pub struct PriorityQueue<K> {
    heap: Vec<(K, Priority)>,
    slots: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PriorityQueue<K> {
    pub fn new() -> Self {
        PriorityQueue { heap: Vec::new(), slots: HashMap::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PriorityQueue {
            heap: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Current priority of `key`, if queued
    pub fn priority_of(&self, key: &K) -> Option<Priority> {
        self.slots.get(key).map(|&slot| self.heap[slot].1)
    }

    /// Insert `key`. Returns `false` and leaves the queue untouched if the
    /// key is already queued.
    pub fn push(&mut self, key: K, priority: Priority) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        let slot = self.heap.len();
        self.heap.push((key, priority));
        self.slots.insert(key, slot);
        self.sift_up(slot);
        true
    }

    /// Remove and return the minimum item, or `None` once the queue is empty
    pub fn pop(&mut self) -> Option<(K, Priority)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (key, priority) = self.heap.pop()?;
        self.slots.remove(&key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((key, priority))
    }

    /// Minimum item without removing it
    pub fn peek(&self) -> Option<(K, Priority)> {
        self.heap.first().copied()
    }

    /// Change the priority of a queued key and restore heap order.
    /// Returns `false` if the key is not queued.
    pub fn update(&mut self, key: &K, priority: Priority) -> bool {
        let slot = match self.slots.get(key) {
            Some(&slot) => slot,
            None => return false,
        };
        let previous = std::mem::replace(&mut self.heap[slot].1, priority);
        match priority.cmp(&previous) {
            Ordering::Less => self.sift_up(slot),
            Ordering::Greater => self.sift_down(slot),
            Ordering::Equal => {}
        }
        true
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.slots.insert(self.heap[i].0, i);
        self.slots.insert(self.heap[j].0, j);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].1 >= self.heap[parent].1 {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < len && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        let ordered = (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2].1 <= self.heap[i].1);
        let indexed = self
            .heap
            .iter()
            .enumerate()
            .all(|(slot, (key, _))| self.slots.get(key) == Some(&slot));
        ordered && indexed && self.slots.len() == self.heap.len()
    }
}
