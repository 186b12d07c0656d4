//! Open set for the route search with in-place priority updates.
//!
//! Unlike a `BinaryHeap` with lazy deletion, every open key appears exactly
//! once in the ordered sequence: re-adding a key moves it to the position
//! of its new priority.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Search status of a key that has been seen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    /// Waiting in the frontier.
    Open,
    /// Popped; never reopened.
    Closed,
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    priority: f64,
    status: NodeStatus,
}

/// Keys ordered by ascending priority, plus the status of every key seen.
///
/// Among equal priorities the most recently added key pops first.
#[derive(Clone, Debug)]
pub struct PriorityFrontier<K> {
    items: VecDeque<K>,
    entries: HashMap<K, Entry>,
}

impl<K: Copy + Eq + Hash> Default for PriorityFrontier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PriorityFrontier<K> {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Index of the first item whose priority is not below `priority`.
    fn lower_bound(&self, priority: f64) -> usize {
        let entries = &self.entries;
        self.items
            .partition_point(|k| entries.get(k).is_some_and(|e| e.priority < priority))
    }

    /// Open `key` with `priority`, or move an already open key to its new
    /// priority. Closed keys stay closed; returns `false` for them.
    pub fn add(&mut self, key: K, priority: f64) -> bool {
        if let Some(old) = self.entries.get(&key).copied() {
            if old.status == NodeStatus::Closed {
                return false;
            }
            self.remove_item(key, old.priority);
        }
        self.entries.insert(
            key,
            Entry {
                priority,
                status: NodeStatus::Open,
            },
        );
        let at = self.lower_bound(priority);
        self.items.insert(at, key);
        true
    }

    /// Drop `key` from the ordered sequence, searching the run of items
    /// sharing its current priority.
    fn remove_item(&mut self, key: K, priority: f64) {
        let start = self.lower_bound(priority);
        let found = self
            .items
            .iter()
            .skip(start)
            .position(|k| *k == key)
            .map(|i| i + start);
        if let Some(i) = found {
            self.items.remove(i);
        }
    }

    /// Remove and return the key with the lowest priority, closing it.
    pub fn pop(&mut self) -> Option<K> {
        let key = self.items.pop_front()?;
        if let Some(e) = self.entries.get_mut(&key) {
            e.status = NodeStatus::Closed;
        }
        Some(key)
    }

    /// Status of `key`, or `None` if it was never added.
    #[inline]
    pub fn status(&self, key: &K) -> Option<NodeStatus> {
        self.entries.get(key).map(|e| e.status)
    }

    /// Whether `key` is waiting in the frontier.
    #[inline]
    pub fn is_open(&self, key: &K) -> bool {
        self.status(key) == Some(NodeStatus::Open)
    }

    /// Whether `key` has been popped.
    #[inline]
    pub fn is_closed(&self, key: &K) -> bool {
        self.status(key) == Some(NodeStatus::Closed)
    }

    /// Current priority of an open key.
    #[inline]
    pub fn priority(&self, key: &K) -> Option<f64> {
        self.entries
            .get(key)
            .filter(|e| e.status == NodeStatus::Open)
            .map(|e| e.priority)
    }

    /// Whether no key is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of open keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
