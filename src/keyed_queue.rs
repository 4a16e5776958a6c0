/*
Min-priority queue that holds at most one entry per payload, backed by orx's binary heap with a position map.

Pushing a payload that is already queued only lowers its key, so consumers never see stale entries. Ties are
still broken by insertion order: the key is (priority, insertion number).
*/

use std::hash::Hash;

use orx_priority_queue::*;

use crate::min_queue::MinQueue;

#[derive(Debug)]
pub struct KeyedQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    pq: BinaryHeapWithMap<T, (P, u64)>,
    next_seq: u64,
}

impl<P, T> KeyedQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            pq: BinaryHeapWithMap::new(),
            next_seq: 0,
        }
    }

    pub fn contains(&self, payload: &T) -> bool {
        self.pq.contains(payload)
    }
}

impl<P, T> Default for KeyedQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> MinQueue<P, T> for KeyedQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    fn push(&mut self, priority: P, payload: T) {
        // Only lower an existing key; a higher or equal priority is dropped.
        if let Some((current, _)) = self.pq.key_of(&payload) {
            if current <= priority {
                return;
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pq.decrease_key_or_push(&payload, (priority, seq));
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.pq.pop().map(|(payload, (priority, _))| (priority, payload))
    }

    fn len(&self) -> usize {
        self.pq.len()
    }
}
