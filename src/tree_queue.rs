/*
Min-priority queue over an ordered BTreeMap keyed by (priority, insertion number).

Like KeyedQueue it keeps one entry per payload: a hash map remembers each payload's current key so a cheaper
push can remove the old tree entry before inserting the new one.
*/

use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::hash::Hash;

use crate::min_queue::MinQueue;

#[derive(Debug)]
pub struct TreeQueue<P, T> {
    tree_map: BTreeMap<(P, u64), T>,
    keys: HashMap<T, (P, u64)>,
    next_seq: u64,
}

impl<P, T> TreeQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            tree_map: BTreeMap::new(),
            keys: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn peek(&self) -> Option<(&P, &T)> {
        self.tree_map
            .first_key_value()
            .map(|((priority, _), payload)| (priority, payload))
    }
}

impl<P, T> Default for TreeQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, T> MinQueue<P, T> for TreeQueue<P, T>
where
    P: Ord + Clone,
    T: Eq + Hash + Clone,
{
    fn push(&mut self, priority: P, payload: T) {
        let key = (priority, self.next_seq);

        // Use entry API to avoid double lookup
        match self.keys.entry(payload.clone()) {
            hashbrown::hash_map::Entry::Occupied(mut entry) => {
                if key.0 >= entry.get().0 {
                    return; // No update needed
                }
                self.tree_map.remove(entry.get());
                entry.insert(key.clone());
            }
            hashbrown::hash_map::Entry::Vacant(entry) => {
                entry.insert(key.clone());
            }
        }
        self.next_seq += 1;
        self.tree_map.insert(key, payload);
    }

    fn pop(&mut self) -> Option<(P, T)> {
        let ((priority, _), payload) = self.tree_map.pop_first()?;
        self.keys.remove(&payload);
        Some((priority, payload))
    }

    fn len(&self) -> usize {
        self.tree_map.len()
    }
}
