/*
Minimum-priority queues over (priority, payload) pairs.

Every backing pops the smallest priority first and breaks ties by insertion order. SortedQueue keeps a sorted
Sequence (O(n) push, O(1) pop); HeapQueue uses a binary heap keyed by (priority, insertion number).
Popping an empty queue returns None.
*/

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::sequence::Sequence;

pub trait MinQueue<P, T> {
    fn push(&mut self, priority: P, payload: T);
    fn pop(&mut self) -> Option<(P, T)>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
struct Entry<P, T> {
    priority: P,
    seq: u64,
    payload: T,
}

impl<P: Ord, T> PartialEq for Entry<P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<P: Ord, T> Eq for Entry<P, T> {}

// Min-heap by (priority, seq)
impl<P: Ord, T> Ord for Entry<P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse ordering for min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<P: Ord, T> PartialOrd for Entry<P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
pub struct HeapQueue<P, T> {
    heap: BinaryHeap<Entry<P, T>>,
    next_seq: u64,
}

impl<P: Ord, T> HeapQueue<P, T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<P: Ord, T> Default for HeapQueue<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ord, T> MinQueue<P, T> for HeapQueue<P, T> {
    fn push(&mut self, priority: P, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            payload,
        });
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.heap.pop().map(|e| (e.priority, e.payload))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Sorted chain of entries. A new entry goes after every entry whose priority is <= its own.
#[derive(Debug)]
pub struct SortedQueue<P, T> {
    list: Sequence<(P, T)>,
}

impl<P: Ord, T> SortedQueue<P, T> {
    pub fn new() -> Self {
        Self {
            list: Sequence::new(),
        }
    }

    pub fn peek(&self) -> Option<&(P, T)> {
        self.list.front()
    }
}

impl<P: Ord, T> Default for SortedQueue<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ord, T> MinQueue<P, T> for SortedQueue<P, T> {
    fn push(&mut self, priority: P, payload: T) {
        self.list
            .insert_after_run((priority, payload), |e, new| e.0 <= new.0);
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.list.pop_front()
    }

    fn len(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<Q: MinQueue<u64, char>>(mut q: Q) -> Vec<(u64, char)> {
        let mut out = Vec::new();
        while let Some(pair) = q.pop() {
            out.push(pair);
        }
        out
    }

    fn fill<Q: MinQueue<u64, char>>(q: &mut Q) {
        q.push(5, 'a');
        q.push(3, 'b');
        q.push(3, 'c');
        q.push(1, 'd');
    }

    #[test]
    fn sorted_queue_pops_by_priority_then_insertion() {
        let mut q = SortedQueue::new();
        fill(&mut q);
        assert_eq!(q.len(), 4);
        assert_eq!(q.peek(), Some(&(1, 'd')));
        assert_eq!(drain(q), vec![(1, 'd'), (3, 'b'), (3, 'c'), (5, 'a')]);
    }

    #[test]
    fn heap_queue_pops_by_priority_then_insertion() {
        let mut q = HeapQueue::new();
        fill(&mut q);
        assert_eq!(q.len(), 4);
        assert_eq!(drain(q), vec![(1, 'd'), (3, 'b'), (3, 'c'), (5, 'a')]);
    }

    #[test]
    fn many_equal_priorities_stay_fifo() {
        let mut sorted = SortedQueue::new();
        let mut heap = HeapQueue::new();
        for (i, c) in "abcdefghij".chars().enumerate() {
            let p = (i % 3) as u64;
            sorted.push(p, c);
            heap.push(p, c);
        }
        let expected: Vec<char> = "adgjbehcfi".chars().collect();
        assert_eq!(drain(sorted).into_iter().map(|e| e.1).collect::<Vec<_>>(), expected);
        assert_eq!(drain(heap).into_iter().map(|e| e.1).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn empty_pop_is_none() {
        let mut sorted: SortedQueue<u64, char> = SortedQueue::new();
        let mut heap: HeapQueue<u64, char> = HeapQueue::new();
        assert!(sorted.is_empty());
        assert!(heap.is_empty());
        assert_eq!(sorted.pop(), None);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn interleaved_push_pop() {
        let mut q = SortedQueue::new();
        q.push(4, 'x');
        q.push(2, 'y');
        assert_eq!(q.pop(), Some((2, 'y')));
        q.push(1, 'z');
        q.push(4, 'w');
        assert_eq!(drain(q), vec![(1, 'z'), (4, 'x'), (4, 'w')]);
    }
}
