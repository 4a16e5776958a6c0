/*
Singly-linked FIFO sequence stored in an index arena.

Cells live in a growable Vec and link to each other by slot index instead of by pointer. Slots released by
pop_front are recycled by later pushes. The tail slot is cached, so push_back does not walk the chain.
*/

#[derive(Debug, Clone)]
struct Cell<T> {
    value: Option<T>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Sequence<T> {
    cells: Vec<Cell<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            self.cells[slot] = Cell {
                value: Some(value),
                next,
            };
            slot
        } else {
            self.cells.push(Cell {
                value: Some(value),
                next,
            });
            self.cells.len() - 1
        }
    }

    pub fn push_back(&mut self, value: T) {
        let slot = self.alloc(value, None);
        match self.tail {
            Some(tail) => self.cells[tail].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    pub fn push_front(&mut self, value: T) {
        let slot = self.alloc(value, self.head);
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    /// Removes the head element. Returns `None` on an empty sequence.
    pub fn pop_front(&mut self) -> Option<T> {
        let slot = self.head?;
        let cell = &mut self.cells[slot];
        let value = cell.value.take();
        self.head = cell.next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        self.free.push(slot);
        self.len -= 1;
        value
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|slot| self.cells[slot].value.as_ref())
    }

    /// Inserts `value` right after the leading run of elements `e` for which `before(e, &value)` holds.
    ///
    /// When the sequence is empty, or `before` already fails on the head, `value` becomes the new head.
    /// With `before = |e, v| e <= v` on an ascending sequence this inserts ahead of the first strictly
    /// greater element, so equal elements keep their insertion order.
    pub fn insert_after_run<F>(&mut self, value: T, before: F)
    where
        F: Fn(&T, &T) -> bool,
    {
        let head = match self.head {
            Some(head) if self.value_at(head).is_some_and(|e| before(e, &value)) => head,
            _ => {
                self.push_front(value);
                return;
            }
        };

        let mut current = head;
        while let Some(next) = self.cells[current].next {
            if !self.value_at(next).is_some_and(|e| before(e, &value)) {
                break;
            }
            current = next;
        }

        let next = self.cells[current].next;
        let slot = self.alloc(value, next);
        self.cells[current].next = Some(slot);
        if self.tail == Some(current) {
            self.tail = Some(slot);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            sequence: self,
            cursor: self.head,
        }
    }

    fn value_at(&self, slot: usize) -> Option<&T> {
        self.cells[slot].value.as_ref()
    }
}

pub struct Iter<'a, T> {
    sequence: &'a Sequence<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let cell = &self.sequence.cells[slot];
        self.cursor = cell.next;
        cell.value.as_ref()
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
