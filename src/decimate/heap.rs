/*!
Min-heap of vertex collapses. Every vertex has at most one entry, and the
position of that entry in the heap is tracked so the score of a vertex can be
changed, or its entry removed, without searching for it.
*/

use crate::element::{Handle, VH};
use std::ops::Range;

/// A candidate collapse of `src` into its neighbor `dst`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Entry {
    pub src: VH,
    pub score: f64,
    pub dst: VH,
}

pub(crate) struct CollapseHeap {
    entries: Vec<Entry>,
    slots: Vec<Option<usize>>,
}

fn parent(index: usize) -> Option<usize> {
    if index > 0 {
        Some((index - 1) >> 1)
    } else {
        None
    }
}

fn children(index: usize) -> Range<usize> {
    let off = index << 1;
    (off + 1)..(off + 3)
}

impl CollapseHeap {
    pub fn with_capacity(num_vertices: usize) -> Self {
        CollapseHeap {
            entries: Vec::with_capacity(num_vertices),
            slots: vec![None; num_vertices],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, v: VH) -> bool {
        self.slot(v).is_some()
    }

    fn slot(&self, v: VH) -> Option<usize> {
        self.slots.get(v.index() as usize).copied().flatten()
    }

    fn set_slot(&mut self, v: VH, slot: Option<usize>) {
        let vi = v.index() as usize;
        if vi >= self.slots.len() {
            self.slots.resize(vi + 1, None);
        }
        self.slots[vi] = slot;
    }

    /// Write `entry` at `index` and record its slot.
    fn place(&mut self, index: usize, entry: Entry) {
        self.slots[entry.src.index() as usize] = Some(index);
        self.entries[index] = entry;
    }

    fn sift_up(&mut self, index: usize) -> usize {
        let entry = self.entries[index];
        let mut index = index;
        while let Some(pi) = parent(index) {
            let above = self.entries[pi];
            if above.score <= entry.score {
                break;
            }
            self.place(index, above);
            index = pi;
        }
        self.place(index, entry);
        index
    }

    fn sift_down(&mut self, index: usize) -> usize {
        let entry = self.entries[index];
        let len = self.entries.len();
        let mut index = index;
        loop {
            let child = children(index)
                .filter(|ci| *ci < len)
                .fold(None, |best: Option<usize>, ci| match best {
                    Some(best) if self.entries[best].score <= self.entries[ci].score => {
                        Some(best)
                    }
                    _ => Some(ci),
                });
            match child {
                Some(ci) if self.entries[ci].score < entry.score => {
                    let below = self.entries[ci];
                    self.place(index, below);
                    index = ci;
                }
                _ => break,
            }
        }
        self.place(index, entry);
        index
    }

    /// Move the entry at `index` up or down, whichever restores the heap order.
    fn resift(&mut self, index: usize) {
        if self.sift_up(index) == index {
            self.sift_down(index);
        }
    }

    /// Insert or update the candidate collapse of `src`.
    pub fn set(&mut self, src: VH, score: f64, dst: VH) {
        let entry = Entry { src, score, dst };
        match self.slot(src) {
            Some(index) => {
                self.entries[index] = entry;
                self.resift(index);
            }
            None => {
                self.entries.push(entry);
                let index = self.entries.len() - 1;
                self.set_slot(src, Some(index));
                self.sift_up(index);
            }
        }
    }

    /// Remove the entry of `v`, if it has one.
    pub fn erase(&mut self, v: VH) {
        let Some(index) = self.slot(v) else {
            return;
        };
        self.set_slot(v, None);
        let Some(last) = self.entries.pop() else {
            return;
        };
        if index < self.entries.len() {
            self.entries[index] = last;
            self.set_slot(last.src, Some(index));
            self.resift(index);
        }
    }

    /// Remove the cheapest collapse and return its `(src, dst)` pair.
    ///
    /// # Panics
    ///
    /// If the heap is empty.
    pub fn pop(&mut self) -> (VH, VH) {
        assert!(!self.is_empty(), "Cannot pop from an empty collapse heap");
        let top = self.entries.swap_remove(0);
        self.set_slot(top.src, None);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        (top.src, top.dst)
    }

    /// Add many entries at once and restore the heap order in linear time. An
    /// entry for a vertex that is already present replaces the old one.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = Entry>) {
        for entry in entries {
            match self.slot(entry.src) {
                Some(index) => self.entries[index] = entry,
                None => {
                    self.entries.push(entry);
                    let index = self.entries.len() - 1;
                    self.set_slot(entry.src, Some(index));
                }
            }
        }
        for index in (0..(self.entries.len() / 2)).rev() {
            self.sift_down(index);
        }
    }
}
