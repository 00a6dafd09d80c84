use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use super::Coord;

#[derive(Clone, Debug, PartialEq, Eq)]
struct FrontierEntry {
    f_cost: usize,
    sequence: u64, // insertion rank, survives decrease-key
    position: Coord,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .cmp(&other.f_cost)
            // Earlier insertion wins ties.
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open set ordered by total estimate, ties broken by insertion order.
#[derive(Debug, Default)]
pub struct Frontier {
    open: BTreeSet<FrontierEntry>,
    keys: HashMap<Coord, (usize, u64)>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `position` with total estimate `f_cost`. A position already in
    /// the frontier is re-inserted as if new.
    pub fn push(&mut self, position: Coord, f_cost: usize) {
        if let Some((old_f_cost, old_sequence)) = self.keys.remove(&position) {
            self.open.remove(&FrontierEntry {
                f_cost: old_f_cost,
                sequence: old_sequence,
                position,
            });
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.keys.insert(position, (f_cost, sequence));
        self.open.insert(FrontierEntry {
            f_cost,
            sequence,
            position,
        });
    }

    pub fn pop_min(&mut self) -> Option<Coord> {
        let entry = self.open.pop_first()?;
        self.keys.remove(&entry.position);
        Some(entry.position)
    }

    /// Lower the total estimate of a queued position, keeping its insertion
    /// rank. Returns `false` if the position is absent or `f_cost` is not
    /// lower than the recorded one.
    pub fn decrease_key(&mut self, position: Coord, f_cost: usize) -> bool {
        let Some(&(old_f_cost, sequence)) = self.keys.get(&position) else {
            return false;
        };
        if f_cost >= old_f_cost {
            return false;
        }

        self.open.remove(&FrontierEntry {
            f_cost: old_f_cost,
            sequence,
            position,
        });
        self.open.insert(FrontierEntry {
            f_cost,
            sequence,
            position,
        });
        self.keys.insert(position, (f_cost, sequence));
        true
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn contains(&self, position: Coord) -> bool {
        self.keys.contains_key(&position)
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.keys.clear();
        self.next_sequence = 0;
    }
}
