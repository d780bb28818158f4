// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Countdown over per-group upload completions.

use std::collections::BTreeSet;

/// Releases once every group has reported completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionBarrier {
    total: usize,
    arrived: BTreeSet<usize>,
    released: bool,
}

impl CompletionBarrier {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            arrived: BTreeSet::new(),
            released: false,
        }
    }

    /// Record that `group` finished.
    ///
    /// Returns `true` exactly once: on the arrival that makes the number of
    /// distinct completed groups equal the total. Repeated or out-of-range
    /// arrivals are ignored.
    pub fn arrive(&mut self, group: usize) -> bool {
        if self.released || group >= self.total {
            return false;
        }
        self.arrived.insert(group);
        if self.arrived.len() == self.total {
            self.released = true;
            return true;
        }
        false
    }

    pub fn completed(&self) -> usize {
        self.arrived.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
