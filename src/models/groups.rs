// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-sample group membership (UI-agnostic).

/// Radio selection for one sample row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Assignment {
    /// No radio button checked yet.
    #[default]
    Unassigned,
    /// Zero-based group index.
    Group(usize),
    Excluded,
}

impl Assignment {
    /// Map a server-suggested group index onto a table with `group_count` groups.
    ///
    /// Indices past the last group select "Exclude"; a missing hint leaves the
    /// row unassigned.
    pub fn from_hint(hint: Option<usize>, group_count: usize) -> Self {
        match hint {
            Some(g) if g < group_count => Assignment::Group(g),
            Some(_) => Assignment::Excluded,
            None => Assignment::Unassigned,
        }
    }

    /// Value posted for the row's `datalabelN` radio, `None` when nothing is checked.
    pub fn wire_value(&self) -> Option<String> {
        match self {
            Assignment::Unassigned => None,
            Assignment::Group(g) => Some(g.to_string()),
            Assignment::Excluded => Some("exclude".to_string()),
        }
    }
}

/// Ordered assignments, one per sample row of the rendered table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupAssignment {
    items: Vec<Assignment>,
}

impl GroupAssignment {
    pub fn new(items: Vec<Assignment>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Assignment] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<Assignment> {
        self.items.get(index).copied()
    }

    /// Change one row. Returns `false` for an out-of-range index.
    pub fn set(&mut self, index: usize, assignment: Assignment) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = assignment;
                true
            }
            None => false,
        }
    }

    /// True until a table has been rendered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.items.len()
    }

    pub fn excluded_count(&self) -> usize {
        self.items
            .iter()
            .filter(|a| matches!(a, Assignment::Excluded))
            .count()
    }

    /// Number of samples placed in `group`.
    pub fn members(&self, group: usize) -> usize {
        self.items
            .iter()
            .filter(|a| **a == Assignment::Group(group))
            .count()
    }
}
