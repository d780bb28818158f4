// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Repeatable form fragments: per-sample upload rows and per-group upload queues.

use log::{debug, info};

use crate::logic::error::FormError;
use crate::models::job::FormSettings;
use crate::models::upload::{GroupQueue, TransportConfig, UploadMetadata, UploadSlot};

/// Upload rows of single-upload mode. Rows only grow and shrink at the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadRows {
    slots: Vec<UploadSlot>,
}

impl UploadRows {
    pub fn slots(&self) -> &[UploadSlot] {
        &self.slots
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut UploadSlot> {
        self.slots.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append a row and return its index.
    pub fn add_upload_row(&mut self) -> usize {
        let index = self.slots.len();
        self.slots.push(UploadSlot::new(index));
        debug!("added upload row {index}");
        index
    }

    /// Drop the highest-index row. Returns `false` when there is none.
    pub fn remove_last_upload_row(&mut self) -> bool {
        match self.slots.pop() {
            Some(slot) => {
                debug!("removed upload row {}", slot.index);
                true
            }
            None => false,
        }
    }

    /// The remove control is only offered while a row exists.
    pub fn shows_remove_control(&self) -> bool {
        !self.slots.is_empty()
    }
}

/// Upload queues of multi-upload mode, one per group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupQueues {
    queues: Vec<GroupQueue>,
    job_id: String,
    settings: FormSettings,
}

impl GroupQueues {
    pub fn new(job_id: String, settings: FormSettings) -> Self {
        Self {
            queues: Vec::new(),
            job_id,
            settings,
        }
    }

    pub fn queues(&self) -> &[GroupQueue] {
        &self.queues
    }

    pub fn queue_mut(&mut self, group: usize) -> Option<&mut GroupQueue> {
        self.queues.get_mut(group)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Large group counts are confirmed by the user before they are applied.
    pub fn needs_confirmation(&self, requested: usize) -> bool {
        requested > self.settings.confirm_group_threshold
    }

    /// Grow the queue list to `requested` groups.
    ///
    /// # Errors
    ///
    /// - [`FormError::TooFewGroups`] when fewer than 2 groups are requested.
    /// - [`FormError::NotSupported`] when `requested` is below the current count;
    ///   existing queues are left untouched.
    pub fn set_group_count(&mut self, requested: usize) -> Result<&[GroupQueue], FormError> {
        if requested < 2 {
            return Err(FormError::TooFewGroups(requested));
        }
        let current = self.queues.len();
        if requested < current {
            return Err(FormError::NotSupported { current, requested });
        }

        for group_id in current..requested {
            let queue = GroupQueue::new(
                group_id,
                group_title(group_id, requested),
                self.transport_config(group_id),
            );
            self.queues.push(queue);
        }
        if requested > current {
            info!("group queues grown from {current} to {requested}");
        }
        Ok(&self.queues)
    }

    fn transport_config(&self, group_id: usize) -> TransportConfig {
        TransportConfig {
            endpoint: self.settings.upload_endpoint.clone(),
            max_file_size_bytes: self.settings.max_file_size_bytes,
            accepted_extensions: self.settings.accepted_extensions.clone(),
            metadata: UploadMetadata {
                job_id: self.job_id.clone(),
                group_id,
            },
        }
    }
}

/// Heading for a queue; the two-group layout names its groups.
fn group_title(group_id: usize, total: usize) -> String {
    match (total, group_id) {
        (2, 0) => "Group 1: Control".to_string(),
        (2, 1) => "Group 2: Case Study".to_string(),
        _ => format!("Group {}", group_id + 1),
    }
}
