// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Error taxonomy of the form core.

use thiserror::Error;

use crate::models::test_config::LabelSource;

/// Failures raised while building or resizing form fragments.
///
/// User-input validation problems are not errors of this type; they are
/// reported as an ordered message list by [`crate::logic::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The requested label list has no entries.
    #[error("{label_source} are not available for every sample yet.")]
    Configuration { label_source: LabelSource },

    /// Group queues only grow.
    #[error("Reducing the number of groups from {current} to {requested} is not supported.")]
    NotSupported { current: usize, requested: usize },

    #[error("Please enter 2 or more groups.")]
    TooFewGroups(usize),

    /// A file was refused by a queue's transport filter.
    #[error("{file}: {reason}")]
    Rejected { file: String, reason: String },
}
