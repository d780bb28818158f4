// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Group enumeration for the sample assignment table.
//!
//! Given the chosen test and label source, produce the selectable groups and
//! one row per sample with its preselected radio. The output is a plain value
//! so views can render it and tests can compare it.

use crate::logic::error::FormError;
use crate::models::groups::{Assignment, GroupAssignment};
use crate::models::test_config::{LabelSource, TestConfiguration};
use crate::models::upload::UploadSlot;

/// Minimum sample count (exclusive) before the ANOVA group count can be chosen.
pub const ADJUSTABLE_FEATURES_MIN_SAMPLES: usize = 3;

/// Candidate row labels for each label source, in sample order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvailableLabels {
    pub default_labels: Vec<String>,
    pub sample_names: Vec<String>,
    pub file_names: Vec<String>,
    /// Server-suggested group per sample.
    pub initial_groups: Vec<usize>,
}

impl AvailableLabels {
    /// Derive label lists from the upload rows.
    ///
    /// Sample and file name lists are only populated once every row has one,
    /// so a partially named form cannot render a table with blank labels.
    pub fn from_rows(rows: &[UploadSlot], initial_groups: &[usize]) -> Self {
        let default_labels = rows
            .iter()
            .map(|slot| format!("Sample {}", slot.index + 1))
            .collect();

        let sample_names = if rows.iter().all(UploadSlot::has_name) {
            rows.iter().map(|s| s.sample_name.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let file_names = rows
            .iter()
            .map(UploadSlot::file_name)
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();

        Self {
            default_labels,
            sample_names,
            file_names,
            initial_groups: initial_groups.to_vec(),
        }
    }

    pub fn list(&self, source: LabelSource) -> &[String] {
        match source {
            LabelSource::Default => &self.default_labels,
            LabelSource::SampleName => &self.sample_names,
            LabelSource::FileName => &self.file_names,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.default_labels.len()
    }

    /// Whether the ANOVA group count is offered to the user.
    pub fn allows_feature_choice(&self) -> bool {
        self.sample_count() > ADJUSTABLE_FEATURES_MIN_SAMPLES
    }
}

/// One selectable radio column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupLabel {
    pub option: Assignment,
    pub caption: String,
}

/// One sample row of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureRow {
    pub label: String,
    pub preselected: Assignment,
}

/// Rendered assignment table: groups in column order plus sample rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureTable {
    groups: Vec<GroupLabel>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Real groups, without the implicit "Exclude" column.
    pub fn groups(&self) -> &[GroupLabel] {
        &self.groups
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Radio columns as rendered: the groups followed by "Exclude".
    pub fn options(&self) -> impl Iterator<Item = GroupLabel> + '_ {
        self.groups.iter().cloned().chain(std::iter::once(GroupLabel {
            option: Assignment::Excluded,
            caption: "Exclude".to_string(),
        }))
    }

    /// Assignment state right after rendering.
    pub fn initial_assignment(&self) -> GroupAssignment {
        GroupAssignment::new(self.rows.iter().map(|r| r.preselected).collect())
    }
}

/// Group count actually used for `config`.
///
/// Two-group tests always use 2. ANOVA variants use the requested count only
/// when enough samples exist to offer the choice, otherwise `default_count`.
pub fn effective_feature_count(
    config: &TestConfiguration,
    labels: &AvailableLabels,
    default_count: usize,
) -> usize {
    if !config.test_type.is_anova() {
        2
    } else if labels.allows_feature_choice() {
        config.feature_count.max(2)
    } else {
        default_count.max(2)
    }
}

/// Build the assignment table for `config`.
///
/// # Errors
///
/// Returns [`FormError::Configuration`] when the list selected by the label
/// source is empty.
pub fn enumerate(
    config: &TestConfiguration,
    labels: &AvailableLabels,
    default_count: usize,
) -> Result<FeatureTable, FormError> {
    let names = labels.list(config.label_source);
    if names.is_empty() {
        return Err(FormError::Configuration {
            label_source: config.label_source,
        });
    }

    let group_count = effective_feature_count(config, labels, default_count);
    let groups = if config.test_type.is_anova() {
        (0..group_count)
            .map(|g| GroupLabel {
                option: Assignment::Group(g),
                caption: (g + 1).to_string(),
            })
            .collect()
    } else {
        vec![
            GroupLabel {
                option: Assignment::Group(0),
                caption: "Control".to_string(),
            },
            GroupLabel {
                option: Assignment::Group(1),
                caption: "Case".to_string(),
            },
        ]
    };

    let rows = names
        .iter()
        .enumerate()
        .map(|(idx, label)| FeatureRow {
            label: label.clone(),
            preselected: Assignment::from_hint(
                labels.initial_groups.get(idx).copied(),
                group_count,
            ),
        })
        .collect();

    Ok(FeatureTable { groups, rows })
}
