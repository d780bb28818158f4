// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Which optional form sections are visible for the current selections.
//!
//! Visibility is derived from [`FormState`] alone through one declarative
//! table; no section is toggled imperatively.

use std::collections::BTreeSet;

use crate::logic::enumerator::ADJUSTABLE_FEATURES_MIN_SAMPLES;
use crate::models::cutoffs::NegativeNormalization;
use crate::models::test_config::{ContentNormalization, DataType, LabelSource, TestType};

/// Optional form section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    TTest,
    DESeq,
    Anova,
    AnovaNegBin,
    AnovaFeatures,
    NegativeNormalization,
    NegativeNormalizationTTest,
    ContentNormalization,
    MiRna,
}

impl Section {
    /// Stable tag naming the section.
    pub fn tag(&self) -> &'static str {
        match self {
            Section::TTest => "ttest-panel",
            Section::DESeq => "deseq-panel",
            Section::Anova => "anova-panel",
            Section::AnovaNegBin => "anovanegbin-panel",
            Section::AnovaFeatures => "anova-features-panel",
            Section::NegativeNormalization => "negnorm-panel",
            Section::NegativeNormalizationTTest => "negnorm-4-panel",
            Section::ContentNormalization => "scn-panel",
            Section::MiRna => "mirna-panel",
        }
    }
}

/// Sections always shown for a test type.
pub fn sections_for(test_type: TestType) -> &'static [Section] {
    match test_type {
        TestType::TTest => &[
            Section::TTest,
            Section::NegativeNormalization,
            Section::ContentNormalization,
        ],
        TestType::DESeq => &[Section::DESeq],
        TestType::Anova => &[
            Section::Anova,
            Section::NegativeNormalization,
            Section::ContentNormalization,
        ],
        TestType::AnovaNegBin => &[Section::AnovaNegBin],
    }
}

/// The t-test negative normalization cutoff only applies to tests that show
/// negative normalization at all.
pub fn shows_negative_ttest_cutoff(test_type: TestType, choice: NegativeNormalization) -> bool {
    choice == NegativeNormalization::StudentTTest
        && matches!(test_type, TestType::TTest | TestType::Anova)
}

/// Transient selections driving visibility.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FormState {
    pub test_type: TestType,
    pub label_source: LabelSource,
    /// Requested ANOVA group count.
    pub feature_count: usize,
    pub negative_normalization: NegativeNormalization,
    pub data_type: DataType,
    pub content_normalization: ContentNormalization,
    /// Rows currently available for assignment.
    pub sample_count: usize,
}

impl FormState {
    pub fn new(default_feature_count: usize) -> Self {
        Self {
            feature_count: default_feature_count,
            ..Default::default()
        }
    }

    pub fn visible_sections(&self) -> BTreeSet<Section> {
        let mut visible: BTreeSet<Section> = sections_for(self.test_type).iter().copied().collect();

        if self.test_type.is_anova() && self.sample_count > ADJUSTABLE_FEATURES_MIN_SAMPLES {
            visible.insert(Section::AnovaFeatures);
        }
        if shows_negative_ttest_cutoff(self.test_type, self.negative_normalization) {
            visible.insert(Section::NegativeNormalizationTTest);
        }
        if self.data_type == DataType::MiRna {
            visible.insert(Section::MiRna);
        }
        visible
    }

    pub fn set_test_type(&mut self, test_type: TestType) -> BTreeSet<Section> {
        self.test_type = test_type;
        self.visible_sections()
    }

    pub fn set_label_source(&mut self, source: LabelSource) -> BTreeSet<Section> {
        self.label_source = source;
        self.visible_sections()
    }

    pub fn set_feature_count(&mut self, count: usize) -> BTreeSet<Section> {
        self.feature_count = count.max(2);
        self.visible_sections()
    }

    pub fn set_negative_normalization(
        &mut self,
        choice: NegativeNormalization,
    ) -> BTreeSet<Section> {
        self.negative_normalization = choice;
        self.visible_sections()
    }

    /// Switching data type also resets the content normalization to the type's default.
    pub fn set_data_type(&mut self, data_type: DataType) -> BTreeSet<Section> {
        self.data_type = data_type;
        self.content_normalization = data_type.default_content_normalization();
        self.visible_sections()
    }

    pub fn set_sample_count(&mut self, count: usize) -> BTreeSet<Section> {
        self.sample_count = count;
        self.visible_sections()
    }
}
