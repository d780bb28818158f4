// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Statistical test selection and the label/data-type choices that shape the
//! group assignment table.

use std::fmt;

/// Statistical test the submitted samples will be run through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TestType {
    #[default]
    TTest,
    DESeq,
    Anova,
    AnovaNegBin,
}

impl TestType {
    /// All test types in the order they are offered.
    pub const ALL: [TestType; 4] = [
        TestType::TTest,
        TestType::DESeq,
        TestType::Anova,
        TestType::AnovaNegBin,
    ];

    /// Token posted in the `test_type` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::TTest => "ttest",
            TestType::DESeq => "DESeq",
            TestType::Anova => "ANOVA",
            TestType::AnovaNegBin => "ANOVAnegbin",
        }
    }

    /// Human-readable name, also used as the prefix of cutoff messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TestType::TTest => "T-test",
            TestType::DESeq => "DESeq",
            TestType::Anova => "One-way ANOVA",
            TestType::AnovaNegBin => "One-way ANOVA (negative binomial)",
        }
    }

    /// ANOVA variants take a user-chosen number of groups; the others compare two.
    pub fn is_anova(&self) -> bool {
        matches!(self, TestType::Anova | TestType::AnovaNegBin)
    }
}

/// Which naming scheme labels the rows of the group assignment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelSource {
    #[default]
    Default,
    SampleName,
    FileName,
}

impl LabelSource {
    pub const ALL: [LabelSource; 3] = [
        LabelSource::Default,
        LabelSource::SampleName,
        LabelSource::FileName,
    ];

    /// Token posted in the `label_type` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::Default => "default",
            LabelSource::SampleName => "samplename",
            LabelSource::FileName => "filename",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LabelSource::Default => "Default labels",
            LabelSource::SampleName => "Sample names",
            LabelSource::FileName => "File names",
        }
    }
}

impl fmt::Display for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Kind of RNA measured by the uploaded cartridges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    MRna,
    MiRna,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::MRna => "mRNA",
            DataType::MiRna => "miRNA",
        }
    }

    /// Content normalization preselected whenever the data type changes.
    pub fn default_content_normalization(&self) -> ContentNormalization {
        match self {
            DataType::MRna => ContentNormalization::Housekeeping,
            DataType::MiRna => ContentNormalization::TopExpressed,
        }
    }
}

/// Sample content normalization strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContentNormalization {
    #[default]
    Housekeeping,
    TopExpressed,
}

impl ContentNormalization {
    pub const ALL: [ContentNormalization; 2] = [
        ContentNormalization::Housekeeping,
        ContentNormalization::TopExpressed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentNormalization::Housekeeping => "housekeeping",
            ContentNormalization::TopExpressed => "top",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContentNormalization::Housekeeping => "Housekeeping genes",
            ContentNormalization::TopExpressed => "Top expressed targets",
        }
    }
}

/// Test selection plus the number of groups samples are split into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestConfiguration {
    pub test_type: TestType,
    /// Requested number of ANOVA groups; ignored for two-group tests.
    pub feature_count: usize,
    pub label_source: LabelSource,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            test_type: TestType::default(),
            feature_count: 2,
            label_source: LabelSource::default(),
        }
    }
}

impl TestConfiguration {
    /// Number of selectable groups: always 2 for t-test/DESeq.
    pub fn group_count(&self) -> usize {
        if self.test_type.is_anova() {
            self.feature_count.max(2)
        } else {
            2
        }
    }
}
