// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Numeric cutoff inputs per test type plus negative-control normalization.
//!
//! Values are kept as the raw text the user typed; they are parsed only when
//! validated or posted.

use crate::models::test_config::TestType;

/// Background subtraction based on the negative control probes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NegativeNormalization {
    #[default]
    None,
    Mean,
    MeanPlusTwoSd,
    Max,
    /// Per-target Student's t-test against the negatives; has its own p-value cutoff.
    StudentTTest,
}

impl NegativeNormalization {
    pub const ALL: [NegativeNormalization; 5] = [
        NegativeNormalization::None,
        NegativeNormalization::Mean,
        NegativeNormalization::MeanPlusTwoSd,
        NegativeNormalization::Max,
        NegativeNormalization::StudentTTest,
    ];

    /// Numeric choice posted in `negative_normalization`.
    pub fn value(&self) -> u8 {
        match self {
            NegativeNormalization::None => 0,
            NegativeNormalization::Mean => 1,
            NegativeNormalization::MeanPlusTwoSd => 2,
            NegativeNormalization::Max => 3,
            NegativeNormalization::StudentTTest => 4,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NegativeNormalization::None => "None",
            NegativeNormalization::Mean => "Mean of negatives",
            NegativeNormalization::MeanPlusTwoSd => "Mean + 2 SD of negatives",
            NegativeNormalization::Max => "Maximum of negatives",
            NegativeNormalization::StudentTTest => "Student's t-test against negatives",
        }
    }
}

/// P-value and mean thresholds for one test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCutoffs {
    pub p_value: String,
    pub mean: String,
}

impl Default for TestCutoffs {
    fn default() -> Self {
        Self {
            p_value: "0.05".into(),
            mean: "1".into(),
        }
    }
}

/// All cutoff inputs of the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizationCutoffs {
    ttest: TestCutoffs,
    deseq: TestCutoffs,
    anova: TestCutoffs,
    anova_negbin: TestCutoffs,
    pub negative_normalization: NegativeNormalization,
    pub negative_p_value: String,
}

impl Default for NormalizationCutoffs {
    fn default() -> Self {
        Self {
            ttest: TestCutoffs::default(),
            deseq: TestCutoffs::default(),
            anova: TestCutoffs::default(),
            anova_negbin: TestCutoffs::default(),
            negative_normalization: NegativeNormalization::default(),
            negative_p_value: "0.05".into(),
        }
    }
}

impl NormalizationCutoffs {
    pub fn for_test(&self, test_type: TestType) -> &TestCutoffs {
        match test_type {
            TestType::TTest => &self.ttest,
            TestType::DESeq => &self.deseq,
            TestType::Anova => &self.anova,
            TestType::AnovaNegBin => &self.anova_negbin,
        }
    }

    pub fn for_test_mut(&mut self, test_type: TestType) -> &mut TestCutoffs {
        match test_type {
            TestType::TTest => &mut self.ttest,
            TestType::DESeq => &mut self.deseq,
            TestType::Anova => &mut self.anova,
            TestType::AnovaNegBin => &mut self.anova_negbin,
        }
    }
}

/// Parse a cutoff field; blanks, garbage and non-finite values yield `None`.
pub fn parse_cutoff(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
