// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Encode a form session into the field list the analysis server expects.

use std::path::PathBuf;

use crate::logic::session::{FormSession, UploadMode};
use crate::logic::validate::SubmitIntent;
use crate::models::test_config::TestType;

/// Multipart form body: text fields in insertion order plus file parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormPost {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, PathBuf)>,
}

impl FormPost {
    fn text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value posted under `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub fn encode(session: &FormSession, intent: SubmitIntent) -> FormPost {
    let mut post = FormPost::default();
    let state = session.state();
    let config = session.effective_config();
    let cutoffs = session.cutoffs();

    post.text("submit", intent.as_str());
    post.text("job_id", session.context().job_id.as_str());
    post.text("email", session.email().trim());

    let num_feat = match session.mode() {
        UploadMode::Rows => {
            let slots = session.rows().slots();
            for slot in slots {
                if let Some(path) = &slot.file {
                    post.files
                        .push((format!("sampledata{}", slot.index), path.clone()));
                }
                post.text(
                    format!("samplename{}", slot.index),
                    slot.sample_name.trim(),
                );
            }
            for (pos, slot) in slots.iter().enumerate() {
                if let Some(name) = slot.file_name() {
                    post.text(format!("filename{}", pos + 1), name);
                }
            }
            for (pos, assignment) in session.assignment().items().iter().enumerate() {
                if let Some(value) = assignment.wire_value() {
                    post.text(format!("datalabel{}", pos + 1), value);
                }
            }
            config.group_count()
        }
        // Files already went up per group; the server only needs the count.
        UploadMode::Queues => session.queues().len(),
    };

    post.text("num_feat", num_feat.to_string());
    post.text("test_type", config.test_type.as_str());
    post.text("label_type", config.label_source.as_str());
    if config.test_type.is_anova() {
        post.text("ANOVA_features", config.feature_count.to_string());
    }
    post.text("data_type", state.data_type.as_str());
    post.text("scn", state.content_normalization.as_str());

    let ttest = cutoffs.for_test(TestType::TTest);
    post.text("ttest_pvalue", ttest.p_value.trim());
    post.text("ttest_mean", ttest.mean.trim());
    let deseq = cutoffs.for_test(TestType::DESeq);
    post.text("DESeq_pvalue", deseq.p_value.trim());
    post.text("DESeq_mean", deseq.mean.trim());
    // Both ANOVA variants share the server's ANOVA_* fields.
    let anova_type = if config.test_type == TestType::AnovaNegBin {
        TestType::AnovaNegBin
    } else {
        TestType::Anova
    };
    let anova = cutoffs.for_test(anova_type);
    post.text("ANOVA_pvalue", anova.p_value.trim());
    post.text("ANOVA_mean", anova.mean.trim());

    post.text(
        "negative_normalization",
        cutoffs.negative_normalization.value().to_string(),
    );
    post.text("negative_4_pvalue", cutoffs.negative_p_value.trim());

    post
}
