// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Pre-submission checks producing user-facing messages.
//!
//! [`validate`] is a pure function of a [`Submission`] snapshot; messages come
//! out in check order so the modal reads top-down like the form.

use std::sync::LazyLock;

use regex::Regex;

use crate::logic::error::FormError;
use crate::logic::visibility::shows_negative_ttest_cutoff;
use crate::models::cutoffs::{NormalizationCutoffs, parse_cutoff};
use crate::models::groups::GroupAssignment;
use crate::models::test_config::TestConfiguration;
use crate::models::upload::{GroupQueue, UploadSlot};

/// `local@domain.tld`, with an optional two-letter second-level suffix.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)*)@((?:[A-Za-z0-9_-]+\.)*[A-Za-z0-9_][A-Za-z0-9_-]{0,66})\.([a-z]{2,6}(?:\.[a-z]{2})?)$",
    )
    .expect("email pattern is a valid regex")
});

/// Which of the two form buttons was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SubmitIntent {
    #[default]
    Submit,
    Cancel,
}

impl SubmitIntent {
    /// Value of the pressed `submit` button.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitIntent::Submit => "Submit",
            SubmitIntent::Cancel => "Cancel",
        }
    }
}

/// Files collected by the active upload mode.
#[derive(Clone, Copy, Debug)]
pub enum Uploads<'a> {
    Rows(&'a [UploadSlot]),
    Queues(&'a [GroupQueue]),
}

/// Complete form snapshot at submission time.
#[derive(Clone, Copy, Debug)]
pub struct Submission<'a> {
    pub config: &'a TestConfiguration,
    pub groups: &'a GroupAssignment,
    pub uploads: Uploads<'a>,
    pub cutoffs: &'a NormalizationCutoffs,
    pub email: &'a str,
    pub intent: SubmitIntent,
    /// Why the assignment table could not be built from the rows, if it failed.
    pub table_error: Option<&'a FormError>,
}

/// Whether `email` matches the address pattern the server accepts.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Run every check in order.
///
/// Returns `Err` with the ordered violation messages when any check fails.
/// A cancel request is never blocked.
pub fn validate(submission: &Submission<'_>) -> Result<(), Vec<String>> {
    if submission.intent == SubmitIntent::Cancel {
        return Ok(());
    }

    let mut msgs = Vec::new();

    if !is_valid_email(submission.email) {
        msgs.push("Please enter a valid email address.".to_string());
    }

    match submission.uploads {
        Uploads::Rows(rows) => {
            check_rows(rows, &mut msgs);
            // Samples exist but none of them can be assigned to a group.
            if let (2.., Some(err)) = (rows.len(), submission.table_error) {
                msgs.push(err.to_string());
            }
        }
        Uploads::Queues(queues) => check_queues(queues, &mut msgs),
    }

    // Nothing to count until the assignment table has been rendered.
    if !submission.groups.is_empty() {
        check_groups(submission.config, submission.groups, &mut msgs);
    }

    check_cutoffs(submission.config, submission.cutoffs, &mut msgs);

    if msgs.is_empty() { Ok(()) } else { Err(msgs) }
}

fn check_rows(rows: &[UploadSlot], msgs: &mut Vec<String>) {
    match rows.len() {
        0 => msgs.push("Please add files to upload.".to_string()),
        1 => msgs.push("Please upload more than one file.".to_string()),
        total => {
            if rows.iter().any(|r| !r.has_file()) {
                msgs.push("Please select a file for each file added.".to_string());
            }
            let unnamed = rows.iter().filter(|r| !r.has_name()).count();
            if unnamed > 0 && unnamed != total {
                msgs.push(
                    "If you wish to use sample names, please assign names to all samples."
                        .to_string(),
                );
            }
        }
    }
}

fn check_queues(queues: &[GroupQueue], msgs: &mut Vec<String>) {
    if queues.len() < 2 {
        msgs.push(FormError::TooFewGroups(queues.len()).to_string());
        return;
    }
    let two_groups = queues.len() == 2;
    for (idx, queue) in queues.iter().enumerate() {
        if !queue.is_empty() {
            continue;
        }
        let msg = match (two_groups, idx) {
            (true, 0) => "Group 1 - Control: You must at least upload one file.".to_string(),
            (true, _) => "Group 2 - Case Study: You must at least upload one file.".to_string(),
            (false, _) => format!("Group {idx}: You must at least upload one file."),
        };
        msgs.push(msg);
    }
}

fn check_groups(config: &TestConfiguration, groups: &GroupAssignment, msgs: &mut Vec<String>) {
    let total = groups.total_samples();
    let excluded = groups.excluded_count();
    let all_excluded = excluded == total;
    let one_left = excluded + 1 == total;

    if !all_excluded && !one_left {
        if config.test_type.is_anova() {
            for group in 0..config.group_count() {
                if groups.members(group) == 0 {
                    let n = group + 1;
                    msgs.push(format!(
                        "There are no samples in group {n}. Please select one or more samples for group {n}."
                    ));
                }
            }
        } else {
            if groups.members(0) == 0 {
                msgs.push("There are no samples in the control group. Please select one or more samples for the control group.".to_string());
            }
            if groups.members(1) == 0 {
                msgs.push("There are no samples in the case group. Please select one or more samples for the case group.".to_string());
            }
        }
    }

    if all_excluded {
        msgs.push("All samples are excluded; there is no data to process. Please select samples for the other features.".to_string());
    }
    if one_left {
        msgs.push("Only one sample is currently selected for use; all other samples are excluded. Please select one or more samples to process.".to_string());
    }
}

fn check_cutoffs(config: &TestConfiguration, cutoffs: &NormalizationCutoffs, msgs: &mut Vec<String>) {
    let test_type = config.test_type;

    if shows_negative_ttest_cutoff(test_type, cutoffs.negative_normalization) {
        let in_range = parse_cutoff(&cutoffs.negative_p_value).is_some_and(|p| p > 0.0 && p < 1.0);
        if !in_range {
            msgs.push(
                "Negative normalization Student's t-test p-value cutoff must be: 0 < cutoff < 1."
                    .to_string(),
            );
        }
    }

    let active = cutoffs.for_test(test_type);
    let name = test_type.display_name();
    if !parse_cutoff(&active.p_value).is_some_and(|p| p > 0.0 && p <= 1.0) {
        msgs.push(format!("{name} p-value cutoff must be: 0 < cutoff <= 1."));
    }
    if !parse_cutoff(&active.mean).is_some_and(|m| m > 0.0) {
        msgs.push(format!("{name} mean cutoff must be: cutoff > 0."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cutoffs::NegativeNormalization;
    use crate::models::groups::Assignment;
    use crate::models::job::FormSettings;
    use crate::logic::builder::GroupQueues;
    use crate::models::test_config::{LabelSource, TestType};
    use std::path::PathBuf;

    const EMAIL: &str = "lab.member@uni-example.edu";

    fn config(test_type: TestType, feature_count: usize) -> TestConfiguration {
        TestConfiguration {
            test_type,
            feature_count,
            label_source: LabelSource::Default,
        }
    }

    fn rows(n: usize) -> Vec<UploadSlot> {
        (0..n)
            .map(|i| UploadSlot {
                index: i,
                file: Some(PathBuf::from(format!("/data/s{i}.RCC"))),
                sample_name: String::new(),
            })
            .collect()
    }

    fn run(
        config: &TestConfiguration,
        groups: &GroupAssignment,
        slots: &[UploadSlot],
        cutoffs: &NormalizationCutoffs,
        email: &str,
    ) -> Result<(), Vec<String>> {
        validate(&Submission {
            config,
            groups,
            uploads: Uploads::Rows(slots),
            cutoffs,
            email,
            intent: SubmitIntent::Submit,
            table_error: None,
        })
    }

    #[test]
    fn accepts_common_addresses_and_rejects_garbage() {
        assert!(is_valid_email("a.b@example.com"));
        assert!(is_valid_email("First-Last@lab.example.co.uk"));
        assert!(is_valid_email("USER@EXAMPLE.ORG"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn bad_email_and_no_rows() {
        let result = run(
            &config(TestType::TTest, 2),
            &GroupAssignment::default(),
            &[],
            &NormalizationCutoffs::default(),
            "bad",
        );
        assert_eq!(
            result.unwrap_err(),
            vec![
                "Please enter a valid email address.",
                "Please add files to upload."
            ]
        );
    }

    #[test]
    fn single_row_skips_per_row_checks() {
        let mut slots = rows(1);
        slots[0].file = None;
        let result = run(
            &config(TestType::TTest, 2),
            &GroupAssignment::default(),
            &slots,
            &NormalizationCutoffs::default(),
            EMAIL,
        );
        assert_eq!(result.unwrap_err(), vec!["Please upload more than one file."]);
    }

    #[test]
    fn missing_files_and_partial_names_are_aggregated() {
        let mut slots = rows(3);
        slots[0].file = None;
        slots[2].file = None;
        slots[1].sample_name = "liver".into();
        let result = run(
            &config(TestType::TTest, 2),
            &GroupAssignment::default(),
            &slots,
            &NormalizationCutoffs::default(),
            EMAIL,
        );
        assert_eq!(
            result.unwrap_err(),
            vec![
                "Please select a file for each file added.",
                "If you wish to use sample names, please assign names to all samples."
            ]
        );
    }

    #[test]
    fn all_or_no_names_are_fine() {
        let mut slots = rows(2);
        let cfg = config(TestType::TTest, 2);
        let groups = GroupAssignment::default();
        let cutoffs = NormalizationCutoffs::default();
        assert!(run(&cfg, &groups, &slots, &cutoffs, EMAIL).is_ok());

        slots[0].sample_name = "a".into();
        slots[1].sample_name = "b".into();
        assert!(run(&cfg, &groups, &slots, &cutoffs, EMAIL).is_ok());
    }

    #[test]
    fn empty_control_group_is_reported() {
        let groups = GroupAssignment::new(vec![Assignment::Group(1), Assignment::Unassigned]);
        let msgs = run(
            &config(TestType::TTest, 2),
            &groups,
            &rows(2),
            &NormalizationCutoffs::default(),
            EMAIL,
        )
        .unwrap_err();

        assert!(msgs.contains(&"There are no samples in the control group. Please select one or more samples for the control group.".to_string()));
        assert!(!msgs.iter().any(|m| m.contains("case group")));
    }

    #[test]
    fn anova_p_value_out_of_range_is_the_only_message() {
        let groups = GroupAssignment::new(vec![
            Assignment::Group(0),
            Assignment::Group(1),
            Assignment::Group(2),
            Assignment::Group(0),
        ]);
        let mut cutoffs = NormalizationCutoffs::default();
        cutoffs.for_test_mut(TestType::TTest).p_value = "7".into();
        cutoffs.for_test_mut(TestType::Anova).p_value = "1.5".into();

        let msgs = run(&config(TestType::Anova, 3), &groups, &rows(4), &cutoffs, EMAIL).unwrap_err();
        assert_eq!(msgs, vec!["One-way ANOVA p-value cutoff must be: 0 < cutoff <= 1."]);
    }

    #[test]
    fn anova_reports_each_empty_group() {
        let groups = GroupAssignment::new(vec![
            Assignment::Group(1),
            Assignment::Group(1),
            Assignment::Unassigned,
            Assignment::Unassigned,
        ]);
        let msgs = run(
            &config(TestType::AnovaNegBin, 3),
            &groups,
            &rows(4),
            &NormalizationCutoffs::default(),
            EMAIL,
        )
        .unwrap_err();
        assert_eq!(
            msgs,
            vec![
                "There are no samples in group 1. Please select one or more samples for group 1.",
                "There are no samples in group 3. Please select one or more samples for group 3."
            ]
        );
    }

    #[test]
    fn all_excluded_skips_group_counts() {
        let groups = GroupAssignment::new(vec![Assignment::Excluded; 4]);
        let msgs = run(
            &config(TestType::TTest, 2),
            &groups,
            &rows(4),
            &NormalizationCutoffs::default(),
            EMAIL,
        )
        .unwrap_err();
        assert_eq!(
            msgs,
            vec!["All samples are excluded; there is no data to process. Please select samples for the other features."]
        );
    }

    #[test]
    fn one_remaining_sample_is_reported() {
        let groups = GroupAssignment::new(vec![
            Assignment::Excluded,
            Assignment::Group(0),
            Assignment::Excluded,
        ]);
        let msgs = run(
            &config(TestType::DESeq, 2),
            &groups,
            &rows(3),
            &NormalizationCutoffs::default(),
            EMAIL,
        )
        .unwrap_err();
        assert_eq!(
            msgs,
            vec!["Only one sample is currently selected for use; all other samples are excluded. Please select one or more samples to process."]
        );
    }

    #[test]
    fn negative_ttest_cutoff_is_strict_and_only_when_visible() {
        let groups = GroupAssignment::new(vec![Assignment::Group(0), Assignment::Group(1)]);
        let mut cutoffs = NormalizationCutoffs::default();
        cutoffs.negative_normalization = NegativeNormalization::StudentTTest;
        cutoffs.negative_p_value = "1".into();

        let msgs = run(&config(TestType::TTest, 2), &groups, &rows(2), &cutoffs, EMAIL).unwrap_err();
        assert_eq!(
            msgs,
            vec!["Negative normalization Student's t-test p-value cutoff must be: 0 < cutoff < 1."]
        );

        assert!(run(&config(TestType::DESeq, 2), &groups, &rows(2), &cutoffs, EMAIL).is_ok());
    }

    #[test]
    fn mean_must_be_positive_and_numeric() {
        let groups = GroupAssignment::new(vec![Assignment::Group(0), Assignment::Group(1)]);
        let mut cutoffs = NormalizationCutoffs::default();
        cutoffs.for_test_mut(TestType::DESeq).mean = "0".into();
        cutoffs.for_test_mut(TestType::DESeq).p_value = "abc".into();

        let msgs = run(&config(TestType::DESeq, 2), &groups, &rows(2), &cutoffs, EMAIL).unwrap_err();
        assert_eq!(
            msgs,
            vec![
                "DESeq p-value cutoff must be: 0 < cutoff <= 1.",
                "DESeq mean cutoff must be: cutoff > 0."
            ]
        );
    }

    #[test]
    fn p_value_of_one_is_allowed() {
        let groups = GroupAssignment::new(vec![Assignment::Group(0), Assignment::Group(1)]);
        let mut cutoffs = NormalizationCutoffs::default();
        cutoffs.for_test_mut(TestType::TTest).p_value = "1".into();
        assert!(run(&config(TestType::TTest, 2), &groups, &rows(2), &cutoffs, EMAIL).is_ok());
    }

    #[test]
    fn empty_queues_are_named_by_layout() {
        let mut queues = GroupQueues::new("j".into(), FormSettings::default());
        queues.set_group_count(2).unwrap();
        let cfg = config(TestType::TTest, 2);
        let groups = GroupAssignment::default();
        let cutoffs = NormalizationCutoffs::default();

        let msgs = validate(&Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Queues(queues.queues()),
            cutoffs: &cutoffs,
            email: EMAIL,
            intent: SubmitIntent::Submit,
            table_error: None,
        })
        .unwrap_err();
        assert_eq!(
            msgs,
            vec![
                "Group 1 - Control: You must at least upload one file.",
                "Group 2 - Case Study: You must at least upload one file."
            ]
        );

        queues.set_group_count(3).unwrap();
        queues
            .queue_mut(0)
            .unwrap()
            .queue_file(PathBuf::from("a.rcc"), 10)
            .unwrap();
        let msgs = validate(&Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Queues(queues.queues()),
            cutoffs: &cutoffs,
            email: EMAIL,
            intent: SubmitIntent::Submit,
            table_error: None,
        })
        .unwrap_err();
        assert_eq!(
            msgs,
            vec![
                "Group 1: You must at least upload one file.",
                "Group 2: You must at least upload one file."
            ]
        );
    }

    #[test]
    fn queue_mode_needs_two_groups_before_submitting() {
        let queues = GroupQueues::new("j".into(), FormSettings::default());
        let cfg = config(TestType::TTest, 2);
        let groups = GroupAssignment::default();
        let cutoffs = NormalizationCutoffs::default();

        let msgs = validate(&Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Queues(queues.queues()),
            cutoffs: &cutoffs,
            email: EMAIL,
            intent: SubmitIntent::Submit,
            table_error: None,
        })
        .unwrap_err();
        assert_eq!(msgs, vec!["Please enter 2 or more groups."]);
    }

    #[test]
    fn rows_without_an_assignment_table_are_blocked() {
        let cfg = TestConfiguration {
            label_source: LabelSource::SampleName,
            ..config(TestType::TTest, 2)
        };
        let groups = GroupAssignment::default();
        let cutoffs = NormalizationCutoffs::default();
        let err = FormError::Configuration {
            label_source: LabelSource::SampleName,
        };
        let slots = rows(2);

        let msgs = validate(&Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Rows(&slots),
            cutoffs: &cutoffs,
            email: EMAIL,
            intent: SubmitIntent::Submit,
            table_error: Some(&err),
        })
        .unwrap_err();
        assert_eq!(
            msgs,
            vec!["Sample names are not available for every sample yet."]
        );

        // With fewer than two rows the row count message already blocks.
        let msgs = validate(&Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Rows(&slots[..1]),
            cutoffs: &cutoffs,
            email: EMAIL,
            intent: SubmitIntent::Submit,
            table_error: Some(&err),
        })
        .unwrap_err();
        assert_eq!(msgs, vec!["Please upload more than one file."]);
    }

    #[test]
    fn cancel_bypasses_validation() {
        let cfg = config(TestType::TTest, 2);
        let groups = GroupAssignment::new(vec![Assignment::Excluded]);
        let cutoffs = NormalizationCutoffs::default();
        let submission = Submission {
            config: &cfg,
            groups: &groups,
            uploads: Uploads::Rows(&[]),
            cutoffs: &cutoffs,
            email: "bad",
            intent: SubmitIntent::Cancel,
            table_error: None,
        };
        assert!(validate(&submission).is_ok());
    }

    #[test]
    fn validation_is_pure() {
        let cfg = config(TestType::Anova, 4);
        let groups = GroupAssignment::new(vec![
            Assignment::Group(0),
            Assignment::Unassigned,
            Assignment::Unassigned,
        ]);
        let slots = rows(3);
        let cutoffs = NormalizationCutoffs::default();

        let first = run(&cfg, &groups, &slots, &cutoffs, "x@y");
        let second = run(&cfg, &groups, &slots, &cutoffs, "x@y");
        assert_eq!(first, second);
        assert!(first.is_err());
    }
}
