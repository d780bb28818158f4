// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! One form instance: owns every counter, fragment and selection, and drives
//! the submit/upload lifecycle.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::logic::barrier::CompletionBarrier;
use crate::logic::builder::{GroupQueues, UploadRows};
use crate::logic::enumerator::{AvailableLabels, FeatureTable, effective_feature_count, enumerate};
use crate::logic::error::FormError;
use crate::logic::submission::{self, FormPost};
use crate::logic::validate::{Submission, SubmitIntent, Uploads, validate};
use crate::logic::visibility::{FormState, Section};
use crate::models::cutoffs::{NegativeNormalization, NormalizationCutoffs};
use crate::models::groups::{Assignment, GroupAssignment};
use crate::models::job::JobContext;
use crate::models::test_config::{
    ContentNormalization, DataType, LabelSource, TestConfiguration, TestType,
};
use crate::models::upload::TransportConfig;

/// How sample files are collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UploadMode {
    /// One row per sample, groups assigned afterwards in the table.
    #[default]
    Rows,
    /// One upload queue per group.
    Queues,
}

/// Lifecycle of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Editing,
    /// Group queues are uploading; the form posts when all of them finish.
    Uploading,
    Submitting,
    Submitted,
}

/// A single file transfer the transport has to perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadJob {
    pub group: usize,
    pub path: PathBuf,
    pub transport: TransportConfig,
}

/// What to do after a successful submit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitPlan {
    /// Post the form right away.
    Post(FormPost),
    /// Upload queued files first; the form is posted once every group completes.
    Upload(Vec<UploadJob>),
}

/// State of the active form.
#[derive(Clone, Debug)]
pub struct FormSession {
    context: JobContext,
    mode: UploadMode,
    state: FormState,
    rows: UploadRows,
    queues: GroupQueues,
    features: Option<FeatureTable>,
    features_error: Option<FormError>,
    assignment: GroupAssignment,
    cutoffs: NormalizationCutoffs,
    email: String,
    barrier: Option<CompletionBarrier>,
    phase: Phase,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(JobContext::default())
    }
}

impl FormSession {
    pub fn new(context: JobContext) -> Self {
        let queues = GroupQueues::new(context.job_id.clone(), context.settings.clone());
        let state = FormState::new(context.settings.default_feature_count);
        let mut session = Self {
            context,
            mode: UploadMode::default(),
            state,
            rows: UploadRows::default(),
            queues,
            features: None,
            features_error: None,
            assignment: GroupAssignment::default(),
            cutoffs: NormalizationCutoffs::default(),
            email: String::new(),
            barrier: None,
            phase: Phase::default(),
        };
        // No rows yet, so this only records the missing labels.
        let _ = session.render_features(false);
        session
    }

    /// Discard everything, including in-flight uploads, keeping the job context.
    pub fn reset(&mut self) {
        info!("form reset (phase was {:?})", self.phase);
        *self = Self::new(self.context.clone());
    }

    pub fn context(&self) -> &JobContext {
        &self.context
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: UploadMode) {
        if self.mode != mode {
            debug!("upload mode changed to {mode:?}");
            self.mode = mode;
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn visible_sections(&self) -> BTreeSet<Section> {
        self.state.visible_sections()
    }

    pub fn rows(&self) -> &UploadRows {
        &self.rows
    }

    pub fn queues(&self) -> &GroupQueues {
        &self.queues
    }

    pub fn features(&self) -> Option<&FeatureTable> {
        self.features.as_ref()
    }

    pub fn features_error(&self) -> Option<&FormError> {
        self.features_error.as_ref()
    }

    pub fn assignment(&self) -> &GroupAssignment {
        &self.assignment
    }

    pub fn cutoffs(&self) -> &NormalizationCutoffs {
        &self.cutoffs
    }

    pub fn cutoffs_mut(&mut self) -> &mut NormalizationCutoffs {
        &mut self.cutoffs
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Uploads or the final post are in flight; editing controls are locked.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Uploading | Phase::Submitting)
    }

    /// Groups completed so far and total, while uploading.
    pub fn upload_progress(&self) -> Option<(usize, usize)> {
        self.barrier.as_ref().map(|b| (b.completed(), b.total()))
    }

    pub fn labels(&self) -> AvailableLabels {
        AvailableLabels::from_rows(self.rows.slots(), &self.context.initial_groups)
    }

    /// Test configuration with the group count that actually applies.
    pub fn effective_config(&self) -> TestConfiguration {
        let requested = TestConfiguration {
            test_type: self.state.test_type,
            feature_count: self.state.feature_count,
            label_source: self.state.label_source,
        };
        let feature_count = match self.mode {
            UploadMode::Rows => effective_feature_count(
                &requested,
                &self.labels(),
                self.context.settings.default_feature_count,
            ),
            UploadMode::Queues => self.queues.len().max(2),
        };
        TestConfiguration {
            feature_count,
            ..requested
        }
    }

    pub fn set_test_type(&mut self, test_type: TestType) -> Result<BTreeSet<Section>, FormError> {
        let visible = self.state.set_test_type(test_type);
        info!("test type set to {}", test_type.as_str());
        log_visible(&visible);
        self.render_features(false)?;
        Ok(visible)
    }

    pub fn set_label_source(
        &mut self,
        source: LabelSource,
    ) -> Result<BTreeSet<Section>, FormError> {
        let visible = self.state.set_label_source(source);
        self.render_features(false)?;
        Ok(visible)
    }

    pub fn set_feature_count(&mut self, count: usize) -> Result<BTreeSet<Section>, FormError> {
        let visible = self.state.set_feature_count(count);
        self.render_features(false)?;
        Ok(visible)
    }

    pub fn set_negative_normalization(
        &mut self,
        choice: NegativeNormalization,
    ) -> BTreeSet<Section> {
        self.cutoffs.negative_normalization = choice;
        let visible = self.state.set_negative_normalization(choice);
        log_visible(&visible);
        visible
    }

    pub fn set_data_type(&mut self, data_type: DataType) -> BTreeSet<Section> {
        let visible = self.state.set_data_type(data_type);
        log_visible(&visible);
        visible
    }

    pub fn set_content_normalization(&mut self, choice: ContentNormalization) {
        self.state.content_normalization = choice;
    }

    pub fn add_upload_row(&mut self) -> usize {
        let index = self.rows.add_upload_row();
        self.rows_changed();
        index
    }

    pub fn remove_last_upload_row(&mut self) -> bool {
        let removed = self.rows.remove_last_upload_row();
        if removed {
            self.rows_changed();
        }
        removed
    }

    pub fn set_row_file(&mut self, index: usize, path: PathBuf) -> bool {
        let Some(slot) = self.rows.slot_mut(index) else {
            return false;
        };
        slot.file = Some(path);
        self.rows_changed();
        true
    }

    /// Set a row's sample name, truncated to the configured maximum length.
    pub fn set_row_name(&mut self, index: usize, name: &str) -> bool {
        let max = self.context.settings.sample_name_max_len;
        let Some(slot) = self.rows.slot_mut(index) else {
            return false;
        };
        slot.sample_name = name.chars().take(max).collect();
        self.rows_changed();
        true
    }

    pub fn assign(&mut self, sample: usize, assignment: Assignment) -> bool {
        self.assignment.set(sample, assignment)
    }

    pub fn needs_group_confirmation(&self, requested: usize) -> bool {
        self.queues.needs_confirmation(requested)
    }

    /// Grow the group queues; returns the resulting count.
    pub fn set_group_count(&mut self, requested: usize) -> Result<usize, FormError> {
        self.queues.set_group_count(requested).map(|queues| queues.len())
    }

    pub fn queue_file(&mut self, group: usize, path: PathBuf, size: u64) -> Result<(), FormError> {
        match self.queues.queue_mut(group) {
            Some(queue) => queue.queue_file(path, size),
            None => Err(FormError::Rejected {
                file: path.display().to_string(),
                reason: format!("group {} does not exist", group + 1),
            }),
        }
    }

    pub fn remove_queued_file(&mut self, group: usize, index: usize) -> bool {
        self.queues
            .queue_mut(group)
            .is_some_and(|queue| queue.remove_file(index))
    }

    /// Validate the current snapshot.
    pub fn validate(&self, intent: SubmitIntent) -> Result<(), Vec<String>> {
        let config = self.effective_config();
        let no_table = GroupAssignment::default();
        let (uploads, groups, table_error) = match self.mode {
            UploadMode::Rows => (
                Uploads::Rows(self.rows.slots()),
                &self.assignment,
                self.features_error.as_ref(),
            ),
            UploadMode::Queues => (Uploads::Queues(self.queues.queues()), &no_table, None),
        };
        validate(&Submission {
            config: &config,
            groups,
            uploads,
            cutoffs: &self.cutoffs,
            email: &self.email,
            intent,
            table_error,
        })
    }

    /// Validate and decide how the submission proceeds.
    ///
    /// On failure the ordered violation messages are returned and nothing
    /// changes. In queue mode every queued file becomes an [`UploadJob`] and
    /// the completion barrier is armed.
    pub fn begin_submit(&mut self, intent: SubmitIntent) -> Result<SubmitPlan, Vec<String>> {
        match self.phase {
            Phase::Editing => {}
            Phase::Submitted => {
                return Err(vec![
                    "This form has already been submitted. Reset it to start a new submission."
                        .to_string(),
                ]);
            }
            Phase::Uploading | Phase::Submitting => {
                return Err(vec!["A submission is already in progress.".to_string()]);
            }
        }
        if let Err(msgs) = self.validate(intent) {
            warn!("submission blocked by {} validation message(s)", msgs.len());
            return Err(msgs);
        }

        if intent == SubmitIntent::Cancel || self.mode == UploadMode::Rows {
            info!("posting form ({})", intent.as_str());
            self.phase = Phase::Submitting;
            return Ok(SubmitPlan::Post(self.form_post(intent)));
        }

        if self.queues.len() < 2 {
            return Err(vec![FormError::TooFewGroups(self.queues.len()).to_string()]);
        }
        for group in 0..self.queues.len() {
            if let Some(queue) = self.queues.queue_mut(group) {
                queue.mark_all_pending();
            }
        }
        let jobs: Vec<UploadJob> = self
            .queues
            .queues()
            .iter()
            .flat_map(|queue| {
                queue.files().iter().map(move |file| UploadJob {
                    group: queue.group_id,
                    path: file.path.clone(),
                    transport: queue.transport.clone(),
                })
            })
            .collect();
        info!(
            "uploading {} file(s) across {} group(s)",
            jobs.len(),
            self.queues.len()
        );
        self.barrier = Some(CompletionBarrier::new(self.queues.len()));
        self.phase = Phase::Uploading;
        Ok(SubmitPlan::Upload(jobs))
    }

    /// Record one finished transfer.
    ///
    /// Returns the form to post when this completion releases the barrier.
    pub fn file_uploaded(&mut self, group: usize, path: &Path, uploaded: bool) -> Option<FormPost> {
        if self.phase != Phase::Uploading {
            debug!("ignoring upload result for {path:?} outside of an upload");
            return None;
        }
        let queue = self.queues.queue_mut(group)?;
        if !queue.mark(path, uploaded) {
            warn!("upload result for unknown file {path:?} in group {group}");
            return None;
        }
        if !uploaded {
            warn!("upload failed for {path:?} in group {group}");
        }
        if !queue.is_complete() {
            return None;
        }

        let released = self.barrier.as_mut().is_some_and(|b| b.arrive(group));
        if !released {
            return None;
        }
        info!("all group queues finished uploading; posting form");
        self.phase = Phase::Submitting;
        Some(self.form_post(SubmitIntent::Submit))
    }

    /// The final post finished; failures return the form to editing.
    pub fn submit_finished(&mut self, succeeded: bool) {
        self.barrier = None;
        self.phase = if succeeded {
            Phase::Submitted
        } else {
            Phase::Editing
        };
    }

    pub fn form_post(&self, intent: SubmitIntent) -> FormPost {
        submission::encode(self, intent)
    }

    fn rows_changed(&mut self) {
        if let Err(err) = self.render_features(true) {
            debug!("assignment table unavailable: {err}");
        }
    }

    /// Re-enumerate the assignment table.
    ///
    /// With `preserve`, selections survive when the group layout is unchanged
    /// (row edits); otherwise they restart from the server hints so nothing
    /// from a previous test type lingers.
    fn render_features(&mut self, preserve: bool) -> Result<(), FormError> {
        let labels = self.labels();
        self.state.set_sample_count(labels.sample_count());
        let config = TestConfiguration {
            test_type: self.state.test_type,
            feature_count: self.state.feature_count,
            label_source: self.state.label_source,
        };

        match enumerate(
            &config,
            &labels,
            self.context.settings.default_feature_count,
        ) {
            Ok(table) => {
                let mut assignment = table.initial_assignment();
                let same_layout =
                    self.features.as_ref().map(FeatureTable::groups) == Some(table.groups());
                if preserve && same_layout {
                    for (idx, previous) in self.assignment.items().iter().enumerate() {
                        assignment.set(idx, *previous);
                    }
                }
                self.assignment = assignment;
                self.features = Some(table);
                self.features_error = None;
                Ok(())
            }
            Err(err) => {
                self.features = None;
                self.assignment = GroupAssignment::default();
                self.features_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

fn log_visible(visible: &BTreeSet<Section>) {
    let tags: Vec<_> = visible.iter().map(Section::tag).collect();
    debug!("visible sections: {}", tags.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upload::FileStatus;

    const EMAIL: &str = "pi@lab.example.org";

    fn session_with_rows(n: usize) -> FormSession {
        let mut session = FormSession::default();
        session.set_email(EMAIL.into());
        for i in 0..n {
            let idx = session.add_upload_row();
            session.set_row_file(idx, PathBuf::from(format!("/data/sample{i}.RCC")));
        }
        session
    }

    #[test]
    fn new_session_has_no_table_until_rows_exist() {
        let session = FormSession::default();
        assert!(session.features().is_none());
        assert!(matches!(
            session.features_error(),
            Some(FormError::Configuration { .. })
        ));

        let session = session_with_rows(2);
        assert_eq!(session.features().map(|t| t.rows().len()), Some(2));
        assert_eq!(session.assignment().total_samples(), 2);
    }

    #[test]
    fn switching_test_type_replaces_the_table() {
        let mut session = session_with_rows(5);
        session.assign(0, Assignment::Group(1));

        let visible = session.set_test_type(TestType::Anova).unwrap();
        assert!(visible.contains(&Section::AnovaFeatures));
        let table = session.features().unwrap();
        assert_eq!(table.group_count(), 3);
        assert_eq!(table.groups()[0].caption, "1");
        assert_eq!(session.assignment().get(0), Some(Assignment::Unassigned));

        session.set_test_type(TestType::TTest).unwrap();
        let captions: Vec<_> = session
            .features()
            .unwrap()
            .groups()
            .iter()
            .map(|g| g.caption.as_str())
            .collect();
        assert_eq!(captions, vec!["Control", "Case"]);
    }

    #[test]
    fn row_edits_keep_existing_selections() {
        let mut session = session_with_rows(2);
        session.assign(0, Assignment::Group(0));
        session.assign(1, Assignment::Group(1));

        session.add_upload_row();
        assert_eq!(
            session.assignment().items(),
            &[
                Assignment::Group(0),
                Assignment::Group(1),
                Assignment::Unassigned
            ]
        );

        session.set_row_name(0, "liver");
        assert_eq!(session.assignment().get(0), Some(Assignment::Group(0)));
    }

    #[test]
    fn sample_names_are_truncated() {
        let mut session = session_with_rows(1);
        let long = "x".repeat(80);
        assert!(session.set_row_name(0, &long));
        assert_eq!(session.rows().slots()[0].sample_name.len(), 50);
        assert!(!session.set_row_name(4, "nope"));
    }

    #[test]
    fn label_source_without_names_is_a_configuration_error() {
        let mut session = session_with_rows(3);
        let err = session.set_label_source(LabelSource::SampleName).unwrap_err();
        assert_eq!(
            err,
            FormError::Configuration {
                label_source: LabelSource::SampleName
            }
        );
        assert!(session.features().is_none());

        for i in 0..3 {
            session.set_row_name(i, &format!("s{i}"));
        }
        assert_eq!(
            session.features().map(|t| t.rows()[2].label.clone()),
            Some("s2".to_string())
        );
    }

    #[test]
    fn rows_mode_posts_immediately_when_valid() {
        let mut session = session_with_rows(2);
        session.assign(0, Assignment::Group(0));
        session.assign(1, Assignment::Group(1));

        match session.begin_submit(SubmitIntent::Submit).unwrap() {
            SubmitPlan::Post(post) => assert_eq!(post.field("submit"), Some("Submit")),
            other => panic!("unexpected plan: {other:?}"),
        }
        assert_eq!(session.phase(), Phase::Submitting);
        assert!(session.begin_submit(SubmitIntent::Submit).is_err());

        session.submit_finished(true);
        assert_eq!(session.phase(), Phase::Submitted);
        let msgs = session.begin_submit(SubmitIntent::Submit).unwrap_err();
        assert!(msgs[0].contains("already been submitted"));
    }

    #[test]
    fn retry_after_failed_post_uploads_everything_again() {
        let mut session = FormSession::default();
        session.set_email(EMAIL.into());
        session.set_mode(UploadMode::Queues);
        session.set_group_count(2).unwrap();
        session.queue_file(0, PathBuf::from("a.rcc"), 1).unwrap();
        session.queue_file(0, PathBuf::from("b.rcc"), 1).unwrap();
        session.queue_file(1, PathBuf::from("c.rcc"), 1).unwrap();

        session.begin_submit(SubmitIntent::Submit).unwrap();
        session.file_uploaded(0, Path::new("a.rcc"), true);
        session.file_uploaded(0, Path::new("b.rcc"), true);
        assert!(session.file_uploaded(1, Path::new("c.rcc"), true).is_some());
        session.submit_finished(false);
        assert_eq!(session.phase(), Phase::Editing);

        session.begin_submit(SubmitIntent::Submit).unwrap();
        assert!(session.file_uploaded(0, Path::new("a.rcc"), true).is_none());
        assert!(session.file_uploaded(1, Path::new("c.rcc"), true).is_none());
        assert!(session.file_uploaded(0, Path::new("b.rcc"), true).is_some());
    }

    #[test]
    fn blocked_submit_leaves_phase_untouched() {
        let mut session = FormSession::default();
        session.set_email("bad".into());

        let msgs = session.begin_submit(SubmitIntent::Submit).unwrap_err();
        assert_eq!(
            msgs,
            vec![
                "Please enter a valid email address.",
                "Please add files to upload."
            ]
        );
        assert_eq!(session.phase(), Phase::Editing);
    }

    #[test]
    fn cancel_posts_without_validation() {
        let mut session = FormSession::default();
        match session.begin_submit(SubmitIntent::Cancel).unwrap() {
            SubmitPlan::Post(post) => assert_eq!(post.field("submit"), Some("Cancel")),
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn queue_uploads_post_once_every_group_completes() {
        let mut session = FormSession::default();
        session.set_email(EMAIL.into());
        session.set_mode(UploadMode::Queues);
        assert_eq!(session.set_group_count(2), Ok(2));
        session.queue_file(0, PathBuf::from("c1.rcc"), 10).unwrap();
        session.queue_file(0, PathBuf::from("c2.rcc"), 10).unwrap();
        session.queue_file(1, PathBuf::from("k1.rcc"), 10).unwrap();

        let jobs = match session.begin_submit(SubmitIntent::Submit).unwrap() {
            SubmitPlan::Upload(jobs) => jobs,
            other => panic!("unexpected plan: {other:?}"),
        };
        assert_eq!(jobs.len(), 3);
        assert_eq!(session.phase(), Phase::Uploading);
        assert!(session.is_busy());

        assert!(session.file_uploaded(0, Path::new("c1.rcc"), true).is_none());
        assert!(session.file_uploaded(1, Path::new("k1.rcc"), true).is_none());
        assert_eq!(session.upload_progress(), Some((1, 2)));

        let post = session
            .file_uploaded(0, Path::new("c2.rcc"), false)
            .expect("last group releases the barrier");
        assert_eq!(post.field("num_feat"), Some("2"));
        assert_eq!(session.phase(), Phase::Submitting);
        assert_eq!(
            session.queues().queues()[0].files()[1].status,
            FileStatus::Failed
        );

        assert!(session.file_uploaded(0, Path::new("c2.rcc"), true).is_none());
    }

    #[test]
    fn queue_mode_without_groups_stays_editable() {
        let mut session = FormSession::default();
        session.set_email(EMAIL.into());
        session.set_mode(UploadMode::Queues);

        let msgs = session.begin_submit(SubmitIntent::Submit).unwrap_err();
        assert_eq!(msgs, vec!["Please enter 2 or more groups."]);
        assert_eq!(session.phase(), Phase::Editing);
        assert!(!session.is_busy());
        assert_eq!(session.upload_progress(), None);
    }

    #[test]
    fn rows_without_labels_cannot_be_submitted() {
        let mut session = session_with_rows(2);
        assert!(session.set_label_source(LabelSource::SampleName).is_err());
        assert!(session.assignment().is_empty());

        let msgs = session.begin_submit(SubmitIntent::Submit).unwrap_err();
        assert_eq!(
            msgs,
            vec!["Sample names are not available for every sample yet."]
        );
        assert_eq!(session.phase(), Phase::Editing);
    }

    #[test]
    fn shrinking_queues_is_rejected() {
        let mut session = FormSession::default();
        session.set_group_count(3).unwrap();
        assert!(matches!(
            session.set_group_count(2),
            Err(FormError::NotSupported { .. })
        ));
        assert_eq!(session.queues().len(), 3);
    }

    #[test]
    fn reset_discards_everything_but_the_job() {
        let mut session = FormSession::new(JobContext {
            job_id: "J9".into(),
            ..Default::default()
        });
        session.add_upload_row();
        session.set_email(EMAIL.into());
        session.set_group_count(4).unwrap();

        session.reset();
        assert_eq!(session.rows().len(), 0);
        assert_eq!(session.queues().len(), 0);
        assert!(session.email().is_empty());
        assert_eq!(session.context().job_id, "J9");
    }

    #[test]
    fn negative_normalization_updates_cutoffs_and_visibility() {
        let mut session = FormSession::default();
        let visible = session.set_negative_normalization(NegativeNormalization::StudentTTest);
        assert!(visible.contains(&Section::NegativeNormalizationTTest));
        assert_eq!(
            session.cutoffs().negative_normalization,
            NegativeNormalization::StudentTTest
        );
    }
}
