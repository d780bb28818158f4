// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Statistical test selection and the sample-to-group assignment table.

use eframe::egui;

use crate::logic::enumerator::FeatureTable;
use crate::logic::session::{FormSession, UploadMode};
use crate::logic::visibility::Section;
use crate::models::groups::Assignment;
use crate::models::test_config::{LabelSource, TestType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeaturesMsg {
    SetTestType(TestType),
    SetLabelSource(LabelSource),
    SetFeatureCount(usize),
    Assign {
        sample: usize,
        assignment: Assignment,
    },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeaturesEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the session.
///
/// A missing label list is reported as a status line rather than an error
/// modal, since it resolves itself once every row has a name or file.
pub fn update(session: &mut FormSession, msg: FeaturesMsg) -> Option<FeaturesEvent> {
    let result = match msg {
        FeaturesMsg::SetTestType(test_type) => session.set_test_type(test_type),
        FeaturesMsg::SetLabelSource(source) => session.set_label_source(source),
        FeaturesMsg::SetFeatureCount(count) => session.set_feature_count(count),
        FeaturesMsg::Assign { sample, assignment } => {
            session.assign(sample, assignment);
            return None;
        }
    };
    result.err().map(|err| FeaturesEvent {
        message: err.to_string(),
        is_error: false,
    })
}

pub fn view(ui: &mut egui::Ui, session: &FormSession) -> Vec<FeaturesMsg> {
    let mut msgs = Vec::new();
    let state = session.state();
    let visible = session.visible_sections();
    let enabled = !session.is_busy();

    ui.add_enabled_ui(enabled, |ui| {
        egui::Grid::new("test_config_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 10.0))
            .min_col_width(140.0)
            .show(ui, |ui| {
                ui.label("Statistical test");
                let mut test_type = state.test_type;
                egui::ComboBox::from_id_salt("test_type_combo")
                    .selected_text(test_type.display_name())
                    .show_ui(ui, |ui| {
                        for option in TestType::ALL {
                            ui.selectable_value(&mut test_type, option, option.display_name());
                        }
                    });
                if test_type != state.test_type {
                    msgs.push(FeaturesMsg::SetTestType(test_type));
                }
                ui.end_row();

                if visible.contains(&Section::AnovaFeatures) {
                    ui.label("Number of groups");
                    let mut count = state.feature_count;
                    let max = session.rows().len().max(2);
                    if ui
                        .add(egui::DragValue::new(&mut count).range(2..=max))
                        .changed()
                    {
                        msgs.push(FeaturesMsg::SetFeatureCount(count));
                    }
                    ui.end_row();
                }

                if session.mode() == UploadMode::Rows {
                    ui.label("Row labels");
                    ui.horizontal(|ui| {
                        let mut source = state.label_source;
                        for option in LabelSource::ALL {
                            ui.radio_value(&mut source, option, option.display_name());
                        }
                        if source != state.label_source {
                            msgs.push(FeaturesMsg::SetLabelSource(source));
                        }
                    });
                    ui.end_row();
                }
            });

        if session.mode() == UploadMode::Rows {
            ui.add_space(8.0);
            render_assignment(ui, session, &mut msgs);
        }
    });

    msgs
}

fn render_assignment(ui: &mut egui::Ui, session: &FormSession, msgs: &mut Vec<FeaturesMsg>) {
    match (session.features(), session.features_error()) {
        (Some(table), _) => render_table(ui, table, session, msgs),
        (None, Some(err)) if !session.rows().is_empty() => {
            ui.colored_label(ui.visuals().warn_fg_color, err.to_string());
        }
        _ => {
            ui.label(
                egui::RichText::new("Add samples to assign them to groups.")
                    .small()
                    .color(egui::Color32::from_gray(110)),
            );
        }
    }
}

fn render_table(
    ui: &mut egui::Ui,
    table: &FeatureTable,
    session: &FormSession,
    msgs: &mut Vec<FeaturesMsg>,
) {
    let options: Vec<_> = table.options().collect();
    egui::Grid::new("assignment_grid")
        .num_columns(table.group_count() + 2)
        .spacing(egui::vec2(12.0, 6.0))
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Sample");
            for option in &options {
                ui.strong(&option.caption);
            }
            ui.end_row();

            for (sample, row) in table.rows().iter().enumerate() {
                ui.label(&row.label);
                let current = session.assignment().get(sample).unwrap_or_default();
                for option in &options {
                    let mut selected = current;
                    if ui.radio_value(&mut selected, option.option, "").changed() {
                        msgs.push(FeaturesMsg::Assign {
                            sample,
                            assignment: option.option,
                        });
                    }
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn session_with_rows(n: usize) -> FormSession {
        let mut session = FormSession::default();
        for i in 0..n {
            let idx = session.add_upload_row();
            session.set_row_file(idx, PathBuf::from(format!("s{i}.rcc")));
        }
        session
    }

    #[test]
    fn switching_to_anova_renders_numbered_groups() {
        let mut session = session_with_rows(4);
        assert!(update(&mut session, FeaturesMsg::SetTestType(TestType::Anova)).is_none());
        assert_eq!(session.features().map(FeatureTable::group_count), Some(3));

        update(&mut session, FeaturesMsg::SetFeatureCount(4));
        assert_eq!(session.features().map(FeatureTable::group_count), Some(4));
    }

    #[test]
    fn unavailable_labels_become_a_status_message() {
        let mut session = session_with_rows(2);
        let event = update(
            &mut session,
            FeaturesMsg::SetLabelSource(LabelSource::SampleName),
        )
        .unwrap();
        assert!(!event.is_error);
        assert_eq!(
            event.message,
            "Sample names are not available for every sample yet."
        );
    }

    #[test]
    fn assignments_are_recorded() {
        let mut session = session_with_rows(2);
        update(
            &mut session,
            FeaturesMsg::Assign {
                sample: 1,
                assignment: Assignment::Excluded,
            },
        );
        assert_eq!(session.assignment().get(1), Some(Assignment::Excluded));
    }
}
