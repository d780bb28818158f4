// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Cutoff inputs and normalization choices, shown per visible section.

use std::collections::BTreeSet;

use eframe::egui;

use crate::logic::session::FormSession;
use crate::logic::visibility::Section;
use crate::models::cutoffs::{NegativeNormalization, parse_cutoff};
use crate::models::test_config::{ContentNormalization, DataType, TestType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CutoffsMsg {
    PValueChanged { test: TestType, value: String },
    MeanChanged { test: TestType, value: String },
    SetNegativeNormalization(NegativeNormalization),
    NegativePValueChanged(String),
    SetDataType(DataType),
    SetContentNormalization(ContentNormalization),
}

pub fn update(session: &mut FormSession, msg: CutoffsMsg) {
    match msg {
        CutoffsMsg::PValueChanged { test, value } => {
            session.cutoffs_mut().for_test_mut(test).p_value = value;
        }
        CutoffsMsg::MeanChanged { test, value } => {
            session.cutoffs_mut().for_test_mut(test).mean = value;
        }
        CutoffsMsg::SetNegativeNormalization(choice) => {
            session.set_negative_normalization(choice);
        }
        CutoffsMsg::NegativePValueChanged(value) => {
            session.cutoffs_mut().negative_p_value = value;
        }
        CutoffsMsg::SetDataType(data_type) => {
            session.set_data_type(data_type);
        }
        CutoffsMsg::SetContentNormalization(choice) => session.set_content_normalization(choice),
    }
}

pub fn view(ui: &mut egui::Ui, session: &FormSession) -> Vec<CutoffsMsg> {
    let mut msgs = Vec::new();
    let visible = session.visible_sections();

    ui.add_enabled_ui(!session.is_busy(), |ui| {
        egui::Grid::new("cutoffs_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 10.0))
            .min_col_width(140.0)
            .show(ui, |ui| {
                render_data_type(ui, session, &mut msgs);
                for test in TestType::ALL {
                    if visible.contains(&test_section(test)) {
                        render_test_cutoffs(ui, session, test, &mut msgs);
                    }
                }
                render_normalization(ui, session, &visible, &mut msgs);
            });
        if visible.contains(&Section::MiRna) {
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new(
                    "miRNA cartridges are normalized against their ligation controls.",
                )
                .small()
                .color(egui::Color32::from_gray(110)),
            );
        }
    });

    msgs
}

fn test_section(test: TestType) -> Section {
    match test {
        TestType::TTest => Section::TTest,
        TestType::DESeq => Section::DESeq,
        TestType::Anova => Section::Anova,
        TestType::AnovaNegBin => Section::AnovaNegBin,
    }
}

fn render_data_type(ui: &mut egui::Ui, session: &FormSession, msgs: &mut Vec<CutoffsMsg>) {
    ui.label("Data type");
    ui.horizontal(|ui| {
        let current = session.state().data_type;
        let mut choice = current;
        for option in [DataType::MRna, DataType::MiRna] {
            ui.selectable_value(&mut choice, option, option.as_str());
        }
        if choice != current {
            msgs.push(CutoffsMsg::SetDataType(choice));
        }
    });
    ui.end_row();
}

fn render_test_cutoffs(
    ui: &mut egui::Ui,
    session: &FormSession,
    test: TestType,
    msgs: &mut Vec<CutoffsMsg>,
) {
    let cutoffs = session.cutoffs().for_test(test);

    ui.label(format!("{} p-value", test.display_name()));
    if let Some(value) = cutoff_input(ui, &cutoffs.p_value, "0 < p ≤ 1") {
        msgs.push(CutoffsMsg::PValueChanged { test, value });
    }
    ui.end_row();

    ui.label(format!("{} mean", test.display_name()));
    if let Some(value) = cutoff_input(ui, &cutoffs.mean, "> 0") {
        msgs.push(CutoffsMsg::MeanChanged { test, value });
    }
    ui.end_row();
}

fn render_normalization(
    ui: &mut egui::Ui,
    session: &FormSession,
    visible: &BTreeSet<Section>,
    msgs: &mut Vec<CutoffsMsg>,
) {
    if visible.contains(&Section::NegativeNormalization) {
        ui.label("Negative normalization");
        let current = session.cutoffs().negative_normalization;
        let mut choice = current;
        egui::ComboBox::from_id_salt("negnorm_combo")
            .selected_text(choice.display_name())
            .show_ui(ui, |ui| {
                for option in NegativeNormalization::ALL {
                    ui.selectable_value(&mut choice, option, option.display_name());
                }
            });
        if choice != current {
            msgs.push(CutoffsMsg::SetNegativeNormalization(choice));
        }
        ui.end_row();
    }

    if visible.contains(&Section::NegativeNormalizationTTest) {
        ui.label("Negatives t-test p-value");
        if let Some(value) = cutoff_input(ui, &session.cutoffs().negative_p_value, "0 < p < 1") {
            msgs.push(CutoffsMsg::NegativePValueChanged(value));
        }
        ui.end_row();
    }

    if visible.contains(&Section::ContentNormalization) {
        ui.label("Content normalization");
        ui.horizontal(|ui| {
            let current = session.state().content_normalization;
            let mut choice = current;
            for option in ContentNormalization::ALL {
                ui.radio_value(&mut choice, option, option.display_name());
            }
            if choice != current {
                msgs.push(CutoffsMsg::SetContentNormalization(choice));
            }
        });
        ui.end_row();
    }
}

/// Text input that flags unparsable numbers inline; range checks happen on submit.
fn cutoff_input(ui: &mut egui::Ui, current: &str, hint: &str) -> Option<String> {
    let mut text = current.to_string();
    let mut changed = None;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text(hint)
                .desired_width(80.0),
        );
        if parse_cutoff(current).is_none() {
            ui.colored_label(ui.visuals().warn_fg_color, egui_phosphor::regular::WARNING)
                .on_hover_text("Not a number");
        }
        if response.changed() {
            changed = Some(text.clone());
        }
    });
    changed
}
