// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-sample upload rows: one file and one optional sample name per row.

use std::path::PathBuf;

use eframe::egui;

use crate::logic::session::FormSession;

/// Messages emitted by the upload rows view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadsMsg {
    AddRow,
    RemoveLastRow,
    BrowseFile(usize),
    FilePicked { index: usize, path: Option<PathBuf> },
    NameChanged { index: usize, name: String },
}

/// Side effects requested by the rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadsCommand {
    PickFile { index: usize },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadsEvent {
    pub message: String,
    pub is_error: bool,
}

pub fn update(
    session: &mut FormSession,
    msg: UploadsMsg,
    cmds: &mut Vec<UploadsCommand>,
) -> Option<UploadsEvent> {
    match msg {
        UploadsMsg::AddRow => {
            let index = session.add_upload_row();
            Some(UploadsEvent {
                message: format!("Added sample {}", index + 1),
                is_error: false,
            })
        }
        UploadsMsg::RemoveLastRow => {
            if session.remove_last_upload_row() {
                Some(UploadsEvent {
                    message: "Removed last sample".into(),
                    is_error: false,
                })
            } else {
                None
            }
        }
        UploadsMsg::BrowseFile(index) => {
            cmds.push(UploadsCommand::PickFile { index });
            None
        }
        UploadsMsg::FilePicked { index, path } => {
            let path = path?;
            let name = path.display().to_string();
            if session.set_row_file(index, path) {
                Some(UploadsEvent {
                    message: format!("Sample {}: {name}", index + 1),
                    is_error: false,
                })
            } else {
                Some(UploadsEvent {
                    message: format!("Sample {} no longer exists.", index + 1),
                    is_error: true,
                })
            }
        }
        UploadsMsg::NameChanged { index, name } => {
            session.set_row_name(index, &name);
            None
        }
    }
}

/// Render the rows and the add/remove controls.
pub fn view(ui: &mut egui::Ui, session: &FormSession) -> Vec<UploadsMsg> {
    let mut msgs = Vec::new();
    let rows = session.rows();
    let enabled = !session.is_busy();

    if rows.is_empty() {
        ui.label(
            egui::RichText::new("No samples added yet.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
    } else {
        egui::Grid::new("upload_rows_grid")
            .num_columns(3)
            .spacing(egui::vec2(8.0, 6.0))
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Sample");
                ui.strong("RCC file");
                ui.strong("Sample name (optional)");
                ui.end_row();

                for slot in rows.slots() {
                    ui.label(format!("{}", slot.index + 1));

                    ui.horizontal(|ui| {
                        let browse = egui::Button::new(format!(
                            "{} Browse",
                            egui_phosphor::regular::FOLDER_OPEN
                        ));
                        if ui.add_enabled(enabled, browse).clicked() {
                            msgs.push(UploadsMsg::BrowseFile(slot.index));
                        }
                        match slot.file_name() {
                            Some(name) => {
                                ui.label(name);
                            }
                            None => {
                                ui.label(
                                    egui::RichText::new("No file selected")
                                        .color(egui::Color32::from_gray(110)),
                                );
                            }
                        }
                        if slot.is_excluded(session.assignment()) {
                            ui.label(
                                egui::RichText::new("excluded")
                                    .small()
                                    .italics()
                                    .color(egui::Color32::from_gray(110)),
                            );
                        }
                    });

                    let mut name = slot.sample_name.clone();
                    let response = ui.add_enabled(
                        enabled,
                        egui::TextEdit::singleline(&mut name)
                            .hint_text("e.g., liver_day3")
                            .desired_width(180.0),
                    );
                    if response.changed() {
                        msgs.push(UploadsMsg::NameChanged {
                            index: slot.index,
                            name,
                        });
                    }
                    ui.end_row();
                }
            });
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let add = egui::Button::new(format!("{} Add sample", egui_phosphor::regular::PLUS));
        if ui.add_enabled(enabled, add).clicked() {
            msgs.push(UploadsMsg::AddRow);
        }
        if rows.shows_remove_control() {
            let remove = egui::Button::new(format!(
                "{} Remove last",
                egui_phosphor::regular::MINUS
            ));
            if ui.add_enabled(enabled, remove).clicked() {
                msgs.push(UploadsMsg::RemoveLastRow);
            }
        }
    });

    msgs
}
