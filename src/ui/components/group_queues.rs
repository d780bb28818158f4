// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Multi-upload mode: a group count input and one file queue per group.

use std::path::PathBuf;

use eframe::egui;

use crate::logic::session::FormSession;
use crate::models::upload::FileStatus;

const DIGITS_ONLY: &str = "Enter numbers only!";

/// UI-only state of the group count controls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupQueuesModel {
    count_input: String,
    input_warning: bool,
    /// Large count awaiting confirmation.
    pending_confirmation: Option<usize>,
}

impl GroupQueuesModel {
    pub fn pending_confirmation(&self) -> Option<usize> {
        self.pending_confirmation
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupQueuesMsg {
    CountInputChanged(String),
    ApplyCount,
    ConfirmCount,
    CancelConfirm,
    BrowseFiles(usize),
    /// Files chosen for a group, with their sizes on disk.
    FilesPicked {
        group: usize,
        files: Vec<(PathBuf, u64)>,
    },
    RemoveFile {
        group: usize,
        index: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupQueuesCommand {
    PickFiles { group: usize },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupQueuesEvent {
    pub message: String,
    pub is_error: bool,
}

impl GroupQueuesEvent {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

pub fn update(
    session: &mut FormSession,
    model: &mut GroupQueuesModel,
    msg: GroupQueuesMsg,
    cmds: &mut Vec<GroupQueuesCommand>,
) -> Option<GroupQueuesEvent> {
    match msg {
        GroupQueuesMsg::CountInputChanged(text) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            model.input_warning = digits.len() != text.len();
            model.count_input = digits;
            None
        }
        GroupQueuesMsg::ApplyCount => {
            let requested = model.count_input.parse::<usize>().unwrap_or(0);
            if session.needs_group_confirmation(requested) {
                model.pending_confirmation = Some(requested);
                return None;
            }
            Some(apply_count(session, requested))
        }
        GroupQueuesMsg::ConfirmCount => {
            let requested = model.pending_confirmation.take()?;
            Some(apply_count(session, requested))
        }
        GroupQueuesMsg::CancelConfirm => {
            model.pending_confirmation = None;
            None
        }
        GroupQueuesMsg::BrowseFiles(group) => {
            cmds.push(GroupQueuesCommand::PickFiles { group });
            None
        }
        GroupQueuesMsg::FilesPicked { group, files } => {
            if files.is_empty() {
                return None;
            }
            let mut added = 0;
            let mut rejected = Vec::new();
            for (path, size) in files {
                match session.queue_file(group, path, size) {
                    Ok(()) => added += 1,
                    Err(err) => rejected.push(err.to_string()),
                }
            }
            if rejected.is_empty() {
                Some(GroupQueuesEvent::info(format!(
                    "Queued {added} file(s) for group {}",
                    group + 1
                )))
            } else {
                Some(GroupQueuesEvent::error(format!(
                    "Queued {added} file(s); rejected:\n{}",
                    rejected.join("\n")
                )))
            }
        }
        GroupQueuesMsg::RemoveFile { group, index } => {
            session.remove_queued_file(group, index);
            None
        }
    }
}

fn apply_count(session: &mut FormSession, requested: usize) -> GroupQueuesEvent {
    match session.set_group_count(requested) {
        Ok(count) => GroupQueuesEvent::info(format!("{count} group(s) ready for upload")),
        Err(err) => GroupQueuesEvent::error(err.to_string()),
    }
}

pub fn view(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    session: &FormSession,
    model: &GroupQueuesModel,
) -> Vec<GroupQueuesMsg> {
    let mut msgs = Vec::new();
    let enabled = !session.is_busy();

    ui.horizontal(|ui| {
        ui.label("Number of groups");
        let mut input = model.count_input.clone();
        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut input)
                .hint_text("2")
                .desired_width(60.0),
        );
        if response.changed() {
            msgs.push(GroupQueuesMsg::CountInputChanged(input));
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.add_enabled(enabled, egui::Button::new("Apply")).clicked() || submitted {
            msgs.push(GroupQueuesMsg::ApplyCount);
        }
        if model.input_warning {
            ui.colored_label(ui.visuals().warn_fg_color, DIGITS_ONLY);
        }
    });

    let queues = session.queues();
    if queues.is_empty() {
        ui.label(
            egui::RichText::new("Enter the number of groups to create upload queues.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
    }

    for queue in queues.queues() {
        ui.add_space(6.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong(&queue.title);
                let browse = egui::Button::new(format!(
                    "{} Add files",
                    egui_phosphor::regular::UPLOAD_SIMPLE
                ));
                if ui.add_enabled(enabled, browse).clicked() {
                    msgs.push(GroupQueuesMsg::BrowseFiles(queue.group_id));
                }
            });

            let failed = queue.failed_count();
            if failed > 0 {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("{failed} file(s) failed to upload"),
                );
            }
            if queue.is_empty() {
                ui.label(
                    egui::RichText::new("No files queued.")
                        .italics()
                        .color(egui::Color32::from_gray(110)),
                );
            }
            for (index, file) in queue.files().iter().enumerate() {
                ui.horizontal(|ui| {
                    let icon = match file.status {
                        FileStatus::Pending => egui_phosphor::regular::FILE,
                        FileStatus::Uploaded => egui_phosphor::regular::CHECK_CIRCLE,
                        FileStatus::Failed => egui_phosphor::regular::WARNING_CIRCLE,
                    };
                    ui.label(icon);
                    ui.label(file.path.display().to_string());
                    ui.label(
                        egui::RichText::new(format!("{} bytes", file.size))
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    );
                    let remove = egui::Button::new(egui_phosphor::regular::TRASH_SIMPLE);
                    if ui
                        .add_enabled(enabled, remove)
                        .on_hover_text("Remove file")
                        .clicked()
                    {
                        msgs.push(GroupQueuesMsg::RemoveFile {
                            group: queue.group_id,
                            index,
                        });
                    }
                });
            }
        });
    }

    if let Some(requested) = model.pending_confirmation {
        egui::Window::new("Confirm group count")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Are you sure you require {requested} groups?"));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        msgs.push(GroupQueuesMsg::ConfirmCount);
                    }
                    if ui.button("No").clicked() {
                        msgs.push(GroupQueuesMsg::CancelConfirm);
                    }
                });
            });
    }

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(
        session: &mut FormSession,
        model: &mut GroupQueuesModel,
        msg: GroupQueuesMsg,
    ) -> Option<GroupQueuesEvent> {
        let mut cmds = Vec::new();
        update(session, model, msg, &mut cmds)
    }

    #[test]
    fn non_digits_are_dropped_with_a_warning() {
        let mut session = FormSession::default();
        let mut model = GroupQueuesModel::default();

        send(&mut session, &mut model, GroupQueuesMsg::CountInputChanged("1a2".into()));
        assert_eq!(model.count_input, "12");
        assert!(model.input_warning);

        send(&mut session, &mut model, GroupQueuesMsg::CountInputChanged("3".into()));
        assert!(!model.input_warning);
    }

    #[test]
    fn applying_creates_queues() {
        let mut session = FormSession::default();
        let mut model = GroupQueuesModel::default();
        send(&mut session, &mut model, GroupQueuesMsg::CountInputChanged("3".into()));

        let event = send(&mut session, &mut model, GroupQueuesMsg::ApplyCount).unwrap();
        assert!(!event.is_error);
        assert_eq!(session.queues().len(), 3);
    }

    #[test]
    fn too_few_groups_surface_an_error() {
        let mut session = FormSession::default();
        let mut model = GroupQueuesModel::default();
        send(&mut session, &mut model, GroupQueuesMsg::CountInputChanged("1".into()));

        let event = send(&mut session, &mut model, GroupQueuesMsg::ApplyCount).unwrap();
        assert!(event.is_error);
        assert_eq!(event.message, "Please enter 2 or more groups.");
    }

    #[test]
    fn large_counts_wait_for_confirmation() {
        let mut session = FormSession::default();
        let mut model = GroupQueuesModel::default();
        send(&mut session, &mut model, GroupQueuesMsg::CountInputChanged("12".into()));

        assert!(send(&mut session, &mut model, GroupQueuesMsg::ApplyCount).is_none());
        assert_eq!(model.pending_confirmation(), Some(12));
        assert_eq!(session.queues().len(), 0);

        send(&mut session, &mut model, GroupQueuesMsg::CancelConfirm);
        assert_eq!(session.queues().len(), 0);

        send(&mut session, &mut model, GroupQueuesMsg::ApplyCount);
        send(&mut session, &mut model, GroupQueuesMsg::ConfirmCount);
        assert_eq!(session.queues().len(), 12);
        assert_eq!(model.pending_confirmation(), None);
    }

    #[test]
    fn picked_files_are_filtered_per_queue() {
        let mut session = FormSession::default();
        session.set_group_count(2).unwrap();
        let mut model = GroupQueuesModel::default();

        let event = send(
            &mut session,
            &mut model,
            GroupQueuesMsg::FilesPicked {
                group: 1,
                files: vec![
                    (PathBuf::from("ok.RCC"), 100),
                    (PathBuf::from("notes.txt"), 100),
                ],
            },
        )
        .unwrap();

        assert!(event.is_error);
        assert!(event.message.contains("notes.txt"));
        assert_eq!(session.queues().queues()[1].files().len(), 1);
    }

    #[test]
    fn browsing_requests_a_dialog_for_the_group() {
        let mut session = FormSession::default();
        let mut model = GroupQueuesModel::default();
        let mut cmds = Vec::new();
        update(
            &mut session,
            &mut model,
            GroupQueuesMsg::BrowseFiles(1),
            &mut cmds,
        );
        assert_eq!(cmds, vec![GroupQueuesCommand::PickFiles { group: 1 }]);
    }
}
