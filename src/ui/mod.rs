// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for the RCC submission form.
//! Handles layout, the submit controls, and wiring to background transfers.

pub mod components;

use eframe::egui;

use crate::logic::session::{Phase, UploadMode};
use crate::logic::validate::SubmitIntent;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{cutoffs, features, group_queues, uploads};

/// Stateful egui application driving one submission form.
pub struct RccSubmitApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl Default for RccSubmitApp {
    fn default() -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::default(),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for RccSubmitApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which eframe
    /// still invokes immediately before `ui` each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drain worker results, apply queued messages, then render the frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });

        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Messages are applied in the order they were produced.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("RCC Submission");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_submit_buttons(ui);
                    ui.separator();
                    self.render_job_controls(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_email_input(ui);
                ui.add_space(12.0);

                self.render_samples_section(ui, ctx);
                ui.add_space(12.0);

                egui::CollapsingHeader::new("Statistical test")
                    .default_open(true)
                    .show(ui, |ui| {
                        let msgs = features::view(ui, &self.model.session);
                        self.inbox.extend(msgs.into_iter().map(Msg::Features));
                    });
                ui.add_space(12.0);

                egui::CollapsingHeader::new("Cutoffs and normalization")
                    .default_open(true)
                    .show(ui, |ui| {
                        let msgs = cutoffs::view(ui, &self.model.session);
                        self.inbox.extend(msgs.into_iter().map(Msg::Cutoffs));
                    });
                ui.add_space(8.0);
            });
        });

        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl RccSubmitApp {
    fn render_job_controls(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.model.session.is_busy();
        let reset = egui::Button::new(format!(
            "{} Reset",
            egui_phosphor::regular::ARROW_COUNTER_CLOCKWISE
        ));
        if ui
            .add_enabled(enabled, reset)
            .on_hover_text("Clear the form")
            .on_disabled_hover_text("A submission is in progress")
            .clicked()
        {
            self.inbox.push(Msg::ResetRequested);
        }

        let load = egui::Button::new(format!("{} Load job", egui_phosphor::regular::FOLDER_OPEN));
        if ui
            .add_enabled(enabled, load)
            .on_hover_text("Open the job context JSON issued by the server")
            .clicked()
        {
            self.inbox.push(Msg::LoadJobRequested);
        }
    }

    /// Submit and cancel are disabled while uploads or the post are in flight.
    fn render_submit_buttons(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.model.session.is_busy();

        let cancel = egui::Button::new(format!("{} Cancel job", egui_phosphor::regular::X_CIRCLE));
        if ui.add_enabled(enabled, cancel).clicked() {
            self.inbox.push(Msg::SubmitRequested(SubmitIntent::Cancel));
        }

        let submit = egui::Button::new(format!(
            "{} Submit",
            egui_phosphor::regular::PAPER_PLANE_RIGHT
        ));
        if ui
            .add_enabled(enabled, submit)
            .on_disabled_hover_text("A submission is in progress")
            .clicked()
        {
            self.inbox.push(Msg::SubmitRequested(SubmitIntent::Submit));
        }
    }

    fn render_email_input(&mut self, ui: &mut egui::Ui) {
        ui.label("Email address");
        ui.add_space(4.0);
        let mut email = self.model.session.email().to_string();
        if ui
            .add_enabled(
                !self.model.session.is_busy(),
                egui::TextEdit::singleline(&mut email).hint_text("you@institute.org"),
            )
            .changed()
        {
            self.inbox.push(Msg::EmailChanged(email));
        }
        ui.label(
            egui::RichText::new("Results are sent to this address when processing finishes.")
                .small()
                .color(egui::Color32::from_gray(110)),
        );
    }

    /// Upload mode switch plus the rows or group queues for the active mode.
    fn render_samples_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::CollapsingHeader::new("Samples")
            .default_open(true)
            .show(ui, |ui| {
                let current = self.model.session.mode();
                let mut mode = current;
                ui.add_enabled_ui(!self.model.session.is_busy(), |ui| {
                    ui.horizontal(|ui| {
                        ui.selectable_value(&mut mode, UploadMode::Rows, "One file per sample");
                        ui.selectable_value(&mut mode, UploadMode::Queues, "Upload by group");
                    });
                });
                if mode != current {
                    self.inbox.push(Msg::SetMode(mode));
                }
                ui.add_space(6.0);

                match current {
                    UploadMode::Rows => {
                        let msgs = uploads::view(ui, &self.model.session);
                        self.inbox.extend(msgs.into_iter().map(Msg::Uploads));
                    }
                    UploadMode::Queues => {
                        let msgs = group_queues::view(
                            ui,
                            ctx,
                            &self.model.session,
                            &self.model.group_queues,
                        );
                        self.inbox.extend(msgs.into_iter().map(Msg::GroupQueues));
                    }
                }
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Validation error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render job, phase and latest status message.
    fn render_status(&self, ui: &mut egui::Ui) {
        let session = &self.model.session;
        ui.horizontal(|ui| {
            let job = &session.context().job_id;
            let job_label = if job.is_empty() {
                "No job loaded".to_string()
            } else {
                format!("Job {job}")
            };
            ui.label(egui::RichText::new(job_label).strong());
            ui.separator();

            if let Some((done, total)) = session.upload_progress() {
                ui.label(format!("{done}/{total} groups uploaded"));
                ui.separator();
            }
            if session.phase() == Phase::Submitted {
                ui.label(egui::RichText::new(egui_phosphor::regular::CHECK_CIRCLE));
            }

            if let Some(text) = &self.model.status {
                // Multi-line errors are shown in full in the modal.
                let first_line = text.lines().next().unwrap_or_default();
                ui.label(egui::RichText::new(first_line).color(egui::Color32::from_gray(68)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }
        });
    }
}
