// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring logging and egui/eframe to launch the form.

use anyhow::{Context, Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;
use log::info;

use crate::ui::RccSubmitApp;

/// Start logging, then run the main egui event loop until the window closes.
pub fn run() -> Result<()> {
    // RUST_LOG overrides the default level. The handle must outlive the UI.
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")
        .context("Invalid log specification")?
        .start()
        .context("Failed to start logger")?;
    info!("starting rccsubmit {}", env!("CARGO_PKG_VERSION"));

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RCC Submission",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(RccSubmitApp::default()))
        }),
    )
    .map_err(|err| anyhow!("UI terminated with an error: {err}"))
}
