// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Job context issued by the analysis server.
//! Parsing is kept pure so it can be reused by UI and tests.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Server-issued job data the form is bound to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct JobContext {
    /// Identifier posted as `job_id` and attached to every upload.
    #[serde(default)]
    pub job_id: String,
    /// Base URL that upload and submit endpoints are resolved against.
    #[serde(default)]
    pub server_url: String,
    /// Suggested group per sample row, in row order.
    #[serde(default)]
    pub initial_groups: Vec<usize>,
    #[serde(default)]
    pub settings: FormSettings,
}

/// Tunables for uploads and dynamic fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FormSettings {
    #[serde(default = "upload_endpoint_default")]
    pub upload_endpoint: String,
    #[serde(default = "submit_endpoint_default")]
    pub submit_endpoint: String,
    #[serde(default = "max_file_size_default")]
    pub max_file_size_bytes: u64,
    #[serde(default = "accepted_extensions_default")]
    pub accepted_extensions: Vec<String>,
    /// ANOVA group count used while too few samples exist to offer a choice.
    #[serde(default = "default_feature_count_default")]
    pub default_feature_count: usize,
    /// Group counts above this ask for confirmation first.
    #[serde(default = "confirm_group_threshold_default")]
    pub confirm_group_threshold: usize,
    #[serde(default = "sample_name_max_len_default")]
    pub sample_name_max_len: usize,
}

fn upload_endpoint_default() -> String {
    "/cgi-bin/upload.php".to_string()
}
fn submit_endpoint_default() -> String {
    "/cgi-bin/process.php".to_string()
}
fn max_file_size_default() -> u64 {
    1024 * 1024
}
fn accepted_extensions_default() -> Vec<String> {
    vec!["rcc".to_string()]
}
fn default_feature_count_default() -> usize {
    3
}
fn confirm_group_threshold_default() -> usize {
    10
}
fn sample_name_max_len_default() -> usize {
    50
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            upload_endpoint: upload_endpoint_default(),
            submit_endpoint: submit_endpoint_default(),
            max_file_size_bytes: max_file_size_default(),
            accepted_extensions: accepted_extensions_default(),
            default_feature_count: default_feature_count_default(),
            confirm_group_threshold: confirm_group_threshold_default(),
            sample_name_max_len: sample_name_max_len_default(),
        }
    }
}

/// Parse a job context from its JSON representation.
///
/// Missing settings fall back to their defaults; extensions are normalized to
/// lowercase without a leading dot.
pub fn parse_job_context(json: &str) -> Result<JobContext> {
    let mut ctx: JobContext =
        serde_json::from_str(json).context("Failed to parse job context JSON")?;

    if ctx.settings.default_feature_count < 2 {
        bail!(
            "default_feature_count must be at least 2 (got {})",
            ctx.settings.default_feature_count
        );
    }

    ctx.settings.accepted_extensions = ctx
        .settings
        .accepted_extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    Ok(ctx)
}

/// Read and parse a job context file.
pub fn load_job_context(path: &Path) -> Result<JobContext> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job context: {:?}", path))?;
    parse_job_context(&content)
}
