// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! HTTP side effects: per-file uploads for group queues and the final form post.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::{Client, multipart};
use url::Url;

use crate::logic::submission::FormPost;
use crate::models::upload::TransportConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Resolve an endpoint path against the job's server URL.
pub fn endpoint_url(server_url: &str, endpoint: &str) -> Result<Url> {
    let base = Url::parse(server_url)
        .with_context(|| format!("Invalid server URL: {server_url:?}"))?;
    base.join(endpoint)
        .with_context(|| format!("Invalid endpoint {endpoint:?} for {base}"))
}

/// Post one queued file with its job and group parameters.
pub fn upload_file(server_url: &str, transport: &TransportConfig, path: &Path) -> Result<()> {
    let url = endpoint_url(server_url, &transport.endpoint)?;
    let name = file_name(path);
    let form = multipart::Form::new()
        .text("jobid", transport.metadata.job_id.clone())
        .text("groupid", transport.metadata.group_id.to_string())
        .text("name", name)
        .part("file", file_part(path)?);

    debug!("uploading {path:?} to {url}");
    client()?
        .post(url.clone())
        .multipart(form)
        .send()
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("Upload of {} to {url} failed", path.display()))?;
    Ok(())
}

/// Post the encoded form to the submit endpoint.
pub fn submit_form(server_url: &str, endpoint: &str, post: &FormPost) -> Result<()> {
    let url = endpoint_url(server_url, endpoint)?;
    let mut form = multipart::Form::new();
    for (name, value) in &post.fields {
        form = form.text(name.clone(), value.clone());
    }
    for (name, path) in &post.files {
        form = form.part(name.clone(), file_part(path)?);
    }

    info!(
        "submitting {} field(s) and {} file(s) to {url}",
        post.fields.len(),
        post.files.len()
    );
    client()?
        .post(url.clone())
        .multipart(form)
        .send()
        .and_then(|resp| resp.error_for_status())
        .with_context(|| format!("Form submission to {url} failed"))?;
    Ok(())
}

fn client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

fn file_part(path: &Path) -> Result<multipart::Part> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    multipart::Part::bytes(bytes)
        .file_name(file_name(path))
        .mime_str(&mime_for(path))
        .context("Invalid MIME type")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
