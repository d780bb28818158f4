// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Upload rows, per-group upload queues and the transport settings handed to
//! the uploader (UI-agnostic).

use std::path::{Path, PathBuf};

use crate::logic::error::FormError;
use crate::models::groups::{Assignment, GroupAssignment};

/// One sample's pending upload in single-upload mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSlot {
    /// Zero-based position; also the `N` in `sampledataN`/`samplenameN`.
    pub index: usize,
    pub file: Option<PathBuf>,
    pub sample_name: String,
}

impl UploadSlot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Whitespace-only names count as missing.
    pub fn has_name(&self) -> bool {
        !self.sample_name.trim().is_empty()
    }

    /// File name without directories, used as a row label and in `filenameN`.
    pub fn file_name(&self) -> Option<String> {
        self.file.as_deref().and_then(display_name)
    }

    /// Whether this sample's row in the assignment table is set to "Exclude".
    pub fn is_excluded(&self, groups: &GroupAssignment) -> bool {
        matches!(groups.get(self.index), Some(Assignment::Excluded))
    }
}

/// Extra parameters posted with every file of a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadMetadata {
    pub job_id: String,
    pub group_id: usize,
}

/// Opaque uploader settings bound to one group queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    /// Path relative to the job's server URL.
    pub endpoint: String,
    pub max_file_size_bytes: u64,
    /// Lowercase extensions without the leading dot.
    pub accepted_extensions: Vec<String>,
    pub metadata: UploadMetadata,
}

impl TransportConfig {
    /// Check a candidate file against the extension filter and size limit.
    pub fn accepts(&self, path: &Path, size: u64) -> Result<(), String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.accepted_extensions.is_empty() && !self.accepted_extensions.contains(&ext) {
            return Err(format!(
                "only {} files are accepted",
                self.accepted_extensions.join(", ")
            ));
        }
        if size > self.max_file_size_bytes {
            return Err(format!(
                "file exceeds the {} byte size limit",
                self.max_file_size_bytes
            ));
        }
        Ok(())
    }
}

/// Upload progress of a queued file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FileStatus {
    #[default]
    Pending,
    Uploaded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedFile {
    pub path: PathBuf,
    pub size: u64,
    pub status: FileStatus,
}

/// Upload queue for one group in multi-upload mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupQueue {
    pub group_id: usize,
    /// Heading such as "Group 1: Control" or "Group 3".
    pub title: String,
    pub transport: TransportConfig,
    files: Vec<QueuedFile>,
}

impl GroupQueue {
    pub fn new(group_id: usize, title: String, transport: TransportConfig) -> Self {
        Self {
            group_id,
            title,
            transport,
            files: Vec::new(),
        }
    }

    pub fn files(&self) -> &[QueuedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Add a file after checking the transport filter and rejecting duplicates.
    pub fn queue_file(&mut self, path: PathBuf, size: u64) -> Result<(), FormError> {
        let name = display_name(&path).unwrap_or_else(|| path.display().to_string());
        if self.files.iter().any(|f| f.path == path) {
            return Err(FormError::Rejected {
                file: name,
                reason: "already queued".into(),
            });
        }
        self.transport
            .accepts(&path, size)
            .map_err(|reason| FormError::Rejected { file: name, reason })?;
        self.files.push(QueuedFile {
            path,
            size,
            status: FileStatus::Pending,
        });
        Ok(())
    }

    pub fn remove_file(&mut self, index: usize) -> bool {
        if index < self.files.len() {
            self.files.remove(index);
            true
        } else {
            false
        }
    }

    /// Record the outcome of one upload. Returns `false` if the file is not queued.
    pub fn mark(&mut self, path: &Path, uploaded: bool) -> bool {
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(file) => {
                file.status = if uploaded {
                    FileStatus::Uploaded
                } else {
                    FileStatus::Failed
                };
                true
            }
            None => false,
        }
    }

    /// Forget outcomes of a previous attempt.
    pub fn mark_all_pending(&mut self) {
        for file in &mut self.files {
            file.status = FileStatus::Pending;
        }
    }

    /// Every queued file has either uploaded or failed.
    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|f| f.status != FileStatus::Pending)
    }

    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Failed)
            .count()
    }
}

fn display_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> TransportConfig {
        TransportConfig {
            endpoint: "/cgi-bin/upload.php".into(),
            max_file_size_bytes: 1024,
            accepted_extensions: vec!["rcc".into()],
            metadata: UploadMetadata {
                job_id: "job-1".into(),
                group_id: 0,
            },
        }
    }

    #[test]
    fn slot_name_and_file_checks() {
        let mut slot = UploadSlot::new(0);
        slot.sample_name = "   ".into();
        assert!(!slot.has_name());
        assert!(!slot.has_file());

        slot.file = Some(PathBuf::from("/data/run1/sample_a.RCC"));
        assert_eq!(slot.file_name().as_deref(), Some("sample_a.RCC"));
    }

    #[test]
    fn slot_reports_exclusion_from_assignment() {
        let groups = GroupAssignment::new(vec![Assignment::Group(0), Assignment::Excluded]);
        assert!(!UploadSlot::new(0).is_excluded(&groups));
        assert!(UploadSlot::new(1).is_excluded(&groups));
        assert!(!UploadSlot::new(7).is_excluded(&groups));
    }

    #[test]
    fn queue_rejects_wrong_extension_oversize_and_duplicates() {
        let mut queue = GroupQueue::new(0, "Group 1".into(), transport());

        assert!(queue.queue_file(PathBuf::from("a.RCC"), 10).is_ok());
        assert!(matches!(
            queue.queue_file(PathBuf::from("a.RCC"), 10),
            Err(FormError::Rejected { .. })
        ));
        assert!(queue.queue_file(PathBuf::from("b.txt"), 10).is_err());
        assert!(queue.queue_file(PathBuf::from("c.rcc"), 4096).is_err());
        assert_eq!(queue.files().len(), 1);
    }

    #[test]
    fn queue_completes_when_no_file_is_pending() {
        let mut queue = GroupQueue::new(1, "Group 2".into(), transport());
        queue.queue_file(PathBuf::from("a.rcc"), 1).unwrap();
        queue.queue_file(PathBuf::from("b.rcc"), 1).unwrap();

        assert!(queue.mark(Path::new("a.rcc"), true));
        assert!(!queue.is_complete());
        assert!(queue.mark(Path::new("b.rcc"), false));
        assert!(queue.is_complete());
        assert_eq!(queue.failed_count(), 1);
        assert!(!queue.mark(Path::new("missing.rcc"), true));

        queue.mark_all_pending();
        assert!(!queue.is_complete());
        assert_eq!(queue.failed_count(), 0);
    }
}
