//! Upload acceptance rules for wizard file fields.
//!
//! Files arrive as [`FileCandidate`]s (name, size, MIME type). The policy
//! of the target field decides which candidates become [`UploadedFile`]
//! records. Every excluded candidate is reported with a reason so the form
//! can tell the seller why a file was not added.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Verified,
    Rejected,
}

impl UploadStatus {
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Pending, Uploading)
                | (Pending, Verified)
                | (Pending, Rejected)
                | (Uploading, Verified)
                | (Uploading, Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub status: UploadStatus,
}

impl UploadedFile {
    fn from_candidate(candidate: FileCandidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            size: candidate.size,
            mime_type: candidate.mime_type,
            preview_url: None,
            status: UploadStatus::Pending,
        }
    }

    pub fn is_image(&self) -> bool {
        is_image_type(&self.mime_type)
    }

    /// Move to `next`, rejecting edges the upload lifecycle does not allow.
    pub fn transition_to(&mut self, next: UploadStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "File '{}' cannot move from {:?} to {:?}",
                self.name, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

pub fn is_image_type(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().starts_with("image/")
}

/// A file offered for upload, before any policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// Limits applied to one file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_mb: u64,
    /// MIME types (`application/pdf`), MIME wildcards (`image/*`) or
    /// extensions (`.pdf`). Empty accepts everything.
    pub accept: Vec<String>,
    pub multiple: bool,
}

impl UploadPolicy {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb * BYTES_PER_MB
    }

    pub fn accepts_type(&self, candidate: &FileCandidate) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        let mime = candidate.mime_type.to_ascii_lowercase();
        let name = candidate.name.to_ascii_lowercase();
        self.accept.iter().any(|pattern| {
            let pattern = pattern.to_ascii_lowercase();
            if pattern.starts_with('.') {
                name.ends_with(&pattern)
            } else if let Some(prefix) = pattern.strip_suffix("/*") {
                mime.split('/').next() == Some(prefix)
            } else {
                mime == pattern
            }
        })
    }

    fn check(&self, candidate: &FileCandidate) -> Option<RejectionReason> {
        if candidate.size > self.max_size_bytes() {
            return Some(RejectionReason::TooLarge {
                size: candidate.size,
                max_bytes: self.max_size_bytes(),
            });
        }
        if !self.accepts_type(candidate) {
            return Some(RejectionReason::DisallowedType {
                mime_type: candidate.mime_type.clone(),
            });
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    #[serde(rename_all = "camelCase")]
    TooLarge { size: u64, max_bytes: u64 },
    #[serde(rename_all = "camelCase")]
    DisallowedType {
        #[serde(rename = "type")]
        mime_type: String,
    },
    /// The field holds a single file and another candidate was kept.
    SingleFileOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub name: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
}

/// Result of offering a batch of candidates to a file field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub accepted: Vec<UploadedFile>,
    pub rejected: Vec<RejectedFile>,
    /// Position in the offered batch of each entry in `accepted`.
    #[serde(skip)]
    pub accepted_indices: Vec<usize>,
    /// Files displaced from a single-file field; their previews must be
    /// released by the caller.
    #[serde(skip)]
    pub replaced: Vec<UploadedFile>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Apply `policy` to `candidates` and merge the accepted ones into `files`.
///
/// With `multiple` the accepted files are appended; otherwise the first
/// accepted file replaces the collection and further candidates are
/// rejected. When nothing is accepted `files` is left untouched.
pub fn accept_files(
    files: &mut Vec<UploadedFile>,
    candidates: Vec<FileCandidate>,
    policy: &UploadPolicy,
) -> UploadOutcome {
    let mut outcome = UploadOutcome::default();

    for (index, candidate) in candidates.into_iter().enumerate() {
        if let Some(reason) = policy.check(&candidate) {
            outcome.rejected.push(RejectedFile {
                name: candidate.name,
                reason,
            });
            continue;
        }
        if !policy.multiple && !outcome.accepted.is_empty() {
            outcome.rejected.push(RejectedFile {
                name: candidate.name,
                reason: RejectionReason::SingleFileOnly,
            });
            continue;
        }
        outcome.accepted.push(UploadedFile::from_candidate(candidate));
        outcome.accepted_indices.push(index);
    }

    if policy.multiple {
        files.extend(outcome.accepted.iter().cloned());
    } else if !outcome.accepted.is_empty() {
        outcome.replaced = std::mem::replace(files, outcome.accepted.clone());
    }

    outcome
}

/// Remove the file with `id`, keeping the order of the rest.
///
/// Returns the removed file so the caller can release its preview.
pub fn remove_file(files: &mut Vec<UploadedFile>, id: Uuid) -> Option<UploadedFile> {
    let index = files.iter().position(|f| f.id == id)?;
    Some(files.remove(index))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
