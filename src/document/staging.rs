//! Transient upload staging with guaranteed cleanup.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::DocumentError;

/// An uploaded report staged on disk for the duration of one request.
///
/// The file is removed when the guard drops, so both the success and the
/// failure path of a pipeline run release the document handle.
pub struct StagedReport {
    path: PathBuf,
}

impl StagedReport {
    /// Write `bytes` under `staging_dir` with a unique, sanitized name.
    pub fn stage(
        staging_dir: &Path,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<Self, DocumentError> {
        std::fs::create_dir_all(staging_dir)?;

        let path = staging_dir.join(format!(
            "{}_{}",
            Uuid::new_v4(),
            sanitize_filename(original_name)
        ));
        std::fs::write(&path, bytes)?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "report staged");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedReport {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), "failed to remove staged report: {e}");
            }
        }
    }
}

/// Strip path separators and control characters from a client-supplied name.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Collapse dot runs so "..", "..." cannot survive as traversal components.
    let mut collapsed = String::with_capacity(sanitized.len());
    for c in sanitized.chars() {
        if c == '.' && collapsed.ends_with('.') {
            continue;
        }
        collapsed.push(c);
    }

    if collapsed.trim_matches('.').is_empty() {
        "report.pdf".to_string()
    } else {
        collapsed
    }
}
