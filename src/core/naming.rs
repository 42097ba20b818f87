//! Workflow file names and repository layout.
//!
//! A workflow's file name is derived from its human-readable name unless one
//! has been pinned explicitly. Derivation is pure and idempotent on the file
//! name space: deriving from an already-derived name returns it unchanged.

use super::types::Workflow;
use std::path::{Path, PathBuf};

/// Extension of every generated workflow file.
pub const WORKFLOW_EXTENSION: &str = ".yml";

/// Directory GitHub reads workflows from, relative to the repository root.
pub const DEFAULT_WORKFLOWS_DIR: &str = "./.github/workflows";

const SEPARATOR: char = '-';

/// Derive a lowercase, filesystem-safe file name from a workflow name.
///
/// Every character that is not an ASCII letter or digit becomes `-`, leading
/// and trailing separators are trimmed, runs of separators collapse into one,
/// and `.yml` is appended.
pub fn filename_for(name: &str) -> String {
    let stem = name.strip_suffix(WORKFLOW_EXTENSION).unwrap_or(name);

    let mut out = String::with_capacity(stem.len() + WORKFLOW_EXTENSION.len());
    for c in stem.chars() {
        let mapped = if c.is_ascii_alphanumeric() { c } else { SEPARATOR };
        if mapped == SEPARATOR && (out.is_empty() || out.ends_with(SEPARATOR)) {
            continue;
        }
        out.push(mapped.to_ascii_lowercase());
    }
    if out.ends_with(SEPARATOR) {
        out.pop();
    }

    out.push_str(WORKFLOW_EXTENSION);
    out
}

impl Workflow {
    /// The pinned file name if one was set, otherwise the derived one.
    pub fn filename(&self) -> String {
        match &self.pinned_filename {
            Some(pinned) => pinned.clone(),
            None => filename_for(&self.name),
        }
    }

    /// Pin an explicit file name. A pinned name is never re-derived.
    pub fn pin_filename(&mut self, filename: impl Into<String>) {
        self.pinned_filename = Some(filename.into());
    }

    pub fn is_filename_pinned(&self) -> bool {
        self.pinned_filename.is_some()
    }
}

/// Path of a workflow relative to the repository root.
pub fn relative_path(workflow: &Workflow) -> PathBuf {
    Path::new(DEFAULT_WORKFLOWS_DIR).join(workflow.filename())
}

/// Path of a workflow inside an arbitrary output directory.
pub fn path_in(dir: &Path, workflow: &Workflow) -> PathBuf {
    dir.join(workflow.filename())
}

/// The `uses:` value a job in the same repository calls this workflow with.
pub fn local_reference(workflow: &Workflow) -> String {
    format!("{}/{}", DEFAULT_WORKFLOWS_DIR, workflow.filename())
}
