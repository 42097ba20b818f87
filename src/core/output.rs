//! Rendering workflows to text and writing them into a workflows directory.

use super::error::WorkflowError;
use super::naming::path_in;
use super::types::Workflow;
use std::path::{Path, PathBuf};

/// First line of every rendered file.
pub const GENERATED_HEADER: &str = "# Code generated by actionsmith. DO NOT EDIT.";

/// Render as YAML, prefixed with the generated-file header.
pub fn render(workflow: &Workflow) -> Result<String, WorkflowError> {
    let yaml = workflow.to_yaml()?;
    Ok(format!("{}\n{}", GENERATED_HEADER, yaml))
}

/// Render as pretty JSON (no header; JSON has no comments).
pub fn render_json(workflow: &Workflow) -> Result<String, WorkflowError> {
    workflow.to_json()
}

fn io_error(path: &Path, e: std::io::Error) -> WorkflowError {
    WorkflowError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

/// Write one workflow into `dir` atomically (temp file, then rename).
/// Returns the written path.
pub fn write_workflow(dir: &Path, workflow: &Workflow) -> Result<PathBuf, WorkflowError> {
    std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let path = path_in(dir, workflow);
    let content = render(workflow)?;

    let tmp_path = path.with_extension("yml.tmp");
    std::fs::write(&tmp_path, &content).map_err(|e| io_error(&tmp_path, e))?;
    std::fs::rename(&tmp_path, &path).map_err(|e| io_error(&path, e))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote workflow");
    Ok(path)
}

/// Write every workflow, stopping at the first failure.
pub fn write_all(dir: &Path, workflows: &[&Workflow]) -> Result<Vec<PathBuf>, WorkflowError> {
    workflows.iter().map(|wf| write_workflow(dir, wf)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Job, Step};

    fn sample() -> Workflow {
        let mut wf = Workflow::new("payments-staging");
        wf.jobs.insert(
            "commit".to_string(),
            Job {
                steps: vec![Step::run("git push")],
                ..Job::default()
            },
        );
        wf
    }

    #[test]
    fn test_render_has_header() {
        let text = render(&sample()).unwrap();
        assert!(text.starts_with(GENERATED_HEADER));
        assert!(text.contains("name: payments-staging"));
        // The header is a comment, so the body still parses.
        let parsed = Workflow::from_yaml(&text).unwrap();
        assert_eq!(parsed.jobs.len(), 1);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "payments-staging");
    }

    #[test]
    fn test_write_workflow_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("workflows");
        let path = write_workflow(&out, &sample()).unwrap();

        assert_eq!(path, out.join("payments-staging.yml"));
        assert!(path.exists());
        assert!(!out.join("payments-staging.yml.tmp").exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, render(&sample()).unwrap());
    }

    #[test]
    fn test_write_all_uses_pinned_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut pinned = Workflow::new("Release Train");
        pinned.pin_filename("train.yml");
        let plain = sample();

        let paths = write_all(dir.path(), &[&plain, &pinned]).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(dir.path().join("payments-staging.yml").exists());
        assert!(dir.path().join("train.yml").exists());
    }
}
