//! Service file parsing and validation.
//!
//! Parses a service file and validates the constraints the generated
//! workflows depend on:
//! - Version must be "1.0"
//! - Service, group, and destination names must be non-empty
//! - Group names are unique (they become workflow names)
//! - Destination display names are unique per group and usable as job ids
//! - No two generated workflows derive the same file name

use super::naming::filename_for;
use super::resolver::{is_valid_job_id, COMMIT_JOB_ID};
use super::service::ServiceFile;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ValidationError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Parse a service file from disk.
pub fn parse_service_file(path: &Path) -> Result<ServiceFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_service(&content)
}

/// Parse a service file from a string.
pub fn parse_service(yaml: &str) -> Result<ServiceFile, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed service file. Returns every problem found (empty = valid).
pub fn validate_service(file: &ServiceFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if file.version != "1.0" {
        errors.push(ValidationError::new(format!(
            "version must be \"1.0\", got \"{}\"",
            file.version
        )));
    }

    let service = &file.service;
    if service.name.trim().is_empty() {
        errors.push(ValidationError::new("service name must not be empty".to_string()));
    }

    // Root workflow file first; every stage file must differ from it and
    // from each other.
    let mut files: HashMap<String, String> = HashMap::new();
    files.insert(filename_for(&service.name), service.name.clone());

    let mut group_names = HashSet::new();
    for (i, group) in service.destination_groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::new(format!(
                "destination group #{} has an empty name",
                i + 1
            )));
            continue;
        }
        if !group_names.insert(group.name.as_str()) {
            errors.push(ValidationError::new(format!(
                "destination group '{}' is declared more than once",
                group.name
            )));
        }
        let stage = format!("{}-{}", service.name, group.name);
        let file = filename_for(&stage);
        if let Some(previous) = files.get(&file) {
            if previous != &stage {
                errors.push(ValidationError::new(format!(
                    "workflow '{}' derives file name '{}', already used by '{}'",
                    stage, file, previous
                )));
            }
        } else {
            files.insert(file, stage);
        }
        if group.destinations.is_empty() {
            errors.push(ValidationError::new(format!(
                "destination group '{}' has no destinations",
                group.name
            )));
        }

        let mut job_ids = HashSet::new();
        for destination in &group.destinations {
            let id = destination.to_string();
            if destination.name.trim().is_empty() {
                errors.push(ValidationError::new(format!(
                    "destination group '{}' has a destination with an empty name",
                    group.name
                )));
                continue;
            }
            if id == COMMIT_JOB_ID {
                errors.push(ValidationError::new(format!(
                    "destination '{}' in group '{}' collides with the commit job",
                    id, group.name
                )));
            }
            if !is_valid_job_id(&id) {
                errors.push(ValidationError::new(format!(
                    "destination '{}' in group '{}' is not a valid job id",
                    id, group.name
                )));
            }
            if !job_ids.insert(id.clone()) {
                errors.push(ValidationError::new(format!(
                    "destination '{}' appears more than once in group '{}'",
                    id, group.name
                )));
            }
        }
    }

    if file.settings.git_ref.trim().is_empty() {
        errors.push(ValidationError::new("settings.git_ref must not be empty".to_string()));
    }
    if file.settings.cli_name.trim().is_empty() {
        errors.push(ValidationError::new("settings.cli_name must not be empty".to_string()));
    }

    errors
}

/// JSON Schema of the service file, pretty-printed.
pub fn service_schema() -> Result<String, String> {
    let schema = schemars::schema_for!(ServiceFile);
    serde_json::to_string_pretty(&schema).map_err(|e| format!("serialize error: {}", e))
}
