//! Service description: the input a river is generated from.
//!
//! A service file names a service, lists its destination groups in
//! deployment order, and optionally tunes how the generated workflows look.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of a service file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ServiceFile {
    /// Schema version (must be "1.0")
    pub version: String,

    /// The service to generate workflows for
    pub service: Service,

    /// Generation settings
    #[serde(default)]
    pub settings: Settings,
}

/// A deployable service and its ordered destination groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub name: String,

    /// Deployment stages, rolled out strictly in this order
    #[serde(default)]
    pub destination_groups: Vec<DestinationGroup>,
}

/// One deployment stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DestinationGroup {
    pub name: String,

    #[serde(default)]
    pub destinations: Vec<Destination>,
}

/// A single deployment target (cluster, optionally narrowed to a namespace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Destination {
    /// Cluster name
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,
}

impl Destination {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: None,
        }
    }

    pub fn in_namespace(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => write!(f, "{}-{}", self.name, ns),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// Knobs for the generated workflows. Every key has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Command the generated steps invoke
    #[serde(default = "default_cli_name")]
    pub cli_name: String,

    /// Branch the commit jobs check out and push to
    #[serde(default = "default_git_ref")]
    pub git_ref: String,

    /// Commit message; `{workflow}` is replaced by the stage workflow name
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Runner labels for every generated job that runs steps
    #[serde(default = "default_runs_on")]
    pub runs_on: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cli_name: default_cli_name(),
            git_ref: default_git_ref(),
            commit_message: default_commit_message(),
            runs_on: default_runs_on(),
        }
    }
}

impl Settings {
    /// The commit message for one stage workflow.
    pub fn commit_message_for(&self, workflow: &str) -> String {
        self.commit_message.replace("{workflow}", workflow)
    }
}

fn default_cli_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_git_ref() -> String {
    "main".to_string()
}

fn default_commit_message() -> String {
    "chore: update {workflow}".to_string()
}

fn default_runs_on() -> Vec<String> {
    vec!["ubuntu-latest".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_file_parse() {
        let yaml = r#"
version: "1.0"
service:
  name: payments
  destination_groups:
    - name: staging
      destinations:
        - name: stage-east
          namespace: payments
    - name: production
      destinations:
        - name: prod-east
        - name: prod-west
settings:
  git_ref: release
"#;
        let file: ServiceFile = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(file.service.name, "payments");
        assert_eq!(file.service.destination_groups.len(), 2);
        assert_eq!(file.service.destination_groups[1].destinations.len(), 2);
        assert_eq!(file.settings.git_ref, "release");
        assert_eq!(file.settings.cli_name, "actionsmith");
        assert_eq!(file.settings.runs_on, vec!["ubuntu-latest"]);
    }

    #[test]
    fn test_settings_defaults_when_absent() {
        let yaml = r#"
version: "1.0"
service:
  name: api
"#;
        let file: ServiceFile = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(file.settings, Settings::default());
        assert!(file.service.destination_groups.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = r#"
version: "1.0"
service:
  name: api
  groups: []
"#;
        assert!(serde_yaml_ng::from_str::<ServiceFile>(yaml).is_err());
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::new("prod-east").to_string(), "prod-east");
        assert_eq!(
            Destination::in_namespace("prod-east", "payments").to_string(),
            "prod-east-payments"
        );
        let empty_ns = Destination {
            name: "edge".to_string(),
            namespace: Some(String::new()),
        };
        assert_eq!(empty_ns.to_string(), "edge");
    }

    #[test]
    fn test_commit_message_template() {
        let s = Settings::default();
        assert_eq!(
            s.commit_message_for("payments-staging"),
            "chore: update payments-staging"
        );
    }
}
