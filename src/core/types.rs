//! Workflow document model.
//!
//! Mirrors the GitHub Actions workflow syntax. Wire names follow the vendor
//! schema exactly and every optional field is omitted when it holds its
//! default, so a round trip through YAML or JSON reproduces the document.
//! <https://docs.github.com/en/actions/reference/workflow-syntax-for-github-actions>

use super::error::WorkflowError;
use super::variant::{Matrix, Secrets, StringOrInt};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// `skip_serializing_if` predicate shared by every defaulted field.
fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Accept either a single string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// A trigger key that is present with no body (`workflow_dispatch:`) still
/// enables the trigger.
fn present_trigger<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?.unwrap_or_default()))
}

// ============================================================================
// Workflow
// ============================================================================

/// One generated workflow document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,

    #[serde(rename = "run-name", default, skip_serializing_if = "String::is_empty")]
    pub run_name: String,

    pub on: WorkflowOn,

    #[serde(default, skip_serializing_if = "is_default")]
    pub concurrency: Concurrency,

    #[serde(default, skip_serializing_if = "is_default")]
    pub defaults: Defaults,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub permissions: Permissions,

    /// Jobs keyed by job id, in insertion order.
    #[serde(default)]
    pub jobs: IndexMap<String, Job>,

    /// Explicit file name; never serialized. See [`Workflow::filename`].
    #[serde(skip)]
    pub(crate) pinned_filename: Option<String>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String, WorkflowError> {
        serde_yaml_ng::to_string(self).map_err(|e| WorkflowError::Serialize(e.to_string()))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, WorkflowError> {
        serde_json::to_string_pretty(self).map_err(|e| WorkflowError::Serialize(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, WorkflowError> {
        serde_yaml_ng::from_str(yaml).map_err(|e| WorkflowError::Parse(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, WorkflowError> {
        serde_json::from_str(json).map_err(|e| WorkflowError::Parse(e.to_string()))
    }
}

// ============================================================================
// Triggers
// ============================================================================

/// The `on` block. Absent triggers are omitted; a present trigger without
/// configuration serializes as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOn {
    #[serde(
        rename = "workflow_call",
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub call: Option<OnCall>,

    #[serde(
        rename = "workflow_run",
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub run: Option<OnWorkflowRun>,

    #[serde(
        rename = "workflow_dispatch",
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub dispatch: Option<OnDispatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<OnSchedule>>,

    #[serde(
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request: Option<OnPullRequest>,

    #[serde(
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request_target: Option<OnPullRequest>,

    #[serde(
        default,
        deserialize_with = "present_trigger",
        skip_serializing_if = "Option::is_none"
    )]
    pub push: Option<OnPush>,
}

/// `workflow_call`: the workflow is reusable from other workflows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnCall {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, CallInput>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, CallOutput>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub secrets: IndexMap<String, CallSecret>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub required: bool,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<CallInputType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallInputType {
    String,
    Boolean,
    Number,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallOutput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallSecret {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub required: bool,
}

/// `workflow_run`: run after another workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnWorkflowRun {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflows: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(flatten)]
    pub branches: OnBranches,
}

/// `workflow_dispatch`: manual runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnDispatch {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub inputs: IndexMap<String, DispatchInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchInput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Always emitted; the dispatch form renders optional inputs differently.
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<DispatchInputType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchInputType {
    String,
    Boolean,
    Number,
    Environment,
    Choice,
}

/// One `schedule` entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnSchedule {
    pub cron: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnPaths {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    #[serde(rename = "paths-ignore", default, skip_serializing_if = "Vec::is_empty")]
    pub paths_ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnBranches {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    #[serde(rename = "branches-ignore", default, skip_serializing_if = "Vec::is_empty")]
    pub branches_ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnTags {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(rename = "tags-ignore", default, skip_serializing_if = "Vec::is_empty")]
    pub tags_ignore: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnPullRequest {
    #[serde(flatten)]
    pub paths: OnPaths,

    #[serde(flatten)]
    pub branches: OnBranches,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnPush {
    #[serde(flatten)]
    pub paths: OnPaths,

    #[serde(flatten)]
    pub branches: OnBranches,

    #[serde(flatten)]
    pub tags: OnTags,
}

// ============================================================================
// Shared blocks
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concurrency {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,

    #[serde(rename = "cancel-in-progress", default, skip_serializing_if = "is_default")]
    pub cancel_in_progress: bool,
}

/// Access level for a `GITHUB_TOKEN` permission scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
    None,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Permissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestations: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussions: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_events: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statuses: Option<AccessLevel>,
}

/// Deployment environment a job targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "is_default")]
    pub run: DefaultsRun,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<Shell>,

    #[serde(rename = "working-directory", default, skip_serializing_if = "String::is_empty")]
    pub working_directory: String,
}

/// Interpreter for a `run` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Sh,
    Pwsh,
    Python,
    Cmd,
    Powershell,
}

// ============================================================================
// Jobs
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub permissions: Permissions,

    /// Sibling job ids that must finish first.
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,

    #[serde(rename = "if", default, skip_serializing_if = "String::is_empty")]
    pub if_condition: String,

    #[serde(
        rename = "runs-on",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub runs_on: Vec<String>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub environment: Environment,

    #[serde(default, skip_serializing_if = "is_default")]
    pub concurrency: Concurrency,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub outputs: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub defaults: Defaults,

    #[serde(default, skip_serializing_if = "is_default")]
    pub strategy: Strategy,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,

    #[serde(rename = "timeout-minutes", default, skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u32>,

    #[serde(rename = "continue-on-error", default, skip_serializing_if = "is_default")]
    pub continue_on_error: bool,

    /// Reusable workflow this job delegates to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uses: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, serde_yaml_ng::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Secrets>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub container: Container,
}

impl Job {
    /// True when the job delegates to another workflow file.
    pub fn is_reusable_call(&self) -> bool {
        !self.uses.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Matrix>,

    #[serde(rename = "fail-fast", default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    #[serde(rename = "max-parallel", default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Port numbers or `host:container` mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<StringOrInt>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub credentials: ContainerCredentials,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub options: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerCredentials {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

// ============================================================================
// Steps
// ============================================================================

/// A single step: either an action reference (`uses` + `with`) or an inline
/// script (`run` + `shell`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "if", default, skip_serializing_if = "String::is_empty")]
    pub if_condition: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uses: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run: String,

    #[serde(rename = "working-directory", default, skip_serializing_if = "String::is_empty")]
    pub working_directory: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<Shell>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, serde_yaml_ng::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    #[serde(rename = "continue-on-error", default, skip_serializing_if = "is_default")]
    pub continue_on_error: bool,

    #[serde(rename = "timeout-minutes", default, skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u32>,
}

impl Step {
    /// An inline script step.
    pub fn run(script: impl Into<String>) -> Self {
        Self {
            run: script.into(),
            ..Self::default()
        }
    }

    /// An action reference step.
    pub fn uses(action: impl Into<String>) -> Self {
        Self {
            uses: action.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add an action argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_yaml_ng::Value>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }

    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = Some(shell);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Workflow {
        let mut wf = Workflow::new("minimal");
        wf.on.push = Some(OnPush {
            branches: OnBranches {
                branches: vec!["main".to_string()],
                ..OnBranches::default()
            },
            ..OnPush::default()
        });
        wf.jobs.insert(
            "foo".to_string(),
            Job {
                runs_on: vec!["ubuntu-latest".to_string()],
                steps: vec![Step::run("echo \"foo\"")],
                ..Job::default()
            },
        );
        wf
    }

    #[test]
    fn test_minimal_workflow_json_shape() {
        let json = serde_json::to_value(minimal()).unwrap();
        assert_eq!(json["name"], "minimal");
        assert_eq!(json["on"]["push"]["branches"][0], "main");
        assert_eq!(json["jobs"]["foo"]["runs-on"][0], "ubuntu-latest");
        assert_eq!(json["jobs"]["foo"]["steps"][0]["run"], "echo \"foo\"");
        // Defaulted fields are omitted, not emitted as null or empty.
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("run-name"));
        assert!(!obj.contains_key("env"));
        assert!(!obj.contains_key("permissions"));
        assert!(!obj.contains_key("concurrency"));
        let job = json["jobs"]["foo"].as_object().unwrap();
        assert_eq!(job.len(), 2);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let wf = minimal();
        let yaml = wf.to_yaml().unwrap();
        let back = Workflow::from_yaml(&yaml).unwrap();
        assert_eq!(back, wf);
    }

    #[test]
    fn test_inherit_secrets_wire_shape() {
        let mut wf = Workflow::new("inherit secrets");
        wf.on.push = Some(OnPush::default());
        wf.jobs.insert(
            "foo".to_string(),
            Job {
                uses: "./foo.yaml".to_string(),
                secrets: Some(Secrets::Inherit),
                ..Job::default()
            },
        );
        let json = serde_json::to_string(&wf).unwrap();
        assert!(json.contains(r#""secrets":"inherit""#), "{}", json);
        assert!(json.contains(r#""push":{}"#), "{}", json);
    }

    #[test]
    fn test_mapping_secrets_wire_shape() {
        let job = Job {
            uses: "./foo.yaml".to_string(),
            secrets: Some(Secrets::mapping([("foo", "bar")])),
            ..Job::default()
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains(r#""secrets":{"foo":"bar"}"#), "{}", json);
    }

    #[test]
    fn test_empty_trigger_key_enables_trigger() {
        let yaml = r#"
name: manual
on:
  workflow_dispatch:
  workflow_call: {}
jobs: {}
"#;
        let wf = Workflow::from_yaml(yaml).unwrap();
        assert_eq!(wf.on.dispatch, Some(OnDispatch::default()));
        assert_eq!(wf.on.call, Some(OnCall::default()));
        assert!(wf.on.push.is_none());
        let json = wf.to_json().unwrap();
        assert!(json.contains("\"workflow_dispatch\": {}"), "{}", json);
    }

    #[test]
    fn test_needs_and_runs_on_accept_scalar() {
        let yaml = r#"
needs: build
runs-on: ubuntu-latest
steps:
  - run: make
"#;
        let job: Job = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(job.needs, vec!["build"]);
        assert_eq!(job.runs_on, vec!["ubuntu-latest"]);
    }

    #[test]
    fn test_permissions_kebab_case() {
        let p = Permissions {
            id_token: Some(AccessLevel::Write),
            pull_requests: Some(AccessLevel::Read),
            ..Permissions::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"id-token":"write","pull-requests":"read"}"#);
    }

    #[test]
    fn test_strategy_matrix_in_job() {
        let yaml = r#"
runs-on: ubuntu-latest
strategy:
  fail-fast: false
  matrix:
    os: [ubuntu-latest, macos-latest]
    version: [1, "2"]
steps:
  - run: echo hi
"#;
        let job: Job = serde_yaml_ng::from_str(yaml).unwrap();
        let matrix = job.strategy.matrix.as_ref().unwrap();
        assert_eq!(
            matrix.dimensions()["version"],
            vec![StringOrInt::Int(1), StringOrInt::String("2".to_string())]
        );
        assert_eq!(job.strategy.fail_fast, Some(false));
    }

    #[test]
    fn test_invalid_secrets_aborts_document() {
        let yaml = r#"
name: bad
on:
  push: {}
jobs:
  call:
    uses: ./other.yml
    secrets: [a, b]
"#;
        let err = Workflow::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("invalid secrets value"), "{}", err);
    }

    #[test]
    fn test_container_ports_mixed() {
        let c: Container = serde_yaml_ng::from_str("image: redis\nports: [6379, \"8080:80\"]").unwrap();
        assert_eq!(c.ports[0], StringOrInt::Int(6379));
        assert_eq!(c.ports[1].as_str(), Some("8080:80"));
    }

    #[test]
    fn test_step_builders() {
        let step = Step::uses("actions/checkout@v4")
            .with_name("checkout")
            .with_id("co")
            .with_arg("fetch-depth", 1)
            .with_env("A", "b");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["with"]["fetch-depth"], 1);
        assert_eq!(json["env"]["A"], "b");
        assert_eq!(json["id"], "co");
        assert!(json.get("run").is_none());
    }

    #[test]
    fn test_pinned_filename_not_serialized() {
        let mut wf = minimal();
        wf.pinned_filename = Some("custom.yml".to_string());
        let json = wf.to_json().unwrap();
        assert!(!json.contains("custom.yml"));
    }
}
