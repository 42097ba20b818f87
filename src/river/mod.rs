//! River: the graph of workflows that rolls a service out stage by stage.
//!
//! The root workflow checks out the source, regenerates application
//! manifests, and then delegates to one child workflow per destination group.
//! Children are chained so that group *i* only starts after group *i-1*.

pub mod jobs;

use crate::core::error::WorkflowError;
use crate::core::naming::local_reference;
use crate::core::resolver::{
    validate_filenames, validate_references, validate_workflow, COMMIT_JOB_ID,
};
use crate::core::service::{DestinationGroup, Service, Settings};
use crate::core::types::{OnCall, OnDispatch, Step, Workflow, WorkflowOn};
use crate::core::variant::Secrets;
use jobs::{CommitChangesInput, JobInput, JobOption};

/// Job id of the seed job in the root workflow.
pub const SEED_JOB_ID: &str = "source";

/// A root workflow plus its ordered stage workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct River {
    workflow: Workflow,
    children: Vec<Workflow>,
}

impl River {
    /// Build the river for `service`. Any job assembly failure aborts the
    /// whole build.
    pub fn new(service: &Service, settings: &Settings) -> Result<Self, WorkflowError> {
        let mut root = Workflow::new(service.name.as_str());
        root.on = WorkflowOn {
            call: Some(OnCall::default()),
            dispatch: Some(OnDispatch::default()),
            ..WorkflowOn::default()
        };

        let seed = jobs::new(
            JobInput::new(SEED_JOB_ID),
            vec![
                jobs::with_runs_on(settings.runs_on.clone()),
                jobs::with_steps(seed_steps(settings)),
            ],
        )?;
        root.jobs.insert(SEED_JOB_ID.to_string(), seed);

        let mut children: Vec<Workflow> = Vec::with_capacity(service.destination_groups.len());
        for group in &service.destination_groups {
            let previous = children.last().map(|wf| wf.name.clone());
            let child = build_child(service, group, previous.as_deref(), settings)?;
            tracing::debug!(
                workflow = %child.name,
                jobs = child.jobs.len(),
                "assembled stage workflow"
            );

            let mut delegate_options: Vec<JobOption> = vec![
                jobs::with_uses(local_reference(&child)),
                jobs::with_secrets(Secrets::Inherit),
            ];
            if let Some(prev) = previous {
                delegate_options.push(jobs::with_needs(vec![prev]));
            }
            let delegate = jobs::new(JobInput::new(child.name.as_str()), delegate_options)?;
            root.jobs.insert(child.name.clone(), delegate);
            children.push(child);
        }

        tracing::debug!(
            workflow = %root.name,
            stages = children.len(),
            "assembled river"
        );
        Ok(Self {
            workflow: root,
            children,
        })
    }

    /// The root workflow.
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Stage workflows in destination group order.
    pub fn child_workflows(&self) -> &[Workflow] {
        &self.children
    }

    /// Root first, then every stage workflow.
    pub fn all_workflows(&self) -> Vec<&Workflow> {
        std::iter::once(&self.workflow)
            .chain(self.children.iter())
            .collect()
    }

    /// Structural problems across every produced document. Stage workflows
    /// may name other workflows of the river in `needs`; no two documents may
    /// share a file name.
    pub fn validate(&self) -> Vec<WorkflowError> {
        let all = self.all_workflows();
        let names: Vec<String> = all.iter().map(|wf| wf.name.clone()).collect();
        let mut errors: Vec<WorkflowError> = all
            .iter()
            .flat_map(|wf| validate_workflow(wf, &names))
            .collect();
        errors.extend(validate_filenames(&all));
        errors.extend(validate_references(&all));
        errors
    }
}

fn seed_steps(settings: &Settings) -> Vec<Step> {
    vec![
        Step::uses("actions/checkout@v4").with_arg("fetch-depth", 1),
        Step::run(format!("{} generate applications", settings.cli_name))
            .with_name("Generate applications"),
    ]
}

fn build_child(
    service: &Service,
    group: &DestinationGroup,
    previous: Option<&str>,
    settings: &Settings,
) -> Result<Workflow, WorkflowError> {
    let name = format!("{}-{}", service.name, group.name);
    let mut child = Workflow::new(name.as_str());
    child.on = WorkflowOn {
        call: Some(OnCall::default()),
        ..WorkflowOn::default()
    };

    let update = Step::run(format!("{} update application", settings.cli_name))
        .with_name("Update application");
    let mut commit_options = vec![
        jobs::with_runs_on(settings.runs_on.clone()),
        jobs::with_commit_changes(
            CommitChangesInput {
                commit_message: settings.commit_message_for(&name),
                git_ref: settings.git_ref.clone(),
            },
            vec![update],
        ),
    ];
    if let Some(prev) = previous {
        commit_options.push(jobs::with_needs(vec![prev.to_string()]));
    }
    let commit = jobs::new(JobInput::new(COMMIT_JOB_ID), commit_options)?;
    child.jobs.insert(COMMIT_JOB_ID.to_string(), commit);

    for destination in &group.destinations {
        let id = destination.to_string();
        let job = jobs::new(
            JobInput::new(id.as_str()),
            vec![
                jobs::with_runs_on(settings.runs_on.clone()),
                jobs::with_needs(vec![COMMIT_JOB_ID.to_string()]),
                jobs::with_external_sync(),
            ],
        )?;
        tracing::debug!(workflow = %name, job = %id, "added destination job");
        child.jobs.insert(id, job);
    }

    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::Destination;

    fn group(name: &str, destinations: &[&str]) -> DestinationGroup {
        DestinationGroup {
            name: name.to_string(),
            destinations: destinations.iter().map(|d| Destination::new(d)).collect(),
        }
    }

    fn service(groups: Vec<DestinationGroup>) -> Service {
        Service {
            name: "payments".to_string(),
            destination_groups: groups,
        }
    }

    fn abc() -> Service {
        service(vec![
            group("a", &["a-east"]),
            group("b", &["b-east", "b-west"]),
            group("c", &["c-east"]),
        ])
    }

    #[test]
    fn test_groups_chain_in_order() {
        let river = River::new(&abc(), &Settings::default()).unwrap();

        let names: Vec<&str> = river
            .child_workflows()
            .iter()
            .map(|wf| wf.name.as_str())
            .collect();
        assert_eq!(names, vec!["payments-a", "payments-b", "payments-c"]);

        let children = river.child_workflows();
        assert!(children[0].jobs[COMMIT_JOB_ID].needs.is_empty());
        assert!(children[1].jobs[COMMIT_JOB_ID]
            .needs
            .contains(&"payments-a".to_string()));
        assert!(children[2].jobs[COMMIT_JOB_ID]
            .needs
            .contains(&"payments-b".to_string()));

        assert_eq!(river.workflow().jobs.len(), 1 + 3);
    }

    #[test]
    fn test_root_delegates_to_children() {
        let river = River::new(&abc(), &Settings::default()).unwrap();
        let root = river.workflow();
        assert_eq!(root.name, "payments");
        assert!(root.on.call.is_some());
        assert!(root.on.dispatch.is_some());

        let ids: Vec<&str> = root.jobs.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            vec![SEED_JOB_ID, "payments-a", "payments-b", "payments-c"]
        );

        let delegate = &root.jobs["payments-b"];
        assert_eq!(delegate.name, "payments-b");
        assert_eq!(delegate.uses, "./.github/workflows/payments-b.yml");
        assert_eq!(delegate.needs, vec!["payments-a"]);
        assert!(delegate.steps.is_empty());
        assert!(root.jobs["payments-a"].needs.is_empty());
    }

    #[test]
    fn test_child_jobs() {
        let river = River::new(&abc(), &Settings::default()).unwrap();
        let child = &river.child_workflows()[1];
        assert!(child.on.call.is_some());
        assert!(child.on.dispatch.is_none());

        let ids: Vec<&str> = child.jobs.keys().map(String::as_str).collect();
        assert_eq!(ids, vec![COMMIT_JOB_ID, "b-east", "b-west"]);

        let commit = &child.jobs[COMMIT_JOB_ID];
        assert_eq!(commit.steps.len(), 4);
        assert_eq!(commit.steps[2].run, "actionsmith update application");
        assert!(commit.steps[3].run.contains("chore: update payments-b"));

        let east = &child.jobs["b-east"];
        assert_eq!(east.name, "b-east");
        assert_eq!(east.needs, vec![COMMIT_JOB_ID]);
        assert_eq!(east.steps.len(), 1);
        assert_eq!(east.runs_on, vec!["ubuntu-latest"]);
    }

    #[test]
    fn test_zero_groups_yields_seed_only() {
        let river = River::new(&service(vec![]), &Settings::default()).unwrap();
        assert!(river.child_workflows().is_empty());
        assert_eq!(river.workflow().jobs.len(), 1);
        assert!(river.workflow().jobs.contains_key(SEED_JOB_ID));
        assert_eq!(river.all_workflows().len(), 1);
    }

    #[test]
    fn test_seed_job_steps() {
        let settings = Settings {
            cli_name: "shipit".to_string(),
            ..Settings::default()
        };
        let river = River::new(&service(vec![]), &settings).unwrap();
        let seed = &river.workflow().jobs[SEED_JOB_ID];
        assert_eq!(seed.steps[0].uses, "actions/checkout@v4");
        assert_eq!(seed.steps[1].run, "shipit generate applications");
    }

    #[test]
    fn test_empty_ref_aborts_build() {
        let settings = Settings {
            git_ref: String::new(),
            ..Settings::default()
        };
        let err = River::new(&abc(), &settings).unwrap_err();
        assert!(err.leaves().contains(&&WorkflowError::missing("ref")));
    }

    #[test]
    fn test_river_validates_clean() {
        let river = River::new(&abc(), &Settings::default()).unwrap();
        let errors = river.validate();
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_deterministic_output() {
        let first = River::new(&abc(), &Settings::default()).unwrap();
        let second = River::new(&abc(), &Settings::default()).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.all_workflows().iter().zip(second.all_workflows()) {
            assert_eq!(a.to_yaml().unwrap(), b.to_yaml().unwrap());
        }
    }

    #[test]
    fn test_rendered_shapes() {
        let river = River::new(&abc(), &Settings::default()).unwrap();
        let yaml = river.workflow().to_yaml().unwrap();
        assert!(yaml.contains("workflow_call"), "{}", yaml);
        assert!(yaml.contains("workflow_dispatch"), "{}", yaml);
        assert!(yaml.contains("uses: ./.github/workflows/payments-a.yml"), "{}", yaml);
        assert!(yaml.contains("secrets: inherit"), "{}", yaml);

        let parsed = Workflow::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.jobs.len(), 4);
        assert_eq!(parsed.jobs["payments-c"].secrets, Some(Secrets::Inherit));
    }

    #[test]
    fn test_colliding_group_file_names_rejected() {
        let river = River::new(
            &service(vec![group("Prod", &["east"]), group("prod", &["west"])]),
            &Settings::default(),
        )
        .unwrap();
        let files: Vec<String> = river
            .child_workflows()
            .iter()
            .map(|wf| wf.filename())
            .collect();
        assert_eq!(files, vec!["payments-prod.yml", "payments-prod.yml"]);

        let errors = river.validate();
        assert!(
            errors.contains(&WorkflowError::DuplicateFilename {
                filename: "payments-prod.yml".to_string(),
                workflows: vec!["payments-Prod".to_string(), "payments-prod".to_string()],
            }),
            "{:?}",
            errors
        );
    }
}
