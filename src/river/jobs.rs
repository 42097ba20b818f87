//! Job assembly.
//!
//! A job is built by applying a sequence of options to a mutable
//! [`JobOptions`] accumulator. Every option runs even if an earlier one
//! failed; all failures (plus input validation) are reported together and no
//! job is produced unless everything succeeded.

use crate::core::error::WorkflowError;
use crate::core::expressions::Expression;
use crate::core::types::{
    Concurrency, Defaults, Environment, Job, Permissions, Step,
};
use crate::core::variant::Secrets;
use indexmap::IndexMap;

/// Accumulated job configuration.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub permissions: Permissions,
    pub needs: Vec<String>,
    pub if_condition: String,
    pub runs_on: Vec<String>,
    pub outputs: IndexMap<String, String>,
    pub environment: Environment,
    pub concurrency: Concurrency,
    pub env: IndexMap<String, String>,
    pub defaults: Defaults,
    pub steps: Vec<Step>,
    pub uses: String,
    pub secrets: Option<Secrets>,
}

/// One configuration step applied during assembly.
pub type JobOption = Box<dyn FnOnce(&mut JobOptions) -> Result<(), WorkflowError>>;

/// Required job inputs.
#[derive(Debug, Clone, Default)]
pub struct JobInput {
    pub job_name: String,
}

impl JobInput {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.job_name.is_empty() {
            return Err(WorkflowError::missing("job name"));
        }
        Ok(())
    }
}

/// Inputs for [`with_commit_changes`].
#[derive(Debug, Clone, Default)]
pub struct CommitChangesInput {
    pub commit_message: String,
    pub git_ref: String,
}

impl CommitChangesInput {
    /// Reports every missing field, not just the first.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut errors = Vec::new();
        if self.git_ref.is_empty() {
            errors.push(WorkflowError::missing("ref"));
        }
        if self.commit_message.is_empty() {
            errors.push(WorkflowError::missing("commit message"));
        }
        match WorkflowError::join(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Secret holding the deploy key the commit job pushes with.
pub const DEPLOY_KEY_SECRET: &str = "WRITE_DEPLOY_KEY";

/// Id of the placeholder step appended by [`with_external_sync`].
pub const EXTERNAL_SYNC_STEP_ID: &str = "external-sync";

/// Assemble a job. Either every option and the input validate, or an error
/// describing all problems is returned.
pub fn new(input: JobInput, options: Vec<JobOption>) -> Result<Job, WorkflowError> {
    let mut opts = JobOptions::default();
    let mut errors = Vec::new();

    for option in options {
        if let Err(e) = option(&mut opts) {
            errors.push(e);
        }
    }

    if let Err(e) = input.validate() {
        errors.push(WorkflowError::invalid_input("invalid input", e));
    }

    if !opts.uses.is_empty() && !opts.steps.is_empty() {
        errors.push(WorkflowError::AmbiguousReference {
            job: input.job_name.clone(),
        });
    }

    if let Some(err) = WorkflowError::join(errors) {
        return Err(WorkflowError::invalid_input("job assembly failed", err));
    }

    Ok(Job {
        name: input.job_name,
        permissions: opts.permissions,
        needs: opts.needs,
        if_condition: opts.if_condition,
        runs_on: opts.runs_on,
        environment: opts.environment,
        concurrency: opts.concurrency,
        outputs: opts.outputs,
        env: opts.env,
        defaults: opts.defaults,
        steps: opts.steps,
        uses: opts.uses,
        secrets: opts.secrets,
        ..Job::default()
    })
}

/// Check out `git_ref`, configure a git identity, run `intermediate_steps`,
/// then add, commit, and push everything they changed.
///
/// The commit message is wrapped in double quotes and otherwise inserted
/// verbatim; callers keep it shell-safe.
pub fn with_commit_changes(input: CommitChangesInput, intermediate_steps: Vec<Step>) -> JobOption {
    Box::new(move |opts| {
        input
            .validate()
            .map_err(|e| WorkflowError::invalid_input("invalid commit changes input", e))?;

        opts.steps.push(
            Step::uses("actions/checkout@v4")
                .with_arg("fetch-depth", 1)
                .with_arg("ssh-key", Expression::secrets(DEPLOY_KEY_SECRET).to_string())
                .with_arg("ref", input.git_ref.as_str()),
        );
        opts.steps.push(
            Step::run(
                [
                    "git config --local user.email 'github-actions@github.com'",
                    "git config --local user.name 'GitHub Actions'",
                ]
                .join("\n"),
            )
            .with_name("configure-git"),
        );
        opts.steps.extend(intermediate_steps);
        opts.steps.push(Step::run(
            [
                "git add .".to_string(),
                format!("git commit -m \"{}\"", input.commit_message),
                "git push".to_string(),
            ]
            .join("\n"),
        ));
        Ok(())
    })
}

/// Append the hook step for the external reconciliation (sync and wait).
///
/// The step is a placeholder: the reconciliation system supplies the real
/// step sequence.
pub fn with_external_sync() -> JobOption {
    Box::new(|opts| {
        opts.steps.push(
            Step::run("echo '::notice::external sync hook not configured'")
                .with_id(EXTERNAL_SYNC_STEP_ID)
                .with_name("Sync and wait"),
        );
        Ok(())
    })
}

pub fn with_needs(needs: Vec<String>) -> JobOption {
    Box::new(move |opts| {
        opts.needs.extend(needs);
        Ok(())
    })
}

pub fn with_if(condition: impl Into<String>) -> JobOption {
    let condition = condition.into();
    Box::new(move |opts| {
        opts.if_condition = condition;
        Ok(())
    })
}

pub fn with_runs_on(labels: Vec<String>) -> JobOption {
    Box::new(move |opts| {
        opts.runs_on = labels;
        Ok(())
    })
}

pub fn with_permissions(permissions: Permissions) -> JobOption {
    Box::new(move |opts| {
        opts.permissions = permissions;
        Ok(())
    })
}

pub fn with_env(key: impl Into<String>, value: impl Into<String>) -> JobOption {
    let (key, value) = (key.into(), value.into());
    Box::new(move |opts| {
        opts.env.insert(key, value);
        Ok(())
    })
}

pub fn with_outputs(outputs: IndexMap<String, String>) -> JobOption {
    Box::new(move |opts| {
        opts.outputs.extend(outputs);
        Ok(())
    })
}

pub fn with_environment(environment: Environment) -> JobOption {
    Box::new(move |opts| {
        if environment.name.is_empty() {
            return Err(WorkflowError::missing("environment name"));
        }
        opts.environment = environment;
        Ok(())
    })
}

pub fn with_concurrency(concurrency: Concurrency) -> JobOption {
    Box::new(move |opts| {
        if concurrency.group.is_empty() {
            return Err(WorkflowError::missing("concurrency group"));
        }
        opts.concurrency = concurrency;
        Ok(())
    })
}

pub fn with_defaults(defaults: Defaults) -> JobOption {
    Box::new(move |opts| {
        opts.defaults = defaults;
        Ok(())
    })
}

pub fn with_steps(steps: Vec<Step>) -> JobOption {
    Box::new(move |opts| {
        opts.steps.extend(steps);
        Ok(())
    })
}

/// Delegate the job to another workflow file.
pub fn with_uses(reference: impl Into<String>) -> JobOption {
    let reference = reference.into();
    Box::new(move |opts| {
        if reference.is_empty() {
            return Err(WorkflowError::missing("uses reference"));
        }
        opts.uses = reference;
        Ok(())
    })
}

pub fn with_secrets(secrets: Secrets) -> JobOption {
    Box::new(move |opts| {
        opts.secrets = Some(secrets);
        Ok(())
    })
}
