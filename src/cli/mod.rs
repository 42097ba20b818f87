//! CLI subcommands: init, validate, plan, generate, drift, filename, schema.

use crate::core::naming::{filename_for, DEFAULT_WORKFLOWS_DIR};
use crate::core::{output, parser, planner, resolver, service};
use crate::river::River;
use crate::tripwire::drift;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter service.yaml
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Validate service.yaml and the workflows it produces
    Validate {
        /// Path to service.yaml
        #[arg(short, long, default_value = "service.yaml")]
        file: PathBuf,
    },

    /// Show which workflow files generate would create or change
    Plan {
        /// Path to service.yaml
        #[arg(short, long, default_value = "service.yaml")]
        file: PathBuf,

        /// Workflows directory
        #[arg(short, long, default_value = DEFAULT_WORKFLOWS_DIR)]
        out: PathBuf,
    },

    /// Write the workflow files
    Generate {
        /// Path to service.yaml
        #[arg(short, long, default_value = "service.yaml")]
        file: PathBuf,

        /// Workflows directory
        #[arg(short, long, default_value = DEFAULT_WORKFLOWS_DIR)]
        out: PathBuf,

        /// Print the rendered workflows instead of writing them
        #[arg(long)]
        dry_run: bool,

        /// Render JSON instead of YAML (dry run only)
        #[arg(long, requires = "dry_run")]
        json: bool,
    },

    /// Detect hand edits to generated workflow files (tripwire)
    Drift {
        /// Path to service.yaml
        #[arg(short, long, default_value = "service.yaml")]
        file: PathBuf,

        /// Workflows directory
        #[arg(short, long, default_value = DEFAULT_WORKFLOWS_DIR)]
        out: PathBuf,

        /// Exit non-zero on any drift (for CI)
        #[arg(long)]
        tripwire: bool,
    },

    /// Print the file name derived from a workflow name
    Filename {
        /// Workflow name
        name: String,
    },

    /// Print the JSON Schema of service.yaml
    Schema,
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init { path } => cmd_init(&path),
        Commands::Validate { file } => cmd_validate(&file),
        Commands::Plan { file, out } => cmd_plan(&file, &out),
        Commands::Generate {
            file,
            out,
            dry_run,
            json,
        } => cmd_generate(&file, &out, dry_run, json),
        Commands::Drift {
            file,
            out,
            tripwire,
        } => cmd_drift(&file, &out, tripwire),
        Commands::Filename { name } => {
            println!("{}", filename_for(&name));
            Ok(())
        }
        Commands::Schema => {
            println!("{}", parser::service_schema()?);
            Ok(())
        }
    }
}

const INIT_TEMPLATE: &str = r#"version: "1.0"
service:
  name: my-service
  destination_groups:
    - name: staging
      destinations:
        - name: staging-cluster
    - name: production
      destinations:
        - name: prod-east
        - name: prod-west

settings:
  git_ref: main
  commit_message: "chore: update {workflow}"
"#;

fn cmd_init(path: &Path) -> Result<(), String> {
    let file = path.join("service.yaml");
    if file.exists() {
        return Err(format!("{} already exists", file.display()));
    }
    std::fs::create_dir_all(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    std::fs::write(&file, INIT_TEMPLATE)
        .map_err(|e| format!("cannot write {}: {}", file.display(), e))?;

    println!("Initialized service at {}", path.display());
    println!("  Created: {}", file.display());
    Ok(())
}

/// Parse and validate a service file, returning errors if invalid.
fn parse_and_validate(file: &Path) -> Result<service::ServiceFile, String> {
    let parsed = parser::parse_service_file(file)?;
    let errors = parser::validate_service(&parsed);
    if errors.is_empty() {
        return Ok(parsed);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err("validation failed".to_string())
}

/// Parse, validate, and build the river, checking the produced documents.
fn load_river(file: &Path) -> Result<River, String> {
    let parsed = parse_and_validate(file)?;
    let river = River::new(&parsed.service, &parsed.settings).map_err(|e| e.to_string())?;

    let errors = river.validate();
    if errors.is_empty() {
        return Ok(river);
    }
    for e in &errors {
        eprintln!("  ERROR: {}", e);
    }
    Err(format!("{} workflow error(s)", errors.len()))
}

fn cmd_validate(file: &Path) -> Result<(), String> {
    let river = load_river(file)?;
    let jobs: usize = river.all_workflows().iter().map(|wf| wf.jobs.len()).sum();
    println!(
        "OK: {} ({} workflows, {} jobs)",
        river.workflow().name,
        river.all_workflows().len(),
        jobs
    );
    for wf in river.child_workflows() {
        let order = resolver::job_execution_order(wf).map_err(|e| e.to_string())?;
        tracing::debug!(workflow = %wf.name, order = ?order, "job order");
    }
    Ok(())
}

fn cmd_plan(file: &Path, out: &Path) -> Result<(), String> {
    let river = load_river(file)?;
    let plan = planner::plan(out, &river.all_workflows()).map_err(|e| e.to_string())?;
    print_plan(&river, &plan);
    Ok(())
}

/// Display a plan to stdout.
fn print_plan(river: &River, plan: &planner::GenerationPlan) {
    println!(
        "Planning: {} ({} workflows)",
        river.workflow().name,
        plan.changes.len()
    );
    println!();
    for change in &plan.changes {
        let symbol = match change.action {
            planner::PlanAction::Create => "+",
            planner::PlanAction::Update => "~",
            planner::PlanAction::NoOp => " ",
        };
        println!("  {} {} ({})", symbol, change.path.display(), change.workflow);
    }
    println!();
    println!(
        "Plan: {} to add, {} to change, {} unchanged.",
        plan.to_create, plan.to_update, plan.unchanged
    );
}

fn cmd_generate(file: &Path, out: &Path, dry_run: bool, json: bool) -> Result<(), String> {
    let river = load_river(file)?;
    let workflows = river.all_workflows();

    if dry_run {
        for wf in &workflows {
            let text = if json {
                output::render_json(wf)
            } else {
                output::render(wf)
            }
            .map_err(|e| e.to_string())?;
            println!("--- {}", wf.filename());
            println!("{}", text);
        }
        println!("Dry run: no files written.");
        return Ok(());
    }

    let paths = output::write_all(out, &workflows).map_err(|e| e.to_string())?;
    for path in &paths {
        println!("  wrote {}", path.display());
    }
    tracing::info!(count = paths.len(), dir = %out.display(), "generated workflows");

    let orphans = drift::find_orphans(out, &workflows).map_err(|e| e.to_string())?;
    for path in &orphans {
        println!("  stale {} (no longer generated)", path.display());
    }
    println!("Generated {} workflow(s).", paths.len());
    Ok(())
}

fn cmd_drift(file: &Path, out: &Path, tripwire: bool) -> Result<(), String> {
    let river = load_river(file)?;
    let workflows = river.all_workflows();
    let findings = drift::detect_drift(out, &workflows).map_err(|e| e.to_string())?;
    let orphans = drift::find_orphans(out, &workflows).map_err(|e| e.to_string())?;

    for f in &findings {
        println!("DRIFTED: {} ({})", f.workflow, f.detail);
        println!("  expected: {}", f.expected_hash);
        println!("  actual:   {}", f.actual_hash);
    }
    for path in &orphans {
        println!("STALE: {}", path.display());
    }

    let total = findings.len() + orphans.len();
    if total == 0 {
        println!("No drift detected.");
        return Ok(());
    }
    println!();
    println!("Drift detected: {} file(s).", total);
    if tripwire {
        return Err(format!("{} drift finding(s)", total));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_service(dir: &Path) -> PathBuf {
        let file = dir.join("service.yaml");
        std::fs::write(
            &file,
            r#"
version: "1.0"
service:
  name: payments
  destination_groups:
    - name: staging
      destinations:
        - name: stage-east
    - name: production
      destinations:
        - name: prod-east
          namespace: payments
"#,
        )
        .unwrap();
        file
    }

    #[test]
    fn test_init() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let file = dir.path().join("service.yaml");
        assert!(file.exists());
        // The template itself must validate.
        cmd_validate(&file).unwrap();
    }

    #[test]
    fn test_init_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let err = cmd_init(dir.path()).unwrap_err();
        assert!(err.contains("already exists"));
    }

    #[test]
    fn test_validate_valid() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_service(dir.path());
        cmd_validate(&file).unwrap();
    }

    #[test]
    fn test_validate_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("service.yaml");
        std::fs::write(&file, "version: \"2.0\"\nservice:\n  name: api\n").unwrap();
        assert_eq!(cmd_validate(&file).unwrap_err(), "validation failed");
    }

    #[test]
    fn test_generate_then_plan_and_drift() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_service(dir.path());
        let out = dir.path().join("workflows");

        cmd_generate(&file, &out, false, false).unwrap();
        assert!(out.join("payments.yml").exists());
        assert!(out.join("payments-staging.yml").exists());
        assert!(out.join("payments-production.yml").exists());

        cmd_plan(&file, &out).unwrap();
        cmd_drift(&file, &out, true).unwrap();

        std::fs::write(out.join("payments-staging.yml"), "name: edited\n").unwrap();
        let err = cmd_drift(&file, &out, true).unwrap_err();
        assert!(err.contains("1 drift finding"));
        cmd_drift(&file, &out, false).unwrap();
    }

    #[test]
    fn test_generate_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_service(dir.path());
        let out = dir.path().join("workflows");
        cmd_generate(&file, &out, true, false).unwrap();
        cmd_generate(&file, &out, true, true).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_drift_reports_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_service(dir.path());
        let out = dir.path().join("workflows");
        cmd_generate(&file, &out, false, false).unwrap();

        let retired = crate::core::types::Workflow::new("payments-canary");
        output::write_workflow(&out, &retired).unwrap();
        let err = cmd_drift(&file, &out, true).unwrap_err();
        assert!(err.contains("1 drift finding"));
    }

    #[test]
    fn test_dispatch_filename_and_schema() {
        dispatch(Commands::Filename {
            name: "Deploy Prod".to_string(),
        })
        .unwrap();
        dispatch(Commands::Schema).unwrap();
    }

    #[test]
    fn test_dispatch_validate_missing_file() {
        let err = dispatch(Commands::Validate {
            file: PathBuf::from("/nonexistent/service.yaml"),
        })
        .unwrap_err();
        assert!(err.contains("failed to read"));
    }
}
