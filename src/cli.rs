//! CLI helper functions
//!
//! The workflow registry behind the scheduler-style commands: list the
//! known workflows, inspect one, trigger one.

use crate::banks::{banks_spec, run_banks};
use crate::config::{BanksConfig, TollConfig};
use crate::storage::RunLog;
use crate::toll::toll_workflow;
use crate::workflow::WorkflowSpec;
use eyre::{Result, eyre};

/// Specs of every registered workflow, built from the current environment.
pub fn workflow_specs() -> Result<Vec<WorkflowSpec>> {
    Ok(vec![
        toll_workflow(&TollConfig::from_env()).spec(),
        banks_spec(),
    ])
}

fn unknown_workflow(name: &str) -> eyre::Report {
    eyre!(
        "unknown workflow '{}'; known workflows: etl_toll_data, etl_banks",
        name
    )
}

/// Look up one workflow's spec by id.
pub fn inspect_workflow(name: &str) -> Result<WorkflowSpec> {
    workflow_specs()?
        .into_iter()
        .find(|spec| spec.id == name)
        .ok_or_else(|| unknown_workflow(name))
}

/// Run a workflow to completion.
pub async fn trigger_workflow(name: &str) -> Result<()> {
    match name {
        "etl_toll_data" => {
            let config = TollConfig::from_env();
            let run_log = RunLog::new(&config.run_log);
            toll_workflow(&config).run(&run_log).await
        }
        "etl_banks" => run_banks(&BanksConfig::from_env()?).await,
        other => Err(unknown_workflow(other)),
    }
}
