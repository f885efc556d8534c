//! Declarative linear workflows
//!
//! A `Workflow` is an ordered chain of named stages with a retry policy and
//! failure notification targets. The runner executes one stage at a time:
//! each stage's success is a precondition for the next, a failed stage is
//! retried a fixed number of times, and an exhausted stage halts the run.
//! Stage completions append to the run log.
//!
//! Actual scheduling (`@daily` and friends) belongs to an external
//! scheduler; the schedule string here is declarative metadata surfaced by
//! `inspect`.

use crate::storage::RunLog;
use eyre::{Context, Result};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

type StageFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// One unit of work in a workflow.
pub struct Stage {
    id: String,
    action: Box<dyn Fn() -> StageFuture + Send + Sync>,
}

impl Stage {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// How often a failed stage is re-attempted, and how long to wait between
/// attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }
}

/// Serializable description of a workflow, printed by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSpec {
    pub id: String,
    pub description: String,
    pub schedule: Option<String>,
    pub owner: Option<String>,
    pub notify: Vec<String>,
    pub retries: u32,
    pub retry_delay_secs: u64,
    pub stages: Vec<String>,
}

/// A named, linear chain of stages.
///
/// # Example
/// ```no_run
/// use etl_pipelines::workflow::Workflow;
/// use etl_pipelines::storage::RunLog;
/// use std::time::Duration;
///
/// # async fn example() -> eyre::Result<()> {
/// let workflow = Workflow::new("etl_toll_data")
///     .description("Consolidate toll data")
///     .schedule("@daily")
///     .retries(1, Duration::from_secs(300))
///     .stage("unzip_data", || async { Ok(()) });
///
/// workflow.run(&RunLog::new("toll_run.log")).await?;
/// # Ok(())
/// # }
/// ```
pub struct Workflow {
    id: String,
    description: String,
    schedule: Option<String>,
    owner: Option<String>,
    notify: Vec<String>,
    retry: RetryPolicy,
    stages: Vec<Stage>,
}

impl Workflow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            schedule: None,
            owner: None,
            notify: Vec::new(),
            retry: RetryPolicy::default(),
            stages: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Address to notify (via the log) when a stage exhausts its retries.
    pub fn notify_on_failure(mut self, address: impl Into<String>) -> Self {
        self.notify.push(address.into());
        self
    }

    pub fn retries(mut self, retries: u32, delay: Duration) -> Self {
        self.retry = RetryPolicy { retries, delay };
        self
    }

    /// Append a stage. Stages run in insertion order.
    pub fn stage<F, Fut>(mut self, id: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.stages.push(Stage {
            id: id.into(),
            action: Box::new(move || Box::pin(action())),
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn spec(&self) -> WorkflowSpec {
        WorkflowSpec {
            id: self.id.clone(),
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            owner: self.owner.clone(),
            notify: self.notify.clone(),
            retries: self.retry.retries,
            retry_delay_secs: self.retry.delay.as_secs(),
            stages: self.stages.iter().map(|s| s.id.clone()).collect(),
        }
    }

    /// Execute every stage in order, halting on the first stage that
    /// exhausts its retries.
    pub async fn run(&self, run_log: &RunLog) -> Result<()> {
        log::info!("Running workflow '{}'", self.id);
        for stage in &self.stages {
            self.run_stage(stage, run_log).await?;
        }
        run_log.record(&format!("Workflow '{}' complete", self.id))?;
        Ok(())
    }

    async fn run_stage(&self, stage: &Stage, run_log: &RunLog) -> Result<()> {
        let attempts = self.retry.retries + 1;
        for attempt in 1..=attempts {
            match (stage.action)().await {
                Ok(()) => {
                    run_log.record(&format!("Stage '{}' complete", stage.id))?;
                    return Ok(());
                }
                Err(error) if attempt < attempts => {
                    log::warn!(
                        "Stage '{}' failed (attempt {}/{}), retrying in {:?}: {:#}",
                        stage.id,
                        attempt,
                        attempts,
                        self.retry.delay,
                        error
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(error) => {
                    run_log.record(&format!("Stage '{}' failed", stage.id))?;
                    for address in &self.notify {
                        log::error!(
                            "Notifying {}: workflow '{}' halted at stage '{}'",
                            address,
                            self.id,
                            stage.id
                        );
                    }
                    return Err(error).with_context(|| {
                        format!("workflow '{}' halted at stage '{}'", self.id, stage.id)
                    });
                }
            }
        }
        unreachable!("stage loop always returns");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn test_run_log(dir: &TempDir) -> RunLog {
        RunLog::new(dir.path().join("run.log"))
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let dir = TempDir::new().unwrap();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let first = order.clone();
        let second = order.clone();
        let workflow = Workflow::new("wf")
            .stage("a", move || {
                let order = first.clone();
                async move {
                    order.lock().unwrap().push("a");
                    Ok(())
                }
            })
            .stage("b", move || {
                let order = second.clone();
                async move {
                    order.lock().unwrap().push("b");
                    Ok(())
                }
            });

        workflow.run(&test_run_log(&dir)).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failed_stage_is_retried_then_succeeds() {
        let dir = TempDir::new().unwrap();
        let attempts = Arc::new(AtomicUsize::new(0));

        let counter = attempts.clone();
        let workflow = Workflow::new("wf")
            .retries(1, Duration::ZERO)
            .stage("flaky", move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        eyre::bail!("transient failure");
                    }
                    Ok(())
                }
            });

        workflow.run(&test_run_log(&dir)).await.unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_stage_halts_the_chain() {
        let dir = TempDir::new().unwrap();
        let downstream_ran = Arc::new(AtomicUsize::new(0));

        let counter = downstream_ran.clone();
        let workflow = Workflow::new("wf")
            .retries(1, Duration::ZERO)
            .notify_on_failure("owner@example.com")
            .stage("broken", || async { eyre::bail!("permanent failure") })
            .stage("downstream", move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });

        let error = workflow.run(&test_run_log(&dir)).await.unwrap_err();
        assert!(error.to_string().contains("halted at stage 'broken'"));
        assert_eq!(downstream_ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn spec_lists_stage_ids_in_order() {
        let workflow = Workflow::new("wf")
            .description("test")
            .schedule("@daily")
            .stage("a", || async { Ok(()) })
            .stage("b", || async { Ok(()) });

        let spec = workflow.spec();
        assert_eq!(spec.stages, vec!["a", "b"]);
        assert_eq!(spec.schedule.as_deref(), Some("@daily"));
    }
}
