//! The sprint-to-changelog pipeline.
//!
//! Five steps run in a fixed order over one [`WorkflowRecord`]: identity
//! check, sprint lookup, issue fetch, issue report, changelog synthesis.
//! Each step takes the record by value and returns it. Once a step marks the
//! record failed, [`Pipeline::run`] skips everything after it, except that a
//! failed identity check is tolerated under [`IdentityPolicy::BestEffort`].

pub mod changelog;
pub mod identity;
pub mod issues;
pub mod report;
pub mod sprints;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{AppConfig, IdentityPolicy};
use crate::generator::TextGenerator;
use crate::model::record::WorkflowRecord;
use crate::tracker::Tracker;

#[async_trait]
pub trait Step: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, record: WorkflowRecord) -> WorkflowRecord;
}

pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
    identity_policy: IdentityPolicy,
}

impl Pipeline {
    pub fn new(identity_policy: IdentityPolicy) -> Self {
        Self {
            steps: Vec::new(),
            identity_policy,
        }
    }

    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    fn tolerates(&self, failed_step: Option<&'static str>) -> bool {
        self.identity_policy == IdentityPolicy::BestEffort
            && failed_step == Some(identity::STEP_NAME)
    }

    pub async fn run(&self, mut record: WorkflowRecord) -> WorkflowRecord {
        let mut failed_step: Option<&'static str> = None;

        for step in &self.steps {
            if record.is_failed() {
                if !self.tolerates(failed_step) {
                    info!(
                        step = step.name(),
                        failed_step = failed_step.unwrap_or("unknown"),
                        "Skipping step after earlier failure"
                    );
                    continue;
                }
                warn!(
                    step = step.name(),
                    error = record.error.as_deref().unwrap_or_default(),
                    "Identity check failed; continuing (best effort)"
                );
            }

            info!(step = step.name(), "Running step");
            record = step.run(record).await;
            failed_step = record.is_failed().then(|| step.name());
        }

        record
    }
}

/// The standard five-step pipeline wired from configuration.
pub fn standard(
    config: &AppConfig,
    tracker: Arc<dyn Tracker>,
    generator: Arc<dyn TextGenerator>,
) -> Pipeline {
    let settings = &config.settings;
    Pipeline::new(settings.pipeline.identity_policy)
        .with_step(identity::IdentityCheck::new(tracker.clone()))
        .with_step(sprints::SprintLookup::new(
            tracker.clone(),
            settings.tracker.project_key.clone(),
        ))
        .with_step(issues::IssueFetch::new(
            tracker,
            config.sprint_name.clone(),
            settings.tracker.issue_type.clone(),
        ))
        .with_step(report::IssueReporter)
        .with_step(changelog::ChangelogSynthesizer::new(
            generator,
            config.sprint_name.clone(),
            settings.pipeline.output_dir.clone(),
        ))
}
