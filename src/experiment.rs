//! Experiment driver
//!
//! Runs the benchmark as a strictly sequential state machine:
//! `Init -> Iterating(n) -> Cleanup -> Report`. Every object uploaded by one
//! run lives under `<bucket>/<run_id>/`, so cleanup only has to remove that
//! prefix from each bucket that actually received files.

use crate::{
    error::{AppError, ErrorContext, Result},
    executor::{CommandRunner, Invocation},
    logging::{Logger, PerformanceLogger},
    manifest::{build_manifest, remote_uri, FixedDestination, LineTemplate, RandomPairedDestination},
    models::{Config, DurationSeries, IterationRecord},
    random::{generate_token, RandomSource},
    types::{CleanupPolicy, DestinationPair, Variant},
};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Everything the driver needs, resolved from the configuration
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub source_dir: PathBuf,
    pub iterations: u32,
    pub baseline_bin: PathBuf,
    pub candidate_bin: PathBuf,
    pub baseline_bucket: String,
    pub pairs: Vec<DestinationPair>,
    pub baseline_manifest: PathBuf,
    pub candidate_manifest: PathBuf,
    pub token_length: usize,
    pub cleanup_policy: CleanupPolicy,
    pub region_env_var: String,
}

impl ExperimentPlan {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            iterations: config.iterations,
            baseline_bin: config.baseline_bin.clone(),
            candidate_bin: config.candidate_bin.clone(),
            baseline_bucket: config.baseline_bucket(),
            pairs: config.destination_pairs(),
            baseline_manifest: config.baseline_manifest(),
            candidate_manifest: config.candidate_manifest(),
            token_length: config.token_length,
            cleanup_policy: config.cleanup_policy,
            region_env_var: config.region_env_var.clone(),
        }
    }

    /// Executable of the given variant
    pub fn executable(&self, variant: Variant) -> &PathBuf {
        match variant {
            Variant::Baseline => &self.baseline_bin,
            Variant::Candidate => &self.candidate_bin,
        }
    }

    /// Preconditions checked before anything is written or launched
    fn check(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(AppError::validation("Iteration count must be greater than 0"));
        }
        if !self.source_dir.is_dir() {
            return Err(AppError::validation(format!(
                "Source directory '{}' does not exist or is not a directory",
                self.source_dir.display()
            )));
        }
        if self.pairs.is_empty() {
            return Err(AppError::validation("At least one destination pair is required"));
        }
        if self.baseline_bucket.trim().is_empty() {
            return Err(AppError::validation("Baseline bucket cannot be empty"));
        }
        Ok(())
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    /// Zero-based index of the iteration in progress
    Iterating(u32),
    Cleanup,
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Init => write!(f, "init"),
            Phase::Iterating(index) => write!(f, "iteration {}", index + 1),
            Phase::Cleanup => write!(f, "cleanup"),
            Phase::Report => write!(f, "report"),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Path segment shared by every object of this run
    pub run_id: String,
    pub baseline: DurationSeries,
    pub candidate: DurationSeries,
    pub records: Vec<IterationRecord>,
    /// Delete commands that failed under the `warn` policy
    pub cleanup_failures: Vec<String>,
}

/// One benchmark run over both variants
pub struct Experiment<R: CommandRunner> {
    plan: ExperimentPlan,
    runner: R,
    rng: Box<dyn RandomSource>,
    logger: Logger,
    perf: PerformanceLogger,
    phase: Phase,
    run_id: String,
    used_buckets: BTreeSet<String>,
}

impl<R: CommandRunner> Experiment<R> {
    pub fn new(plan: ExperimentPlan, runner: R, rng: Box<dyn RandomSource>, logger: Logger) -> Self {
        let perf = PerformanceLogger::new(logger.child("PERF"));
        Self {
            plan,
            runner,
            rng,
            logger,
            perf,
            phase: Phase::Init,
            run_id: String::new(),
            used_buckets: BTreeSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn plan(&self) -> &ExperimentPlan {
        &self.plan
    }

    /// Run every iteration, clean up and hand back the measurements
    ///
    /// The first failing manifest build or transfer aborts the run without
    /// cleanup; the objects already uploaded stay under the logged run root.
    pub async fn run(&mut self) -> Result<ExperimentOutcome> {
        self.init().await?;

        let started = Instant::now();
        let mut baseline = DurationSeries::new(Variant::Baseline.name());
        let mut candidate = DurationSeries::new(Variant::Candidate.name());
        let mut records = Vec::with_capacity(self.plan.iterations as usize);

        for index in 0..self.plan.iterations {
            self.phase = Phase::Iterating(index);

            let record = match self.run_iteration(index).await {
                Ok(record) => record,
                Err(error) => {
                    self.log_abort(&error).await;
                    return Err(error);
                }
            };

            if let Some((baseline_time, candidate_time)) = record.durations() {
                baseline.push(baseline_time);
                candidate.push(candidate_time);
            }
            self.perf.log_iteration(&record).await;
            records.push(record);
        }
        self.perf.log_run_summary(records.len(), started.elapsed()).await;

        self.phase = Phase::Cleanup;
        let cleanup_failures = self.cleanup().await?;

        self.phase = Phase::Report;
        Ok(ExperimentOutcome {
            run_id: self.run_id.clone(),
            baseline,
            candidate,
            records,
            cleanup_failures,
        })
    }

    async fn init(&mut self) -> Result<()> {
        self.phase = Phase::Init;
        self.plan.check()?;

        self.run_id = generate_token(self.rng.as_mut(), self.plan.token_length);
        self.logger.add_context_field("run_id", &self.run_id).await;

        self.logger.info(&format!("Starting {} iteration(s)", self.plan.iterations))
            .field("source", self.plan.source_dir.display().to_string())
            .field("baseline_bucket", &self.plan.baseline_bucket)
            .field("pairs", self.plan.pairs.len())
            .log()
            .await;

        Ok(())
    }

    /// Prefix `<run_id>/<token>` for one variant of one iteration
    fn next_prefix(&mut self) -> String {
        let token = generate_token(self.rng.as_mut(), self.plan.token_length);
        format!("{}/{}", self.run_id, token)
    }

    async fn run_iteration(&mut self, index: u32) -> Result<IterationRecord> {
        let baseline_prefix = self.next_prefix();
        let candidate_prefix = self.next_prefix();
        let mut record = IterationRecord::new(index, baseline_prefix, candidate_prefix);

        let fixed = FixedDestination::new(self.plan.baseline_bucket.clone(), record.baseline_prefix.clone());
        self.run_variant(Variant::Baseline, &fixed, &mut record).await?;

        let paired = RandomPairedDestination::new(self.plan.pairs.clone(), record.candidate_prefix.clone());
        self.run_variant(Variant::Candidate, &paired, &mut record).await?;

        Ok(record)
    }

    /// Build the variant's manifest, then time one batch run over it
    async fn run_variant(
        &mut self,
        variant: Variant,
        template: &dyn LineTemplate,
        record: &mut IterationRecord,
    ) -> Result<()> {
        let manifest_path = match variant {
            Variant::Baseline => self.plan.baseline_manifest.clone(),
            Variant::Candidate => self.plan.candidate_manifest.clone(),
        };

        let summary = build_manifest(&manifest_path, &self.plan.source_dir, template, self.rng.as_mut())?;
        self.used_buckets.extend(
            summary.lines_per_bucket
                .iter()
                .filter(|(_, &count)| count > 0)
                .map(|(bucket, _)| bucket.clone()),
        );

        self.logger.debug(&format!("Wrote {} manifest", variant))
            .field("manifest", manifest_path.display().to_string())
            .field("lines", summary.line_count)
            .field("buckets", &summary.lines_per_bucket)
            .log()
            .await;

        let invocation = Invocation::batch(self.plan.executable(variant).clone(), &manifest_path);
        let phase = self.phase;
        let elapsed = self.runner
            .run(&invocation)
            .await
            .with_context(|| format!("{} run failed in {}", variant, phase))?;

        record.record(variant, elapsed, summary.line_count);
        Ok(())
    }

    /// Delete commands for this run, one per bucket that received objects
    ///
    /// Buckets belonging to a destination pair are cleaned by the candidate
    /// executable with the pair's region on the child environment; a
    /// baseline-only bucket is cleaned by the baseline executable.
    pub fn cleanup_invocations(&self) -> Vec<Invocation> {
        self.used_buckets
            .iter()
            .map(|bucket| {
                let uri = remote_uri(bucket, &self.run_id);
                match self.plan.pairs.iter().find(|pair| &pair.bucket == bucket) {
                    Some(pair) => Invocation::remove(self.plan.candidate_bin.clone(), &uri)
                        .env(self.plan.region_env_var.clone(), pair.region.clone()),
                    None => Invocation::remove(self.plan.baseline_bin.clone(), &uri),
                }
            })
            .collect()
    }

    async fn cleanup(&mut self) -> Result<Vec<String>> {
        let mut failures = Vec::new();

        if self.plan.cleanup_policy == CleanupPolicy::Skip {
            self.logger.info("Cleanup skipped")
                .field("buckets", &self.used_buckets)
                .log()
                .await;
            return Ok(failures);
        }

        for invocation in self.cleanup_invocations() {
            self.logger.debug(&format!("Cleaning up: {}", invocation)).log().await;

            let Err(error) = self.runner.run(&invocation).await else {
                continue;
            };

            let message = format!("{}: {}", invocation, error);
            match self.plan.cleanup_policy {
                CleanupPolicy::Fatal => {
                    self.logger.error("Cleanup failed")
                        .field("command", invocation.to_string())
                        .error_info(&error)
                        .log()
                        .await;
                    return Err(AppError::cleanup(message));
                }
                _ => {
                    self.logger.warn(&format!("Cleanup failed, continuing: {}", message)).log().await;
                    failures.push(message);
                }
            }
        }

        Ok(failures)
    }

    async fn log_abort(&self, error: &AppError) {
        let roots: Vec<String> = self.used_buckets
            .iter()
            .map(|bucket| remote_uri(bucket, &self.run_id))
            .collect();

        self.logger.error(&format!("Aborted during {}", self.phase))
            .error_info(error)
            .field("uploaded_under", roots)
            .log()
            .await;
    }
}
