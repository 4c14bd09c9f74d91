//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    executor::{CommandRunner, ProcessRunner},
    experiment::{Experiment, ExperimentPlan},
    logging::LoggerFactory,
    models::Config,
    output::{BenchmarkReport, OutputFormatterFactory},
    random::{RandomSource, SeededRandom},
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the benchmark and print the report
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone())?;

        if config.debug {
            eprintln!("{}", build_banner());
            eprintln!("\nConfiguration Summary:");
            eprintln!("{}\n", display_config_summary(&config));
        }

        let warnings = validate_config(&config)?;
        if !warnings.is_empty() {
            eprintln!("Configuration Warnings:");
            for warning in &warnings {
                eprintln!("  {}", warning.format(config.enable_color));
            }
            eprintln!();
        }

        let rng = match self.cli.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_clock(),
        };
        if config.debug {
            eprintln!("Random seed: {}\n", rng.seed());
        }

        let runner = if self.cli.quiet {
            ProcessRunner::quiet()
        } else {
            ProcessRunner::new()
        };

        let report = benchmark(&config, runner, Box::new(rng)).await?;
        println!("{}", report);

        Ok(())
    }
}

/// Run one experiment with `runner` and render its report
pub async fn benchmark<R: CommandRunner>(
    config: &Config,
    runner: R,
    rng: Box<dyn RandomSource>,
) -> Result<String> {
    let factory = LoggerFactory::new(config);
    let logger = factory.create_logger("BENCH").await;
    let mut perf = factory.create_performance_logger().await;

    let plan = ExperimentPlan::from_config(config);
    let mut experiment = Experiment::new(plan.clone(), runner, rng, logger);

    perf.start_timing("benchmark").await;
    let outcome = experiment.run().await;
    perf.end_timing("benchmark").await;

    let report = BenchmarkReport::new(&plan, outcome?)?;
    let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
    formatter.format_report(&report)
}

/// Version line with build metadata when available
pub fn build_banner() -> String {
    let mut banner = format!("{} v{}", crate::PKG_NAME, crate::VERSION);
    if let Some(commit) = option_env!("GIT_COMMIT") {
        banner.push_str(&format!(" ({}", commit));
        if let Some(branch) = option_env!("GIT_BRANCH") {
            banner.push_str(&format!(" on {}", branch));
        }
        banner.push(')');
    }
    if let Some(built) = option_env!("BUILD_TIME") {
        banner.push_str(&format!(", built {}", built));
    }
    banner
}
