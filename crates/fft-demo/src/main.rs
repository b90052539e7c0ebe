//! FFT stabilization demo CLI.
//!
//! Commands:
//! - run: One interaction (generate, smooth, score, render)
//! - sweep: Repeat runs across keep ratios and summarize
//! - generate: Write the raw signal table as CSV

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fft_demo::config::DemoConfig;
use fft_demo::experiment::{run_sweep, DemoRunner};
use fft_demo::render::{
    write_table_csv, ChartRenderer, CsvRenderer, RenderView, Renderer, TerminalRenderer,
};
use fft_demo::results::{format_duration, timestamped_path};
use fft_kernel::SignalGenerator;

#[derive(Parser)]
#[command(name = "fft-demo")]
#[command(version)]
#[command(about = "Stabilize chaotic agent signals with FFT truncation")]
struct Cli {
    /// JSON file with default demo parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed (omit for a fresh draw every run)
    #[arg(long, global = true, env = "FFT_DEMO_SEED")]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline once and render it
    Run {
        /// Number of agents (5-50)
        #[arg(long)]
        agents: Option<usize>,

        /// Simulation steps (100-1000)
        #[arg(long)]
        steps: Option<usize>,

        /// Fraction of DFT bins kept
        #[arg(long)]
        keep_ratio: Option<f64>,

        /// Write the agent and stabilization charts to this SVG file
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Also write raw vs smoothed series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run repeated trials across keep ratios
    Sweep {
        /// Number of trials per keep ratio
        #[arg(long, default_value = "5")]
        trials: usize,

        /// Keep ratios to test (comma-separated)
        #[arg(long, default_value = "0.05,0.1,0.2,0.5,1.0", value_delimiter = ',')]
        keep_ratios: Vec<f64>,

        /// Number of agents (5-50)
        #[arg(long)]
        agents: Option<usize>,

        /// Simulation steps (100-1000)
        #[arg(long)]
        steps: Option<usize>,

        /// Output file for results
        #[arg(long, default_value = "sweep.json")]
        output: PathBuf,
    },

    /// Generate the signal table and write it as CSV
    Generate {
        /// Number of agents (5-50)
        #[arg(long)]
        agents: Option<usize>,

        /// Simulation steps (100-1000)
        #[arg(long)]
        steps: Option<usize>,

        /// Output CSV file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn base_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn apply_counts(config: &mut DemoConfig, agents: Option<usize>, steps: Option<usize>) {
    if let Some(agents) = agents {
        config.agents = agents;
    }
    if let Some(steps) = steps {
        config.steps = steps;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .init();

    let mut config = base_config(&cli)?;

    match cli.command {
        Commands::Run {
            agents,
            steps,
            keep_ratio,
            chart,
            csv,
        } => {
            apply_counts(&mut config, agents, steps);
            if let Some(keep_ratio) = keep_ratio {
                config.keep_ratio = keep_ratio;
            }

            let runner = DemoRunner::new(config)?;
            let outcome = runner.run(0, None)?;
            let view = RenderView {
                table: &outcome.table,
                displayed_agents: runner.config().displayed_agents,
                focus_agent: runner.config().focus_agent,
                original: &outcome.original,
                smoothed: &outcome.smoothed,
                evaluation: &outcome.evaluation,
            };

            let stdout = io::stdout();
            let mut terminal = TerminalRenderer::new(stdout.lock());
            terminal.render(&view)?;

            if let Some(path) = chart {
                ChartRenderer::new(&path)
                    .render(&view)
                    .with_context(|| format!("drawing chart {}", path.display()))?;
                info!(path = %path.display(), "Wrote chart");
            }

            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                CsvRenderer::new(BufWriter::new(file)).render(&view)?;
                info!(path = %path.display(), "Wrote series CSV");
            }
        }

        Commands::Sweep {
            trials,
            keep_ratios,
            agents,
            steps,
            output,
        } => {
            apply_counts(&mut config, agents, steps);
            info!(
                trials = trials,
                ratios = keep_ratios.len(),
                agents = config.agents,
                steps = config.steps,
                "Starting sweep"
            );

            let seed = config.seed;
            let results = run_sweep(&config, &keep_ratios, trials, seed)?;
            let output_path = timestamped_path(&output);
            results.save(&output_path)?;

            let total_ms: u64 = results.records.iter().map(|r| r.duration_ms).sum();
            println!("\n=== Sweep Complete ===");
            println!("Runs: {} in {}", results.records.len(), format_duration(total_ms));
            println!("Results saved to: {}", output_path.display());
            println!(
                "\n  {:>10} {:>7} {:>12} {:>18} {:>12}",
                "keep_ratio", "trials", "err_red(%)", "95% CI (%)", "res_gain"
            );
            for summary in results.sorted_summary() {
                println!(
                    "  {:>10.3} {:>7} {:>12.1} {:>8.1}..{:<8.1} {:>12.2}",
                    summary.keep_ratio,
                    summary.trials,
                    summary.mean_error_reduction * 100.0,
                    summary.error_reduction_ci.0 * 100.0,
                    summary.error_reduction_ci.1 * 100.0,
                    summary.mean_resilience_gain
                );
            }
        }

        Commands::Generate {
            agents,
            steps,
            output,
        } => {
            apply_counts(&mut config, agents, steps);
            config.validate()?;

            let mut generator = SignalGenerator::new(config.generator_config(), config.seed);
            let table = generator.generate()?;

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    write_table_csv(&table, BufWriter::new(file))?;
                    info!(
                        path = %path.display(),
                        agents = table.agent_count(),
                        steps = table.step_count(),
                        "Wrote signal table"
                    );
                }
                None => write_table_csv(&table, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
