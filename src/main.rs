use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cci_baseline::config::BaselineConfig;
use cci_baseline::scoring::{ScoreOutcome, Scorer, SubmissionSchema};
use cci_baseline::{io, pipeline};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cci-baseline")]
#[command(about = "Node-statistics logistic baseline for interaction prediction", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output (debug-level logs)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit on train, validate, refit on train+val and predict test
    Run {
        /// JSON configuration file
        #[arg(short, long, env = "CCI_BASELINE_CONFIG")]
        config: Option<PathBuf>,

        /// Labeled training edges (source,target,label)
        #[arg(long)]
        train: Option<PathBuf>,

        /// Labeled validation edges (source,target,label)
        #[arg(long)]
        val: Option<PathBuf>,

        /// Unlabeled test edges (source,target)
        #[arg(long)]
        test: Option<PathBuf>,

        /// Submission file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        epochs: Option<usize>,

        #[arg(long)]
        learning_rate: Option<f64>,

        #[arg(long)]
        l2: Option<f64>,

        /// Decision threshold on the positive-class probability
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Write the all-zero submission for a test file
    Zero {
        /// Unlabeled test edges (source,target)
        #[arg(long)]
        test: PathBuf,

        /// Submission file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Score a submission against ground truth
    Score {
        /// Submission file
        submission: PathBuf,

        /// Ground-truth labels file
        labels: PathBuf,

        /// Competition format
        #[arg(short, long, value_enum, default_value = "cci")]
        format: FormatArg,

        /// Also write the JSON verdict to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    Cci,
    Ppi,
}

impl From<FormatArg> for SubmissionSchema {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Cci => SubmissionSchema::cci(),
            FormatArg::Ppi => SubmissionSchema::ppi(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "cci_baseline=debug" } else { "cci_baseline=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run { config, train, val, test, output, epochs, learning_rate, l2, threshold } => {
            let mut cfg = match &config {
                Some(path) => BaselineConfig::from_json_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => BaselineConfig::default(),
            };
            if let Some(p) = train { cfg.paths.train = p; }
            if let Some(p) = val { cfg.paths.val = p; }
            if let Some(p) = test { cfg.paths.test = p; }
            if let Some(p) = output { cfg.paths.output = p; }
            if let Some(n) = epochs { cfg.train.epochs = n; }
            if let Some(lr) = learning_rate { cfg.train.learning_rate = lr; }
            if let Some(l2) = l2 { cfg.train.l2 = l2; }
            if let Some(t) = threshold { cfg.threshold = t; }
            cfg.validate()?;

            let outcome = pipeline::run_from_config(&cfg).context("baseline run failed")?;
            if let Some(v) = &outcome.validation {
                println!("[Validation] Accuracy={:.4}, F1={:.4}", v.accuracy, v.f1);
            }
            println!("Wrote {} predictions to {}", outcome.predictions.len(), cfg.paths.output.display());
        }

        Commands::Zero { test, output } => {
            let edges = io::read_unlabeled_edges(&test)
                .with_context(|| format!("reading {}", test.display()))?;
            let rows = pipeline::zero_baseline(&edges);
            io::write_predictions_file(&output, rows.iter().map(|p| (p.key, p.label)))?;
            println!("Wrote {} predictions to {}", rows.len(), output.display());
        }

        Commands::Score { submission, labels, format, report } => {
            let scorer = Scorer::new(format.into());
            tracing::info!(
                keys = ?scorer.schema().key_columns,
                prediction = %scorer.schema().prediction_column,
                "scoring submission"
            );
            let result = scorer.score_files(&submission, &labels);
            let rejected = result.as_ref().err().map(ToString::to_string);

            let outcome = ScoreOutcome::from(result);
            let json = serde_json::to_string_pretty(&outcome)?;
            println!("{json}");
            if let Some(path) = report {
                std::fs::write(&path, &json)
                    .with_context(|| format!("writing report {}", path.display()))?;
            }
            if let Some(reason) = rejected {
                bail!("submission rejected: {reason}");
            }
        }
    }

    Ok(())
}
