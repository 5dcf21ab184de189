use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::fields::JobField;
use crate::history::{summarize, HistorySummary};
use crate::models::AnalysisHistoryRecord;
use crate::scoring::handlers::{handle_analyze, handle_recommend, handle_score};
use crate::state::AppState;
use crate::status::system_status;
use crate::training::handlers::{handle_dataset_summary, handle_predict, handle_train};
use crate::training::trainer::TrainingOutcome;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Score resumes for ATS readiness and recommend job fields", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides SCREENER_DATA_DIR
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Overrides SCREENER_MODELS_DIR
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,
}

/// Resume text source: `--file`, or stdin when omitted.
#[derive(Args)]
pub struct InputArgs {
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read resume text from {}", path.display())),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read resume text from stdin")?;
                Ok(buf)
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// ATS point score against a target field
    Score {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, short = 'j')]
        field: JobField,
        /// Do not append to the analysis history
        #[arg(long)]
        no_history: bool,
    },
    /// ATS score, keyword gap analysis, suggestions and field recommendation
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, short = 'j')]
        field: JobField,
        #[arg(long)]
        no_history: bool,
    },
    /// Field probabilities from the trained model or keyword counts
    Recommend {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Classify with the trained model only
    Predict {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Train and persist the field classifier
    Train {
        /// Write the built-in dataset first if none is usable
        #[arg(long)]
        seed_dataset: bool,
    },
    /// Training dataset statistics
    Dataset {
        #[arg(long)]
        seed_dataset: bool,
    },
    /// Usage statistics from the analysis history
    History {
        /// Number of most recent rows to include
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },
    /// Presence of data and model artifacts
    Status,
}

#[derive(Serialize)]
struct HistoryReport {
    summary: HistorySummary,
    recent: Vec<AnalysisHistoryRecord>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn handle_command(command: Command, state: &AppState) -> Result<()> {
    match command {
        Command::Score {
            input,
            field,
            no_history,
        } => print_json(&handle_score(state, &input.read()?, field, !no_history)?),

        Command::Analyze {
            input,
            field,
            no_history,
        } => print_json(&handle_analyze(state, &input.read()?, field, !no_history)?),

        Command::Recommend { input } => print_json(&handle_recommend(state, &input.read()?)?),

        Command::Predict { input } => print_json(&handle_predict(state, &input.read()?)?),

        Command::Train { seed_dataset } => {
            let outcome = handle_train(state, seed_dataset)?;
            print_json(&outcome)?;
            match outcome {
                TrainingOutcome::Completed(report) => {
                    info!("Artifacts written to {}", report.models_dir.display());
                    Ok(())
                }
                TrainingOutcome::Failed(f) => {
                    anyhow::bail!("Training failed during {:?} [{}]: {}", f.stage, f.code, f.message)
                }
            }
        }

        Command::Dataset { seed_dataset } => print_json(&handle_dataset_summary(state, seed_dataset)?),

        Command::History { recent } => {
            let records = state.history.load()?;
            let summary = summarize(&records);
            let skip = records.len().saturating_sub(recent);
            let recent = records.into_iter().skip(skip).collect();
            print_json(&HistoryReport { summary, recent })
        }

        Command::Status => print_json(&system_status(state)),
    }
}
