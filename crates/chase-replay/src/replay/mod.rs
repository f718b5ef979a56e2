use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chase_core::game::belief::{Belief, BeliefError};
use chase_core::model::station::Station;
use chase_core::network::{DataFormatError, TransitNetwork};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{ResolvedOutputs, ScenarioConfig, ScenarioStep};

/// Primary entry point for replaying a recorded pursuit.
pub struct ReplayRunner {
    config: ScenarioConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct ReplaySummary {
    pub steps_played: usize,
    pub rows_written: usize,
    pub final_candidates: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub trace_path: Option<PathBuf>,
}

impl ReplayRunner {
    /// Build a runner from a validated scenario.
    pub fn new(config: ScenarioConfig, outputs: ResolvedOutputs) -> Self {
        Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        }
    }

    /// Replay every step, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<ReplaySummary, ReplayError> {
        let network = TransitNetwork::from_dir(&self.config.data.dir)?;

        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if !self.outputs.plots_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.outputs.plots_dir)?;
        }

        let mut belief = Belief::new(self.config.game.detectives.clone());
        belief.set_barrages(self.config.game.barrages.iter().copied());

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut analytics = AnalyticsCollector::new(&self.config.run_id);
        let mut rows_written = 0usize;

        for (step_index, step) in self.config.steps.iter().enumerate() {
            let action = apply_step(&mut belief, &network, step, step_index)?;
            analytics.record_step(step_index, &action, &belief);
            rows_written += write_step_row(
                &mut writer,
                &self.config.run_id,
                step_index,
                &action,
                &belief,
            )?;

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "chase_replay::step",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    step_index = step_index as u32,
                    action = %action,
                    candidates = belief.candidates().len() as u32
                );
            }
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;
        let plot_path = match summary.render_plot(&self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                eprintln!("WARN: {err}");
                None
            }
        };

        let trace_path = if self.logging_enabled {
            self.outputs
                .summary_md
                .parent()
                .map(|dir| dir.join("trace.jsonl"))
        } else {
            None
        };

        Ok(ReplaySummary {
            steps_played: self.config.steps.len(),
            rows_written,
            final_candidates: summary.final_candidates.len(),
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_path,
            trace_path,
        })
    }
}

/// Applies one scripted step and names it for the log row. Rejected steps
/// abort the replay; the scenario scripted an impossible position.
fn apply_step(
    belief: &mut Belief,
    network: &TransitNetwork,
    step: &ScenarioStep,
    step_index: usize,
) -> Result<String, ReplayError> {
    match step {
        ScenarioStep::Ticket(ticket) => {
            belief.apply_ticket(network, *ticket);
            Ok(format!("ticket {ticket}"))
        }
        ScenarioStep::Detectives(positions) => {
            belief
                .set_detectives(positions)
                .map_err(|source| ReplayError::Step { step_index, source })?;
            Ok("detectives".to_string())
        }
        ScenarioStep::Barrages(stations) => {
            belief.set_barrages(stations.iter().copied());
            Ok("barrages".to_string())
        }
        ScenarioStep::Reveal(station) => {
            let audit = belief.reveal(*station);
            if !audit.is_clean() {
                tracing::warn!(
                    station = %station,
                    on_detective = audit.on_detective,
                    on_barrage = audit.on_barrage,
                    "reveal landed on an occupied square"
                );
            }
            Ok(format!("reveal {station}"))
        }
        ScenarioStep::Round {
            detectives,
            barrages,
        } => {
            let next_barrages: BTreeSet<Station> = match barrages {
                Some(list) => list.iter().copied().collect(),
                None => belief.barrages().clone(),
            };
            belief
                .play_round(detectives, next_barrages)
                .map_err(|source| ReplayError::Step { step_index, source })?;
            Ok("round".to_string())
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), ReplayError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct StepLogRow {
    run_id: String,
    step_index: usize,
    action: String,
    candidate_count: usize,
    candidates: Vec<Station>,
}

fn write_step_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    step_index: usize,
    action: &str,
    belief: &Belief,
) -> Result<usize, ReplayError> {
    let row = StepLogRow {
        run_id: run_id.to_string(),
        step_index,
        action: action.to_string(),
        candidate_count: belief.candidates().len(),
        candidates: belief.candidates().iter().copied().collect(),
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(1)
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("board data error: {source}")]
    Board {
        #[from]
        source: DataFormatError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("step {step_index} rejected: {source}")]
    Step {
        step_index: usize,
        source: BeliefError,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
