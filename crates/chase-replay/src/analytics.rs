use std::fs;
use std::path::{Path, PathBuf};

use chase_core::game::belief::Belief;
use chase_core::model::station::Station;
use plotters::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// Accumulates the possibility-set trajectory while the runner replays steps.
pub struct AnalyticsCollector {
    run_id: String,
    steps: Vec<StepPoint>,
    final_candidates: Vec<Station>,
}

impl AnalyticsCollector {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            steps: Vec::new(),
            final_candidates: Vec::new(),
        }
    }

    pub fn record_step(&mut self, step_index: usize, action: &str, belief: &Belief) {
        self.steps.push(StepPoint {
            step_index,
            action: action.to_string(),
            candidates: belief.candidates().len(),
        });
        self.final_candidates = belief.candidates().iter().copied().collect();
    }

    pub fn finalize(self) -> AnalyticsSummary {
        let peak_candidates = self
            .steps
            .iter()
            .map(|point| point.candidates)
            .max()
            .unwrap_or(0);
        let first_singleton = self
            .steps
            .iter()
            .find(|point| point.candidates == 1)
            .map(|point| point.step_index);

        AnalyticsSummary {
            run_id: self.run_id,
            steps: self.steps,
            peak_candidates,
            first_singleton,
            final_candidates: self.final_candidates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepPoint {
    pub step_index: usize,
    pub action: String,
    pub candidates: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub steps: Vec<StepPoint>,
    pub peak_candidates: usize,
    pub first_singleton: Option<usize>,
    pub final_candidates: Vec<Station>,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let mut rows = String::new();
        rows.push_str("# Replay Summary\n\n");
        rows.push_str(&format!("Run: {}\n\n", self.run_id));
        rows.push_str("| Step | Action | Candidates |\n");
        rows.push_str("|------|--------|------------|\n");

        for point in &self.steps {
            rows.push_str(&format!(
                "| {} | {} | {} |\n",
                point.step_index, point.action, point.candidates
            ));
        }

        rows.push('\n');
        rows.push_str(&format!(
            "Peak possibility count: {}\n",
            self.peak_candidates
        ));
        match self.first_singleton {
            Some(step) => rows.push_str(&format!("Narrowed to one station at step {step}\n")),
            None => rows.push_str("Never narrowed to a single station\n"),
        }

        let listed = if self.final_candidates.is_empty() {
            "none".to_string()
        } else {
            self.final_candidates
                .iter()
                .map(|station| station.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        rows.push_str(&format!(
            "Final possibility set ({}): {}\n",
            self.final_candidates.len(),
            listed
        ));

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }

    pub fn render_plot(&self, dir: impl AsRef<Path>) -> Result<PathBuf, AnalyticsError> {
        let dir = dir.as_ref();
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| AnalyticsError::Io {
                context: "creating plots directory",
                source: e,
            })?;
        }

        let output_path = dir.join("candidates.png");
        let points = self.steps.clone();
        let y_max = self.peak_candidates.max(1) + 1;

        let prev_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let plot_attempt = std::panic::catch_unwind(move || {
            let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .caption("Possibility count per step", ("sans-serif", 22))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 60)
                .build_cartesian_2d(0..points.len(), 0..y_max)
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .configure_mesh()
                .disable_mesh()
                .y_desc("Candidates")
                .x_desc("Step")
                .draw()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            chart
                .draw_series(points.iter().map(|point| {
                    let color = if point.candidates == 1 { &GREEN } else { &RED };
                    Rectangle::new(
                        [
                            (point.step_index, 0),
                            (point.step_index + 1, point.candidates),
                        ],
                        color.filled(),
                    )
                }))
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(chart);

            root.present()
                .map_err(|e| AnalyticsError::Plot(e.to_string()))?;

            drop(root);

            Ok(output_path)
        });

        std::panic::set_hook(prev_hook);

        match plot_attempt {
            Ok(result) => result,
            Err(_) => Err(AnalyticsError::Plot(
                "plotters panicked while rendering (missing font support?)".into(),
            )),
        }
    }
}
