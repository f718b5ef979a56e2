use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use chase_core::model::station::Station;
use chase_core::model::ticket::TicketKind;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root scenario configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub run_id: String,
    pub data: DataConfig,
    pub game: GameConfig,
    pub steps: Vec<ScenarioStep>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScenarioConfig {
    /// Load a scenario from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ScenarioConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the scenario without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.game.validate()?;
        validate_steps(&self.steps, self.game.detectives.len())?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Board data location block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
    pub dir: PathBuf,
}

/// Opening position of the recorded pursuit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    pub detectives: Vec<Station>,
    #[serde(default)]
    pub barrages: Vec<Station>,
}

impl GameConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.detectives.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "game.detectives".to_string(),
                message: "at least one detective must be placed".to_string(),
            });
        }
        check_stations("game.detectives", &self.detectives)?;
        check_stations("game.barrages", &self.barrages)?;
        Ok(())
    }
}

/// One scripted move of the recorded pursuit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    Ticket(TicketKind),
    Detectives(Vec<Station>),
    Barrages(Vec<Station>),
    Reveal(Station),
    Round {
        detectives: Vec<Station>,
        #[serde(default)]
        barrages: Option<Vec<Station>>,
    },
}

impl ScenarioStep {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioStep::Ticket(_) => "ticket",
            ScenarioStep::Detectives(_) => "detectives",
            ScenarioStep::Barrages(_) => "barrages",
            ScenarioStep::Reveal(_) => "reveal",
            ScenarioStep::Round { .. } => "round",
        }
    }
}

fn validate_steps(steps: &[ScenarioStep], detective_count: usize) -> Result<(), ValidationError> {
    if steps.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "steps".to_string(),
            message: "at least one step must be scripted".to_string(),
        });
    }

    for (index, step) in steps.iter().enumerate() {
        match step {
            ScenarioStep::Ticket(_) => {}
            ScenarioStep::Detectives(positions) => {
                check_stations(&format!("steps[{index}].detectives"), positions)?;
                check_detective_count(index, positions.len(), detective_count)?;
            }
            ScenarioStep::Barrages(stations) => {
                check_stations(&format!("steps[{index}].barrages"), stations)?;
            }
            ScenarioStep::Reveal(station) => {
                check_stations(&format!("steps[{index}].reveal"), &[*station])?;
            }
            ScenarioStep::Round {
                detectives,
                barrages,
            } => {
                check_stations(&format!("steps[{index}].round.detectives"), detectives)?;
                check_detective_count(index, detectives.len(), detective_count)?;
                if let Some(barrages) = barrages {
                    check_stations(&format!("steps[{index}].round.barrages"), barrages)?;
                }
            }
        }
    }

    Ok(())
}

fn check_stations(field: &str, stations: &[Station]) -> Result<(), ValidationError> {
    if stations.iter().any(|station| station.label() == 0) {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "station labels must be positive".to_string(),
        });
    }
    Ok(())
}

fn check_detective_count(
    index: usize,
    found: usize,
    expected: usize,
) -> Result<(), ValidationError> {
    if found != expected {
        return Err(ValidationError::InvalidField {
            field: format!("steps[{index}]"),
            message: format!("expected {expected} detective positions but found {found}"),
        });
    }
    Ok(())
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.plots_dir", &self.plots_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

/// Errors surfaced when loading scenario files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse scenario {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid scenario in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
