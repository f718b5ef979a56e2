use super::belief::Belief;
use crate::model::station::Station;
use serde::{Deserialize, Serialize};

/// Resumable capture of one pursuit. Positions only; the network is loaded
/// separately and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PursuitSnapshot {
    pub detectives: Vec<Station>,
    pub barrages: Vec<Station>,
    pub candidates: Vec<Station>,
}

impl PursuitSnapshot {
    pub fn capture(belief: &Belief) -> Self {
        PursuitSnapshot {
            detectives: belief.detectives().to_vec(),
            barrages: belief.barrages().iter().copied().collect(),
            candidates: belief.candidates().iter().copied().collect(),
        }
    }

    /// Rebuilds the belief. Detective squares are struck from the restored
    /// possibility set again, so an edited snapshot cannot smuggle a
    /// candidate onto a detective.
    pub fn restore(self) -> Belief {
        Belief::from_parts(
            self.detectives,
            self.barrages.into_iter().collect(),
            self.candidates.into_iter().collect(),
        )
    }

    pub fn to_json(belief: &Belief) -> serde_json::Result<String> {
        let snapshot = Self::capture(belief);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
