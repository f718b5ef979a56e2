use crate::model::station::Station;
use crate::model::ticket::TicketKind;
use crate::network::TransitNetwork;
use core::fmt;
use std::collections::BTreeSet;

/// Where Mister X can be, plus the board facts that constrain it.
///
/// `candidates` is the possibility set: every station consistent with the
/// clues seen so far. It starts empty and only a reveal seeds it. The
/// operations keep one rule standing at all times: after any call that
/// promises it, no candidate sits on a detective or under a barrage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Belief {
    detectives: Vec<Station>,
    barrages: BTreeSet<Station>,
    candidates: BTreeSet<Station>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeliefError {
    DetectiveCountMismatch { expected: usize, found: usize },
}

impl fmt::Display for BeliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefError::DetectiveCountMismatch { expected, found } => {
                write!(f, "expected {expected} detective positions but got {found}")
            }
        }
    }
}

impl std::error::Error for BeliefError {}

/// Outcome flags for a reveal. A reveal that lands on a detective or a
/// barrage is suspicious, not impossible: the sighting is ground truth and
/// always wins, but the caller should say something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealAudit {
    pub on_detective: bool,
    pub on_barrage: bool,
}

impl RevealAudit {
    pub const fn is_clean(self) -> bool {
        !self.on_detective && !self.on_barrage
    }
}

impl Belief {
    /// Starts a pursuit with the given detective positions. The detective
    /// count is fixed from here on.
    pub fn new(detectives: Vec<Station>) -> Self {
        Belief {
            detectives,
            barrages: BTreeSet::new(),
            candidates: BTreeSet::new(),
        }
    }

    pub(crate) fn from_parts(
        detectives: Vec<Station>,
        barrages: BTreeSet<Station>,
        candidates: BTreeSet<Station>,
    ) -> Self {
        let mut belief = Belief {
            detectives,
            barrages,
            candidates,
        };
        for station in belief.detectives.iter() {
            belief.candidates.remove(station);
        }
        belief
    }

    pub fn detective_count(&self) -> usize {
        self.detectives.len()
    }

    pub fn detectives(&self) -> &[Station] {
        &self.detectives
    }

    pub fn barrages(&self) -> &BTreeSet<Station> {
        &self.barrages
    }

    pub fn candidates(&self) -> &BTreeSet<Station> {
        &self.candidates
    }

    /// True once the possibility set has shrunk to a single station.
    pub fn is_located(&self) -> bool {
        self.candidates.len() == 1
    }

    /// Replaces every detective position at once. The slice must carry
    /// exactly one station per detective; on a mismatch nothing changes.
    /// New positions are struck from the possibility set: Mister X is not
    /// standing on a detective.
    pub fn set_detectives(&mut self, positions: &[Station]) -> Result<(), BeliefError> {
        if positions.len() != self.detectives.len() {
            return Err(BeliefError::DetectiveCountMismatch {
                expected: self.detectives.len(),
                found: positions.len(),
            });
        }
        self.replace_detectives(positions);
        Ok(())
    }

    /// Replaces the barrage set wholesale. Existing candidates are left
    /// alone: a barrage blocks movement from now on, it says nothing about
    /// where Mister X already is.
    pub fn set_barrages<I>(&mut self, barrages: I)
    where
        I: IntoIterator<Item = Station>,
    {
        self.barrages = barrages.into_iter().collect();
    }

    /// One revealed ticket: every candidate takes one step along the
    /// ticket's graph, then detective squares and barraged squares are
    /// struck. An empty possibility set stays empty, which is a reportable
    /// state, not a fault. Deliberately not idempotent; one call per move.
    pub fn apply_ticket(&mut self, network: &TransitNetwork, ticket: TicketKind) {
        let mut reachable = BTreeSet::new();
        for station in self.candidates.iter().copied() {
            reachable.extend(network.neighbors(ticket, station).iter().copied());
        }
        for station in self.detectives.iter() {
            reachable.remove(station);
        }
        for station in self.barrages.iter() {
            reachable.remove(station);
        }
        self.candidates = reachable;
    }

    /// A confirmed sighting: the possibility set collapses to exactly
    /// `station`, whatever it held before. The returned audit flags the
    /// odd cases worth a warning.
    pub fn reveal(&mut self, station: Station) -> RevealAudit {
        let audit = RevealAudit {
            on_detective: self.detectives.contains(&station),
            on_barrage: self.barrages.contains(&station),
        };
        self.candidates.clear();
        self.candidates.insert(station);
        audit
    }

    /// The detectives' turn as one batch: new positions plus the next
    /// barrage layout, validated up front. A rejected round leaves every
    /// field untouched.
    pub fn play_round(
        &mut self,
        detectives: &[Station],
        barrages: BTreeSet<Station>,
    ) -> Result<(), BeliefError> {
        if detectives.len() != self.detectives.len() {
            return Err(BeliefError::DetectiveCountMismatch {
                expected: self.detectives.len(),
                found: detectives.len(),
            });
        }
        self.barrages = barrages;
        self.replace_detectives(detectives);
        Ok(())
    }

    fn replace_detectives(&mut self, positions: &[Station]) {
        self.detectives.clear();
        self.detectives.extend_from_slice(positions);
        for station in positions {
            self.candidates.remove(station);
        }
    }
}
