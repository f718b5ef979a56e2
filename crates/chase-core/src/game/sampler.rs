use crate::game::belief::Belief;
use crate::model::station::Station;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Draws one station uniformly from the possibility set, or `None` when the
/// set is empty. A hint for the table, nothing more.
pub fn sample_candidate<R: Rng + ?Sized>(belief: &Belief, rng: &mut R) -> Option<Station> {
    let count = belief.candidates().len();
    if count == 0 {
        return None;
    }
    let pick = rng.gen_range(0..count);
    belief.candidates().iter().nth(pick).copied()
}

pub fn sample_candidate_with_seed(belief: &Belief, seed: u64) -> Option<Station> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_candidate(belief, &mut rng)
}
