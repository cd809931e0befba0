//! Partner selection strategies

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::ClientId;

/// Picks one partner out of the ready-unpaired candidates.
///
/// Candidates arrive sorted by id and never include the initiator. Returning
/// `None` or an id outside the slice means no pairing happens.
pub trait PeerSelector: Send + Sync {
    fn select(&self, candidates: &[ClientId]) -> Option<ClientId>;
}

/// Uniform random choice over all candidates
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl PeerSelector for RandomSelector {
    fn select(&self, candidates: &[ClientId]) -> Option<ClientId> {
        candidates.choose(&mut rand::thread_rng()).copied()
    }
}

/// Uniform choice driven by a seeded generator, reproducible across runs
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PeerSelector for SeededSelector {
    fn select(&self, candidates: &[ClientId]) -> Option<ClientId> {
        candidates.choose(&mut *self.rng.lock()).copied()
    }
}

impl<F> PeerSelector for F
where
    F: Fn(&[ClientId]) -> Option<ClientId> + Send + Sync,
{
    fn select(&self, candidates: &[ClientId]) -> Option<ClientId> {
        self(candidates)
    }
}
