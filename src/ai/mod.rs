use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of the bot's cell choice.
pub trait MovePicker {
    /// Choose one of `candidates` (board indices). `None` only if the slice is empty.
    fn pick(&mut self, candidates: &[usize]) -> Option<usize>;
}

/// Picks uniformly among the candidates.
#[derive(Debug, Clone)]
pub struct RandomPicker<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MovePicker for RandomPicker<R> {
    fn pick(&mut self, candidates: &[usize]) -> Option<usize> {
        candidates.choose(&mut self.rng).copied()
    }
}
