//! Score-weighted random choice among candidate moves.
//!
//! Layered on top of the deterministic scorer: the scores are unchanged, only
//! the final choice is drawn at random with probability proportional to
//! `exp((score - max) / temperature)`. A temperature of zero or less falls
//! back to the arg-max.

use rand::Rng;

use crate::board::Move;

use super::heuristic::{ScoredMove, DISQUALIFIED};

/// Draws a move from scored candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSampler {
    pub temperature: f64,
}

impl WeightedSampler {
    pub fn new(temperature: f64) -> Self {
        WeightedSampler { temperature }
    }

    /// Picks a candidate, or `None` when there are none.
    ///
    /// Disqualified candidates are only eligible when every candidate is
    /// disqualified.
    pub fn sample<R: Rng + ?Sized>(&self, scored: &[ScoredMove], rng: &mut R) -> Option<Move> {
        let eligible: Vec<&ScoredMove> = if scored.iter().all(|s| s.score == DISQUALIFIED) {
            scored.iter().collect()
        } else {
            scored.iter().filter(|s| s.score != DISQUALIFIED).collect()
        };
        let argmax = eligible
            .iter()
            .copied()
            .fold(None::<&ScoredMove>, |best, s| match best {
                Some(b) if b.score >= s.score => Some(b),
                _ => Some(s),
            })?;
        if self.temperature <= 0.0 || !self.temperature.is_finite() {
            return Some(argmax.mv);
        }

        let max = argmax.score as f64;
        let weights: Vec<f64> = eligible
            .iter()
            .map(|s| ((s.score as f64 - max) / self.temperature).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        let r: f64 = rng.gen::<f64>() * total;
        let mut cum = 0.0;
        for (s, w) in eligible.iter().zip(&weights) {
            cum += w;
            if r < cum {
                return Some(s.mv);
            }
        }
        eligible.last().map(|s| s.mv)
    }
}
