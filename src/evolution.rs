//! The evolving parameter vector shared by all bots.
//!
//! Each epoch, every bot except the control one gets a random sparse perturbation (its
//! delta) of the common baseline. After the epoch, the delta of the bot that scored best is
//! folded into the baseline. The control bot always plays the plain baseline, so the baseline
//! only moves when a perturbation actually beats it.

use rand::Rng;
use tracing::{debug, info};

use crate::dealer::NUM_SEATS;

/// Default length of the parameter vector.
pub const DEFAULT_PARAMETER_COUNT: usize = 23;
/// Default control bot: it never mutates.
pub const DEFAULT_CONTROL_BOT: usize = 1;

/// Deltas smaller than this count as "not mutated yet".
const UNSET_DELTA: f64 = 1e-5;
/// Lower bound of the number of parameters touched per mutation.
const MIN_MUTATIONS: usize = 3;

/// Size of a mutation step for a parameter currently at `value`.
///
/// This is `step` scaled by the derivative of `tanh`: smooth, bounded by `step`, largest
/// around zero and shrinking as the parameter grows in magnitude.
pub fn gradient(value: f64, step: f64) -> f64 {
    let t = value.tanh();
    step * (1.0 - t * t)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    baseline: Vec<f64>,
    deltas: [Vec<f64>; NUM_SEATS],
    control_bot: usize,
    step: f64,
}

impl Population {
    /// Baseline of `parameter_count` zeros, no deltas.
    ///
    /// # Panics
    /// If `control_bot` is not a bot index.
    pub fn new(parameter_count: usize, control_bot: usize, step: f64) -> Population {
        assert!(control_bot < NUM_SEATS, "control bot {control_bot} does not exist");
        Population {
            baseline: vec![0.0; parameter_count],
            deltas: std::array::from_fn(|_| vec![0.0; parameter_count]),
            control_bot,
            step,
        }
    }

    /// Starts from an existing baseline, e.g. the result of an earlier run.
    pub fn with_baseline(mut self, baseline: Vec<f64>) -> Population {
        let count = baseline.len();
        self.baseline = baseline;
        self.deltas = std::array::from_fn(|_| vec![0.0; count]);
        self
    }

    pub fn baseline(&self) -> &[f64] {
        &self.baseline
    }

    pub fn delta(&self, bot: usize) -> &[f64] {
        &self.deltas[bot]
    }

    pub fn control_bot(&self) -> usize {
        self.control_bot
    }

    /// What `bot` plays with this epoch: baseline plus its delta.
    pub fn parameters_for(&self, bot: usize) -> Vec<f64> {
        self.baseline
            .iter()
            .zip(&self.deltas[bot])
            .map(|(base, delta)| base + delta)
            .collect()
    }

    /// Draws fresh perturbations for every bot except the control bot.
    ///
    /// A bot gets between `min(3, n - 1)` and `n - 1` distinct parameters changed, each by
    /// `±gradient(baseline[i])` with a random sign.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.baseline.len();
        if n == 0 {
            return;
        }
        let upper = n - 1;
        let lower = MIN_MUTATIONS.min(upper);

        for bot in (0..NUM_SEATS).filter(|b| *b != self.control_bot) {
            let mut remaining = rng.gen_range(lower..=upper);
            while remaining > 0 {
                let index = rng.gen_range(0..n);
                if self.deltas[bot][index].abs() < UNSET_DELTA {
                    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                    self.deltas[bot][index] = sign * gradient(self.baseline[index], self.step);
                    remaining -= 1;
                }
            }
            debug!(bot, delta = ?self.deltas[bot], "mutated");
        }
    }

    /// Ends the epoch: the bot with the highest score (lowest index on ties) has its delta
    /// added to the baseline, then every delta is cleared. Returns that bot.
    pub fn commit(&mut self, scores: &[i64; NUM_SEATS]) -> usize {
        let mut winner = 0;
        for bot in 1..NUM_SEATS {
            if scores[bot] > scores[winner] {
                winner = bot;
            }
        }
        for (base, delta) in self.baseline.iter_mut().zip(&self.deltas[winner]) {
            *base += delta;
        }
        for delta in &mut self.deltas {
            delta.fill(0.0);
        }
        info!(winner, baseline = ?self.baseline, "baseline updated");
        winner
    }
}
