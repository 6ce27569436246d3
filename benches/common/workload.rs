//! Deterministic key streams for hit-rate benchmarks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Zipf};

#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split: `hot_prob` of accesses land in the first
    /// `hot_fraction` of the universe.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan over `[0, universe)`, wrapping around.
    Scan,
    /// Zipfian distribution; `exponent` controls skew (1.0 = standard).
    Zipfian { exponent: f64 },
}

pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    rng: SmallRng,
    zipf: Option<Zipf<f64>>,
    cursor: u64,
}

impl WorkloadGenerator {
    pub fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let zipf = match workload {
            Workload::Zipfian { exponent } => {
                Some(Zipf::new(universe as f64, exponent).expect("valid zipf parameters"))
            },
            _ => None,
        };
        Self {
            universe,
            workload,
            rng: SmallRng::seed_from_u64(seed),
            zipf,
            cursor: 0,
        }
    }

    pub fn next_key(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.random_range(0..self.universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_keys = ((self.universe as f64) * hot_fraction).max(1.0) as u64;
                if self.rng.random_bool(hot_prob) {
                    self.rng.random_range(0..hot_keys)
                } else {
                    self.rng.random_range(hot_keys..self.universe.max(hot_keys + 1))
                }
            },
            Workload::Scan => {
                let key = self.cursor;
                self.cursor = (self.cursor + 1) % self.universe;
                key
            },
            Workload::Zipfian { .. } => {
                let sample = self
                    .zipf
                    .as_ref()
                    .expect("zipf distribution initialised")
                    .sample(&mut self.rng);
                (sample as u64).saturating_sub(1)
            },
        }
    }
}
