//! Warm-up and measurement loops.
//!
//! A pass runs one candidate over a whole fixture group. Warm-up repeats
//! passes for a fixed budget and throws the timings away; measurement times
//! each pass, normalizes it to nanoseconds per operation and aggregates the
//! samples into a mean and an error percentage.

use anyhow::Result;
use std::hint::black_box;
use tracing::debug;

use crate::timer::Clock;

/// Budgets for one (function, fixture group, candidate) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchConfig {
    pub warmup_ms: f64,
    pub measure_ms: f64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            warmup_ms: 15.0,
            measure_ms: 50.0,
        }
    }
}

/// Runs `f` over every fixture in order and returns the number of operations.
///
/// Calls are strictly sequential. The first error aborts the pass and is
/// returned as is.
pub fn run_pass<F>(f: F, fixtures: &[Vec<u8>]) -> Result<usize>
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    for fixture in fixtures {
        black_box(f(black_box(fixture.as_slice()))?);
    }
    Ok(fixtures.len())
}

/// Repeats `bench` until `budget_ms` has elapsed. The budget is checked before
/// each pass, so a positive budget always runs at least one.
pub fn warm_up<C, F>(clock: &C, budget_ms: f64, mut bench: F) -> Result<()>
where
    C: Clock,
    F: FnMut() -> Result<usize>,
{
    let start = clock.now();
    let mut passes = 0u64;
    while clock.elapsed_ms(start) < budget_ms {
        bench()?;
        passes += 1;
    }
    debug!(passes, budget_ms, "warm-up finished");
    Ok(())
}

/// Aggregated timing of one triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Nanoseconds per operation, one entry per pass.
    pub samples: Vec<f64>,
    pub mean_ns_per_op: f64,
    pub error_pct: f64,
}

impl Measurement {
    pub fn from_samples(samples: Vec<f64>) -> Self {
        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;

        // Mean absolute deviation over (n - 1), relative to the mean
        let error_pct = if samples.len() > 1 {
            let deviation =
                samples.iter().map(|s| (mean - s).abs()).sum::<f64>() / (count - 1.0);
            deviation / mean * 100.0
        } else {
            0.0
        };

        Self {
            samples,
            mean_ns_per_op: mean,
            error_pct,
        }
    }
}

/// Times passes of `bench` until `budget_ms` is exceeded, then takes one more.
///
/// At least two samples are always collected, whatever the budget. A pass
/// reporting zero operations yields a non-finite sample.
pub fn measure<C, F>(clock: &C, budget_ms: f64, mut bench: F) -> Result<Measurement>
where
    C: Clock,
    F: FnMut() -> Result<usize>,
{
    let mut samples = Vec::new();
    let start = clock.now();
    let mut pass_start = start;
    let mut over_budget = 0u32;

    loop {
        let ops = bench()?;
        samples.push(clock.elapsed_ms(pass_start) * 1e6 / ops as f64);

        if clock.elapsed_ms(start) > budget_ms {
            over_budget += 1;
            if over_budget >= 2 {
                break;
            }
        }
        pass_start = clock.now();
    }

    debug!(samples = samples.len(), budget_ms, "measurement finished");
    Ok(Measurement::from_samples(samples))
}
