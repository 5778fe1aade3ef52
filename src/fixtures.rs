//! Deterministic fixture generation.
//!
//! Every candidate sees byte-identical input: buffers come from a single
//! ChaCha20 stream keyed by a fixed seed, consumed in generation order.

use anyhow::{Context, Result};
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use tracing::debug;

/// Hex-encoded 32-byte key of the fixture stream.
pub const SEED: &str = "176D4F8638E08ACDE420A7FE72EC8A5A9E90E31034ABA768F927B0A5D6F4AA08";
pub const STREAM: u64 = 0;

/// Default suite: 100 buffers of 100 bytes.
pub const DEFAULT_SIZES: [(usize, usize); 1] = [(100, 100)];

/// Extended suite, (size, count) in generation order.
pub const EXTENDED_SIZES: [(usize, usize); 6] = [
    (100, 100),
    (100, 10_000),
    (1_000, 1_000),
    (10_000, 100),
    (100_000, 100),
    (1_000_000, 10),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureGroup {
    pub size: usize,
    pub buffers: Vec<Vec<u8>>,
}

pub struct FixtureGenerator {
    rng: ChaCha20Rng,
}

impl FixtureGenerator {
    pub fn new(seed_hex: &str, stream: u64) -> Result<Self> {
        let bytes = hex::decode(seed_hex).context("Fixture seed is not valid hex")?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .with_context(|| format!("Fixture seed must be 32 bytes, got {}", bytes.len()))?;

        let mut rng = ChaCha20Rng::from_seed(seed);
        rng.set_stream(stream);
        Ok(Self { rng })
    }

    /// Generator on the built-in seed, positioned at the start of the stream.
    pub fn with_default_seed() -> Result<Self> {
        Self::new(SEED, STREAM)
    }

    /// Draws `count` buffers of `size` bytes from the ongoing stream.
    pub fn generate(&mut self, size: usize, count: usize) -> FixtureGroup {
        let buffers = (0..count)
            .map(|_| {
                let mut buffer = vec![0u8; size];
                self.rng.fill_bytes(&mut buffer);
                buffer
            })
            .collect();

        debug!(size, count, "generated fixture group");
        FixtureGroup { size, buffers }
    }

    /// Generates one group per `(size, count)` entry, in order.
    pub fn generate_all(&mut self, table: &[(usize, usize)]) -> Vec<FixtureGroup> {
        table
            .iter()
            .map(|&(size, count)| self.generate(size, count))
            .collect()
    }
}
