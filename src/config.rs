//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Debug toggles, threaded through constructors rather than read from
/// globals so tests can flip them per body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Master switch. Off means every other toggle is ignored.
    pub debug_mode: bool,
    /// Re-check the position index against pixel storage after every
    /// structural change and log any mismatch. Expensive.
    pub validate_index: bool,
    /// Log cell and component counts after every surface pass.
    pub log_surface_stats: bool,
}

/// Tuning knobs for one body's engine passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum wall-clock delay between darkness recomputations. The pass
    /// is quadratic-ish in body size, so it runs on a throttle instead of
    /// every tick.
    pub darkness_interval: Duration,
    /// Darkness above which concealable materials render as plain dirt.
    pub reveal_threshold: f32,
    /// Number of fixed alpha steps when banding pixel health into the
    /// output frame.
    pub alpha_bands: u32,
    /// Cells a boundary walker remembers for loop avoidance.
    pub walker_history: usize,
    /// Seed for the body's deterministic RNG. Same seed, same world.
    pub rng_seed: u64,
    /// Debug toggles.
    pub debug: DebugConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            darkness_interval: Duration::from_millis(consts::DARKNESS_INTERVAL_MS),
            reveal_threshold: consts::REVEAL_THRESHOLD,
            alpha_bands: consts::ALPHA_BANDS,
            walker_history: consts::WALKER_HISTORY,
            rng_seed: consts::DEFAULT_SEED,
            debug: DebugConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default config with a specific seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: seed,
            ..Self::default()
        }
    }
}
