//! Regolith - a destructible pixel-body simulation engine
//!
//! Core modules:
//! - `body`: pixel ownership, surface analysis, darkness, the planet and
//!   serpent variants
//! - `walker`: boundary-walking movement for digging agents
//! - `grid`: cell math shared by bodies and agents
//! - `snapshot`: plain-data save/load forms
//! - `palette`: colors and material shades
//!
//! The engine is synchronous and caller-driven: construct bodies, then
//! call [`PixelBody::update`] once per frame from your own loop and blit
//! the resulting [`body::frame::Frame`]. For a given seed the simulation
//! is deterministic; only the darkness throttle consults the wall clock,
//! and only through the `now` you pass in.

pub mod body;
pub mod config;
pub mod grid;
pub mod palette;
pub mod pixel;
pub mod snapshot;
pub mod walker;

pub use body::frame::Frame;
pub use body::planet::{Deposit, Planet, PlanetSpec};
pub use body::serpent::{HeadState, Segment, Serpent, SerpentSpec};
pub use body::{Body, BodyError, DamageOutcome, GridBounds, PixelBody, PixelKey, TickEvents};
pub use config::{DebugConfig, EngineConfig};
pub use palette::Rgba;
pub use pixel::{Material, MaterialSet, Pixel};
pub use snapshot::{BodySnapshot, SegmentSnapshot, SerpentSnapshot};
pub use walker::SurfaceWalker;

/// Engine default constants
pub mod consts {
    /// Minimum delay between darkness recomputations (the pass is heavy)
    pub const DARKNESS_INTERVAL_MS: u64 = 500;
    /// Darkness above which buried valuables read as plain dirt
    pub const REVEAL_THRESHOLD: f32 = 0.35;
    /// Fixed alpha steps when banding pixel health into a frame
    pub const ALPHA_BANDS: u32 = 4;
    /// Cells of revisit memory carried by a boundary walker
    pub const WALKER_HISTORY: usize = 4;
    /// Serpent turn probability gained per cell of straight travel
    pub const SERPENT_TURN_BIAS: f32 = 0.02;
    /// Engine seed used when the caller does not supply one
    pub const DEFAULT_SEED: u64 = 0x5EED;
}
