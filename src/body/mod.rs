//! Pixel-body state and operations.
//!
//! A [`Body`] owns every pixel of one destructible object and keeps three
//! views of them consistent: the pixel arena itself, a cell-to-pixel
//! position index, and the current surface set. All structural mutation
//! funnels through the methods here so the views can never drift apart.
//!
//! Concrete variants ([`planet::Planet`], [`serpent::Serpent`]) implement
//! [`PixelBody`] on top of a `Body` instead of subclassing it; the engine
//! passes (surface analysis, darkness, frame assembly) live in the
//! submodules and run from [`Body::refresh`].

pub mod darkness;
pub mod frame;
pub mod planet;
pub mod serpent;
pub mod surface;

use std::time::Instant;

use glam::{IVec2, Vec2};
use rand_pcg::Pcg32;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::grid::NEIGHBORS_8;
use crate::palette::{Rgba, colors};
use crate::pixel::{Material, MaterialSet, Pixel};
use crate::snapshot::BodySnapshot;

use self::darkness::DarknessClock;
use self::frame::Frame;

new_key_type! {
    /// Stable generational handle to a pixel. Keys survive unrelated
    /// insertions and removals and go stale (not dangling) when their
    /// pixel is destroyed.
    pub struct PixelKey;
}

/// Inclusive cell rectangle a body's pixels must stay inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: IVec2,
    pub max: IVec2,
}

impl GridBounds {
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Square bounds around the origin reaching `extent + margin` cells
    /// out on every axis.
    pub fn centered(extent: i32, margin: i32) -> Self {
        let reach = extent + margin;
        Self {
            min: IVec2::splat(-reach),
            max: IVec2::splat(reach),
        }
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Whether a square of half-width `extent` centered on `center` fits
    /// entirely inside the bounds.
    pub fn contains_rect(&self, center: IVec2, extent: i32) -> bool {
        self.contains(center - IVec2::splat(extent)) && self.contains(center + IVec2::splat(extent))
    }
}

/// Fatal misuse of the engine API. Everything recoverable (occupied cell,
/// out-of-bounds placement, stale key) is reported through return values
/// and logged instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    #[error("material {0} is not allowed on this body")]
    ForbiddenMaterial(Material),
    #[error("nominal radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("segment size must be a positive odd integer, got {0}")]
    InvalidSegmentSize(i32),
    #[error("serpent needs at least one segment")]
    EmptySerpent,
    #[error("heading must be a cardinal unit vector")]
    InvalidHeading,
    #[error("serpent spawn does not fit inside its bounds")]
    SpawnOutOfBounds,
    #[error("snapshot pixel at ({x}, {y}) lies outside the body bounds")]
    SnapshotOutOfBounds { x: i32, y: i32 },
    #[error("snapshot places two pixels at ({x}, {y}) on a body that forbids overlap")]
    SnapshotConflict { x: i32, y: i32 },
    #[error("snapshot segment references pixel slot {0} out of range")]
    SnapshotBadSlot(usize),
    #[error("snapshot segment {0} does not line up with the spec's segment sizes")]
    SnapshotSegmentMismatch(usize),
}

/// What a damage application did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Pixel absorbed the hit and survives.
    Absorbed,
    /// Pixel health reached zero and it was removed.
    Destroyed,
    /// Stale key, nothing behind it. No-op.
    Missing,
}

/// Report of everything notable that happened during one tick. Callers
/// poll this instead of registering listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvents {
    /// Tick counter after this update.
    pub tick: u64,
    /// The surface set was recomputed this tick.
    pub surface_recomputed: bool,
    /// Connected components as of the last surface pass.
    pub components: usize,
    /// The darkness field was recomputed this tick.
    pub darkness_refreshed: bool,
    /// Pixels destroyed by damage since the previous tick.
    pub pixels_destroyed: usize,
    /// The body just transitioned to zero pixels. Fires once.
    pub died: bool,
    /// Serpent segments that found no legal heading this tick.
    pub stuck_segments: usize,
}

/// Pixel arena plus the derived views that make spatial queries cheap.
#[derive(Debug)]
pub struct Body {
    pixels: SlotMap<PixelKey, Pixel>,
    /// Cell to pixel keys. Buckets are dropped when they empty, so a
    /// present key always means an occupied cell.
    index: FxHashMap<IVec2, SmallVec<[PixelKey; 1]>>,
    /// Surface pixels in flood-fill visit order. Order is stable between
    /// passes, which keeps distance tie-breaks deterministic.
    surface: Vec<PixelKey>,
    surface_dirty: bool,
    components: usize,
    initial_count: usize,
    nominal_radius: f32,
    bounds: GridBounds,
    dirt: Material,
    allowed: MaterialSet,
    allow_overlap: bool,
    tick: u64,
    destroyed_since_tick: usize,
    death_emitted: bool,
    darkness_clock: DarknessClock,
    frame: Frame,
    config: EngineConfig,
}

impl Body {
    /// Empty shell. Variants populate it and then run the first engine
    /// passes through [`Body::seal`].
    pub fn new(
        nominal_radius: f32,
        bounds: GridBounds,
        dirt: Material,
        allowed: MaterialSet,
        allow_overlap: bool,
        config: EngineConfig,
    ) -> Result<Self, BodyError> {
        if !(nominal_radius > 0.0) {
            return Err(BodyError::InvalidRadius(nominal_radius));
        }
        let darkness_clock = DarknessClock::new(config.darkness_interval);
        Ok(Self {
            pixels: SlotMap::with_key(),
            index: FxHashMap::default(),
            surface: Vec::new(),
            surface_dirty: false,
            components: 0,
            initial_count: 0,
            nominal_radius,
            bounds,
            dirt,
            allowed,
            allow_overlap,
            tick: 0,
            destroyed_since_tick: 0,
            death_emitted: false,
            darkness_clock,
            frame: Frame::empty(),
            config,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel count right after initial generation.
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Remaining pixels as a fraction of the initial count.
    pub fn health(&self) -> f32 {
        if self.initial_count == 0 {
            0.0
        } else {
            self.pixels.len() as f32 / self.initial_count as f32
        }
    }

    pub fn nominal_radius(&self) -> f32 {
        self.nominal_radius
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Material buried concealable pixels masquerade as.
    pub fn dirt_variant(&self) -> Material {
        self.dirt
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn pixel(&self, key: PixelKey) -> Option<&Pixel> {
        self.pixels.get(key)
    }

    pub(crate) fn pixel_mut(&mut self, key: PixelKey) -> Option<&mut Pixel> {
        self.pixels.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PixelKey, &Pixel)> {
        self.pixels.iter()
    }

    /// Current surface set, in flood-fill visit order.
    pub fn surface_keys(&self) -> &[PixelKey] {
        &self.surface
    }

    /// Connected components as of the last surface pass.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Frame assembled by the last [`Body::refresh`].
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// True when `cell` exposes surface: outside the bounds or holding no
    /// pixel.
    #[inline]
    pub fn is_open(&self, cell: IVec2) -> bool {
        !self.bounds.contains(cell) || !self.index.contains_key(&cell)
    }

    /// First pixel key at `cell`, if any. "First" is creation order within
    /// the cell, which only matters on overlap-permitting bodies.
    pub fn pixel_key_at(&self, cell: IVec2) -> Option<PixelKey> {
        self.index.get(&cell).and_then(|bucket| bucket.first().copied())
    }

    pub fn pixel_at(&self, cell: IVec2) -> Option<&Pixel> {
        self.pixel_key_at(cell).and_then(|key| self.pixels.get(key))
    }

    /// Every pixel key at `cell`. More than one only on overlap-permitting
    /// bodies.
    pub fn pixels_at(&self, cell: IVec2) -> &[PixelKey] {
        self.index
            .get(&cell)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Occupied pixels among the 8 neighbors of `cell`, optionally with
    /// the center cell itself first. Enumeration order is fixed.
    pub fn surrounding_pixels(
        &self,
        cell: IVec2,
        include_center: bool,
    ) -> SmallVec<[(IVec2, PixelKey); 9]> {
        let mut out = SmallVec::new();
        if include_center {
            for &key in self.pixels_at(cell) {
                out.push((cell, key));
            }
        }
        for offset in NEIGHBORS_8 {
            let neighbor = cell + offset;
            for &key in self.pixels_at(neighbor) {
                out.push((neighbor, key));
            }
        }
        out
    }

    /// Surface pixel nearest to a sub-cell position. Exact distance ties
    /// go to the earlier pixel in surface order.
    pub fn closest_surface_pixel(&self, pos: Vec2) -> Option<PixelKey> {
        let mut best: Option<(PixelKey, f32)> = None;
        for &key in &self.surface {
            let Some(px) = self.pixels.get(key) else {
                continue;
            };
            let dist = px.position().as_vec2().distance_squared(pos);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((key, dist));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Add a pixel of `material` at `cell`.
    ///
    /// A forbidden material is a fatal error. An occupied or out-of-bounds
    /// cell is an expected no-op: logged, `Ok(None)`.
    pub fn add_pixel(
        &mut self,
        cell: IVec2,
        material: Material,
    ) -> Result<Option<PixelKey>, BodyError> {
        if !self.allowed.contains(material) {
            return Err(BodyError::ForbiddenMaterial(material));
        }
        if !self.bounds.contains(cell) {
            log::debug!("add_pixel: {cell:?} is outside the body bounds, skipping");
            return Ok(None);
        }
        if !self.allow_overlap && self.index.contains_key(&cell) {
            log::debug!("add_pixel: {cell:?} already occupied, skipping");
            return Ok(None);
        }
        let key = self.pixels.insert(Pixel::new(cell, material));
        self.index.entry(cell).or_default().push(key);
        self.surface_dirty = true;
        self.debug_validate();
        Ok(Some(key))
    }

    /// Remove a pixel, updating the index and surface set. Returns false
    /// on a stale key; removal is idempotent. Pass
    /// `recompute_surface_now` when the caller needs fresh surface data
    /// before the next tick; batch removals should defer it.
    pub fn remove_pixel(&mut self, key: PixelKey, recompute_surface_now: bool) -> bool {
        let Some(px) = self.pixels.remove(key) else {
            return false;
        };
        let cell = px.position();
        match self.index.get_mut(&cell) {
            Some(bucket) => {
                bucket.retain(|k| *k != key);
                if bucket.is_empty() {
                    self.index.remove(&cell);
                }
            }
            None => log::warn!("remove_pixel: {cell:?} had no index bucket"),
        }
        self.surface.retain(|k| *k != key);
        self.surface_dirty = true;
        if recompute_surface_now {
            self.update_surface();
        }
        self.debug_validate();
        true
    }

    /// Remove a batch of pixels with a single surface recompute at the
    /// end. Returns how many were actually removed.
    pub fn remove_pixels(&mut self, keys: &[PixelKey]) -> usize {
        let mut removed = 0;
        for &key in keys {
            if self.remove_pixel(key, false) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.update_surface();
        }
        removed
    }

    /// Move a pixel to `cell`, keeping the index in step. Out-of-bounds
    /// targets and collisions on overlap-forbidding bodies are logged
    /// no-ops returning false.
    pub fn relocate_pixel(&mut self, key: PixelKey, cell: IVec2) -> bool {
        let Some(old) = self.pixels.get(key).map(|px| px.position()) else {
            return false;
        };
        if old == cell {
            return true;
        }
        if !self.bounds.contains(cell) {
            log::debug!("relocate_pixel: {cell:?} is outside the body bounds");
            return false;
        }
        if !self.allow_overlap && self.index.contains_key(&cell) {
            log::debug!("relocate_pixel: {cell:?} already occupied");
            return false;
        }
        match self.index.get_mut(&old) {
            Some(bucket) => {
                bucket.retain(|k| *k != key);
                if bucket.is_empty() {
                    self.index.remove(&old);
                }
            }
            None => log::warn!("relocate_pixel: {old:?} had no index bucket"),
        }
        self.index.entry(cell).or_default().push(key);
        if let Some(px) = self.pixels.get_mut(key) {
            px.set_position(cell);
        }
        self.surface_dirty = true;
        self.debug_validate();
        true
    }

    /// Apply dig damage to a pixel, removing it on destruction. Serpent
    /// flesh bruises toward blood as it takes hits. The surface recompute
    /// after a destruction is deferred to the next tick (or an explicit
    /// [`Body::update_surface`]).
    pub fn apply_damage(&mut self, key: PixelKey, amount: f32) -> DamageOutcome {
        let Some(px) = self.pixels.get_mut(key) else {
            return DamageOutcome::Missing;
        };
        if !px.apply_damage(amount) {
            if px.material() == Material::Serpent {
                let bruised = px.color.lerp(colors::BLOOD, 0.5);
                px.stain(bruised);
            }
            return DamageOutcome::Absorbed;
        }
        self.remove_pixel(key, false);
        self.destroyed_since_tick += 1;
        DamageOutcome::Destroyed
    }

    /// One dig hit. On destruction, also reports the material's dig value
    /// for the caller's economy.
    pub fn dig_pixel(&mut self, key: PixelKey) -> (DamageOutcome, u32) {
        let Some(material) = self.pixels.get(key).map(|px| px.material()) else {
            return (DamageOutcome::Missing, 0);
        };
        let outcome = self.apply_damage(key, 1.0);
        let value = match outcome {
            DamageOutcome::Destroyed => material.dig_value(),
            _ => 0,
        };
        (outcome, value)
    }

    /// Destroy a pixel and grow a fresh one of `material` in its place,
    /// at full health. The only way a cell changes material.
    pub fn convert_pixel(
        &mut self,
        key: PixelKey,
        material: Material,
    ) -> Result<Option<PixelKey>, BodyError> {
        if !self.allowed.contains(material) {
            return Err(BodyError::ForbiddenMaterial(material));
        }
        let Some(cell) = self.pixels.get(key).map(|px| px.position()) else {
            return Ok(None);
        };
        self.remove_pixel(key, false);
        self.add_pixel(cell, material)
    }

    /// Recompute the surface set and connected components from scratch.
    pub fn update_surface(&mut self) {
        surface::recompute(self);
    }

    /// Recompute darkness if the wall-clock throttle allows it.
    pub fn refresh_darkness(&mut self, now: Instant) -> bool {
        if self.pixels.is_empty() {
            return false;
        }
        if !self.darkness_clock.due(now) {
            return false;
        }
        darkness::recompute(self);
        true
    }

    /// Recompute darkness immediately, ignoring the throttle.
    pub fn refresh_darkness_forced(&mut self) {
        darkness::recompute(self);
    }

    /// Shared per-tick work: surface recompute if dirty, throttled
    /// darkness, frame assembly, event collection. Variants call this
    /// from their `update` after their own movement.
    pub fn refresh(&mut self, now: Instant) -> TickEvents {
        self.tick += 1;
        let mut events = TickEvents {
            tick: self.tick,
            ..TickEvents::default()
        };
        if self.surface_dirty {
            self.update_surface();
            events.surface_recomputed = true;
        }
        events.components = self.components;
        events.darkness_refreshed = self.refresh_darkness(now);
        frame::rebuild(self);
        events.pixels_destroyed = std::mem::take(&mut self.destroyed_since_tick);
        if self.pixels.is_empty() && self.initial_count > 0 && !self.death_emitted {
            self.death_emitted = true;
            events.died = true;
        }
        events
    }

    /// Freeze the initial census and run the first surface, darkness and
    /// frame passes. Called once by variant constructors.
    fn seal(&mut self, now: Instant) {
        self.initial_count = self.pixels.len();
        self.update_surface();
        darkness::recompute(self);
        self.darkness_clock.mark(now);
        frame::rebuild(self);
    }

    /// Plain-data form of this body.
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            nominal_radius: self.nominal_radius,
            bounds: self.bounds,
            dirt: self.dirt,
            allowed: self.allowed,
            allow_overlap: self.allow_overlap,
            initial_count: self.initial_count,
            tick: self.tick,
            components: self.components,
            pixels: self.pixels.values().cloned().collect(),
        }
    }

    /// Rebuild a body from a snapshot without re-running world
    /// generation. The position index and surface set are reconstructed
    /// from the stored pixels; keys are freshly assigned.
    pub fn from_snapshot(snap: BodySnapshot, config: EngineConfig) -> Result<Self, BodyError> {
        let mut body = Self::new(
            snap.nominal_radius,
            snap.bounds,
            snap.dirt,
            snap.allowed,
            snap.allow_overlap,
            config,
        )?;
        for px in snap.pixels {
            body.insert_restored(px)?;
        }
        body.initial_count = snap.initial_count;
        body.tick = snap.tick;
        body.components = snap.components;
        body.surface_dirty = false;
        frame::rebuild(&mut body);
        body.debug_validate();
        Ok(body)
    }

    fn insert_restored(&mut self, px: Pixel) -> Result<PixelKey, BodyError> {
        let cell = px.position();
        if !self.bounds.contains(cell) {
            return Err(BodyError::SnapshotOutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        if !self.allow_overlap && self.index.contains_key(&cell) {
            return Err(BodyError::SnapshotConflict {
                x: cell.x,
                y: cell.y,
            });
        }
        let on_surface = px.is_surface();
        let key = self.pixels.insert(px);
        self.index.entry(cell).or_default().push(key);
        if on_surface {
            self.surface.push(key);
        }
        Ok(key)
    }

    /// Cross-check the position index against pixel storage, logging any
    /// mismatch. Runs only with `debug_mode` and `validate_index` set.
    fn debug_validate(&self) {
        if !(self.config.debug.debug_mode && self.config.debug.validate_index) {
            return;
        }
        for (key, px) in self.pixels.iter() {
            let cell = px.position();
            let indexed = self
                .index
                .get(&cell)
                .is_some_and(|bucket| bucket.contains(&key));
            if !indexed {
                log::warn!("index validation: pixel {key:?} at {cell:?} missing from its bucket");
            }
        }
        let mut total = 0usize;
        for (cell, bucket) in &self.index {
            if bucket.is_empty() {
                log::warn!("index validation: empty bucket left at {cell:?}");
            }
            for &key in bucket {
                total += 1;
                match self.pixels.get(key) {
                    Some(px) if px.position() == *cell => {}
                    Some(px) => log::warn!(
                        "index validation: {key:?} indexed at {cell:?} but sits at {:?}",
                        px.position()
                    ),
                    None => log::warn!("index validation: stale key {key:?} indexed at {cell:?}"),
                }
            }
        }
        if total != self.pixels.len() {
            log::warn!(
                "index validation: {total} indexed keys for {} pixels",
                self.pixels.len()
            );
        }
    }
}

/// Capability surface every concrete pixel body provides. State lives in
/// the wrapped [`Body`]; variants contribute generation and palette hooks
/// plus their own movement inside `update`.
pub trait PixelBody {
    /// Initial cell layout, drawn from the body's seeded RNG.
    fn create_initial_pixels(&self, rng: &mut Pcg32) -> Vec<(IVec2, Material)>;

    /// Two-stop sky gradient behind the body, top then bottom.
    fn sky_colors(&self) -> [Rgba; 2];

    /// Material buried concealable pixels masquerade as.
    fn dirt_variant(&self) -> Material;

    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Advance one tick. `now` drives wall-clock throttles only; all
    /// simulation state advances per call.
    fn update(&mut self, now: Instant) -> TickEvents;
}
