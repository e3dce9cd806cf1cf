//! Segmented serpent bodies.
//!
//! A serpent is a chain of odd-sized square segments. The head roams an
//! allowed rectangle under a straight/turning state machine; every
//! follower replays the pose history of the segment ahead of it at a lag
//! derived from the two sizes, so the chain flows through corners cell by
//! cell instead of hinging around them.

use std::collections::VecDeque;
use std::time::Instant;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyError, GridBounds, PixelBody, PixelKey, TickEvents};
use crate::config::EngineConfig;
use crate::consts;
use crate::grid;
use crate::palette::{Rgba, colors};
use crate::pixel::{Material, MaterialSet};
use crate::snapshot::{SegmentSnapshot, SerpentSnapshot};

/// Movement state of the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadState {
    /// Advancing along the current heading.
    Straight,
    /// Rotated onto a new heading this tick.
    Turning,
}

/// Spawn description for a serpent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpentSpec {
    /// Segment sizes head first. All odd and positive.
    pub segment_sizes: Vec<i32>,
    /// Center cell where the head spawns. The chain trails out opposite
    /// the heading.
    pub spawn: IVec2,
    /// Initial heading, a cardinal unit vector.
    pub heading: IVec2,
    /// Rectangle the serpent roams. Every segment square stays inside.
    pub bounds: GridBounds,
    /// Turn probability gained per cell of straight travel.
    pub turn_bias: f32,
}

impl SerpentSpec {
    /// Three-segment serpent with a five-cell head.
    pub fn standard(spawn: IVec2, bounds: GridBounds) -> Self {
        Self {
            segment_sizes: vec![5, 3, 3],
            spawn,
            heading: grid::RIGHT,
            bounds,
            turn_bias: consts::SERPENT_TURN_BIAS,
        }
    }
}

/// One link of the chain.
#[derive(Debug)]
pub struct Segment {
    size: i32,
    /// Pixel keys, parallel to `offsets`.
    keys: Vec<PixelKey>,
    /// Cell offsets from the center. Rotated in place when the segment
    /// turns, so directional pixel patterns ride along.
    offsets: Vec<IVec2>,
    position: IVec2,
    direction: IVec2,
    /// Recent poses, newest first. Bounded at twice the segment size.
    history: VecDeque<(IVec2, IVec2)>,
}

impl Segment {
    fn new(size: i32, position: IVec2, direction: IVec2) -> Self {
        Self {
            size,
            keys: Vec::new(),
            offsets: Vec::new(),
            position,
            direction,
            history: VecDeque::new(),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Center cell of the segment square.
    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn direction(&self) -> IVec2 {
        self.direction
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Cells from center to edge.
    fn extent(&self) -> i32 {
        (self.size - 1) / 2
    }

    /// Half the size rounded up; this segment's contribution to the
    /// replay lag between it and a neighbor.
    fn half(&self) -> i32 {
        (self.size + 1) / 2
    }

    fn capacity(&self) -> usize {
        self.size as usize * 2
    }

    fn record(&mut self) {
        self.history.push_front((self.position, self.direction));
        self.history.truncate(self.capacity());
    }

    /// Backfill history as if the segment had always been travelling its
    /// current heading, so followers can replay from the first tick
    /// instead of waiting for real entries to accumulate.
    fn prefill_history(&mut self) {
        self.history.clear();
        for age in 0..self.capacity() as i32 {
            self.history
                .push_back((self.position - self.direction * age, self.direction));
        }
    }

    fn rotate_offsets(&mut self, turns: u32) {
        for offset in &mut self.offsets {
            *offset = grid::rotate_cw_by(*offset, turns);
        }
    }
}

/// A serpent body.
#[derive(Debug)]
pub struct Serpent {
    spec: SerpentSpec,
    body: Body,
    /// Chain links, head first.
    segments: Vec<Segment>,
    state: HeadState,
    /// Cells travelled since the head last turned. Drives turn pressure.
    cells_since_turn: u32,
    rng: Pcg32,
}

impl Serpent {
    pub fn new(spec: SerpentSpec, config: EngineConfig, now: Instant) -> Result<Self, BodyError> {
        validate_spec(&spec)?;
        let largest = spec.segment_sizes.iter().copied().max().unwrap_or(1);
        let body = Body::new(
            largest as f32,
            spec.bounds,
            Material::Serpent,
            MaterialSet::only(Material::Serpent),
            true,
            config,
        )?;
        let rng = Pcg32::seed_from_u64(body.config().rng_seed);

        let mut segments = Vec::with_capacity(spec.segment_sizes.len());
        let mut center = spec.spawn;
        for (i, &size) in spec.segment_sizes.iter().enumerate() {
            if i > 0 {
                let fore_half = (spec.segment_sizes[i - 1] + 1) / 2;
                let self_half = (size + 1) / 2;
                center -= spec.heading * (fore_half + self_half - 1);
            }
            let mut segment = Segment::new(size, center, spec.heading);
            if !spec.bounds.contains_rect(center, segment.extent()) {
                return Err(BodyError::SpawnOutOfBounds);
            }
            segment.prefill_history();
            segments.push(segment);
        }

        let mut serpent = Self {
            spec,
            body,
            segments,
            state: HeadState::Straight,
            cells_since_turn: 0,
            rng,
        };
        serpent.grow_pixels()?;
        serpent.body.seal(now);
        Ok(serpent)
    }

    pub fn spec(&self) -> &SerpentSpec {
        &self.spec
    }

    /// Chain links, head first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn head_state(&self) -> HeadState {
        self.state
    }

    /// Create every segment's pixels and wire keys to offsets. The head
    /// gets two eye cells at its leading corners so turns read on screen.
    fn grow_pixels(&mut self) -> Result<(), BodyError> {
        for idx in 0..self.segments.len() {
            let (center, extent, direction) = {
                let seg = &self.segments[idx];
                (seg.position, seg.extent(), seg.direction)
            };
            let mut keys = Vec::new();
            let mut offsets = Vec::new();
            for y in -extent..=extent {
                for x in -extent..=extent {
                    let offset = IVec2::new(x, y);
                    let Some(key) = self.body.add_pixel(center + offset, Material::Serpent)? else {
                        return Err(BodyError::SpawnOutOfBounds);
                    };
                    keys.push(key);
                    offsets.push(offset);
                }
            }
            if idx == 0 && extent >= 1 {
                let perp = grid::rotate_cw(direction);
                for eye in [direction * extent + perp, direction * extent - perp] {
                    if let Some(slot) = offsets.iter().position(|o| *o == eye)
                        && let Some(px) = self.body.pixel_mut(keys[slot])
                    {
                        px.stain(colors::SERPENT_EYE);
                    }
                }
            }
            let seg = &mut self.segments[idx];
            seg.keys = keys;
            seg.offsets = offsets;
        }
        Ok(())
    }

    /// Move the whole chain one tick. Returns how many segments could not
    /// move (only ever the head; followers always have a pose to replay).
    fn advance(&mut self) -> usize {
        let mut stuck = 0;
        let bounds = self.spec.bounds;

        let (pos, dir, extent) = {
            let head = &self.segments[0];
            (head.position, head.direction, head.extent())
        };
        let forward_blocked = !bounds.contains_rect(pos + dir, extent);
        let turn_pressure = self.cells_since_turn as f32 * self.spec.turn_bias;
        let wants_turn = forward_blocked || self.rng.random::<f32>() < turn_pressure;

        let mut new_dir = dir;
        let mut advanced = !wants_turn;
        if wants_turn {
            // Pick a side at random, then fall back through the reverse
            // side, the way back, and finally straight on.
            let side = if self.rng.random_bool(0.5) {
                grid::rotate_cw(dir)
            } else {
                grid::rotate_ccw(dir)
            };
            let candidates = [side, -side, -dir, dir];
            match candidates
                .iter()
                .copied()
                .find(|d| bounds.contains_rect(pos + *d, extent))
            {
                Some(d) => {
                    new_dir = d;
                    advanced = true;
                }
                None => {
                    log::error!("serpent head boxed in at {pos:?}, holding position");
                    stuck += 1;
                }
            }
        }

        let turned = advanced && new_dir != dir;
        self.state = if turned {
            HeadState::Turning
        } else {
            HeadState::Straight
        };
        if advanced {
            self.cells_since_turn = if turned { 0 } else { self.cells_since_turn + 1 };
            let head = &mut self.segments[0];
            if turned {
                head.rotate_offsets(grid::quarter_turns_between(dir, new_dir));
                head.direction = new_dir;
            }
            head.position = pos + new_dir;
            sync_pixels(&mut self.body, &mut self.segments[0]);
        }
        self.segments[0].record();

        for i in 1..self.segments.len() {
            let (fore_part, rest) = self.segments.split_at_mut(i);
            let fore = &fore_part[i - 1];
            let seg = &mut rest[0];
            let lag = (fore.half() + seg.half() - 1) as usize;
            let (target_pos, target_dir) = match fore.history.get(lag) {
                Some(&pose) => pose,
                None => match fore.history.back() {
                    Some(&oldest) => {
                        log::warn!(
                            "segment {i} needs history depth {lag}, fore has {}; clamping",
                            fore.history.len()
                        );
                        oldest
                    }
                    None => (seg.position, seg.direction),
                },
            };
            if target_dir != seg.direction {
                seg.rotate_offsets(grid::quarter_turns_between(seg.direction, target_dir));
                seg.direction = target_dir;
            }
            seg.position = target_pos;
            sync_pixels(&mut self.body, seg);
            seg.record();
        }

        stuck
    }

    /// Plain-data form of the whole chain. Segment membership is stored
    /// as positions into the body snapshot's pixel list, since keys do
    /// not survive a rebuild.
    pub fn snapshot(&self) -> SerpentSnapshot {
        let key_slots: FxHashMap<PixelKey, usize> = self
            .body
            .iter()
            .enumerate()
            .map(|(slot, (key, _))| (key, slot))
            .collect();
        let segments = self
            .segments
            .iter()
            .map(|seg| {
                let mut pixel_slots = Vec::with_capacity(seg.keys.len());
                let mut offsets = Vec::with_capacity(seg.offsets.len());
                for (key, offset) in seg.keys.iter().zip(&seg.offsets) {
                    if let Some(&slot) = key_slots.get(key) {
                        pixel_slots.push(slot);
                        offsets.push(*offset);
                    }
                }
                SegmentSnapshot {
                    size: seg.size,
                    position: seg.position,
                    direction: seg.direction,
                    offsets,
                    pixel_slots,
                    history: seg.history.iter().copied().collect(),
                }
            })
            .collect();
        SerpentSnapshot {
            spec: self.spec.clone(),
            body: self.body.snapshot(),
            segments,
            state: self.state,
            cells_since_turn: self.cells_since_turn,
        }
    }

    /// Rebuild a serpent from a snapshot. Pixel keys are freshly
    /// assigned; the RNG restarts from the configured seed. A segment
    /// chain that does not line up with its spec is rejected.
    pub fn from_snapshot(snap: SerpentSnapshot, config: EngineConfig) -> Result<Self, BodyError> {
        validate_spec(&snap.spec)?;
        if snap.segments.is_empty() {
            return Err(BodyError::EmptySerpent);
        }
        // The restored chain must match the spec's sizes entry by entry.
        for (i, &size) in snap.spec.segment_sizes.iter().enumerate() {
            if snap.segments.get(i).map(|seg| seg.size) != Some(size) {
                return Err(BodyError::SnapshotSegmentMismatch(i));
            }
        }
        if snap.segments.len() > snap.spec.segment_sizes.len() {
            return Err(BodyError::SnapshotSegmentMismatch(
                snap.spec.segment_sizes.len(),
            ));
        }
        let body = Body::from_snapshot(snap.body, config)?;
        let keys_by_slot: Vec<PixelKey> = body.iter().map(|(key, _)| key).collect();
        let rng = Pcg32::seed_from_u64(body.config().rng_seed);

        let mut segments = Vec::with_capacity(snap.segments.len());
        for seg in snap.segments {
            let mut keys = Vec::with_capacity(seg.pixel_slots.len());
            for slot in seg.pixel_slots {
                let key = keys_by_slot
                    .get(slot)
                    .copied()
                    .ok_or(BodyError::SnapshotBadSlot(slot))?;
                keys.push(key);
            }
            segments.push(Segment {
                size: seg.size,
                keys,
                offsets: seg.offsets,
                position: seg.position,
                direction: seg.direction,
                history: seg.history.into_iter().collect(),
            });
        }

        Ok(Self {
            spec: snap.spec,
            body,
            segments,
            state: snap.state,
            cells_since_turn: snap.cells_since_turn,
            rng,
        })
    }
}

fn validate_spec(spec: &SerpentSpec) -> Result<(), BodyError> {
    if spec.segment_sizes.is_empty() {
        return Err(BodyError::EmptySerpent);
    }
    for &size in &spec.segment_sizes {
        if size <= 0 || size % 2 == 0 {
            return Err(BodyError::InvalidSegmentSize(size));
        }
    }
    let cardinal = matches!(
        (spec.heading.x, spec.heading.y),
        (0, -1) | (0, 1) | (1, 0) | (-1, 0)
    );
    if !cardinal {
        return Err(BodyError::InvalidHeading);
    }
    Ok(())
}

/// Drop keys whose pixels were dug away, then move the survivors to
/// match the segment pose.
fn sync_pixels(body: &mut Body, seg: &mut Segment) {
    let mut slot = 0;
    while slot < seg.keys.len() {
        if body.pixel(seg.keys[slot]).is_none() {
            seg.keys.swap_remove(slot);
            seg.offsets.swap_remove(slot);
        } else {
            slot += 1;
        }
    }
    for (key, offset) in seg.keys.iter().zip(&seg.offsets) {
        if !body.relocate_pixel(*key, seg.position + *offset) {
            log::warn!("serpent pixel {key:?} failed to relocate");
        }
    }
}

impl PixelBody for Serpent {
    /// Segment squares head first, every cell serpent flesh. Eye tinting
    /// happens after creation and does not affect the layout.
    fn create_initial_pixels(&self, _rng: &mut Pcg32) -> Vec<(IVec2, Material)> {
        let mut cells = Vec::new();
        for seg in &self.segments {
            let extent = seg.extent();
            for y in -extent..=extent {
                for x in -extent..=extent {
                    cells.push((seg.position + IVec2::new(x, y), Material::Serpent));
                }
            }
        }
        cells
    }

    fn sky_colors(&self) -> [Rgba; 2] {
        [colors::SKY_BURROW_TOP, colors::SKY_BURROW_BOTTOM]
    }

    fn dirt_variant(&self) -> Material {
        Material::Serpent
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, now: Instant) -> TickEvents {
        let stuck = self.advance();
        let mut events = self.body.refresh(now);
        events.stuck_segments = stuck;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor(spec: SerpentSpec, seed: u64) -> Serpent {
        Serpent::new(spec, EngineConfig::seeded(seed), Instant::now()).unwrap()
    }

    fn straight_spec(sizes: &[i32]) -> SerpentSpec {
        SerpentSpec {
            segment_sizes: sizes.to_vec(),
            spawn: IVec2::ZERO,
            heading: grid::RIGHT,
            bounds: GridBounds::new(IVec2::new(-40, -5), IVec2::new(40, 5)),
            turn_bias: 0.0,
        }
    }

    #[test]
    fn followers_replay_the_head_at_the_size_derived_lag() {
        let mut serpent = corridor(straight_spec(&[5, 3]), 1);
        let mut head_track = Vec::new();
        for _ in 0..10 {
            serpent.update(Instant::now());
            head_track.push(serpent.head().position());
        }
        // Lag between a 5 head and a 3 follower is ceil(5/2) + ceil(3/2)
        // - 1 = 4 ticks.
        assert_eq!(serpent.head().position(), IVec2::new(10, 0));
        assert_eq!(serpent.segments()[1].position(), head_track[5]);
        assert_eq!(serpent.segments()[1].position(), IVec2::new(6, 0));
        assert_eq!(serpent.segments()[1].direction(), grid::RIGHT);
    }

    #[test]
    fn chain_spacing_holds_while_travelling_straight() {
        let mut serpent = corridor(straight_spec(&[5, 3, 3]), 2);
        for _ in 0..12 {
            serpent.update(Instant::now());
        }
        let positions: Vec<IVec2> = serpent.segments().iter().map(|s| s.position()).collect();
        assert_eq!(positions[0] - positions[1], IVec2::new(4, 0));
        assert_eq!(positions[1] - positions[2], IVec2::new(3, 0));
    }

    #[test]
    fn head_turns_when_the_wall_arrives() {
        let mut spec = straight_spec(&[5]);
        spec.bounds = GridBounds::new(IVec2::new(-20, -20), IVec2::new(4, 20));
        let mut serpent = corridor(spec, 3);

        serpent.update(Instant::now());
        serpent.update(Instant::now());
        assert_eq!(serpent.head().position(), IVec2::new(2, 0));
        assert_eq!(serpent.head_state(), HeadState::Straight);

        // Forward would put the square edge past x = 4.
        let events = serpent.update(Instant::now());
        assert_eq!(events.stuck_segments, 0);
        assert_eq!(serpent.head_state(), HeadState::Turning);
        let head = serpent.head();
        assert_eq!(head.position().x, 2);
        assert_eq!(head.position().y.abs(), 1);
        assert_eq!(head.direction().x, 0);
        assert_eq!(head.direction().y.abs(), 1);

        serpent.update(Instant::now());
        assert_eq!(serpent.head_state(), HeadState::Straight);
    }

    #[test]
    fn boxed_in_head_reports_stuck_and_stays_put() {
        let mut spec = straight_spec(&[5]);
        spec.bounds = GridBounds::new(IVec2::new(-2, -2), IVec2::new(2, 2));
        let mut serpent = corridor(spec, 4);
        let before = serpent.head().position();
        let events = serpent.update(Instant::now());
        assert_eq!(events.stuck_segments, 1);
        assert_eq!(serpent.head().position(), before);
        assert_eq!(serpent.head_state(), HeadState::Straight);
    }

    #[test]
    fn turning_rotates_the_eye_pattern() {
        let mut spec = straight_spec(&[3]);
        spec.bounds = GridBounds::new(IVec2::new(-20, -20), IVec2::new(3, 20));
        let mut serpent = corridor(spec, 5);
        for _ in 0..4 {
            serpent.update(Instant::now());
        }
        let head = serpent.head();
        assert_ne!(head.direction(), grid::RIGHT);

        let forward = head.position() + head.direction();
        let perp = grid::rotate_cw(head.direction());
        let mut eyes: Vec<IVec2> = serpent
            .body()
            .iter()
            .filter(|(_, px)| px.color == colors::SERPENT_EYE)
            .map(|(_, px)| px.position())
            .collect();
        eyes.sort_by_key(|p| (p.x, p.y));
        let mut expected = vec![forward + perp, forward - perp];
        expected.sort_by_key(|p| (p.x, p.y));
        assert_eq!(eyes, expected);
    }

    #[test]
    fn undersized_fore_history_clamps_to_the_oldest_pose() {
        // A 9 follower behind a 3 fore needs depth 6 but the fore only
        // keeps 6 entries (indices 0..=5), so the follower rides one cell
        // closer than the ideal lag.
        let mut spec = straight_spec(&[3, 9]);
        spec.bounds = GridBounds::new(IVec2::new(-60, -6), IVec2::new(60, 6));
        let mut serpent = corridor(spec, 6);
        for _ in 0..10 {
            serpent.update(Instant::now());
        }
        let head = serpent.head().position();
        let follower = serpent.segments()[1].position();
        assert_eq!(head - follower, IVec2::new(5, 0));
    }

    #[test]
    fn spec_validation_catches_bad_chains() {
        let bounds = GridBounds::centered(20, 0);
        let base = SerpentSpec::standard(IVec2::ZERO, bounds);

        let mut even = base.clone();
        even.segment_sizes = vec![5, 4];
        assert_eq!(
            Serpent::new(even, EngineConfig::default(), Instant::now()).unwrap_err(),
            BodyError::InvalidSegmentSize(4)
        );

        let mut empty = base.clone();
        empty.segment_sizes = Vec::new();
        assert_eq!(
            Serpent::new(empty, EngineConfig::default(), Instant::now()).unwrap_err(),
            BodyError::EmptySerpent
        );

        let mut diagonal = base.clone();
        diagonal.heading = IVec2::new(1, 1);
        assert_eq!(
            Serpent::new(diagonal, EngineConfig::default(), Instant::now()).unwrap_err(),
            BodyError::InvalidHeading
        );

        let mut cramped = base;
        cramped.bounds = GridBounds::new(IVec2::new(-3, -3), IVec2::new(3, 3));
        assert_eq!(
            Serpent::new(cramped, EngineConfig::default(), Instant::now()).unwrap_err(),
            BodyError::SpawnOutOfBounds
        );
    }

    #[test]
    fn serpent_flesh_is_the_only_material() {
        let mut serpent = corridor(straight_spec(&[3]), 7);
        let err = serpent
            .body_mut()
            .add_pixel(IVec2::new(10, 0), Material::Dirt)
            .unwrap_err();
        assert_eq!(err, BodyError::ForbiddenMaterial(Material::Dirt));
    }

    #[test]
    fn overlapping_serpent_cells_are_legal() {
        let mut serpent = corridor(straight_spec(&[3]), 8);
        let cell = IVec2::new(10, 0);
        let first = serpent.body_mut().add_pixel(cell, Material::Serpent).unwrap();
        let second = serpent.body_mut().add_pixel(cell, Material::Serpent).unwrap();
        assert!(first.is_some());
        assert!(second.is_some());
        assert_eq!(serpent.body().pixels_at(cell).len(), 2);
    }

    #[test]
    fn dug_out_pixels_leave_the_chain() {
        let mut serpent = corridor(straight_spec(&[3]), 9);
        let target = serpent.head().position();
        let key = serpent.body().pixel_key_at(target).unwrap();
        for _ in 0..8 {
            serpent.body_mut().apply_damage(key, 1.0);
        }
        assert!(serpent.body().pixel(key).is_none());
        serpent.update(Instant::now());
        assert_eq!(serpent.body().len(), 8);
        // The survivors all moved with the segment.
        let head = serpent.head();
        for (_, px) in serpent.body().iter() {
            let local = px.position() - head.position();
            assert!(local.x.abs() <= 1 && local.y.abs() <= 1);
        }
    }

    #[test]
    fn snapshot_round_trips_the_chain() {
        let mut spec = straight_spec(&[5, 3]);
        spec.bounds = GridBounds::new(IVec2::new(-20, -20), IVec2::new(6, 20));
        let mut serpent = corridor(spec, 10);
        for _ in 0..7 {
            serpent.update(Instant::now());
        }

        let snap = serpent.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let parsed: SerpentSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Serpent::from_snapshot(parsed, EngineConfig::seeded(10)).unwrap();

        assert_eq!(restored.segments().len(), serpent.segments().len());
        for (a, b) in serpent.segments().iter().zip(restored.segments()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.direction(), b.direction());
            assert_eq!(a.size(), b.size());
            assert_eq!(a.history_len(), b.history_len());
        }
        assert_eq!(restored.body().len(), serpent.body().len());
        assert_eq!(restored.head_state(), serpent.head_state());
        for (_, px) in serpent.body().iter() {
            let twin = restored.body().pixels_at(px.position());
            assert!(!twin.is_empty(), "missing pixel at {:?}", px.position());
        }

        // A restored serpent keeps moving without complaint.
        let mut restored = restored;
        let events = restored.update(Instant::now());
        assert_eq!(events.stuck_segments, 0);
    }

    #[test]
    fn restore_rejects_a_chain_that_disagrees_with_its_spec() {
        let serpent = corridor(straight_spec(&[5, 3]), 11);

        let mut emptied = serpent.snapshot();
        emptied.segments.clear();
        assert_eq!(
            Serpent::from_snapshot(emptied, EngineConfig::seeded(11)).unwrap_err(),
            BodyError::EmptySerpent
        );

        let mut truncated = serpent.snapshot();
        truncated.segments.pop();
        assert_eq!(
            Serpent::from_snapshot(truncated, EngineConfig::seeded(11)).unwrap_err(),
            BodyError::SnapshotSegmentMismatch(1)
        );

        let mut resized = serpent.snapshot();
        resized.segments[1].size = 5;
        assert_eq!(
            Serpent::from_snapshot(resized, EngineConfig::seeded(11)).unwrap_err(),
            BodyError::SnapshotSegmentMismatch(1)
        );
    }
}
