//! Plain-data snapshots.
//!
//! Bodies serialize to a flat pixel list plus the few scalars needed to
//! rebuild the position index and surface set without re-running world
//! generation. Pixel keys are not stable across a round trip, so serpent
//! snapshots reference pixels by their position in the list instead.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::body::GridBounds;
use crate::body::serpent::{HeadState, SerpentSpec};
use crate::pixel::{Material, MaterialSet, Pixel};

/// Serialized form of a [`Body`](crate::body::Body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub nominal_radius: f32,
    pub bounds: GridBounds,
    pub dirt: Material,
    pub allowed: MaterialSet,
    pub allow_overlap: bool,
    pub initial_count: usize,
    pub tick: u64,
    pub components: usize,
    /// Every pixel with its full color, health and darkness state, in
    /// arena order.
    pub pixels: Vec<Pixel>,
}

/// Serialized form of one serpent segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub size: i32,
    pub position: IVec2,
    pub direction: IVec2,
    /// Rotation state of the segment's pixel layout, parallel to
    /// `pixel_slots`.
    pub offsets: Vec<IVec2>,
    /// Indices into the body snapshot's pixel list.
    pub pixel_slots: Vec<usize>,
    /// Pose history, newest first.
    pub history: Vec<(IVec2, IVec2)>,
}

/// Serialized form of a [`Serpent`](crate::body::serpent::Serpent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpentSnapshot {
    pub spec: SerpentSpec,
    pub body: BodySnapshot,
    pub segments: Vec<SegmentSnapshot>,
    pub state: HeadState,
    pub cells_since_turn: u32,
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::body::planet::{Planet, PlanetSpec};
    use crate::body::{Body, BodyError, PixelBody};
    use crate::config::EngineConfig;

    #[test]
    fn planet_body_round_trips_through_json() {
        let mut planet = Planet::new(
            PlanetSpec::terra(10),
            EngineConfig::seeded(21),
            Instant::now(),
        )
        .unwrap();
        // Rough the body up so the snapshot carries non-initial state.
        let key = planet.body().pixel_key_at(IVec2::new(10, 0)).unwrap();
        planet.body_mut().remove_pixel(key, true);
        let dent = planet.body().pixel_key_at(IVec2::new(9, 0)).unwrap();
        planet.body_mut().apply_damage(dent, 0.5);
        planet.body_mut().refresh_darkness_forced();
        planet.update(Instant::now());

        let snap = planet.body().snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let parsed: BodySnapshot = serde_json::from_str(&json).unwrap();
        let restored = Body::from_snapshot(parsed, EngineConfig::seeded(21)).unwrap();

        let original = planet.body();
        assert_eq!(restored.len(), original.len());
        assert_eq!(restored.initial_count(), original.initial_count());
        assert_eq!(restored.tick(), original.tick());
        assert_eq!(restored.components(), original.components());
        assert_eq!(restored.surface_keys().len(), original.surface_keys().len());
        assert_eq!(restored.bounds(), original.bounds());
        assert_eq!(restored.dirt_variant(), original.dirt_variant());

        for (_, px) in original.iter() {
            let twin = restored
                .pixel_at(px.position())
                .unwrap_or_else(|| panic!("missing pixel at {:?}", px.position()));
            assert_eq!(twin.material(), px.material());
            assert_eq!(twin.health(), px.health());
            assert_eq!(twin.darkness(), px.darkness());
            assert_eq!(twin.is_surface(), px.is_surface());
            assert_eq!(twin.color, px.color);
        }

        // The restored body renders the same frame.
        assert_eq!(restored.frame().origin(), original.frame().origin());
        assert_eq!(restored.frame().bytes(), original.frame().bytes());
    }

    #[test]
    fn restored_body_keeps_simulating() {
        let planet = Planet::new(
            PlanetSpec::terra(8),
            EngineConfig::seeded(3),
            Instant::now(),
        )
        .unwrap();
        let snap = planet.body().snapshot();
        let mut restored = Body::from_snapshot(snap, EngineConfig::seeded(3)).unwrap();
        let key = restored.pixel_key_at(IVec2::new(8, 0)).unwrap();
        restored.remove_pixel(key, true);
        let events = restored.refresh(Instant::now());
        assert_eq!(events.tick, planet.body().tick() + 1);
        assert_eq!(restored.len(), planet.body().len() - 1);
    }

    #[test]
    fn out_of_bounds_snapshot_pixel_is_fatal() {
        let planet = Planet::new(
            PlanetSpec::terra(6),
            EngineConfig::default(),
            Instant::now(),
        )
        .unwrap();
        let mut snap = planet.body().snapshot();
        snap.pixels.push(Pixel::new(IVec2::new(500, 0), Material::Dirt));
        let err = Body::from_snapshot(snap, EngineConfig::default()).unwrap_err();
        assert_eq!(err, BodyError::SnapshotOutOfBounds { x: 500, y: 0 });
    }

    #[test]
    fn duplicate_cell_snapshot_is_fatal_without_overlap() {
        let planet = Planet::new(
            PlanetSpec::terra(6),
            EngineConfig::default(),
            Instant::now(),
        )
        .unwrap();
        let mut snap = planet.body().snapshot();
        snap.pixels.push(Pixel::new(IVec2::new(0, 0), Material::Dirt));
        let err = Body::from_snapshot(snap, EngineConfig::default()).unwrap_err();
        assert_eq!(err, BodyError::SnapshotConflict { x: 0, y: 0 });
    }
}
