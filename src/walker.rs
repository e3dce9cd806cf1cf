//! Boundary-walking movement.
//!
//! Digging agents crawl along a body's surface with one shared primitive:
//! gather the surface pixels around the current cell, take their free
//! edges as candidate cells, and step to the candidate nearest in the
//! walker's own rotated frame, breaking exact ties laterally. Distance
//! dominates, so the walker hugs the terrain down into pits and around
//! overhangs instead of cutting corners.

use glam::{IVec2, Vec2};
use smallvec::SmallVec;

use crate::body::Body;
use crate::config::EngineConfig;
use crate::consts;
use crate::grid::{self, CARDINALS, UP};

/// An agent that walks a body's surface one cell at a time.
///
/// The walker remembers the last few cells it arrived at and refuses to
/// revisit them, which stops it oscillating between two pit walls. The
/// memory clears when the travel direction flips, so reversing is always
/// allowed.
#[derive(Debug, Clone)]
pub struct SurfaceWalker {
    position: Vec2,
    orientation: IVec2,
    /// Recently arrived-at cells, newest first.
    history: Vec<IVec2>,
    history_limit: usize,
    travel_direction: i8,
}

impl SurfaceWalker {
    /// Place a walker at a body-local position, standing upright.
    pub fn new(position: Vec2) -> Self {
        Self::with_history_limit(position, consts::WALKER_HISTORY)
    }

    /// Place a walker carrying the configured revisit memory length.
    pub fn from_config(position: Vec2, config: &EngineConfig) -> Self {
        Self::with_history_limit(position, config.walker_history)
    }

    pub fn with_history_limit(position: Vec2, history_limit: usize) -> Self {
        Self {
            position,
            orientation: UP,
            history: Vec::new(),
            history_limit,
            travel_direction: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Grid cell the walker currently occupies.
    pub fn cell(&self) -> IVec2 {
        grid::snap(self.position)
    }

    /// Which way "up" is for this walker: the free-edge direction of the
    /// surface cell it last stepped onto.
    pub fn orientation(&self) -> IVec2 {
        self.orientation
    }

    /// One lateral step along the surface. `direction` is +1 or -1 in the
    /// walker's own frame: +1 moves toward its local right.
    ///
    /// Returns false without moving when there is no reachable surface or
    /// every candidate is blocked by the revisit memory.
    pub fn step(&mut self, body: &Body, direction: i8) -> bool {
        let direction = direction.signum();
        if direction == 0 {
            return false;
        }
        if direction != self.travel_direction {
            self.history.clear();
            self.travel_direction = direction;
        }
        let cell = self.cell();

        // Free edges of nearby surface pixels are the places a walker can
        // stand.
        let mut candidates: SmallVec<[(IVec2, IVec2); 16]> = SmallVec::new();
        for (pixel_cell, key) in body.surrounding_pixels(cell, false) {
            let Some(px) = body.pixel(key) else {
                continue;
            };
            if !px.is_surface() {
                continue;
            }
            for edge in CARDINALS {
                let open_cell = pixel_cell + edge;
                if !body.is_open(open_cell) {
                    continue;
                }
                if open_cell == cell || self.history.contains(&open_cell) {
                    continue;
                }
                candidates.push((open_cell, edge));
            }
        }
        if candidates.is_empty() {
            log::trace!("walker at {cell:?} has nowhere to step");
            return false;
        }

        // Rotate everything so the walker faces up, making the lateral
        // tie-break a plain x comparison regardless of which face of the
        // body it clings to.
        let turns = grid::quarter_turns_to_up(self.orientation);
        let origin = grid::rotate_cw_by_f(self.position, turns);
        let mut best: Option<(IVec2, IVec2, f32, f32)> = None;
        for (candidate, edge) in candidates {
            let rotated = grid::rotate_cw_by_f(candidate.as_vec2(), turns);
            let dist = rotated.distance_squared(origin);
            let take = match best {
                None => true,
                Some((_, _, best_dist, best_x)) => {
                    dist < best_dist
                        || (dist == best_dist
                            && if direction > 0 {
                                rotated.x > best_x
                            } else {
                                rotated.x < best_x
                            })
                }
            };
            if take {
                best = Some((candidate, edge, dist, rotated.x));
            }
        }
        let Some((next, edge, _, _)) = best else {
            return false;
        };

        self.position = next.as_vec2();
        self.orientation = edge;
        self.history.insert(0, next);
        self.history.truncate(self.history_limit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::GridBounds;
    use crate::config::EngineConfig;
    use crate::pixel::{Material, MaterialSet};

    fn strip_body(len: i32) -> Body {
        let mut body = Body::new(
            10.0,
            GridBounds::centered(len + 4, 2),
            Material::Dirt,
            MaterialSet::all().without(Material::Serpent),
            false,
            EngineConfig::default(),
        )
        .unwrap();
        for x in 0..=len {
            body.add_pixel(IVec2::new(x, 0), Material::Dirt).unwrap();
        }
        body.update_surface();
        body
    }

    fn column_body(len: i32) -> Body {
        let mut body = Body::new(
            10.0,
            GridBounds::centered(len + 4, 2),
            Material::Dirt,
            MaterialSet::all().without(Material::Serpent),
            false,
            EngineConfig::default(),
        )
        .unwrap();
        for y in 0..=len {
            body.add_pixel(IVec2::new(0, y), Material::Dirt).unwrap();
        }
        body.update_surface();
        body
    }

    #[test]
    fn twenty_steps_never_revisit_the_previous_cell() {
        let body = strip_body(20);
        let mut walker = SurfaceWalker::new(Vec2::new(3.0, -1.0));
        let mut previous = walker.cell();
        for step in 0..20 {
            assert!(walker.step(&body, 1), "stuck at step {step}");
            let here = walker.cell();
            assert_ne!(here, previous, "returned to {here:?} at step {step}");
            previous = here;
        }
    }

    #[test]
    fn tie_break_follows_the_requested_direction() {
        let body = strip_body(20);

        let mut right = SurfaceWalker::new(Vec2::new(3.0, -1.0));
        assert!(right.step(&body, 1));
        assert_eq!(right.cell(), IVec2::new(4, -1));

        let mut left = SurfaceWalker::new(Vec2::new(3.0, -1.0));
        assert!(left.step(&body, -1));
        assert_eq!(left.cell(), IVec2::new(2, -1));
    }

    #[test]
    fn walker_wraps_around_the_strip_end() {
        let body = strip_body(6);
        let mut walker = SurfaceWalker::new(Vec2::new(3.0, -1.0));

        let mut track = Vec::new();
        for _ in 0..5 {
            assert!(walker.step(&body, 1));
            track.push((walker.cell(), walker.orientation()));
        }
        assert_eq!(
            track,
            vec![
                (IVec2::new(4, -1), grid::UP),
                (IVec2::new(5, -1), grid::UP),
                (IVec2::new(6, -1), grid::UP),
                (IVec2::new(7, 0), grid::RIGHT),
                (IVec2::new(6, 1), grid::DOWN),
            ]
        );
    }

    #[test]
    fn reversing_clears_the_revisit_memory() {
        let body = strip_body(20);
        let mut walker = SurfaceWalker::new(Vec2::new(3.0, -1.0));
        for _ in 0..5 {
            assert!(walker.step(&body, 1));
        }
        let turnaround = walker.cell();
        assert!(walker.step(&body, -1));
        assert!(walker.cell().x < turnaround.x);
    }

    #[test]
    fn the_configured_history_length_caps_the_revisit_memory() {
        let body = strip_body(20);
        let config = EngineConfig {
            walker_history: 2,
            ..EngineConfig::default()
        };
        let mut walker = SurfaceWalker::from_config(Vec2::new(3.0, -1.0), &config);
        assert_eq!(walker.history_limit, 2);
        for _ in 0..8 {
            assert!(walker.step(&body, 1));
            assert!(walker.history.len() <= 2);
        }
    }

    #[test]
    fn lateral_sense_rotates_with_the_orientation() {
        // Clinging to the left face of a column, facing left: +1 is the
        // walker's local right, which is world up.
        let body = column_body(10);
        let mut walker = SurfaceWalker::with_history_limit(Vec2::new(-1.0, 5.0), 4);
        walker.orientation = grid::LEFT;
        assert!(walker.step(&body, 1));
        assert_eq!(walker.cell(), IVec2::new(-1, 4));

        let mut walker = SurfaceWalker::with_history_limit(Vec2::new(-1.0, 5.0), 4);
        walker.orientation = grid::LEFT;
        assert!(walker.step(&body, -1));
        assert_eq!(walker.cell(), IVec2::new(-1, 6));
    }

    #[test]
    fn no_surface_within_reach_means_no_move() {
        let body = strip_body(5);
        let mut walker = SurfaceWalker::new(Vec2::new(10.0, 10.0));
        assert!(!walker.step(&body, 1));
        assert_eq!(walker.cell(), IVec2::new(10, 10));
    }

    #[test]
    fn zero_direction_is_a_no_op() {
        let body = strip_body(5);
        let mut walker = SurfaceWalker::new(Vec2::new(2.0, -1.0));
        assert!(!walker.step(&body, 0));
        assert_eq!(walker.cell(), IVec2::new(2, -1));
    }

    #[test]
    fn an_embedded_walker_pops_to_a_free_edge() {
        // Walker buried at the center of a solid 3x3 block. The ring
        // around it is all surface, so the nearest free edges sit two
        // cells out; the +1 tie-break picks the rightmost of them.
        let mut body = Body::new(
            6.0,
            GridBounds::centered(6, 2),
            Material::Dirt,
            MaterialSet::all().without(Material::Serpent),
            false,
            EngineConfig::default(),
        )
        .unwrap();
        for y in 0..3 {
            for x in 0..3 {
                body.add_pixel(IVec2::new(x, y), Material::Dirt).unwrap();
            }
        }
        body.update_surface();

        let mut walker = SurfaceWalker::new(Vec2::new(1.0, 1.0));
        assert!(walker.step(&body, 1));
        assert_eq!(walker.cell(), IVec2::new(3, 1));
        assert!(body.is_open(walker.cell()));
    }
}
