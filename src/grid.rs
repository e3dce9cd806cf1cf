//! Grid math shared by bodies and agents.
//!
//! Cells are `IVec2` coordinates; sub-cell positions are `Vec2` and must be
//! snapped before touching any index. Quarter-turn helpers serve the
//! walker's facing-up normalization and serpent pixel rotation.

use glam::{IVec2, Vec2};

/// Up in body-local space (screen convention: y grows downward).
pub const UP: IVec2 = IVec2::new(0, -1);
/// Right in body-local space.
pub const RIGHT: IVec2 = IVec2::new(1, 0);
/// Down in body-local space.
pub const DOWN: IVec2 = IVec2::new(0, 1);
/// Left in body-local space.
pub const LEFT: IVec2 = IVec2::new(-1, 0);

/// 4-connected neighbor offsets, enumerated up, right, down, left.
pub const CARDINALS: [IVec2; 4] = [UP, RIGHT, DOWN, LEFT];

/// 8-connected neighbor offsets, row-major around the center.
pub const NEIGHBORS_8: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// Round a sub-cell position to its grid cell.
///
/// Two positions address the same cell iff their snapped coordinates match.
#[inline]
pub fn snap(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

/// Rotate a cell vector a quarter turn clockwise about the origin
/// (screen coordinates: up maps to right).
#[inline]
pub const fn rotate_cw(v: IVec2) -> IVec2 {
    IVec2::new(-v.y, v.x)
}

/// Rotate a cell vector a quarter turn counterclockwise about the origin.
#[inline]
pub const fn rotate_ccw(v: IVec2) -> IVec2 {
    IVec2::new(v.y, -v.x)
}

/// Apply `turns` clockwise quarter turns to a cell vector.
#[inline]
pub fn rotate_cw_by(v: IVec2, turns: u32) -> IVec2 {
    match turns % 4 {
        0 => v,
        1 => rotate_cw(v),
        2 => IVec2::new(-v.x, -v.y),
        _ => rotate_ccw(v),
    }
}

/// Apply `turns` clockwise quarter turns to a sub-cell vector.
#[inline]
pub fn rotate_cw_by_f(v: Vec2, turns: u32) -> Vec2 {
    match turns % 4 {
        0 => v,
        1 => Vec2::new(-v.y, v.x),
        2 => -v,
        _ => Vec2::new(v.y, -v.x),
    }
}

/// Clockwise quarter turns that bring a cardinal `orientation` to [`UP`].
///
/// Non-cardinal input degrades to zero turns (callers only ever store
/// cardinal orientations).
pub fn quarter_turns_to_up(orientation: IVec2) -> u32 {
    match (orientation.x, orientation.y) {
        (0, -1) => 0,
        (1, 0) => 3,
        (0, 1) => 2,
        (-1, 0) => 1,
        _ => {
            log::warn!("non-cardinal orientation {orientation:?}, treating as up");
            0
        }
    }
}

/// Clockwise quarter turns taking the cardinal `from` to the cardinal `to`.
pub fn quarter_turns_between(from: IVec2, to: IVec2) -> u32 {
    for turns in 0..4 {
        if rotate_cw_by(from, turns) == to {
            return turns;
        }
    }
    log::warn!("no quarter-turn path from {from:?} to {to:?}");
    0
}
