//! Surface and connectivity analysis.
//!
//! A full flood fill over the occupied cells, rerun whenever structure
//! changes. Local edits can flip connectivity anywhere in the body, so
//! there is no incremental variant; the grids involved are a few hundred
//! cells across and the pass is linear in occupied cells.

use glam::IVec2;
use rustc_hash::FxHashSet;

use crate::grid::CARDINALS;

use super::Body;

/// Rebuild `body.surface`, per-pixel surface flags, and the connected
/// component count.
///
/// Iterative DFS with an explicit stack; bodies are routinely thousands
/// of cells deep. A cell is surface when any 4-neighbor is unoccupied or
/// outside the bounds. Cells sharing a position share a verdict. The
/// surface list comes out in visit order, which is stable for a given
/// body state.
pub(crate) fn recompute(body: &mut Body) {
    body.surface.clear();
    body.components = 0;
    body.surface_dirty = false;
    if body.pixels.is_empty() {
        return;
    }

    // Seed order follows the pixel arena so the pass is deterministic.
    let seeds: Vec<IVec2> = body.pixels.values().map(|px| px.position()).collect();

    let mut visited: FxHashSet<IVec2> = FxHashSet::default();
    visited.reserve(body.index.len());
    let mut stack: Vec<IVec2> = Vec::new();

    for seed in seeds {
        if visited.contains(&seed) {
            continue;
        }
        body.components += 1;
        visited.insert(seed);
        stack.push(seed);

        while let Some(cell) = stack.pop() {
            let mut exposed = false;
            for offset in CARDINALS {
                let neighbor = cell + offset;
                let open =
                    !body.bounds.contains(neighbor) || !body.index.contains_key(&neighbor);
                if open {
                    exposed = true;
                } else if !visited.contains(&neighbor) {
                    visited.insert(neighbor);
                    stack.push(neighbor);
                }
            }
            if let Some(bucket) = body.index.get(&cell) {
                for &key in bucket {
                    if let Some(px) = body.pixels.get_mut(key) {
                        px.is_surface = exposed;
                    }
                    if exposed {
                        body.surface.push(key);
                    }
                }
            }
        }
    }

    if body.config.debug.debug_mode && body.config.debug.log_surface_stats {
        log::debug!(
            "surface pass: {} pixels, {} on surface, {} components",
            body.pixels.len(),
            body.surface.len(),
            body.components
        );
    }
}
