//! Regolith demo driver
//!
//! Builds a planet and a serpent, runs a digging walker over the planet
//! for a fixed number of ticks, and logs what the engine reports. The
//! engine never owns a loop; this binary shows the intended call shape.
//! Takes an optional RNG seed and an optional path that receives the
//! end-of-run world as JSON.

use std::time::Instant;

use glam::{IVec2, Vec2};
use serde::Serialize;

use regolith::{
    BodySnapshot, DamageOutcome, EngineConfig, GridBounds, PixelBody, Planet, PlanetSpec, Serpent,
    SerpentSnapshot, SerpentSpec, SurfaceWalker,
};

/// Everything a resumed run would need, in snapshot form.
#[derive(Serialize)]
struct SaveState {
    planet: BodySnapshot,
    serpent: SerpentSnapshot,
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(regolith::consts::DEFAULT_SEED);
    let save_path = std::env::args().nth(2);
    let config = EngineConfig::seeded(seed);
    log::info!("seed {seed}");

    let now = Instant::now();
    let mut planet =
        Planet::new(PlanetSpec::terra(24), config.clone(), now).expect("planet spec is valid");
    let serpent_bounds = GridBounds::new(IVec2::new(40, -20), IVec2::new(90, 20));
    let mut serpent = Serpent::new(
        SerpentSpec::standard(IVec2::new(60, 0), serpent_bounds),
        config.clone(),
        now,
    )
    .expect("serpent spec is valid");
    log::info!(
        "planet: {} pixels, serpent: {} pixels in {} segments",
        planet.body().len(),
        serpent.body().len(),
        serpent.segments().len()
    );

    let mut walker = SurfaceWalker::from_config(
        Vec2::new(0.0, -(planet.spec().radius as f32) - 1.0),
        &config,
    );
    let mut wallet = 0u32;

    for frame in 0..240u32 {
        let now = Instant::now();

        // Alternate a surface step with dig hits on the nearest surface
        // pixel, slowly trenching into the crust.
        if frame % 3 == 0 {
            walker.step(planet.body(), 1);
        } else if let Some(target) = planet.body().closest_surface_pixel(walker.position()) {
            let (outcome, value) = planet.body_mut().dig_pixel(target);
            wallet += value;
            if outcome == DamageOutcome::Destroyed {
                log::debug!("dug out a pixel, wallet now {wallet}");
            }
        }

        let planet_events = planet.update(now);
        let serpent_events = serpent.update(now);

        if planet_events.surface_recomputed {
            log::debug!(
                "tick {}: planet surface recomputed, {} components",
                planet_events.tick,
                planet_events.components
            );
        }
        if planet_events.darkness_refreshed {
            log::debug!("tick {}: darkness refreshed", planet_events.tick);
        }
        if serpent_events.stuck_segments > 0 {
            log::warn!("serpent spent tick {} boxed in", serpent_events.tick);
        }
        if planet_events.died {
            log::info!("planet fully mined at tick {}", planet_events.tick);
            break;
        }
    }

    let frame = planet.body().frame();
    log::info!(
        "done: wallet {wallet}, planet health {:.2}, frame {}x{} at {:?}, serpent head at {:?}",
        planet.body().health(),
        frame.width(),
        frame.height(),
        frame.origin(),
        serpent.head().position(),
    );

    if let Some(path) = save_path {
        let save = SaveState {
            planet: planet.body().snapshot(),
            serpent: serpent.snapshot(),
        };
        if let Ok(json) = serde_json::to_string(&save) {
            match std::fs::write(&path, &json) {
                Ok(()) => log::info!("world saved to {path} ({} bytes)", json.len()),
                Err(err) => log::error!("could not write {path}: {err}"),
            }
        }
    }
}
