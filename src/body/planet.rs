//! Circular planet bodies.
//!
//! A planet is a filled disk of dirt with ore clusters scattered through
//! the crust and, usually, a serpent egg at the core. Generation is fully
//! determined by the engine seed: same seed, same planet, cell for cell.

use std::f32::consts::TAU;
use std::time::Instant;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyError, GridBounds, PixelBody, TickEvents};
use crate::config::EngineConfig;
use crate::grid::{self, CARDINALS};
use crate::palette::{Rgba, colors};
use crate::pixel::{Material, MaterialSet};

/// Scatter recipe for one buried material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub material: Material,
    /// Clusters scattered through the crust.
    pub clusters: u32,
    /// Cells per cluster, grown as a random walk from the cluster seed.
    pub cluster_size: u32,
    /// Minimum burial depth as a fraction of the radius. Zero lets the
    /// deposit break the surface.
    pub min_depth: f32,
}

/// Generation recipe for a planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetSpec {
    /// Disk radius in cells.
    pub radius: i32,
    /// Bulk material, and what concealed valuables masquerade as.
    pub dirt: Material,
    /// Sky gradient behind the planet, top then bottom.
    pub sky: [Rgba; 2],
    /// Buried features, applied in order; later deposits overwrite.
    pub deposits: Vec<Deposit>,
    /// Bury a 3x3 serpent egg at the core.
    pub center_egg: bool,
    /// Half-range of per-channel color jitter on dirt cells, to break up
    /// the flat fill.
    pub dirt_jitter: u8,
}

impl PlanetSpec {
    /// The starting world: modest gold, a little diamond, an egg.
    pub fn terra(radius: i32) -> Self {
        Self {
            radius,
            dirt: Material::Dirt,
            sky: [colors::SKY_TERRA_TOP, colors::SKY_TERRA_BOTTOM],
            deposits: vec![
                Deposit {
                    material: Material::Gold,
                    clusters: 6,
                    cluster_size: 12,
                    min_depth: 0.15,
                },
                Deposit {
                    material: Material::Magic,
                    clusters: 2,
                    cluster_size: 8,
                    min_depth: 0.30,
                },
                Deposit {
                    material: Material::Diamond,
                    clusters: 3,
                    cluster_size: 6,
                    min_depth: 0.45,
                },
            ],
            center_egg: true,
            dirt_jitter: 10,
        }
    }

    /// Late-game variant: denser seams, harsher sky.
    pub fn gilded(radius: i32) -> Self {
        Self {
            radius,
            dirt: Material::Dirt,
            sky: [colors::SKY_GILDED_TOP, colors::SKY_GILDED_BOTTOM],
            deposits: vec![
                Deposit {
                    material: Material::Gold,
                    clusters: 10,
                    cluster_size: 14,
                    min_depth: 0.10,
                },
                Deposit {
                    material: Material::Magic,
                    clusters: 5,
                    cluster_size: 10,
                    min_depth: 0.25,
                },
                Deposit {
                    material: Material::Diamond,
                    clusters: 4,
                    cluster_size: 6,
                    min_depth: 0.40,
                },
            ],
            center_egg: true,
            dirt_jitter: 8,
        }
    }
}

/// A planet body. Movement-free; `update` is just the shared engine
/// refresh.
#[derive(Debug)]
pub struct Planet {
    spec: PlanetSpec,
    body: Body,
}

impl Planet {
    pub fn new(spec: PlanetSpec, config: EngineConfig, now: Instant) -> Result<Self, BodyError> {
        if spec.radius <= 0 {
            return Err(BodyError::InvalidRadius(spec.radius as f32));
        }
        let bounds = GridBounds::centered(spec.radius, 2);
        let body = Body::new(
            spec.radius as f32,
            bounds,
            spec.dirt,
            MaterialSet::all().without(Material::Serpent),
            false,
            config,
        )?;
        let mut planet = Self { spec, body };

        let mut rng = Pcg32::seed_from_u64(planet.body.config().rng_seed);
        for (cell, material) in planet.create_initial_pixels(&mut rng) {
            planet.body.add_pixel(cell, material)?;
        }
        planet.jitter_dirt(&mut rng);
        planet.body.seal(now);
        Ok(planet)
    }

    pub fn spec(&self) -> &PlanetSpec {
        &self.spec
    }

    /// Nudge every dirt cell's colors by a small per-channel offset so
    /// the fill does not read as a flat sheet. Same delta on both shades
    /// keeps the surface highlight relationship.
    fn jitter_dirt(&mut self, rng: &mut Pcg32) {
        let jitter = self.spec.dirt_jitter as i16;
        if jitter == 0 {
            return;
        }
        let dirt = self.spec.dirt;
        let keys: Vec<_> = self
            .body
            .iter()
            .filter(|(_, px)| px.material() == dirt)
            .map(|(key, _)| key)
            .collect();
        for key in keys {
            let dr = rng.random_range(-jitter..=jitter);
            let dg = rng.random_range(-jitter..=jitter);
            let db = rng.random_range(-jitter..=jitter);
            if let Some(px) = self.body.pixel_mut(key) {
                px.color = shift(px.color, dr, dg, db);
                px.surface_color = shift(px.surface_color, dr, dg, db);
            }
        }
    }
}

fn shift(color: Rgba, dr: i16, dg: i16, db: i16) -> Rgba {
    let channel = |c: u8, d: i16| (c as i16 + d).clamp(0, 255) as u8;
    Rgba::new(
        channel(color.r, dr),
        channel(color.g, dg),
        channel(color.b, db),
        color.a,
    )
}

impl PixelBody for Planet {
    /// Disk of dirt, deposits walked out cluster by cluster, optional egg
    /// at the core. Output is in row-major disk order so pixel keys are
    /// assigned deterministically.
    fn create_initial_pixels(&self, rng: &mut Pcg32) -> Vec<(IVec2, Material)> {
        let radius = self.spec.radius;
        let radius_sq = radius * radius;

        let mut materials: FxHashMap<IVec2, Material> = FxHashMap::default();
        for y in -radius..=radius {
            for x in -radius..=radius {
                let cell = IVec2::new(x, y);
                if cell.length_squared() <= radius_sq {
                    materials.insert(cell, self.spec.dirt);
                }
            }
        }

        for deposit in &self.spec.deposits {
            let max_dist = radius as f32 * (1.0 - deposit.min_depth);
            let max_dist_sq = max_dist * max_dist;
            for _ in 0..deposit.clusters {
                let angle = rng.random::<f32>() * TAU;
                let dist = rng.random::<f32>() * max_dist;
                let mut cur = grid::snap(Vec2::new(angle.cos(), angle.sin()) * dist);
                for _ in 0..deposit.cluster_size {
                    if (cur.length_squared() as f32) <= max_dist_sq && materials.contains_key(&cur)
                    {
                        materials.insert(cur, deposit.material);
                    }
                    let step = CARDINALS[rng.random_range(0..CARDINALS.len())];
                    let next = cur + step;
                    if (next.length_squared() as f32) <= max_dist_sq {
                        cur = next;
                    }
                }
            }
        }

        if self.spec.center_egg {
            for y in -1..=1 {
                for x in -1..=1 {
                    materials.insert(IVec2::new(x, y), Material::Egg);
                }
            }
        }

        let mut cells = Vec::with_capacity(materials.len());
        for y in -radius..=radius {
            for x in -radius..=radius {
                let cell = IVec2::new(x, y);
                if let Some(&material) = materials.get(&cell) {
                    cells.push((cell, material));
                }
            }
        }
        cells
    }

    fn sky_colors(&self) -> [Rgba; 2] {
        self.spec.sky
    }

    fn dirt_variant(&self) -> Material {
        self.spec.dirt
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, now: Instant) -> TickEvents {
        self.body.refresh(now)
    }
}
