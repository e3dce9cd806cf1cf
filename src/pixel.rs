//! Pixel cells and the material behavior table.
//!
//! Material differences are table lookups on the variant rather than
//! virtual dispatch, so adding a material means touching the tables here
//! and nothing else.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::palette::{Rgba, colors};

/// Cell material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Dirt,
    Gold,
    Diamond,
    Egg,
    Magic,
    Serpent,
    Tombstone,
}

impl Material {
    pub const ALL: [Material; 7] = [
        Material::Dirt,
        Material::Gold,
        Material::Diamond,
        Material::Egg,
        Material::Magic,
        Material::Serpent,
        Material::Tombstone,
    ];

    /// Whether the material masquerades as plain dirt while buried in
    /// darkness. Valuables stay hidden until dug near; structural
    /// materials always read as themselves.
    pub fn acts_like_dirt(self) -> bool {
        matches!(
            self,
            Material::Dirt | Material::Gold | Material::Diamond | Material::Magic
        )
    }

    /// Dig hits the material absorbs before crumbling.
    pub fn initial_health(self) -> f32 {
        match self {
            Material::Dirt => 1.0,
            Material::Tombstone => 2.0,
            Material::Gold => 3.0,
            Material::Magic => 4.0,
            Material::Diamond => 5.0,
            Material::Serpent => 8.0,
            Material::Egg => 10.0,
        }
    }

    /// Currency awarded when a pixel of this material is dug out.
    pub fn dig_value(self) -> u32 {
        match self {
            Material::Dirt => 1,
            Material::Gold => 10,
            Material::Magic => 25,
            Material::Diamond => 50,
            Material::Egg | Material::Serpent | Material::Tombstone => 0,
        }
    }

    pub fn base_color(self) -> Rgba {
        match self {
            Material::Dirt => colors::DIRT,
            Material::Gold => colors::GOLD,
            Material::Diamond => colors::DIAMOND,
            Material::Egg => colors::EGG,
            Material::Magic => colors::MAGIC,
            Material::Serpent => colors::SERPENT,
            Material::Tombstone => colors::TOMBSTONE,
        }
    }

    pub fn surface_color(self) -> Rgba {
        match self {
            Material::Dirt => colors::DIRT_SURFACE,
            Material::Gold => colors::GOLD_SURFACE,
            Material::Diamond => colors::DIAMOND_SURFACE,
            Material::Egg => colors::EGG_SURFACE,
            Material::Magic => colors::MAGIC_SURFACE,
            Material::Serpent => colors::SERPENT_SURFACE,
            Material::Tombstone => colors::TOMBSTONE_SURFACE,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Material::Dirt => 1 << 0,
            Material::Gold => 1 << 1,
            Material::Diamond => 1 << 2,
            Material::Egg => 1 << 3,
            Material::Magic => 1 << 4,
            Material::Serpent => 1 << 5,
            Material::Tombstone => 1 << 6,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Material::Dirt => "dirt",
            Material::Gold => "gold",
            Material::Diamond => "diamond",
            Material::Egg => "egg",
            Material::Magic => "magic",
            Material::Serpent => "serpent",
            Material::Tombstone => "tombstone",
        };
        f.write_str(name)
    }
}

/// Bitset of materials a body accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialSet(u8);

impl MaterialSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        let mut set = Self::empty();
        for material in Material::ALL {
            set = set.with(material);
        }
        set
    }

    pub fn only(material: Material) -> Self {
        Self::empty().with(material)
    }

    #[must_use]
    pub fn with(self, material: Material) -> Self {
        Self(self.0 | material.bit())
    }

    #[must_use]
    pub fn without(self, material: Material) -> Self {
        Self(self.0 & !material.bit())
    }

    pub fn contains(self, material: Material) -> bool {
        self.0 & material.bit() != 0
    }
}

/// A single grid cell of a body.
///
/// Position and material are fixed at construction; position moves only
/// through [`Body::relocate_pixel`](crate::body::Body::relocate_pixel) so
/// the position index can never go stale, and material changes only by
/// destroying and re-adding the cell. Health never increases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pixel {
    position: IVec2,
    material: Material,
    health: f32,
    /// Interior display color. Mutable; effects may override it.
    pub color: Rgba,
    /// Display color while this pixel sits on the surface.
    pub surface_color: Rgba,
    pub(crate) is_surface: bool,
    pub(crate) darkness: f32,
}

impl Pixel {
    /// Build a pixel with the material's palette colors and full health.
    pub fn new(position: IVec2, material: Material) -> Self {
        Self {
            position,
            material,
            health: material.initial_health(),
            color: material.base_color(),
            surface_color: material.surface_color(),
            is_surface: false,
            darkness: 1.0,
        }
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        self.position
    }

    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    #[inline]
    pub fn health(&self) -> f32 {
        self.health
    }

    #[inline]
    pub fn is_surface(&self) -> bool {
        self.is_surface
    }

    /// Darkness of this cell, 0 (fully revealed) to 1 (fully buried).
    #[inline]
    pub fn darkness(&self) -> f32 {
        self.darkness
    }

    /// Remaining health as a fraction of the material's starting health.
    pub fn health_ratio(&self) -> f32 {
        self.health / self.material.initial_health()
    }

    /// Paint both display colors at once (blood stains, scorch marks).
    pub fn stain(&mut self, color: Rgba) {
        self.color = color;
        self.surface_color = color;
    }

    /// Color the renderer should show for this pixel. Buried concealable
    /// materials read as the body's dirt variant until enough darkness has
    /// been dug away around them.
    pub fn render_color(&self, dirt: Material, reveal_threshold: f32) -> Rgba {
        if self.darkness > reveal_threshold
            && self.material.acts_like_dirt()
            && self.material != dirt
        {
            return dirt.base_color();
        }
        if self.is_surface {
            self.surface_color
        } else {
            self.color
        }
    }

    pub(crate) fn set_position(&mut self, position: IVec2) {
        self.position = position;
    }

    /// Apply dig damage. Negative amounts are ignored so health can never
    /// climb back up. Returns true when the pixel is destroyed.
    pub(crate) fn apply_damage(&mut self, amount: f32) -> bool {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health <= 0.0
    }
}
