//! RGBA frame assembly.
//!
//! Each refresh flattens the body into a row-major RGBA buffer covering
//! its current bounding box. Colors are multiplied by the complement of
//! darkness and alpha encodes banded pixel health, so the buffer is ready
//! for any external presenter to blit without further engine knowledge.

use glam::IVec2;

use crate::palette::{Rgba, banded_alpha};

use super::Body;

/// Row-major RGBA pixels covering a body's bounding box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    origin: IVec2,
    width: u32,
    height: u32,
    data: Vec<Rgba>,
}

impl Frame {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Top-left cell of the covered box, in body coordinates.
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Color at a body-space cell, if the cell lies inside the box.
    pub fn get(&self, cell: IVec2) -> Option<Rgba> {
        let local = cell - self.origin;
        if local.x < 0 || local.y < 0 || local.x >= self.width as i32 || local.y >= self.height as i32
        {
            return None;
        }
        Some(self.data[local.y as usize * self.width as usize + local.x as usize])
    }

    /// Raw pixel data, row-major from the origin.
    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    /// Flat bytes, 4 per pixel, row-major. Suitable for texture upload.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Rebuild `body.frame` from current pixel state.
///
/// Cells without pixels stay fully transparent. When overlap puts several
/// pixels on one cell the later pixel in arena order wins, which is
/// stable for a given body state.
pub(crate) fn rebuild(body: &mut Body) {
    if body.pixels.is_empty() {
        body.frame = Frame::empty();
        return;
    }

    let mut min = IVec2::MAX;
    let mut max = IVec2::MIN;
    for (_, px) in body.pixels.iter() {
        min = min.min(px.position());
        max = max.max(px.position());
    }
    let size = max - min + IVec2::ONE;
    let width = size.x as usize;
    let height = size.y as usize;
    let mut data = vec![Rgba::TRANSPARENT; width * height];

    let dirt = body.dirt;
    let reveal = body.config.reveal_threshold;
    let bands = body.config.alpha_bands;
    for (_, px) in body.pixels.iter() {
        let local = px.position() - min;
        let idx = local.y as usize * width + local.x as usize;
        let lit = px.render_color(dirt, reveal).scale_rgb(1.0 - px.darkness());
        data[idx] = lit.with_alpha(banded_alpha(px.health_ratio(), bands));
    }

    body.frame = Frame {
        origin: min,
        width: width as u32,
        height: height as u32,
        data,
    };
}
