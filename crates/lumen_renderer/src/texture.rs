//! Textures sampled by materials at a hit point.

use std::sync::Arc;

use crate::Color;
use lumen_core::TextureImage;
use lumen_math::{Interval, Vec3};

/// Color returned by image textures that have no pixel data.
const MISSING_TEXTURE: Color = Color::new(0.0, 1.0, 1.0);

/// Trait for textures: a color as a function of surface coordinates and
/// world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A 3D checkerboard alternating between two textures.
///
/// Cells are cubes of side `scale` in world space; a cell is "even" when
/// the sum of its integer coordinates is even.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checkerboard between two solid colors.
    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// A texture backed by a decoded image, sampled with nearest-pixel lookup.
pub struct ImageTexture {
    image: TextureImage,
}

impl ImageTexture {
    pub fn new(image: TextureImage) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        // Cyan makes missing data easy to spot in a render
        if self.image.height() == 0 {
            return MISSING_TEXTURE;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Flip V to image coordinates
        let v = 1.0 - unit.clamp(v);

        let i = (u * self.image.width() as f32) as i64;
        let j = (v * self.image.height() as f32) as i64;

        match self.image.pixel(i, j) {
            Some([r, g, b]) => Color::new(r as f32, g as f32, b as f32) / 255.0,
            None => MISSING_TEXTURE,
        }
    }
}
