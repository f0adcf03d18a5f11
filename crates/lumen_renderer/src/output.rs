//! Writing rendered images to disk.
//!
//! Linear colors are gamma corrected (gamma 2) and quantized to 8 bits per
//! channel, then written either as plain-text PPM or as PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::{Color, ImageBuffer};
use lumen_math::Interval;

/// Errors that can occur while saving an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format '{0}' (expected .ppm or .png)")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let quantize = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Write the image as plain-text PPM (P3), top row first.
pub fn write_ppm(image: &ImageBuffer, out: &mut impl Write) -> OutputResult<()> {
    writeln!(out, "P3\n{} {}\n255", image.width, image.height)?;
    for row in image.rows() {
        for color in row {
            let [r, g, b] = color_to_rgb8(*color);
            writeln!(out, "{r} {g} {b}")?;
        }
    }
    Ok(())
}

/// Save the image, choosing the format from the file extension.
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let mut out = BufWriter::new(File::create(path)?);
            write_ppm(image, &mut out)?;
            out.flush()?;
        }
        "png" => {
            let mut bytes = Vec::with_capacity(image.pixels.len() * 3);
            for color in &image.pixels {
                bytes.extend_from_slice(&color_to_rgb8(*color));
            }
            image::save_buffer(path, &bytes, image.width, image.height, image::ColorType::Rgb8)?;
        }
        other => return Err(OutputError::UnsupportedFormat(other.to_string())),
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::splat(4.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::new(0.25, -1.0, 1.0)), [128, 0, 255]);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(1, 0, Color::ONE);
        image.set(0, 1, Color::new(0.25, 0.0, 0.0));

        let mut out = Vec::new();
        write_ppm(&image, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[..3], ["P3", "2 2", "255"]);
        assert_eq!(lines[3..], ["0 0 0", "255 255 255", "128 0 0", "0 0 0"]);
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = std::env::temp_dir();
        let mut image = ImageBuffer::new(3, 1);
        image.set(2, 0, Color::ONE);

        let png = dir.join("lumen_renderer_output_test.png");
        save_image(&image, &png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 1));
        assert_eq!(decoded.get_pixel(2, 0).0, [255, 255, 255]);

        let ppm = dir.join("lumen_renderer_output_test.ppm");
        save_image(&image, &ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n3 1\n255\n"));

        let _ = std::fs::remove_file(png);
        let _ = std::fs::remove_file(ppm);
    }

    #[test]
    fn test_unsupported_extension() {
        let image = ImageBuffer::new(1, 1);
        let err = save_image(&image, std::env::temp_dir().join("lumen.bmp")).unwrap_err();
        assert!(matches!(err, OutputError::UnsupportedFormat(ext) if ext == "bmp"));
    }
}
