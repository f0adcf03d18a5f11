//! Core path tracing estimator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray bouncing with a hard depth cutoff
//! - Sky gradient or solid background on a miss
//! - Anti-aliasing via multi-sampling

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::{Camera, Color, Hittable, Ray};
use lumen_math::Interval;
use rand::RngCore;

/// Minimum hit distance; keeps scattered rays from re-hitting their own origin.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// Vertical white-to-sky-blue gradient
    #[default]
    Sky,
    /// A single flat color
    Solid(Color),
}

impl Background {
    /// Color seen along `ray`.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. Each scatter multiplies in the
/// material's attenuation and recurses with one less bounce; absorption or
/// running out of depth yields black, escaping the scene yields the
/// background. Recursion depth is bounded by `depth`.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded the ray bounce limit, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return background.color(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, background, rng)
        }
        None => Color::ZERO,
    }
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` estimates, clamped to [0, 1].
/// The camera must already be initialized.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.effective_samples() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, &camera.background, rng);
    }

    (pixel_color * camera.samples_scale()).clamp(Color::ZERO, Color::ONE)
}

/// Linear color image, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Wrap already computed rows.
    pub(crate) fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Coarse render progress, logged every 10% of completed rows.
///
/// Safe to share between worker threads.
pub struct Progress {
    total_rows: usize,
    done_rows: AtomicUsize,
    reported: AtomicUsize,
    start: Instant,
}

impl Progress {
    pub fn new(total_rows: u32) -> Self {
        Self {
            total_rows: total_rows.max(1) as usize,
            done_rows: AtomicUsize::new(0),
            reported: AtomicUsize::new(0),
            start: Instant::now(),
        }
    }

    /// Mark one more row as finished.
    pub fn row_done(&self) {
        let done = self.done_rows.fetch_add(1, Ordering::Relaxed) + 1;
        let decile = done * 10 / self.total_rows;
        if self.reported.fetch_max(decile, Ordering::Relaxed) < decile {
            log::info!("Rendering: {}% ({}/{} rows)", decile * 10, done, self.total_rows);
        }
    }

    /// Number of finished rows.
    pub fn rows_done(&self) -> usize {
        self.done_rows.load(Ordering::Relaxed)
    }

    /// Log completion with elapsed time.
    pub fn finish(&self) {
        log::info!("Render finished in {:.2?}", self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, HittableList, Lambertian, Material, Metal, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn single_sphere(material: Arc<dyn Material>) -> HittableList {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::stationary(Vec3::new(0.0, 0.0, -1.0), 0.5, material)));
        world
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        let down = sky_gradient(&Ray::new_simple(Vec3::ZERO, -Vec3::Y));
        let level = sky_gradient(&Ray::new_simple(Vec3::ZERO, Vec3::X));

        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_miss_returns_exact_background() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let mut rng = StdRng::seed_from_u64(1);

        // Direction scale must not matter
        for direction in [Vec3::new(0.0, 3.0, 1.0), Vec3::new(1.0, -0.2, 0.5), Vec3::new(-4.0, 0.0, 0.0)] {
            let ray = Ray::new_simple(Vec3::ZERO, direction);
            let color = ray_color(&ray, &world, 10, &Background::Sky, &mut rng);
            assert_eq!(color, sky_gradient(&ray));
        }

        let solid = Background::Solid(Color::new(0.1, 0.2, 0.3));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&ray, &world, 10, &solid, &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let mut rng = StdRng::seed_from_u64(2);

        let at_sphere = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let at_sky = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&at_sphere, &world, 0, &Background::Sky, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&at_sky, &world, 0, &Background::Sky, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_depth_one_hit_is_black() {
        // One bounce is spent on the hit, nothing left for the scattered ray
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let mut rng = StdRng::seed_from_u64(3);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(ray_color(&ray, &world, 1, &Background::Sky, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_mirror_bounce_attenuates_background() {
        // Perfect mirror facing the camera reflects straight back into the sky
        let albedo = Color::new(0.8, 0.6, 0.2);
        let world = single_sphere(Arc::new(Metal::new(albedo, 0.0)));
        let mut rng = StdRng::seed_from_u64(4);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let color = ray_color(&ray, &world, 5, &Background::Sky, &mut rng);
        let expected = albedo * Color::new(0.75, 0.85, 1.0);
        assert!((color - expected).length() < 1e-5);
    }

    #[test]
    fn test_absorbed_ray_is_black() {
        struct Absorber;
        impl Material for Absorber {
            fn scatter(
                &self,
                _ray_in: &Ray,
                _rec: &crate::HitRecord,
                _rng: &mut dyn RngCore,
            ) -> Option<crate::ScatterResult> {
                None
            }
        }

        let world = single_sphere(Arc::new(Absorber));
        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ray_color(&ray, &world, 10, &Background::Sky, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_glass_colors_stay_in_range() {
        let world = single_sphere(Arc::new(Dielectric::new(1.5)));
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..100 {
            let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.1, 0.05, -1.0));
            let c = ray_color(&ray, &world, 20, &Background::Sky, &mut rng);
            assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_render_pixel() {
        let world = single_sphere(Arc::new(Lambertian::new(Color::splat(0.5))));
        let mut camera = Camera::new().with_image(1.0, 10).with_quality(4, 5);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let color = render_pixel(&camera, &world, 5, 5, &mut rng);

        // Center pixel hits the grey sphere: darker than the sky behind it
        assert!(color.length() > 0.0);
        assert!(color.x < 0.75);
    }

    #[test]
    fn test_image_buffer_indexing() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.rows().count(), 2);
        assert_eq!(image.rows().last().unwrap()[2], Color::ONE);
    }

    #[test]
    fn test_progress_counts_rows() {
        let progress = Progress::new(20);
        for _ in 0..20 {
            progress.row_done();
        }
        assert_eq!(progress.rows_done(), 20);
        assert_eq!(progress.reported.load(Ordering::Relaxed), 10);
        progress.finish();
    }
}
