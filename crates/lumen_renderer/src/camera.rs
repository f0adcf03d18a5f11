//! Camera for ray generation and the render loops.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::renderer::{render_pixel, Background, ImageBuffer, Progress};
use crate::{gen_f32, random_in_unit_disk, Color, Hittable, Ray};
use lumen_math::Vec3;

/// Camera for generating rays into the scene.
///
/// The public fields are plain configuration. Everything else is derived
/// by [`Camera::initialize`], which the render methods call for you.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f32,      // Ratio of image width over height
    pub image_width: u32,       // Rendered image width in pixel count
    pub samples_per_pixel: u32, // Count of random samples for each pixel
    pub max_depth: u32,         // Maximum number of ray bounces into scene

    // Camera positioning
    pub vfov: f32, // Vertical view angle (field of view) in degrees
    pub lookfrom: Vec3,
    pub lookat: Vec3,
    pub vup: Vec3, // Camera-relative "up" direction

    // Lens settings
    pub defocus_angle: f32, // Variation angle of rays through each pixel
    pub focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Background seen by escaping rays
    pub background: Background,

    // Cached computed values (set by initialize())
    image_height: u32,
    samples_scale: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            lookfrom: Vec3::new(0.0, 0.0, 0.0),
            lookat: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::Sky,
            image_height: 0,
            samples_scale: 0.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set aspect ratio and image width.
    pub fn with_image(mut self, aspect_ratio: f32, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Vec3, lookat: Vec3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the background seen by rays that escape the scene.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Derive image height, pixel grid and lens basis from the configuration.
    ///
    /// Idempotent; called at the start of every render.
    pub fn initialize(&mut self) {
        // Calculate the image height, and ensure that both dimensions are at least 1.
        self.image_width = self.image_width.max(1);
        let height = if self.aspect_ratio > 0.0 {
            (self.image_width as f32 / self.aspect_ratio) as u32
        } else {
            0
        };
        self.image_height = height.max(1);

        self.samples_scale = 1.0 / self.effective_samples() as f32;
        self.center = self.lookfrom;

        // Determine viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate the u,v,w unit basis vectors for the camera coordinate frame
        self.w = (self.lookfrom - self.lookat).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = viewport_height * -self.v;

        // Horizontal and vertical delta vectors from pixel to pixel
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Location of the upper left pixel
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Camera defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target is jittered within the pixel square, the origin is drawn
    /// from the defocus disk when `defocus_angle > 0`, and the time is
    /// uniform in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Render the scene on the calling thread, drawing every sample from `rng`.
    ///
    /// Pixels are produced in row-major order, top row first.
    pub fn render(&mut self, world: &dyn Hittable, rng: &mut dyn RngCore) -> ImageBuffer {
        self.initialize();
        let (width, height) = (self.image_width, self.image_height);
        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}",
            width,
            height,
            self.effective_samples(),
            self.max_depth
        );

        let progress = Progress::new(height);
        let mut image = ImageBuffer::new(width, height);
        for j in 0..height {
            for i in 0..width {
                let color = render_pixel(self, world, i, j, rng);
                image.set(i, j, color);
            }
            progress.row_done();
        }
        progress.finish();

        image
    }

    /// Render rows in parallel on the current rayon pool.
    ///
    /// Each row samples from its own generator seeded by `(seed, row)`, so
    /// the image depends only on the seed, not on the thread count.
    pub fn render_parallel(&mut self, world: &dyn Hittable, seed: u64) -> ImageBuffer {
        self.initialize();
        let (width, height) = (self.image_width, self.image_height);
        log::info!(
            "Rendering {}x{} @ {} spp, max depth {} on {} threads",
            width,
            height,
            self.effective_samples(),
            self.max_depth,
            rayon::current_num_threads()
        );

        let camera: &Camera = self;
        let progress = Progress::new(height);
        let rows: Vec<Vec<Color>> = (0..height)
            .into_par_iter()
            .map(|j| {
                let mut rng = StdRng::seed_from_u64(row_seed(seed, j));
                let row: Vec<Color> = (0..width)
                    .map(|i| render_pixel(camera, world, i, j, &mut rng))
                    .collect();
                progress.row_done();
                row
            })
            .collect();
        progress.finish();

        ImageBuffer::from_pixels(width, height, rows.into_iter().flatten().collect())
    }

    /// Image height derived from width and aspect ratio (at least 1).
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Samples actually taken per pixel; zero is treated as one.
    pub fn effective_samples(&self) -> u32 {
        self.samples_per_pixel.max(1)
    }

    /// Camera frame basis `(u, v, w)`: right, up, and backwards.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// World position of the center of pixel (0, 0).
    pub fn pixel00_loc(&self) -> Vec3 {
        self.pixel00_loc
    }

    /// Step vectors between horizontally and vertically adjacent pixels.
    pub fn pixel_deltas(&self) -> (Vec3, Vec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    /// Defocus disk radius vectors along `u` and `v`.
    pub fn defocus_disk(&self) -> (Vec3, Vec3) {
        (self.defocus_disk_u, self.defocus_disk_v)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Generator seed for one image row.
fn row_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}
