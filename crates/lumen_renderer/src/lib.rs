//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over analytic spheres:
//! - Hit testing through the [`Hittable`] trait, with closest-hit aggregation
//! - Diffuse, metal and dielectric materials sampling textures
//! - A thin-lens camera with antialiasing, depth of field and motion blur
//! - Serial and row-parallel render loops that are reproducible for a seed

mod camera;
mod hittable;
mod material;
mod output;
mod random;
mod renderer;
mod scene;
mod sphere;
mod texture;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{color_to_rgb8, linear_to_gamma, save_image, write_ppm, OutputError, OutputResult};
pub use random::{
    gen_f32, gen_range, random_color, random_color_range, random_in_unit_disk, random_unit_vector,
};
pub use renderer::{ray_color, render_pixel, Background, ImageBuffer, Progress};
pub use scene::{build_scene, camera_from_desc, SceneSetup};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};

/// Re-export math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;
