//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use lumen_core::TextureImage;
use lumen_renderer::{
    gen_f32, gen_range, random_color, random_color_range, Camera, CheckerTexture, Color,
    Dielectric, HittableList, ImageTexture, Lambertian, Material, Metal, SceneSetup, Sphere, Vec3,
};
use rand::RngCore;

fn ground_checker() -> Arc<CheckerTexture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Wide shot shared by the showcase scenes.
fn showcase_camera() -> Camera {
    Camera::new()
        .with_image(16.0 / 9.0, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
}

/// A checkered ground covered by a 22x22 grid of small random spheres, with
/// three large feature spheres. Diffuse spheres bounce upwards over the
/// shutter interval.
pub fn bouncing_spheres(rng: &mut dyn RngCore) -> SceneSetup {
    let mut world = HittableList::new();

    let ground = Arc::new(Lambertian::from_texture(ground_checker()));
    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            // Keep clear of the metal feature sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_color(rng) * random_color(rng);
                let end = center + Vec3::new(0.0, gen_range(rng, 0.0, 0.5), 0.0);
                world.add(Box::new(Sphere::moving(
                    center,
                    end,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else {
                let material: Arc<dyn Material> = if choose_mat < 0.95 {
                    let albedo = random_color_range(rng, 0.5, 1.0);
                    let fuzz = gen_range(rng, 0.0, 0.5);
                    Arc::new(Metal::new(albedo, fuzz))
                } else {
                    Arc::new(Dielectric::new(1.5))
                };
                world.add(Box::new(Sphere::stationary(center, 0.2, material)));
            }
        }
    }

    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::stationary(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::stationary(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    SceneSetup {
        world,
        camera: showcase_camera().with_lens(20.0, 0.6, 10.0),
    }
}

/// Two large spheres sharing one checker texture.
pub fn checkered_spheres() -> SceneSetup {
    let mut world = HittableList::new();
    let material = Arc::new(Lambertian::from_texture(ground_checker()));

    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, -10.0, 0.0),
        10.0,
        material.clone(),
    )));
    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, 10.0, 0.0),
        10.0,
        material,
    )));

    SceneSetup {
        world,
        camera: showcase_camera().with_lens(20.0, 0.0, 10.0),
    }
}

/// A globe wrapped in the image at `texture_path`.
///
/// A missing or unreadable image renders the globe cyan.
pub fn earth(texture_path: &Path) -> SceneSetup {
    let texture = Arc::new(ImageTexture::new(TextureImage::load_or_empty(texture_path)));
    let mut world = HittableList::new();
    world.add(Box::new(Sphere::stationary(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::from_texture(texture)),
    )));

    let camera = showcase_camera()
        .with_position(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    SceneSetup { world, camera }
}

/// A yellow ground and one metal sphere.
pub fn simple() -> SceneSetup {
    let mut world = HittableList::new();
    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0))),
    )));
    world.add(Box::new(Sphere::stationary(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.1)),
    )));

    let camera = Camera::new().with_image(16.0 / 9.0, 400).with_quality(10, 10);

    SceneSetup { world, camera }
}
