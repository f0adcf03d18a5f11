//! Turning scene descriptions into renderable worlds.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lumen_core::{
    CameraDesc, MaterialDesc, SceneFile, SceneResult, TextureDesc, TextureImage, TextureRef,
};
use lumen_math::Vec3;

use crate::{
    Background, Camera, CheckerTexture, Color, Dielectric, HittableList, ImageTexture, Lambertian,
    Material, Metal, SolidColor, Sphere, Texture,
};

/// A world and the camera that looks at it.
pub struct SceneSetup {
    pub world: HittableList,
    pub camera: Camera,
}

/// Build a camera from its description.
pub fn camera_from_desc(desc: &CameraDesc) -> Camera {
    let background = match desc.background {
        Some(color) => Background::Solid(Vec3::from_array(color)),
        None => Background::Sky,
    };

    let mut camera = Camera::new()
        .with_image(desc.aspect_ratio, desc.image_width)
        .with_quality(desc.samples_per_pixel, desc.max_depth)
        .with_position(
            Vec3::from_array(desc.lookfrom),
            Vec3::from_array(desc.lookat),
            Vec3::from_array(desc.vup),
        )
        .with_lens(desc.vfov, desc.defocus_angle, desc.focus_dist)
        .with_background(background);
    camera.initialize();
    camera
}

/// Build the world and camera for a scene file.
///
/// Image texture paths are resolved against `base_dir` when they are
/// relative. An image that fails to load renders as cyan instead of
/// failing the scene.
pub fn build_scene(desc: &SceneFile, base_dir: Option<&Path>) -> SceneResult<SceneSetup> {
    desc.validate()?;

    let mut builder = Builder {
        desc,
        base_dir,
        textures: HashMap::new(),
    };

    let mut materials: HashMap<&str, Arc<dyn Material>> = HashMap::new();
    for (name, material) in &desc.materials {
        let material: Arc<dyn Material> = match material {
            MaterialDesc::Lambertian { albedo } => {
                Arc::new(Lambertian::from_texture(builder.texture_ref(albedo)))
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                Arc::new(Metal::new(Color::from_array(*albedo), *fuzz))
            }
            MaterialDesc::Dielectric { refraction_index } => {
                Arc::new(Dielectric::new(*refraction_index))
            }
        };
        materials.insert(name.as_str(), material);
    }

    let mut world = HittableList::new();
    for sphere in &desc.spheres {
        // validate() guarantees the lookup
        let Some(material) = materials.get(sphere.material.as_str()) else {
            continue;
        };
        let center = Vec3::from_array(sphere.center);
        let object = match sphere.center_end {
            Some(end) => {
                Sphere::moving(center, Vec3::from_array(end), sphere.radius, material.clone())
            }
            None => Sphere::stationary(center, sphere.radius, material.clone()),
        };
        world.add(Box::new(object));
    }

    log::debug!(
        "Built scene: {} materials, {} spheres",
        materials.len(),
        world.len()
    );

    Ok(SceneSetup {
        world,
        camera: camera_from_desc(&desc.camera),
    })
}

/// Resolves named textures once so materials can share them.
struct Builder<'a> {
    desc: &'a SceneFile,
    base_dir: Option<&'a Path>,
    textures: HashMap<String, Arc<dyn Texture>>,
}

impl Builder<'_> {
    fn texture_ref(&mut self, texture: &TextureRef) -> Arc<dyn Texture> {
        match texture {
            TextureRef::Color(color) => Arc::new(SolidColor::new(Color::from_array(*color))),
            TextureRef::Named(name) => self.named(name),
        }
    }

    fn named(&mut self, name: &str) -> Arc<dyn Texture> {
        if let Some(texture) = self.textures.get(name) {
            return texture.clone();
        }

        let desc = self.desc;
        let texture: Arc<dyn Texture> = match desc.textures.get(name) {
            Some(TextureDesc::Solid { color }) => {
                Arc::new(SolidColor::new(Color::from_array(*color)))
            }
            Some(TextureDesc::Checker { scale, even, odd }) => {
                let even = self.texture_ref(even);
                let odd = self.texture_ref(odd);
                Arc::new(CheckerTexture::new(*scale, even, odd))
            }
            Some(TextureDesc::Image { path }) => {
                let path = match self.base_dir {
                    Some(dir) => dir.join(path),
                    None => Path::new(path).to_path_buf(),
                };
                Arc::new(ImageTexture::new(TextureImage::load_or_empty(path)))
            }
            // Unreachable after validate(); an empty image shows up as cyan
            None => Arc::new(ImageTexture::new(TextureImage::default())),
        };

        self.textures.insert(name.to_string(), texture.clone());
        texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, Ray};
    use lumen_core::SceneError;
    use lumen_math::Interval;

    const SCENE: &str = r#"{
        "camera": { "aspect_ratio": 2.0, "image_width": 40, "samples_per_pixel": 3,
                    "lookfrom": [0, 0, 5], "lookat": [0, 0, 0], "background": [0.1, 0.2, 0.3] },
        "textures": {
            "white": { "type": "solid", "color": [1, 1, 1] },
            "checker": { "type": "checker", "scale": 1.0, "even": "white", "odd": [0, 0, 0] },
            "globe": { "type": "image", "path": "does/not/exist.png" }
        },
        "materials": {
            "ground": { "type": "lambertian", "albedo": "checker" },
            "earth": { "type": "lambertian", "albedo": "globe" },
            "mirror": { "type": "metal", "albedo": [0.8, 0.8, 0.8], "fuzz": 3.0 },
            "glass": { "type": "dielectric", "refraction_index": 1.5 }
        },
        "spheres": [
            { "center": [0, -100, 0], "radius": 99, "material": "ground" },
            { "center": [0, 0, 0], "radius": 1, "material": "earth" },
            { "center": [3, 0, 0], "center_end": [3, 1, 0], "radius": 0.5, "material": "mirror" }
        ]
    }"#;

    #[test]
    fn test_camera_from_desc() {
        let desc = SceneFile::from_json_str(SCENE).unwrap();
        let camera = camera_from_desc(&desc.camera);

        assert_eq!(camera.image_width, 40);
        assert_eq!(camera.image_height(), 20);
        assert_eq!(camera.samples_per_pixel, 3);
        assert_eq!(camera.max_depth, 10);
        assert_eq!(camera.lookfrom, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.background, Background::Solid(Color::new(0.1, 0.2, 0.3)));
    }

    #[test]
    fn test_default_camera_uses_sky() {
        let camera = camera_from_desc(&CameraDesc::default());
        assert_eq!(camera.background, Background::Sky);
        assert_eq!(camera.image_height(), 100);
    }

    #[test]
    fn test_build_scene() {
        let desc = SceneFile::from_json_str(SCENE).unwrap();
        let setup = build_scene(&desc, None).unwrap();

        assert_eq!(setup.world.len(), 3);

        // Missing image file falls back to cyan instead of failing
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = setup.world.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let desc = SceneFile::from_json_str(SCENE).unwrap();
        let setup = build_scene(&desc, None).unwrap();

        // The mirror sphere sits at y = 1 at time 1
        let ray = Ray::new(Vec3::new(3.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 1.0);
        let rec = setup.world.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 4.5).abs() < 1e-4);

        let early = Ray::new(Vec3::new(3.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(setup.world.hit(&early, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_shared_textures_are_built_once() {
        let desc = SceneFile::from_json_str(SCENE).unwrap();
        let mut builder = Builder {
            desc: &desc,
            base_dir: None,
            textures: HashMap::new(),
        };

        let a = builder.named("checker");
        let b = builder.named("checker");
        assert!(Arc::ptr_eq(&a, &b));
        // "white" was resolved while building the checker
        assert_eq!(builder.textures.len(), 2);
        assert_eq!(a.value(0.0, 0.0, Vec3::splat(0.5)), Color::ONE);
        assert_eq!(a.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_invalid_scene_is_rejected() {
        let mut desc = SceneFile::from_json_str(SCENE).unwrap();
        desc.spheres[0].material = "lava".into();
        assert!(matches!(
            build_scene(&desc, None),
            Err(SceneError::UnknownMaterial { index: 0, .. })
        ));
    }
}
