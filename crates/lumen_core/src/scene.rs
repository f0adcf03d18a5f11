//! Scene description files.
//!
//! A scene file is JSON holding a camera block, named textures, named
//! materials and a list of spheres. Textures and materials are referenced
//! by name so several spheres can share one material instance.
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "lookfrom": [13, 2, 3], "vfov": 20 },
//!   "textures": {
//!     "checker": { "type": "checker", "scale": 0.32, "even": [0.2, 0.3, 0.1], "odd": [0.9, 0.9, 0.9] }
//!   },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": "checker" },
//!     "mirror": { "type": "metal", "albedo": [0.8, 0.8, 0.8], "fuzz": 0.1 }
//!   },
//!   "spheres": [
//!     { "center": [0, -1000, 0], "radius": 1000, "material": "ground" },
//!     { "center": [0, 1, 0], "center_end": [0, 1.5, 0], "radius": 1, "material": "mirror" }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Sphere {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("'{owner}' references unknown texture '{name}'")]
    UnknownTexture { owner: String, name: String },

    #[error("Texture '{0}' references itself through its checker pattern")]
    TextureCycle(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub lookfrom: [f32; 3],
    pub lookat: [f32; 3],
    pub vup: [f32; 3],
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from `lookfrom` to the plane of perfect focus
    pub focus_dist: f32,
    /// Solid background color; the sky gradient is used when absent
    pub background: Option<[f32; 3]>,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            lookfrom: [0.0, 0.0, 0.0],
            lookat: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: None,
        }
    }
}

/// Either an inline color or the name of a texture in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureRef {
    Color([f32; 3]),
    Named(String),
}

/// A texture definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDesc {
    Solid {
        color: [f32; 3],
    },
    Checker {
        scale: f32,
        even: TextureRef,
        odd: TextureRef,
    },
    /// Image file; relative paths resolve against the scene file's directory.
    Image {
        path: String,
    },
}

/// A material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: TextureRef,
    },
    Metal {
        albedo: [f32; 3],
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        refraction_index: f32,
    },
}

/// A sphere placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: [f32; 3],
    /// End position at time 1 for a moving sphere.
    #[serde(default)]
    pub center_end: Option<[f32; 3]>,
    pub radius: f32,
    pub material: String,
}

/// A complete scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub camera: CameraDesc,
    pub textures: BTreeMap<String, TextureDesc>,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub spheres: Vec<SphereDesc>,
}

impl SceneFile {
    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneFile = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read, parse and validate a scene file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;

        log::info!(
            "Loaded scene {}: {} textures, {} materials, {} spheres",
            path.display(),
            scene.textures.len(),
            scene.materials.len(),
            scene.spheres.len()
        );

        Ok(scene)
    }

    /// Serialize the scene to pretty-printed JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every texture and material reference resolves and that
    /// checker textures do not nest into themselves.
    pub fn validate(&self) -> SceneResult<()> {
        for (name, texture) in &self.textures {
            if let TextureDesc::Checker { even, odd, .. } = texture {
                self.check_texture_ref(name, even)?;
                self.check_texture_ref(name, odd)?;
            }
            self.check_acyclic(name, &mut HashSet::new())?;
        }

        for (name, material) in &self.materials {
            if let MaterialDesc::Lambertian { albedo } = material {
                self.check_texture_ref(name, albedo)?;
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !self.materials.contains_key(&sphere.material) {
                return Err(SceneError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                });
            }
        }

        Ok(())
    }

    fn check_texture_ref(&self, owner: &str, texture: &TextureRef) -> SceneResult<()> {
        match texture {
            TextureRef::Named(name) if !self.textures.contains_key(name) => {
                Err(SceneError::UnknownTexture {
                    owner: owner.to_string(),
                    name: name.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_acyclic<'a>(&'a self, name: &'a str, visiting: &mut HashSet<&'a str>) -> SceneResult<()> {
        if !visiting.insert(name) {
            return Err(SceneError::TextureCycle(name.to_string()));
        }
        if let Some(TextureDesc::Checker { even, odd, .. }) = self.textures.get(name) {
            for child in [even, odd] {
                if let TextureRef::Named(child) = child {
                    self.check_acyclic(child, visiting)?;
                }
            }
        }
        visiting.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SPHERES: &str = r#"{
        "camera": { "image_width": 64, "lookfrom": [13, 2, 3], "lookat": [0, 0, 0], "vfov": 20 },
        "textures": {
            "checker": { "type": "checker", "scale": 0.32, "even": [0.2, 0.3, 0.1], "odd": [0.9, 0.9, 0.9] }
        },
        "materials": {
            "ground": { "type": "lambertian", "albedo": "checker" },
            "mirror": { "type": "metal", "albedo": [0.8, 0.8, 0.8] },
            "glass": { "type": "dielectric", "refraction_index": 1.5 }
        },
        "spheres": [
            { "center": [0, -10, 0], "radius": 10, "material": "ground" },
            { "center": [0, 1, 0], "center_end": [0, 1.5, 0], "radius": 1, "material": "mirror" }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneFile::from_json_str(TWO_SPHERES).unwrap();

        assert_eq!(scene.camera.image_width, 64);
        assert_eq!(scene.camera.vfov, 20.0);
        // Unspecified fields keep their defaults
        assert_eq!(scene.camera.samples_per_pixel, 10);
        assert_eq!(scene.camera.focus_dist, 10.0);
        assert_eq!(scene.camera.background, None);

        assert_eq!(scene.spheres.len(), 2);
        assert_eq!(scene.spheres[1].center_end, Some([0.0, 1.5, 0.0]));
        assert_eq!(
            scene.materials["mirror"],
            MaterialDesc::Metal {
                albedo: [0.8, 0.8, 0.8],
                fuzz: 0.0
            }
        );
        assert_eq!(
            scene.materials["ground"],
            MaterialDesc::Lambertian {
                albedo: TextureRef::Named("checker".into())
            }
        );
    }

    #[test]
    fn test_empty_scene_uses_defaults() {
        let scene = SceneFile::from_json_str("{}").unwrap();
        assert_eq!(scene.camera, CameraDesc::default());
        assert!(scene.spheres.is_empty());
    }

    #[test]
    fn test_unknown_material() {
        let json = r#"{ "spheres": [ { "center": [0, 0, 0], "radius": 1, "material": "nope" } ] }"#;
        let err = SceneFile::from_json_str(json).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial { index: 0, ref name } if name == "nope"));
    }

    #[test]
    fn test_unknown_texture() {
        let json = r#"{ "materials": { "m": { "type": "lambertian", "albedo": "missing" } } }"#;
        let err = SceneFile::from_json_str(json).unwrap_err();
        assert!(matches!(err, SceneError::UnknownTexture { .. }));
    }

    #[test]
    fn test_checker_cycle_is_rejected() {
        let json = r#"{ "textures": {
            "a": { "type": "checker", "scale": 1, "even": "b", "odd": [0, 0, 0] },
            "b": { "type": "checker", "scale": 1, "even": [1, 1, 1], "odd": "a" }
        } }"#;
        let err = SceneFile::from_json_str(json).unwrap_err();
        assert!(matches!(err, SceneError::TextureCycle(_)));
    }

    #[test]
    fn test_shared_texture_is_not_a_cycle() {
        let json = r#"{ "textures": {
            "white": { "type": "solid", "color": [1, 1, 1] },
            "c": { "type": "checker", "scale": 1, "even": "white", "odd": "white" }
        } }"#;
        assert!(SceneFile::from_json_str(json).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneFile::from_json_str("{ \"spheres\": 3 }").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let scene = SceneFile::from_json_str(TWO_SPHERES).unwrap();
        let json = scene.to_json_string().unwrap();
        assert_eq!(SceneFile::from_json_str(&json).unwrap(), scene);
    }
}
