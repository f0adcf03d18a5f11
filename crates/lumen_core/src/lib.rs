//! Lumen Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Texture images**: decoded 8-bit RGB pixel buffers for image textures
//! - **Scene files**: the JSON scene description (camera, textures,
//!   materials, spheres) with reference validation
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneFile;
//!
//! let scene = SceneFile::load("scenes/two_spheres.json")?;
//! println!("Loaded {} spheres", scene.spheres.len());
//! ```

pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    CameraDesc, MaterialDesc, SceneError, SceneFile, SceneResult, SphereDesc, TextureDesc,
    TextureRef,
};
pub use texture::{TextureError, TextureImage, TextureResult};
