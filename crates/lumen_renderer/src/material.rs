//! Material trait for surface scattering.

use std::sync::Arc;

use crate::{
    hittable::HitRecord, random::gen_f32, random_unit_vector, Color, Ray, SolidColor, Texture,
};
use lumen_math::{near_zero, Vec3};
use rand::RngCore;

/// Outcome of a scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color filter applied to light arriving along `scattered`
    pub attenuation: Color,
    /// The outgoing ray, leaving from the hit point at the incoming ray's time
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some` if the ray scatters, or `None` if it is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with a constant albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(Arc::new(SolidColor::new(albedo)))
    }

    /// Create a Lambertian material whose albedo is sampled from a texture.
    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    /// Diffuse bounce direction for a given random unit vector.
    ///
    /// Falls back to the normal when the sum degenerates to zero.
    pub fn scatter_direction(normal: Vec3, unit: Vec3) -> Vec3 {
        let direction = normal + unit;
        if near_zero(direction) {
            normal
        } else {
            direction
        }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let direction = Self::scatter_direction(rec.normal, random_unit_vector(rng));

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough (clamped to [0, 1])
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    /// Mirror direction perturbed by `fuzz * unit`. The sum is not
    /// renormalized.
    pub fn scatter_direction(&self, direction: Vec3, normal: Vec3, unit: Vec3) -> Vec3 {
        reflect(direction, normal).normalize() + self.fuzz * unit
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let direction =
            self.scatter_direction(ray_in.direction(), rec.normal, random_unit_vector(rng));

        // Fuzz can push the ray below the surface; absorb it there
        if direction.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, direction, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Refractive index in vacuum or air, or the ratio of the material's
    /// index over the index of the enclosing medium
    refraction_index: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f32, ri: f32) -> f32 {
        let r0 = ((1.0 - ri) / (1.0 + ri)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// True when Snell's law has no solution (total internal reflection).
    pub fn cannot_refract(ri: f32, sin_theta: f32) -> bool {
        ri * sin_theta > 1.0
    }

    /// Relative index seen by a ray: entering from outside divides by the
    /// material index.
    pub fn relative_index(&self, front_face: bool) -> f32 {
        if front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let ri = self.relative_index(rec.front_face);

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let direction = if Self::cannot_refract(ri, sin_theta)
            || Self::reflectance(cos_theta, ri) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
