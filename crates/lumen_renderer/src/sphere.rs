//! Sphere primitive, stationary or moving linearly over the shutter interval.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// A sphere primitive.
///
/// The center is stored as a ray from the time-0 position towards the
/// time-1 position; a stationary sphere has a zero direction.
pub struct Sphere {
    center: Ray,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a sphere that does not move. Negative radii clamp to zero.
    pub fn stationary(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center: Ray::new_simple(center, Vec3::ZERO),
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `start` at time 0 to `end` at time 1.
    pub fn moving(start: Vec3, end: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let center = Ray::new_simple(start, end - start);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center.at(0.0) - rvec, center.at(0.0) + rvec);
        let box1 = Aabb::from_points(center.at(1.0) - rvec, center.at(1.0) + rvec);

        Self {
            center,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// The path of the center over time.
    pub fn center_ray(&self) -> Ray {
        self.center
    }

    /// Sphere radius (never negative).
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u is the angle around the Y axis starting from X=-1, v the angle
    /// from Y=-1 up to Y=+1, both normalized to [0, 1].
    pub fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // A point has no surface normal
        if self.radius <= 0.0 {
            return None;
        }

        let current_center = self.center.at(ray.time());
        let oc = current_center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - current_center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
