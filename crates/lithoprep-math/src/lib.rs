#![warn(missing_docs)]

//! Math types for the lithoprep print-preparation core.
//!
//! Thin wrappers around nalgebra providing the domain types the
//! pipeline works in: points, vectors, rigid transforms, axis-aligned
//! bounding boxes, and split planes with in-plane bases.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Tolerance for degenerate-geometry checks.
pub const GEOM_TOL: f64 = 1e-9;

/// One of the three global coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Y => Vec3::new(0.0, 1.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Component index (0, 1, 2) of this axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// All three axes, in X, Y, Z order.
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

/// A rigid affine transformation (rotation + translation).
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Rotation about an arbitrary axis through the origin by `angle`
    /// radians (Rodrigues' formula).
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Compose: apply `self` first, then `other` (`other * self`).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (rotation only, no translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Transform a bounding box: the Aabb of the eight transformed corners.
    pub fn apply_aabb(&self, b: &Aabb) -> Aabb {
        Aabb::from_points(b.corners().iter().map(|c| self.apply_point(c)))
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Box from explicit corners. Components of `min` must not exceed `max`.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// The inverted empty box: grows to fit whatever is included.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Bounding box of a point set.
    pub fn from_points<I: IntoIterator<Item = Point3>>(points: I) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.include(&p);
        }
        b
    }

    /// True if nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Grow to include a point.
    pub fn include(&mut self, p: &Point3) {
        for i in 0..3 {
            if p[i] < self.min[i] {
                self.min[i] = p[i];
            }
            if p[i] > self.max[i] {
                self.max[i] = p[i];
            }
        }
    }

    /// Extent along each axis.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Extent along one axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// The three extents in ascending order.
    pub fn sorted_extents(&self) -> [f64; 3] {
        let e = self.extents();
        let mut dims = [e.x, e.y, e.z];
        dims.sort_by(|a, b| a.total_cmp(b));
        dims
    }

    /// Axis with the largest extent.
    pub fn longest_axis(&self) -> Axis {
        let e = self.extents();
        if e.x >= e.y && e.x >= e.z {
            Axis::X
        } else if e.y >= e.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Center point.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut b = *self;
        b.include(&other.min);
        b.include(&other.max);
        b
    }

    /// Box grown by `margin` on every side (XY and Z alike).
    pub fn expanded(&self, margin: f64) -> Aabb {
        let m = Vec3::new(margin, margin, margin);
        Aabb {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// True if the boxes overlap (closed intervals).
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }

    /// Overlap region, or `None` if disjoint.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        let mut min = self.min;
        let mut max = self.max;
        for i in 0..3 {
            min[i] = min[i].max(other.min[i]);
            max[i] = max[i].min(other.max[i]);
        }
        Some(Aabb { min, max })
    }

    /// True if `p` lies inside or on the boundary.
    pub fn contains_point(&self, p: &Point3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// True if `other` lies fully inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..3).all(|i| other.min[i] >= self.min[i] && other.max[i] <= self.max[i])
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Length of the main diagonal.
    pub fn diagonal(&self) -> f64 {
        self.extents().norm()
    }
}

/// An oriented plane: origin, unit normal, and a derived in-plane basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal; the "positive" side is where it points.
    pub normal: Dir3,
}

impl Plane {
    /// Plane through `origin` with the given normal.
    ///
    /// Returns `None` if the normal is degenerate.
    pub fn new(origin: Point3, normal: Vec3) -> Option<Self> {
        Unit::try_new(normal, GEOM_TOL).map(|normal| Self { origin, normal })
    }

    /// Plane perpendicular to `axis` at coordinate `position`.
    pub fn axis_aligned(axis: Axis, position: f64) -> Self {
        let mut origin = Point3::origin();
        origin[axis.index()] = position;
        Self {
            origin,
            normal: Unit::new_unchecked(axis.unit()),
        }
    }

    /// Two orthonormal in-plane directions `(u, v)`.
    ///
    /// Derived solely from the normal, so both halves of a split share
    /// the exact same basis.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let n = self.normal.as_ref();
        let reference = if n.x.abs() < 0.9 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        };
        let u = n.cross(&reference).normalize();
        let v = n.cross(&u).normalize();
        (u, v)
    }

    /// Signed distance from `p` to the plane (positive on the normal side).
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_rotation_x() {
        let t = Transform::rotation_x(std::f64::consts::FRAC_PI_2);
        let p = t.apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_then_applies_in_order() {
        // Rotate 90 about Z, then translate +X.
        let t = Transform::rotation_z(std::f64::consts::FRAC_PI_2)
            .then(&Transform::translation(5.0, 0.0, 0.0));
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_vec_ignores_translation() {
        let t = Transform::translation(10.0, 20.0, 30.0);
        let v = t.apply_vec(&Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(v.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aabb_union_and_extents() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        let b = Aabb::new(Point3::new(-1.0, 1.0, 1.0), Point3::new(0.5, 5.0, 2.0));
        let u = a.union(&b);
        assert_relative_eq!(u.min.x, -1.0);
        assert_relative_eq!(u.max.y, 5.0);
        assert_eq!(u.longest_axis(), Axis::Y);
    }

    #[test]
    fn test_aabb_sorted_extents() {
        let b = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.2, 1.0));
        let dims = b.sorted_extents();
        assert_relative_eq!(dims[0], 0.2);
        assert_relative_eq!(dims[1], 1.0);
        assert_relative_eq!(dims[2], 3.0);
    }

    #[test]
    fn test_aabb_transform() {
        let b = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let t = Transform::rotation_z(std::f64::consts::FRAC_PI_2);
        let r = t.apply_aabb(&b);
        // X extent becomes Y extent.
        assert_relative_eq!(r.extents().y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(r.extents().x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(3.0, 3.0, 3.0));
        let i = a.intersection(&b).unwrap();
        assert_relative_eq!(i.min.x, 1.0);
        assert_relative_eq!(i.max.x, 2.0);
        let c = Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_plane_basis_orthonormal() {
        let p = Plane::new(Point3::origin(), Vec3::new(0.3, -0.4, 0.866)).unwrap();
        let (u, v) = p.basis();
        assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
        assert_relative_eq!(u.dot(p.normal.as_ref()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_signed_distance() {
        let p = Plane::axis_aligned(Axis::Y, 10.0);
        assert_relative_eq!(p.signed_distance(&Point3::new(0.0, 12.0, 0.0)), 2.0);
        assert_relative_eq!(p.signed_distance(&Point3::new(5.0, 7.0, 3.0)), -3.0);
    }

    #[test]
    fn test_degenerate_plane_rejected() {
        assert!(Plane::new(Point3::origin(), Vec3::new(0.0, 0.0, 0.0)).is_none());
    }
}
