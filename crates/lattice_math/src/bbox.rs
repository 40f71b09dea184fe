use crate::{Ray, Vec3};

/// Axis-aligned bounding box used by the grid and by every geometric object.
///
/// Stored as six scalars. `x0 <= x1` (and likewise for y, z) holds for every
/// box except [`BBox::EMPTY`], whose inverted bounds make it the identity of
/// [`BBox::expand_to_fit`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct BBox {
    pub x0: f32,
    pub x1: f32,
    pub y0: f32,
    pub y1: f32,
    pub z0: f32,
    pub z1: f32,
}

/// Entry and exit distances of a ray along one axis slab `[lo, hi]`.
///
/// A zero direction component means the ray runs parallel to the slab: the
/// range is `(-inf, inf)` when the origin lies within the slab and the empty
/// range `(inf, -inf)` otherwise. No NaN ever comes out of this function.
#[inline]
pub fn slab(lo: f32, hi: f32, origin: f32, dir: f32) -> (f32, f32) {
    if dir == 0.0 {
        if origin < lo || origin > hi {
            (f32::INFINITY, f32::NEG_INFINITY)
        } else {
            (f32::NEG_INFINITY, f32::INFINITY)
        }
    } else {
        let inv = 1.0 / dir;
        let t0 = (lo - origin) * inv;
        let t1 = (hi - origin) * inv;
        if inv >= 0.0 {
            (t0, t1)
        } else {
            (t1, t0)
        }
    }
}

impl BBox {
    /// The union identity: contains nothing.
    pub const EMPTY: BBox = BBox {
        x0: f32::INFINITY,
        x1: f32::NEG_INFINITY,
        y0: f32::INFINITY,
        y1: f32::NEG_INFINITY,
        z0: f32::INFINITY,
        z1: f32::NEG_INFINITY,
    };

    /// Box of an unbounded object such as an infinite plane.
    pub const UNBOUNDED: BBox = BBox {
        x0: f32::NEG_INFINITY,
        x1: f32::INFINITY,
        y0: f32::NEG_INFINITY,
        y1: f32::INFINITY,
        z0: f32::NEG_INFINITY,
        z1: f32::INFINITY,
    };

    /// Create a box from its six bounds.
    pub fn new(x0: f32, x1: f32, y0: f32, y1: f32, z0: f32, z1: f32) -> Self {
        Self {
            x0,
            x1,
            y0,
            y1,
            z0,
            z1,
        }
    }

    /// Create a box from two opposite corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, max.x, min.y, max.y, min.z, max.z)
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x0, self.y0, self.z0)
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x1, self.y1, self.z1)
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.x0, self.y0, self.z0),
            Vec3::new(self.x1, self.y0, self.z0),
            Vec3::new(self.x0, self.y1, self.z0),
            Vec3::new(self.x1, self.y1, self.z0),
            Vec3::new(self.x0, self.y0, self.z1),
            Vec3::new(self.x1, self.y0, self.z1),
            Vec3::new(self.x0, self.y1, self.z1),
            Vec3::new(self.x1, self.y1, self.z1),
        ]
    }

    /// True for the empty sentinel and any other inverted box.
    pub fn is_empty(&self) -> bool {
        self.x0 > self.x1 || self.y0 > self.y1 || self.z0 > self.z1
    }

    /// True when all six bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min().is_finite() && self.max().is_finite()
    }

    /// Grow this box so it also encloses `other`.
    pub fn expand_to_fit(&mut self, other: &BBox) {
        self.x0 = self.x0.min(other.x0);
        self.y0 = self.y0.min(other.y0);
        self.z0 = self.z0.min(other.z0);
        self.x1 = self.x1.max(other.x1);
        self.y1 = self.y1.max(other.y1);
        self.z1 = self.z1.max(other.z1);
    }

    /// Box enclosing both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        let mut out = *self;
        out.expand_to_fit(other);
        out
    }

    /// Box grown by `delta` on every side.
    pub fn padded(&self, delta: f32) -> BBox {
        BBox::new(
            self.x0 - delta,
            self.x1 + delta,
            self.y0 - delta,
            self.y1 + delta,
            self.z0 - delta,
            self.z1 + delta,
        )
    }

    /// True if `other` lies entirely within this box (boundaries included).
    pub fn contains_box(&self, other: &BBox) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.y0 >= self.y0
            && other.y1 <= self.y1
            && other.z0 >= self.z0
            && other.z1 <= self.z1
    }

    /// Strict containment test for a point.
    pub fn inside(&self, p: Vec3) -> bool {
        (p.x > self.x0 && p.x < self.x1)
            && (p.y > self.y0 && p.y < self.y1)
            && (p.z > self.z0 && p.z < self.z1)
    }

    /// Entry and exit distances of the ray through the box, if it crosses it
    /// in front of the origin.
    pub fn hit_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let o = ray.origin;
        let d = ray.direction;

        let (tx0, tx1) = slab(self.x0, self.x1, o.x, d.x);
        let (ty0, ty1) = slab(self.y0, self.y1, o.y, d.y);
        let (tz0, tz1) = slab(self.z0, self.z1, o.z, d.z);

        let t0 = tx0.max(ty0).max(tz0);
        let t1 = tx1.min(ty1).min(tz1);

        if t0 < t1 && t1 > 0.0 {
            Some((t0, t1))
        } else {
            None
        }
    }

    /// Slab test: does the ray pass through the box in front of its origin?
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.hit_interval(ray).is_some()
    }
}
