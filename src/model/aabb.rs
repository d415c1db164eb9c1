use glam::Vec3;

/// Axis-aligned bounding box given by its min and max corners.
///
/// Boxes are cheap to build and are recomputed every frame from the owner's
/// current position, never stored between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from two arbitrary corners. Components are reordered so that
    /// `min <= max` always holds.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Slab test: overlap on all three axes. Touching faces count as overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.min.cmple(p).all() && self.max.cmpge(p).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let ball = Aabb::from_corners(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 2.0, 0.5));
        let obstacle = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        assert!(ball.intersects(&obstacle));
    }

    #[test]
    fn test_separated_on_one_axis_does_not_intersect() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_corners(Vec3::new(0.5, 0.5, 1.5), Vec3::new(2.0, 2.0, 3.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_corners(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let boxes = [
            Aabb::from_corners(Vec3::ZERO, Vec3::ONE),
            Aabb::from_corners(Vec3::splat(-3.0), Vec3::splat(3.0)),
            Aabb::from_corners(Vec3::new(0.9, -1.0, 0.2), Vec3::new(4.0, 0.1, 0.4)),
            Aabb::from_corners(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0)),
            Aabb::from_center_half_extents(Vec3::new(1.0, 0.5, 0.0), Vec3::splat(0.5)),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_corners_are_ordered() {
        let b = Aabb::from_corners(Vec3::new(2.0, -1.0, 5.0), Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 1.0, 5.0));

        let h = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
        assert!(h.min.cmple(h.max).all());
    }

    #[test]
    fn test_containment_implies_intersection() {
        let outer = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(2.0));
        let inner = Aabb::from_center_half_extents(Vec3::new(0.5, 0.0, 0.0), Vec3::splat(0.5));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.intersects(&inner));
        assert!(outer.contains_point(inner.center()));
    }
}
