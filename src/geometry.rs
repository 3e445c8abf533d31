use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in map coordinates (top-left origin, y down).
///
/// Values are accepted as given: negative positions are fine, and negative
/// dimensions are not validated or corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edge-inclusive intersection test: boxes that merely share a boundary
    /// line still count as intersecting. The separation comparison is strict
    /// `<` on purpose; downstream overlap decisions depend on it.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.x + self.width < other.x
            || other.x + other.width < self.x
            || self.y + self.height < other.y
            || other.y + other.height < self.y)
    }

    /// A new box offset by `(dx, dy)`, same size. The receiver is untouched.
    pub fn translated(&self, dx: f32, dy: f32) -> BoundingBox {
        BoundingBox {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Area of the intersection of two boxes, zero when disjoint.
pub fn overlap_area(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = a.right().min(b.right());
    let y1 = a.bottom().min(b.bottom());
    let w = (x1 - x0).max(0.0);
    let h = (y1 - y0).max(0.0);
    w * h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersects_is_symmetric() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
        let c = BoundingBox::new(100.0, 100.0, 4.0, 4.0);
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert_eq!(a.intersects(&c), c.intersects(&a));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersects_self() {
        let a = BoundingBox::new(-3.0, 7.0, 12.0, 5.0);
        assert!(a.intersects(&a));
    }

    #[test]
    fn edge_touching_boxes_intersect() {
        // b starts exactly where a ends; inclusive boundary means overlap.
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        let below = BoundingBox::new(0.0, 10.0, 10.0, 10.0);
        assert!(a.intersects(&below));
        // Strictly separated by any positive gap.
        let apart = BoundingBox::new(10.1, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn translated_returns_new_box() {
        let a = BoundingBox::new(30.0, 83.0, 25.0, 12.0);
        let b = a.translated(0.0, -15.0);
        assert_eq!(b, BoundingBox::new(30.0, 68.0, 25.0, 12.0));
        assert_eq!(a, BoundingBox::new(30.0, 83.0, 25.0, 12.0));
    }

    #[test]
    fn overlap_area_of_disjoint_boxes_is_zero() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(30.0, 30.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &b), 0.0);
        let c = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &c), 25.0);
    }
}
