//! Simple 2D polygon with even-odd containment

use crate::core::types::Vec2;

/// Closed polygon; the last vertex connects back to the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Even-odd crossing test. Polygons with fewer than 3 vertices contain
    /// nothing.
    pub fn contains(&self, p: Vec2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y)
                && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        let square = Polygon::from_points([
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        assert!(square.contains(Vec2::new(2.0, 2.0)));
        assert!(!square.contains(Vec2::new(5.0, 2.0)));
        assert!(!square.contains(Vec2::new(2.0, -1.0)));
    }

    #[test]
    fn test_concave() {
        // U shape opening upwards
        let u = Polygon::from_points([
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(4.0, 6.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 6.0),
            Vec2::new(0.0, 6.0),
        ]);
        assert!(u.contains(Vec2::new(1.0, 4.0)));
        assert!(u.contains(Vec2::new(5.0, 4.0)));
        assert!(!u.contains(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_degenerate() {
        let line = Polygon::from_points([Vec2::ZERO, Vec2::ONE]);
        assert!(!line.contains(Vec2::new(0.5, 0.5)));
        assert!(Polygon::new().is_empty());
    }
}
