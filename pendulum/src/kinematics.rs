/// A point in the vertical plane `(x, y)` with `y` pointing up (m).
pub type Point = (f64, f64);

/// Positions of the pivot and both bobs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkPositions {
    pub pivot: Point,
    pub bob1: Point,
    pub bob2: Point,
}

impl LinkPositions {
    /// The polyline pivot -> bob1 -> bob2.
    pub fn points(&self) -> [Point; 3] {
        [self.pivot, self.bob1, self.bob2]
    }
}

/// Forward kinematics for rods of length `l1`, `l2` hanging from a pivot at `(pivot_x, 0)`,
/// angles measured from the downward vertical.
pub fn link_positions(l1: f64, l2: f64, pivot_x: f64, theta1: f64, theta2: f64) -> LinkPositions {
    let pivot = (pivot_x, 0.0);
    let bob1 = (pivot_x + l1 * theta1.sin(), -l1 * theta1.cos());
    let bob2 = (bob1.0 + l2 * theta2.sin(), bob1.1 - l2 * theta2.cos());
    LinkPositions { pivot, bob1, bob2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_hanging_down() {
        let links = link_positions(1.0, 2.0, 0.0, 0.0, 0.0);
        assert_eq!(links.bob1, (0.0, -1.0));
        assert_eq!(links.bob2, (0.0, -3.0));
    }

    #[test]
    fn test_horizontal_links_on_cart() {
        let links = link_positions(1.0, 0.5, 2.0, PI / 2.0, -PI / 2.0);
        assert_eq!(links.pivot, (2.0, 0.0));
        assert_relative_eq!(links.bob1.0, 3.0, epsilon = 1e-12);
        assert_relative_eq!(links.bob1.1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(links.bob2.0, 2.5, epsilon = 1e-12);
        assert_relative_eq!(links.bob2.1, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rod_lengths_preserved() {
        let links = link_positions(1.3, 0.7, -1.0, 2.1, -0.4);
        let [p, b1, b2] = links.points();
        assert_relative_eq!((b1.0 - p.0).hypot(b1.1 - p.1), 1.3, epsilon = 1e-12);
        assert_relative_eq!((b2.0 - b1.0).hypot(b2.1 - b1.1), 0.7, epsilon = 1e-12);
    }
}
