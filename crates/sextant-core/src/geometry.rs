//! Geometric primitives for layout and positioning.
//!
//! This module provides the fundamental geometric types every Sextant layout
//! engine uses to express positions, sizes and extents.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Circle`] - A center point and a radius, used by the pack layout
//!
//! # Coordinate System
//!
//! Sextant uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

use serde::Deserialize;

/// A 2D point representing a position in scene coordinate space.
///
/// # Examples
///
/// ```
/// # use sextant_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant_core::geometry::Point;
    /// let doubled = Point::new(10.0, 20.0).scale(2.0);
    /// assert_eq!(doubled.x(), 20.0);
    /// assert_eq!(doubled.y(), 40.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the smaller of the two dimensions
    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }

    /// Returns the center point of a viewport with this size anchored at the origin
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant_core::geometry::{Bounds, Point, Size};
    /// let header = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let content = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = header.merge(&content);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Finds where the ray from the center of the bounds towards `target`
    /// leaves the rectangle.
    ///
    /// When `target` coincides with the center the center itself is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant_core::geometry::{Bounds, Point, Size};
    /// let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(40.0, 20.0));
    /// let exit = bounds.boundary_point_toward(Point::new(100.0, 0.0));
    /// assert_eq!(exit, Point::new(20.0, 0.0));
    /// ```
    pub fn boundary_point_toward(&self, target: Point) -> Point {
        let center = self.center();
        let delta = target.sub_point(center);
        if delta.hypot() < 0.001 {
            return center;
        }

        let half_w = self.width() / 2.0;
        let half_h = self.height() / 2.0;

        let scale_x = if delta.x.abs() > f32::EPSILON {
            half_w / delta.x.abs()
        } else {
            f32::INFINITY
        };
        let scale_y = if delta.y.abs() > f32::EPSILON {
            half_h / delta.y.abs()
        } else {
            f32::INFINITY
        };

        center.add_point(delta.scale(scale_x.min(scale_y)))
    }
}

/// A circle given by its center and radius.
///
/// # Examples
///
/// ```
/// # use sextant_core::geometry::{Circle, Point};
/// let outer = Circle::new(Point::new(0.0, 0.0), 10.0);
/// let inner = Circle::new(Point::new(3.0, 0.0), 5.0);
/// assert!(outer.contains_circle(&inner, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f32,
}

impl Circle {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns the center of the circle
    pub fn center(self) -> Point {
        self.center
    }

    /// Returns the radius of the circle
    pub fn radius(self) -> f32 {
        self.radius
    }

    /// Returns the axis-aligned bounds of the circle
    pub fn bounds(self) -> Bounds {
        Bounds::new_from_center(self.center, Size::new(self.radius * 2.0, self.radius * 2.0))
    }

    /// Checks whether `other` lies fully inside this circle, allowing
    /// `tolerance` units of overshoot.
    pub fn contains_circle(&self, other: &Circle, tolerance: f32) -> bool {
        self.center.distance(other.center) + other.radius <= self.radius + tolerance
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_operations() {
        let p = Point::new(3.0, 4.0);
        assert_approx_eq!(f32, p.hypot(), 5.0);
        assert_approx_eq!(f32, p.distance(Point::new(0.0, 0.0)), 5.0);

        let moved = p.add_point(Point::new(1.0, -1.0));
        assert_eq!(moved, Point::new(4.0, 3.0));
        assert_eq!(moved.sub_point(Point::new(1.0, -1.0)), p);
    }

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, 10.0));
    }

    #[test]
    fn test_size_center_and_min_side() {
        let size = Size::new(720.0, 420.0);
        assert_eq!(size.center(), Point::new(360.0, 210.0));
        assert_approx_eq!(f32, size.min_side(), 420.0);
    }

    #[test]
    fn test_bounds_from_center() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 50.0), Size::new(20.0, 10.0));
        assert_approx_eq!(f32, bounds.min_x(), 40.0);
        assert_approx_eq!(f32, bounds.min_y(), 45.0);
        assert_approx_eq!(f32, bounds.max_x(), 60.0);
        assert_approx_eq!(f32, bounds.max_y(), 55.0);
        assert_eq!(bounds.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_boundary_point_vertical() {
        let bounds = Bounds::new_from_center(Point::new(0.0, 0.0), Size::new(160.0, 80.0));
        let exit = bounds.boundary_point_toward(Point::new(0.0, 500.0));
        assert_approx_eq!(f32, exit.x(), 0.0);
        assert_approx_eq!(f32, exit.y(), 40.0);
    }

    #[test]
    fn test_boundary_point_same_point_returns_center() {
        let bounds = Bounds::new_from_center(Point::new(7.0, 9.0), Size::new(10.0, 10.0));
        assert_eq!(bounds.boundary_point_toward(Point::new(7.0, 9.0)), bounds.center());
    }

    #[test]
    fn test_circle_containment() {
        let parent = Circle::new(Point::new(0.0, 0.0), 10.0);
        let inside = Circle::new(Point::new(4.0, 0.0), 6.0);
        let poking_out = Circle::new(Point::new(5.0, 0.0), 6.0);

        assert!(parent.contains_circle(&inside, 0.0));
        assert!(!parent.contains_circle(&poking_out, 0.0));
        assert!(parent.contains_circle(&poking_out, 1.0));
    }

    #[test]
    fn test_circle_bounds() {
        let bounds = Circle::new(Point::new(10.0, 10.0), 5.0).bounds();
        assert_approx_eq!(f32, bounds.width(), 10.0);
        assert_approx_eq!(f32, bounds.min_x(), 5.0);
    }
}
