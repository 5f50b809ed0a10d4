//! 2D geometry primitives shared by loop repair and the scanline sweep.

use voxgrid_math::{are_close, Point2};

/// One intersection of a mesh edge with the slicing plane.
///
/// The endpoint pair is unordered; the layer's z height is carried on
/// the layer record, not per segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First endpoint.
    pub a: Point2,
    /// Second endpoint.
    pub b: Point2,
}

impl LineSegment {
    /// Create a segment from two endpoints.
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    /// Create a segment from raw coordinates.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    /// Both endpoints within `tolerance` of each other.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        are_close(&self.a, &self.b, tolerance)
    }

    /// Zero x-extent: the segment never straddles a sweep interval.
    pub fn is_vertical(&self) -> bool {
        self.b.x - self.a.x == 0.0
    }

    /// Endpoints ordered by x, smaller first.
    pub fn endpoints_by_x(&self) -> (Point2, Point2) {
        if self.a.x <= self.b.x {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    /// Y value of the segment's supporting line at `x`.
    ///
    /// Divides by the x-delta; callers must exclude vertical segments.
    pub fn y_at(&self, x: f64) -> f64 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        dy * (x - self.a.x) / dx + self.a.y
    }
}

/// A closed polyline reconstructed from slice segments.
///
/// The first and last points are identical; a valid loop has at least
/// two edges (three stored points).
#[derive(Debug, Clone)]
pub struct SliceLoop {
    /// Vertices in walk order, first repeated as last.
    pub points: Vec<Point2>,
}

impl SliceLoop {
    /// Create a loop from an already-closed point sequence.
    pub fn new(points: Vec<Point2>) -> Self {
        debug_assert!(
            points.len() >= 3 && points.first() == points.last(),
            "loop must be closed with at least two edges"
        );
        Self { points }
    }

    /// Number of edges in the loop.
    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// First and last points coincide within `tolerance`.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => are_close(first, last, tolerance),
            _ => false,
        }
    }

    /// Decompose the loop into consecutive-point edge segments.
    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        self.points
            .windows(2)
            .map(|w| LineSegment::new(w[0], w[1]))
    }

    /// Signed area of the loop.
    /// Positive for counter-clockwise, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.edge_count();
        if n < 2 {
            return 0.0;
        }
        let mut area = 0.0;
        for w in self.points.windows(2) {
            area += w[0].x * w[1].y;
            area -= w[1].x * w[0].y;
        }
        area / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxgrid_math::EPS_STITCH;

    #[test]
    fn test_y_at_interpolates() {
        let seg = LineSegment::from_coords(0.0, 0.0, 10.0, 20.0);
        assert_relative_eq!(seg.y_at(5.0), 10.0);
        assert_relative_eq!(seg.y_at(0.0), 0.0);
        assert_relative_eq!(seg.y_at(10.0), 20.0);
    }

    #[test]
    fn test_endpoints_by_x() {
        let seg = LineSegment::from_coords(7.0, 1.0, 3.0, 2.0);
        let (first, second) = seg.endpoints_by_x();
        assert_eq!(first.x, 3.0);
        assert_eq!(second.x, 7.0);
    }

    #[test]
    fn test_vertical_and_degenerate() {
        assert!(LineSegment::from_coords(2.0, 0.0, 2.0, 5.0).is_vertical());
        assert!(!LineSegment::from_coords(2.0, 0.0, 2.1, 5.0).is_vertical());
        assert!(LineSegment::from_coords(1.0, 1.0, 1.0, 1.0).is_degenerate(EPS_STITCH));
    }

    #[test]
    #[should_panic(expected = "closed")]
    fn test_open_point_sequence_rejected() {
        let _ = SliceLoop::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_loop_area_and_edges() {
        // Unit square, CCW, closed.
        let square = SliceLoop::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ]);
        assert!(square.is_closed(EPS_STITCH));
        assert_eq!(square.edge_count(), 4);
        assert_eq!(square.edges().count(), 4);
        assert_relative_eq!(square.signed_area(), 1.0);
    }
}
