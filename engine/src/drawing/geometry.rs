// Pixel-space geometry shared by hit testing and the overlay renderer. Shapes are
// always rebuilt from domain points under the current scale, never cached.
use crate::chart::ChartScale;
use crate::coords::{CoordinateMapper, PixelPoint};
use serde::Serialize;
use shared::models::DomainPoint;

pub const FIBONACCI_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

/// Converts every point to pixels, or `None` if any of them cannot be resolved.
pub fn project(mapper: &CoordinateMapper, scale: &dyn ChartScale, points: &[DomainPoint]) -> Option<Vec<PixelPoint>> {
    points
        .iter()
        .map(|p| mapper.domain_to_pixel(scale, *p).ok())
        .collect()
}

pub fn point_segment_distance(p: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance_to(PixelPoint::new(a.x + t * dx, a.y + t * dy))
}

/// Center and radius of the circle spanned by two points.
pub fn circle_from_points(a: PixelPoint, b: PixelPoint) -> (PixelPoint, f64) {
    let center = PixelPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    (center, a.distance_to(b) / 2.0)
}

/// Isosceles triangle inscribed in the bounding box: apex top-center, base along the bottom.
pub fn triangle_from_points(a: PixelPoint, b: PixelPoint) -> [PixelPoint; 3] {
    let rect = PixelRect::from_corners(a, b);
    [
        PixelPoint::new(rect.center().x, rect.top),
        PixelPoint::new(rect.right, rect.bottom),
        PixelPoint::new(rect.left, rect.bottom),
    ]
}

/// Y pixel of every retracement level; level 0 sits on the start point, 1.0 on the end point.
pub fn fibonacci_level_ys(start_y: f64, end_y: f64) -> [(f64, f64); 7] {
    FIBONACCI_LEVELS.map(|level| (level, start_y + (end_y - start_y) * level))
}
