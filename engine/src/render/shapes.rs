// Per-kind paint rules. Every shape is rebuilt from its domain points under the
// current scale on each paint.
use super::surface::{OverlaySurface, StrokeStyle};
use crate::chart::ChartScale;
use crate::coords::{CoordinateMapper, PixelPoint};
use crate::drawing::geometry::{circle_from_points, fibonacci_level_ys, project, triangle_from_points, PixelRect};
use shared::models::{Drawing, DrawingKind};

/// Gap between a line and the label painted next to it.
const LABEL_OFFSET_PX: f64 = 4.0;

pub fn fibonacci_label(level: f64) -> String {
    format!("{:.1}%", level * 100.0)
}

pub fn measure_label(from: PixelPoint, to: PixelPoint) -> String {
    format!("{:.1}px", from.distance_to(to))
}

/// Paints one drawing. Returns `false` when its points cannot be placed on the
/// current scale, in which case nothing is painted.
pub fn paint_drawing(
    surface: &mut dyn OverlaySurface,
    mapper: &CoordinateMapper,
    scale: &dyn ChartScale,
    drawing: &Drawing,
    style: &StrokeStyle,
    font_size: f64,
) -> bool {
    if drawing.points.len() < drawing.kind.point_count() {
        tracing::warn!(id = %drawing.id, kind = ?drawing.kind, points = drawing.points.len(), "Skipping malformed drawing");
        return false;
    }
    let Some(px) = project(mapper, scale, &drawing.points) else {
        return false;
    };
    let (width, height) = surface.size();

    match drawing.kind {
        DrawingKind::Trend => surface.stroke_line(px[0], px[1], style),
        DrawingKind::Horizontal => {
            surface.stroke_line(PixelPoint::new(0.0, px[0].y), PixelPoint::new(width, px[0].y), style)
        }
        DrawingKind::Vertical => {
            surface.stroke_line(PixelPoint::new(px[0].x, 0.0), PixelPoint::new(px[0].x, height), style)
        }
        DrawingKind::Rectangle => surface.stroke_rect(PixelRect::from_corners(px[0], px[1]), style),
        DrawingKind::Circle => {
            let (center, radius) = circle_from_points(px[0], px[1]);
            surface.stroke_circle(center, radius, style);
        }
        DrawingKind::Triangle => surface.stroke_polygon(&triangle_from_points(px[0], px[1]), style),
        DrawingKind::Fibonacci => {
            let left = px[0].x.min(px[1].x);
            let right = px[0].x.max(px[1].x);
            for (level, y) in fibonacci_level_ys(px[0].y, px[1].y) {
                surface.stroke_line(PixelPoint::new(left, y), PixelPoint::new(right, y), style);
                surface.fill_text(
                    PixelPoint::new(right + LABEL_OFFSET_PX, y),
                    &fibonacci_label(level),
                    &style.color,
                    font_size,
                );
            }
        }
        DrawingKind::Text => {
            let text = drawing.label.as_deref().unwrap_or("Text");
            surface.fill_text(px[0], text, &style.color, font_size);
        }
        DrawingKind::Measure => {
            surface.stroke_line(px[0], px[1], style);
            let mid = PixelPoint::new((px[0].x + px[1].x) / 2.0, (px[0].y + px[1].y) / 2.0 - LABEL_OFFSET_PX);
            surface.fill_text(mid, &measure_label(px[0], px[1]), &style.color, font_size);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LinearViewport;
    use crate::render::surface::{DrawCommand, RecordingSurface};
    use shared::models::DomainPoint;

    fn drawing(kind: DrawingKind, points: &[(f64, f64)]) -> Drawing {
        Drawing {
            id: "d".to_string(),
            kind,
            points: points.iter().map(|&(t, p)| DomainPoint::new(t, p)).collect(),
            color: None,
            label: None,
        }
    }

    fn paint(d: &Drawing) -> RecordingSurface {
        let vp = LinearViewport::new(512.0, 256.0).with_ranges(0.0, 512.0, 0.0, 256.0);
        let mut surface = RecordingSurface::new(512.0, 256.0);
        assert!(paint_drawing(&mut surface, &CoordinateMapper::new(), &vp, d, &StrokeStyle::solid("#000", 1.0), 12.0));
        surface
    }

    #[test]
    fn test_horizontal_spans_full_width() {
        let surface = paint(&drawing(DrawingKind::Horizontal, &[(100.0, 56.0)]));
        match &surface.commands()[0] {
            DrawCommand::Line { from, to, .. } => {
                assert_eq!(*from, PixelPoint::new(0.0, 200.0));
                assert_eq!(*to, PixelPoint::new(512.0, 200.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_vertical_spans_full_height() {
        let surface = paint(&drawing(DrawingKind::Vertical, &[(64.0, 100.0)]));
        assert!(matches!(
            &surface.commands()[0],
            DrawCommand::Line { from, to, .. }
                if *from == PixelPoint::new(64.0, 0.0) && *to == PixelPoint::new(64.0, 256.0)
        ));
    }

    #[test]
    fn test_trend_joins_its_two_points() {
        let surface = paint(&drawing(DrawingKind::Trend, &[(10.0, 246.0), (300.0, 56.0)]));
        assert_eq!(surface.commands().len(), 1);
        assert!(matches!(
            &surface.commands()[0],
            DrawCommand::Line { from, to, .. }
                if *from == PixelPoint::new(10.0, 10.0) && *to == PixelPoint::new(300.0, 200.0)
        ));
    }

    #[test]
    fn test_rectangle_normalises_corners() {
        let surface = paint(&drawing(DrawingKind::Rectangle, &[(200.0, 56.0), (100.0, 156.0)]));
        match &surface.commands()[0] {
            DrawCommand::Rect { rect, .. } => {
                assert_eq!((rect.left, rect.top, rect.right, rect.bottom), (100.0, 100.0, 200.0, 200.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_circle_centred_between_points() {
        // Pixels (100, 100) and (160, 180) are 100px apart.
        let surface = paint(&drawing(DrawingKind::Circle, &[(100.0, 156.0), (160.0, 76.0)]));
        match &surface.commands()[0] {
            DrawCommand::Circle { center, radius, .. } => {
                assert_eq!(*center, PixelPoint::new(130.0, 140.0));
                assert_eq!(*radius, 50.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_triangle_apex_on_top_edge() {
        let surface = paint(&drawing(DrawingKind::Triangle, &[(100.0, 156.0), (200.0, 56.0)]));
        match &surface.commands()[0] {
            DrawCommand::Polygon { points, .. } => assert_eq!(
                points.as_slice(),
                &[PixelPoint::new(150.0, 100.0), PixelPoint::new(200.0, 200.0), PixelPoint::new(100.0, 200.0)]
            ),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_fibonacci_draws_seven_labelled_levels() {
        let surface = paint(&drawing(DrawingKind::Fibonacci, &[(300.0, 256.0), (100.0, 56.0)]));
        let lines = surface.commands().iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
        assert_eq!(lines, 7);
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "61.8%")));
        match &surface.commands()[0] {
            DrawCommand::Line { from, to, .. } => {
                assert_eq!(*from, PixelPoint::new(100.0, 0.0));
                assert_eq!(*to, PixelPoint::new(300.0, 0.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_measure_label_is_pixel_distance() {
        let surface = paint(&drawing(DrawingKind::Measure, &[(0.0, 256.0), (30.0, 216.0)]));
        assert!(matches!(&surface.commands()[1], DrawCommand::Text { text, .. } if text == "50.0px"));
    }

    #[test]
    fn test_text_defaults_label() {
        let surface = paint(&drawing(DrawingKind::Text, &[(10.0, 10.0)]));
        assert!(matches!(&surface.commands()[0], DrawCommand::Text { text, .. } if text == "Text"));
    }

    #[test]
    fn test_unprojectable_drawing_paints_nothing() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let degenerate = LinearViewport::new(0.0, 0.0);
        let d = drawing(DrawingKind::Trend, &[(1.0, 1.0), (2.0, 2.0)]);
        let style = StrokeStyle::solid("#000", 1.0);
        assert!(!paint_drawing(&mut surface, &CoordinateMapper::new(), &degenerate, &d, &style, 12.0));
        assert!(surface.commands().is_empty());
    }
}
