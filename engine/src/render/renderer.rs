// Overlay renderer: clear, paint persisted drawings in z-order, then the preview.
use super::shapes::paint_drawing;
use super::surface::{OverlaySurface, StrokeStyle};
use crate::chart::ChartScale;
use crate::config::settings::DrawingSettings;
use crate::coords::CoordinateMapper;
use shared::models::Drawing;
use std::cell::Cell;
use std::rc::Rc;

/// Upper bound on follow-up passes triggered by redraw requests raised during paint.
pub const MAX_RENDER_PASSES: usize = 4;

const FALLBACK_COLOR: &str = "#2196F3";

#[derive(Debug, Default)]
struct RedrawFlags {
    pending: Cell<bool>,
    painting: Cell<bool>,
}

/// Cloneable invalidation handle. Callbacks that fire while the overlay is being
/// painted (resize, scale change) request a redraw here instead of painting inline.
#[derive(Debug, Clone, Default)]
pub struct RedrawHandle(Rc<RedrawFlags>);

impl RedrawHandle {
    pub fn request(&self) {
        self.0.pending.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.0.pending.get()
    }

    pub fn is_painting(&self) -> bool {
        self.0.painting.get()
    }
}

/// Outcome of one `render` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub passes: usize,
    pub painted: usize,
    pub skipped: usize,
    pub deferred: bool,
}

#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    handle: RedrawHandle,
    settings: DrawingSettings,
}

impl OverlayRenderer {
    pub fn new(settings: DrawingSettings) -> Self {
        Self { handle: RedrawHandle::default(), settings }
    }

    pub fn handle(&self) -> RedrawHandle {
        self.handle.clone()
    }

    pub fn invalidate(&self) {
        self.handle.request();
    }

    pub fn needs_redraw(&self) -> bool {
        self.handle.is_pending()
    }

    /// Repaints the overlay. A call made while a paint is already running is
    /// recorded as pending and served by the running paint's next pass.
    pub fn render(
        &self,
        surface: &mut dyn OverlaySurface,
        mapper: &CoordinateMapper,
        scale: &dyn ChartScale,
        drawings: &[Drawing],
        in_progress: Option<&Drawing>,
        visible: bool,
    ) -> RenderReport {
        if self.handle.is_painting() {
            self.handle.request();
            tracing::trace!("Redraw requested during paint; deferred");
            return RenderReport { deferred: true, ..RenderReport::default() };
        }

        self.handle.0.painting.set(true);
        let mut report = RenderReport::default();
        loop {
            self.handle.0.pending.set(false);
            let (painted, skipped) = self.paint_frame(surface, mapper, scale, drawings, in_progress, visible);
            report.passes += 1;
            report.painted = painted;
            report.skipped = skipped;

            if !self.handle.is_pending() {
                break;
            }
            if report.passes >= MAX_RENDER_PASSES {
                tracing::warn!(passes = report.passes, "Overlay kept invalidating itself during paint; giving up");
                self.handle.0.pending.set(false);
                break;
            }
        }
        self.handle.0.painting.set(false);
        report
    }

    fn paint_frame(
        &self,
        surface: &mut dyn OverlaySurface,
        mapper: &CoordinateMapper,
        scale: &dyn ChartScale,
        drawings: &[Drawing],
        in_progress: Option<&Drawing>,
        visible: bool,
    ) -> (usize, usize) {
        surface.clear();
        let (mut painted, mut skipped) = (0, 0);

        if visible {
            for drawing in drawings {
                if paint_drawing(surface, mapper, scale, drawing, &self.style_for(drawing), self.settings.font_size) {
                    painted += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        if let Some(preview) = in_progress {
            let style = StrokeStyle::dashed(self.settings.preview_color.clone(), self.settings.line_width);
            paint_drawing(surface, mapper, scale, preview, &style, self.settings.font_size);
        }
        (painted, skipped)
    }

    fn style_for(&self, drawing: &Drawing) -> StrokeStyle {
        let color = drawing
            .color
            .as_deref()
            .or(self.settings.default_color.as_deref())
            .unwrap_or(FALLBACK_COLOR);
        StrokeStyle::solid(color, self.settings.line_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::LinearViewport;
    use crate::coords::PixelPoint;
    use crate::drawing::geometry::PixelRect;
    use crate::render::surface::{DrawCommand, RecordingSurface};
    use shared::models::{DomainPoint, DrawingKind};

    fn viewport() -> LinearViewport {
        LinearViewport::new(512.0, 256.0).with_ranges(0.0, 512.0, 0.0, 256.0)
    }

    fn horizontal(id: &str, price: f64) -> Drawing {
        Drawing {
            id: id.to_string(),
            kind: DrawingKind::Horizontal,
            points: vec![DomainPoint::new(10.0, price)],
            color: None,
            label: None,
        }
    }

    #[test]
    fn test_insertion_order_then_preview() {
        let renderer = OverlayRenderer::new(DrawingSettings::default());
        let mut surface = RecordingSurface::new(512.0, 256.0);
        let drawings = vec![horizontal("a", 100.0), horizontal("b", 200.0)];
        let preview = horizontal("preview", 50.0);

        let report = renderer.render(&mut surface, &CoordinateMapper::new(), &viewport(), &drawings, Some(&preview), true);
        assert_eq!(report, RenderReport { passes: 1, painted: 2, skipped: 0, deferred: false });

        let ys: Vec<f64> = surface
            .commands()
            .iter()
            .map(|c| match c {
                DrawCommand::Line { from, .. } => from.y,
                other => panic!("unexpected command {:?}", other),
            })
            .collect();
        assert_eq!(ys, vec![156.0, 56.0, 206.0]);
        assert!(matches!(&surface.commands()[2], DrawCommand::Line { style, .. } if style.dashed));
    }

    #[test]
    fn test_hidden_drawings_still_show_preview() {
        let renderer = OverlayRenderer::new(DrawingSettings::default());
        let mut surface = RecordingSurface::new(512.0, 256.0);
        let preview = horizontal("preview", 50.0);
        renderer.render(&mut surface, &CoordinateMapper::new(), &viewport(), &[horizontal("a", 1.0)], Some(&preview), false);
        assert_eq!(surface.commands().len(), 1);
    }

    /// Surface whose first clear behaves like a resize callback firing mid-paint.
    struct ResizingSurface {
        inner: RecordingSurface,
        handle: RedrawHandle,
        resized: bool,
    }

    impl OverlaySurface for ResizingSurface {
        fn size(&self) -> (f64, f64) {
            self.inner.size()
        }
        fn clear(&mut self) {
            self.inner.clear();
            if !self.resized {
                self.resized = true;
                self.inner.resize(1024.0, 256.0);
                self.handle.request();
            }
        }
        fn stroke_line(&mut self, from: PixelPoint, to: PixelPoint, style: &StrokeStyle) {
            self.inner.stroke_line(from, to, style)
        }
        fn stroke_rect(&mut self, rect: PixelRect, style: &StrokeStyle) {
            self.inner.stroke_rect(rect, style)
        }
        fn stroke_circle(&mut self, center: PixelPoint, radius: f64, style: &StrokeStyle) {
            self.inner.stroke_circle(center, radius, style)
        }
        fn stroke_polygon(&mut self, points: &[PixelPoint], style: &StrokeStyle) {
            self.inner.stroke_polygon(points, style)
        }
        fn fill_text(&mut self, at: PixelPoint, text: &str, color: &str, font_size: f64) {
            self.inner.fill_text(at, text, color, font_size)
        }
    }

    #[test]
    fn test_redraw_requested_during_paint_runs_as_follow_up_pass() {
        let renderer = OverlayRenderer::new(DrawingSettings::default());
        let mut surface = ResizingSurface {
            inner: RecordingSurface::new(512.0, 256.0),
            handle: renderer.handle(),
            resized: false,
        };
        let report = renderer.render(&mut surface, &CoordinateMapper::new(), &viewport(), &[horizontal("a", 100.0)], None, true);

        assert_eq!(report.passes, 2);
        assert_eq!(surface.inner.frames(), 2);
        assert!(!renderer.needs_redraw());
        assert!(matches!(&surface.inner.commands()[0], DrawCommand::Line { to, .. } if to.x == 1024.0));
    }

    /// Surface that invalidates on every clear.
    struct RestlessSurface(RecordingSurface, RedrawHandle);

    impl OverlaySurface for RestlessSurface {
        fn size(&self) -> (f64, f64) {
            self.0.size()
        }
        fn clear(&mut self) {
            self.0.clear();
            self.1.request();
        }
        fn stroke_line(&mut self, from: PixelPoint, to: PixelPoint, style: &StrokeStyle) {
            self.0.stroke_line(from, to, style)
        }
        fn stroke_rect(&mut self, rect: PixelRect, style: &StrokeStyle) {
            self.0.stroke_rect(rect, style)
        }
        fn stroke_circle(&mut self, center: PixelPoint, radius: f64, style: &StrokeStyle) {
            self.0.stroke_circle(center, radius, style)
        }
        fn stroke_polygon(&mut self, points: &[PixelPoint], style: &StrokeStyle) {
            self.0.stroke_polygon(points, style)
        }
        fn fill_text(&mut self, at: PixelPoint, text: &str, color: &str, font_size: f64) {
            self.0.fill_text(at, text, color, font_size)
        }
    }

    #[test]
    fn test_passes_are_bounded() {
        let renderer = OverlayRenderer::new(DrawingSettings::default());
        let mut surface = RestlessSurface(RecordingSurface::new(512.0, 256.0), renderer.handle());
        let report = renderer.render(&mut surface, &CoordinateMapper::new(), &viewport(), &[], None, true);
        assert_eq!(report.passes, MAX_RENDER_PASSES);
        assert!(!renderer.needs_redraw());
        assert!(!renderer.handle().is_painting());
    }
}
