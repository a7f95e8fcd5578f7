// Transparent overlay surface the annotations are painted on.
use crate::coords::PixelPoint;
use crate::drawing::geometry::PixelRect;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: String,
    pub line_width: f64,
    pub dashed: bool,
}

impl StrokeStyle {
    pub fn solid(color: impl Into<String>, line_width: f64) -> Self {
        Self { color: color.into(), line_width, dashed: false }
    }

    pub fn dashed(color: impl Into<String>, line_width: f64) -> Self {
        Self { color: color.into(), line_width, dashed: true }
    }
}

/// 2D drawing primitives of the overlay. Implemented by the UI layer's canvas;
/// `RecordingSurface` is the headless implementation.
pub trait OverlaySurface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn stroke_line(&mut self, from: PixelPoint, to: PixelPoint, style: &StrokeStyle);
    fn stroke_rect(&mut self, rect: PixelRect, style: &StrokeStyle);
    fn stroke_circle(&mut self, center: PixelPoint, radius: f64, style: &StrokeStyle);
    fn stroke_polygon(&mut self, points: &[PixelPoint], style: &StrokeStyle);
    fn fill_text(&mut self, at: PixelPoint, text: &str, color: &str, font_size: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Line { from: PixelPoint, to: PixelPoint, style: StrokeStyle },
    Rect { rect: PixelRect, style: StrokeStyle },
    Circle { center: PixelPoint, radius: f64, style: StrokeStyle },
    Polygon { points: Vec<PixelPoint>, style: StrokeStyle },
    Text { at: PixelPoint, text: String, color: String, font_size: f64 },
}

/// Keeps the commands of the last painted frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    frames: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, frames: 0, commands: Vec::new() }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of times the surface was cleared, i.e. frames started.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl OverlaySurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn stroke_line(&mut self, from: PixelPoint, to: PixelPoint, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Line { from, to, style: style.clone() });
    }

    fn stroke_rect(&mut self, rect: PixelRect, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Rect { rect, style: style.clone() });
    }

    fn stroke_circle(&mut self, center: PixelPoint, radius: f64, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Circle { center, radius, style: style.clone() });
    }

    fn stroke_polygon(&mut self, points: &[PixelPoint], style: &StrokeStyle) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), style: style.clone() });
    }

    fn fill_text(&mut self, at: PixelPoint, text: &str, color: &str, font_size: f64) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color: color.to_string(),
            font_size,
        });
    }
}
