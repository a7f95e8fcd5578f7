// Toolbar tools and how each one consumes pointer gestures.
use serde::{Deserialize, Serialize};
use shared::models::DrawingKind;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingTool {
    #[default]
    Cursor,
    Crosshair,
    Trend,
    Horizontal,
    Vertical,
    Rectangle,
    Circle,
    Triangle,
    Fibonacci,
    Text,
    Measure,
    Eraser,
}

/// Gesture protocol a tool follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Events go to the underlying chart (pan, zoom, crosshair).
    PassThrough,
    /// Pointer-down deletes the nearest annotation.
    Erase,
    /// Pointer-down anchors, pointer-up commits one point.
    SinglePoint(DrawingKind),
    /// Pointer-down anchors, pointer-move previews, pointer-up commits two points.
    TwoPoint(DrawingKind),
}

impl DrawingTool {
    pub fn all() -> &'static [DrawingTool] {
        &[
            DrawingTool::Cursor,
            DrawingTool::Crosshair,
            DrawingTool::Trend,
            DrawingTool::Horizontal,
            DrawingTool::Vertical,
            DrawingTool::Rectangle,
            DrawingTool::Circle,
            DrawingTool::Triangle,
            DrawingTool::Fibonacci,
            DrawingTool::Text,
            DrawingTool::Measure,
            DrawingTool::Eraser,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            DrawingTool::Cursor => "cursor",
            DrawingTool::Crosshair => "crosshair",
            DrawingTool::Trend => "trend",
            DrawingTool::Horizontal => "horizontal",
            DrawingTool::Vertical => "vertical",
            DrawingTool::Rectangle => "rectangle",
            DrawingTool::Circle => "circle",
            DrawingTool::Triangle => "triangle",
            DrawingTool::Fibonacci => "fibonacci",
            DrawingTool::Text => "text",
            DrawingTool::Measure => "measure",
            DrawingTool::Eraser => "eraser",
        }
    }

    pub fn gesture(&self) -> GestureKind {
        match self {
            DrawingTool::Cursor | DrawingTool::Crosshair => GestureKind::PassThrough,
            DrawingTool::Eraser => GestureKind::Erase,
            DrawingTool::Horizontal => GestureKind::SinglePoint(DrawingKind::Horizontal),
            DrawingTool::Vertical => GestureKind::SinglePoint(DrawingKind::Vertical),
            DrawingTool::Text => GestureKind::SinglePoint(DrawingKind::Text),
            DrawingTool::Trend => GestureKind::TwoPoint(DrawingKind::Trend),
            DrawingTool::Rectangle => GestureKind::TwoPoint(DrawingKind::Rectangle),
            DrawingTool::Circle => GestureKind::TwoPoint(DrawingKind::Circle),
            DrawingTool::Triangle => GestureKind::TwoPoint(DrawingKind::Triangle),
            DrawingTool::Fibonacci => GestureKind::TwoPoint(DrawingKind::Fibonacci),
            DrawingTool::Measure => GestureKind::TwoPoint(DrawingKind::Measure),
        }
    }

    /// Whether the overlay captures pointer events for this tool.
    pub fn captures_pointer(&self) -> bool {
        self.gesture() != GestureKind::PassThrough
    }
}

impl fmt::Display for DrawingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DrawingTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawingTool::all()
            .iter()
            .copied()
            .find(|tool| tool.id() == s)
            .ok_or_else(|| format!("unknown drawing tool '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_ids_round_trip() {
        for tool in DrawingTool::all() {
            assert_eq!(tool.id().parse::<DrawingTool>().unwrap(), *tool);
        }
        assert!("lasso".parse::<DrawingTool>().is_err());
    }

    #[test]
    fn test_gesture_classes() {
        assert_eq!(DrawingTool::default(), DrawingTool::Cursor);
        assert!(!DrawingTool::Crosshair.captures_pointer());
        assert_eq!(DrawingTool::Text.gesture(), GestureKind::SinglePoint(DrawingKind::Text));
        assert_eq!(DrawingTool::Measure.gesture(), GestureKind::TwoPoint(DrawingKind::Measure));
        assert_eq!(DrawingTool::Eraser.gesture(), GestureKind::Erase);
    }
}
