// Pointer gesture state machine turning pointer events into annotations.
use super::collection::DrawingCollection;
use super::hit_test::nearest_hit;
use super::tools::{DrawingTool, GestureKind};
use crate::chart::ChartScale;
use crate::config::settings::DrawingSettings;
use crate::coords::{ClampedPointer, CoordinateMapper, PixelPoint};
use crate::error::EngineError;
use shared::models::{DomainPoint, Drawing, DrawingKind};
use uuid::Uuid;

/// In-progress gesture. Exists only between pointer-down and pointer-up/leave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing {
        kind: DrawingKind,
        start: ClampedPointer,
        current: Option<ClampedPointer>,
    },
}

impl GestureState {
    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::Drawing { .. })
    }
}

/// What a pointer event did, so the owner knows whether to redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// The active tool leaves pointer handling to the chart.
    PassThrough,
    /// Nothing changed (no coordinate, or no gesture to update).
    Ignored,
    Started,
    PreviewMoved,
    Committed(String),
    /// Gesture ended without enough points.
    Discarded,
    Erased(Drawing),
    /// Eraser click with nothing under the threshold.
    Missed,
}

impl PointerOutcome {
    pub fn needs_redraw(&self) -> bool {
        matches!(
            self,
            PointerOutcome::Started
                | PointerOutcome::PreviewMoved
                | PointerOutcome::Committed(_)
                | PointerOutcome::Discarded
                | PointerOutcome::Erased(_)
        )
    }
}

/// Single owner of the annotation collection, the active tool and the gesture state.
#[derive(Debug, Clone)]
pub struct DrawingController {
    tool: DrawingTool,
    gesture: GestureState,
    drawings: DrawingCollection,
    settings: DrawingSettings,
}

impl DrawingController {
    pub fn new(settings: DrawingSettings) -> Self {
        Self {
            tool: DrawingTool::default(),
            gesture: GestureState::Idle,
            drawings: DrawingCollection::new(),
            settings,
        }
    }

    pub fn tool(&self) -> DrawingTool {
        self.tool
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn drawings(&self) -> &DrawingCollection {
        &self.drawings
    }

    pub fn drawings_mut(&mut self) -> &mut DrawingCollection {
        &mut self.drawings
    }

    pub fn settings(&self) -> &DrawingSettings {
        &self.settings
    }

    /// Switches tools. An in-progress gesture is cancelled; returns whether one was.
    pub fn set_tool(&mut self, tool: DrawingTool) -> bool {
        let cancelled = self.cancel_gesture();
        if cancelled {
            tracing::debug!(from = %self.tool, to = %tool, "Tool switch cancelled in-progress gesture");
        }
        self.tool = tool;
        cancelled
    }

    pub fn cancel_gesture(&mut self) -> bool {
        let was_active = self.gesture.is_active();
        self.gesture = GestureState::Idle;
        was_active
    }

    pub fn pointer_down(&mut self, mapper: &CoordinateMapper, scale: &dyn ChartScale, x: f64, y: f64) -> PointerOutcome {
        match self.tool.gesture() {
            GestureKind::PassThrough => PointerOutcome::PassThrough,
            GestureKind::Erase => self.erase_at(mapper, scale, PixelPoint::new(x, y)),
            GestureKind::SinglePoint(kind) | GestureKind::TwoPoint(kind) => {
                let Some(start) = clamp_or_ignore(mapper, scale, x, y) else {
                    return PointerOutcome::Ignored;
                };
                self.gesture = GestureState::Drawing { kind, start, current: None };
                PointerOutcome::Started
            }
        }
    }

    pub fn pointer_move(&mut self, mapper: &CoordinateMapper, scale: &dyn ChartScale, x: f64, y: f64) -> PointerOutcome {
        match self.tool.gesture() {
            GestureKind::PassThrough => return PointerOutcome::PassThrough,
            GestureKind::TwoPoint(_) => {}
            GestureKind::Erase | GestureKind::SinglePoint(_) => return PointerOutcome::Ignored,
        }
        let GestureState::Drawing { kind, start, .. } = self.gesture else {
            return PointerOutcome::Ignored;
        };
        let Some(current) = clamp_or_ignore(mapper, scale, x, y) else {
            return PointerOutcome::Ignored;
        };
        self.gesture = GestureState::Drawing { kind, start, current: Some(current) };
        PointerOutcome::PreviewMoved
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        if self.tool.gesture() == GestureKind::PassThrough {
            return PointerOutcome::PassThrough;
        }
        let GestureState::Drawing { kind, start, current } = std::mem::take(&mut self.gesture) else {
            return PointerOutcome::Ignored;
        };

        let points: Vec<DomainPoint> = match (kind.point_count(), current) {
            (1, _) => vec![start.domain],
            (_, Some(current)) => vec![start.domain, current.domain],
            (_, None) => {
                tracing::trace!(?kind, "Two-point gesture ended without a second point");
                return PointerOutcome::Discarded;
            }
        };

        let drawing = Drawing {
            id: Uuid::now_v7().to_string(),
            kind,
            points,
            color: self.settings.default_color.clone(),
            label: (kind == DrawingKind::Text).then(|| self.settings.default_text_label.clone()),
        };
        let id = drawing.id.clone();
        self.drawings.add(drawing);
        PointerOutcome::Committed(id)
    }

    /// Leaving the overlay ends the gesture exactly like releasing the pointer.
    pub fn pointer_leave(&mut self) -> PointerOutcome {
        self.pointer_up()
    }

    /// The gesture as a transient drawing for preview rendering, if one is in progress.
    pub fn preview(&self) -> Option<Drawing> {
        let GestureState::Drawing { kind, start, current } = self.gesture else {
            return None;
        };
        let points = match (kind.point_count(), current) {
            (1, _) => vec![start.domain],
            (_, Some(current)) => vec![start.domain, current.domain],
            (_, None) => return None,
        };
        Some(Drawing {
            id: String::from("preview"),
            kind,
            points,
            color: Some(self.settings.preview_color.clone()),
            label: (kind == DrawingKind::Text).then(|| self.settings.default_text_label.clone()),
        })
    }

    fn erase_at(&mut self, mapper: &CoordinateMapper, scale: &dyn ChartScale, click: PixelPoint) -> PointerOutcome {
        let hit = nearest_hit(
            self.drawings.as_slice(),
            mapper,
            scale,
            click,
            self.settings.eraser_threshold_px,
        );
        let Some((index, distance)) = hit else {
            return PointerOutcome::Missed;
        };
        let id = self.drawings.as_slice()[index].id.clone();
        tracing::debug!(id = %id, distance, "Eraser hit");
        match self.drawings.remove(&id) {
            Some(removed) => PointerOutcome::Erased(removed),
            None => PointerOutcome::Missed,
        }
    }
}

fn clamp_or_ignore(mapper: &CoordinateMapper, scale: &dyn ChartScale, x: f64, y: f64) -> Option<ClampedPointer> {
    match mapper.clamp_pointer(scale, x, y) {
        Ok(pointer) => Some(pointer),
        Err(EngineError::NoCoordinate(reason)) => {
            tracing::trace!(x, y, reason, "Pointer event ignored: no coordinate");
            None
        }
        Err(e) => {
            tracing::warn!(x, y, error = %e, "Pointer event ignored");
            None
        }
    }
}
