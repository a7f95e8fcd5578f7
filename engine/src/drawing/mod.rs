// Annotation tools: tool catalog, gesture state machine, hit testing and the
// persisted collection.
pub mod collection;
pub mod geometry;
pub mod gesture;
pub mod tools;

pub use collection::DrawingCollection;
pub use gesture::{DrawingController, GestureState, PointerOutcome};
pub use hit_test::{nearest_hit, ERASER_THRESHOLD_PX};
pub use tools::{DrawingTool, GestureKind};
