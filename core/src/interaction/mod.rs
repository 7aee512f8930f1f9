pub mod drag;
pub mod hover;

pub use drag::{DragController, DragPhase, DragSettings};
pub use hover::{hit_test, HoverTracker, HoverTransition};
