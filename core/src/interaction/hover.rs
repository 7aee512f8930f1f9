use crate::layout::LayoutEntry;
use crate::prelude::ScreenPoint;

/// Outcome of feeding one pointer event to the [`HoverTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTransition {
    Enter(String),
    Leave(String),
    Switch { from: String, to: String },
    Stay,
}

/// Tracks which marker is under the pointer.
///
/// | previous | marker hit | transition |
/// |----------|------------|------------|
/// | none     | none       | `Stay`     |
/// | none     | `b`        | `Enter(b)` |
/// | `a`      | `a`        | `Stay`     |
/// | `a`      | `b`        | `Switch`   |
/// | `a`      | none       | `Leave(a)` |
#[derive(Debug, Clone)]
pub struct HoverTracker {
    hovered: Option<String>,
    hit_radius: f32,
}

impl HoverTracker {
    pub fn new(hit_radius: f32) -> Self {
        Self {
            hovered: None,
            hit_radius,
        }
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn pointer_moved(&mut self, pointer: ScreenPoint, layout: &[LayoutEntry]) -> HoverTransition {
        let hit = hit_test(layout, pointer, self.hit_radius).map(|entry| entry.name.clone());
        self.transition_to(hit)
    }

    pub fn pointer_left(&mut self) -> HoverTransition {
        self.transition_to(None)
    }

    /// Re-validates the hovered marker after the layout changed under a
    /// stationary pointer, e.g. while the globe coasts.
    pub fn refresh(&mut self, pointer: Option<ScreenPoint>, layout: &[LayoutEntry]) -> HoverTransition {
        match pointer {
            Some(pointer) => self.pointer_moved(pointer, layout),
            None => self.pointer_left(),
        }
    }

    fn transition_to(&mut self, next: Option<String>) -> HoverTransition {
        let previous = self.hovered.take();
        self.hovered = next.clone();
        match (previous, next) {
            (None, None) => HoverTransition::Stay,
            (None, Some(to)) => HoverTransition::Enter(to),
            (Some(from), None) => HoverTransition::Leave(from),
            (Some(from), Some(to)) if from == to => HoverTransition::Stay,
            (Some(from), Some(to)) => HoverTransition::Switch { from, to },
        }
    }
}

/// The marker under `pointer`: the closest one within `radius`, preferring
/// the one drawn last when two are equally close.
pub fn hit_test(layout: &[LayoutEntry], pointer: ScreenPoint, radius: f32) -> Option<&LayoutEntry> {
    let mut best: Option<(&LayoutEntry, f32)> = None;
    for entry in layout {
        let distance = entry.position.distance(&pointer);
        if distance > radius {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance > best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }
    best.map(|(entry, _)| entry)
}
