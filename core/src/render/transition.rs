use std::collections::HashMap;

const SHOW_MS: f64 = 150.0;
const HIDE_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
struct Reveal {
    progress: f32,
    showing: bool,
}

/// Time-based reveal of the ray indicators, keyed by city name.
///
/// Progress climbs to 1 over the show duration and falls back to 0 over
/// the hide duration; fully hidden entries are dropped.
#[derive(Debug, Clone)]
pub struct RayReveal {
    entries: HashMap<String, Reveal>,
    show_ms: f64,
    hide_ms: f64,
}

impl RayReveal {
    pub fn new(show_ms: f64, hide_ms: f64) -> Self {
        Self {
            entries: HashMap::new(),
            show_ms: show_ms.max(1.0),
            hide_ms: hide_ms.max(1.0),
        }
    }

    pub fn show(&mut self, name: &str) {
        self.entries
            .entry(name.to_string())
            .or_insert(Reveal {
                progress: 0.0,
                showing: true,
            })
            .showing = true;
    }

    pub fn hide(&mut self, name: &str) {
        if let Some(reveal) = self.entries.get_mut(name) {
            reveal.showing = false;
        }
    }

    /// Shows exactly the given names and hides everything else.
    pub fn retarget<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let targets: Vec<&str> = names.into_iter().collect();
        for (name, reveal) in self.entries.iter_mut() {
            reveal.showing = targets.contains(&name.as_str());
        }
        for name in targets {
            self.show(name);
        }
    }

    /// Jumps straight to the end state, skipping the animation.
    pub fn settle(&mut self) {
        self.entries.retain(|_, reveal| reveal.showing);
        for reveal in self.entries.values_mut() {
            reveal.progress = 1.0;
        }
    }

    pub fn progress(&self, name: &str) -> f32 {
        self.entries.get(name).map_or(0.0, |reveal| reveal.progress)
    }

    pub fn is_animating(&self) -> bool {
        self.entries.values().any(|reveal| {
            (reveal.showing && reveal.progress < 1.0) || (!reveal.showing && reveal.progress > 0.0)
        })
    }

    /// Advances every reveal by `elapsed_ms`. Returns whether anything moved.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if elapsed_ms <= 0.0 {
            return false;
        }
        let mut moved = false;
        for reveal in self.entries.values_mut() {
            let before = reveal.progress;
            reveal.progress = if reveal.showing {
                (reveal.progress + (elapsed_ms / self.show_ms) as f32).min(1.0)
            } else {
                (reveal.progress - (elapsed_ms / self.hide_ms) as f32).max(0.0)
            };
            moved |= reveal.progress != before;
        }
        self.entries
            .retain(|_, reveal| reveal.showing || reveal.progress > 0.0);
        moved
    }
}

impl Default for RayReveal {
    fn default() -> Self {
        Self::new(SHOW_MS, HIDE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_grows_then_shrinks() {
        let mut reveal = RayReveal::default();
        reveal.show("Oslo");
        assert!(reveal.is_animating());
        assert!(reveal.advance(75.0));
        assert!((reveal.progress("Oslo") - 0.5).abs() < 1e-6);
        reveal.advance(100.0);
        assert_eq!(reveal.progress("Oslo"), 1.0);
        assert!(!reveal.is_animating());

        reveal.hide("Oslo");
        reveal.advance(50.0);
        assert!((reveal.progress("Oslo") - 0.5).abs() < 1e-6);
        reveal.advance(60.0);
        assert_eq!(reveal.progress("Oslo"), 0.0);
        assert!(!reveal.is_animating());
    }

    #[test]
    fn retarget_hides_others() {
        let mut reveal = RayReveal::default();
        reveal.show("a");
        reveal.settle();
        reveal.retarget(["b"]);
        reveal.advance(1_000.0);
        assert_eq!(reveal.progress("a"), 0.0);
        assert_eq!(reveal.progress("b"), 1.0);
    }
}
