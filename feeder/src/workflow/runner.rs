use crate::gui_bridge::model::FeedModel;
use globecore::geo::Viewport;
use globecore::render::{DrawCommand, MarkerStyle, RecordingSurface};
use globecore::telemetry::ViewMetrics;
use globecore::{CameraSnapshot, GlobeView, InputEvent, LayoutEntry};
use serde::{Deserialize, Serialize};

/// Camera placement and canvas size for one headless layout pass. Missing
/// camera fields keep the configured initial view.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRequest {
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
    pub scale: Option<f64>,
    pub select: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LayoutReport {
    pub camera: CameraSnapshot,
    pub viewport: Viewport,
    pub selected: Option<String>,
    pub total_cities: usize,
    pub labels_shown: usize,
    pub draw_commands: usize,
    pub ray_strokes: usize,
    pub entries: Vec<LayoutEntry>,
    pub metrics: ViewMetrics,
}

/// Runs the globe without a window: one layout pass plus a recorded frame.
#[derive(Clone, Default)]
pub struct LayoutRunner;

impl LayoutRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, model: &FeedModel, request: &LayoutRequest) -> LayoutReport {
        let mut view = GlobeView::new(
            model.cities.clone(),
            model.boundaries.clone(),
            model.config.clone(),
        );

        let defaults = Viewport::default();
        view.handle(InputEvent::Resize(Viewport::new(
            request.width.unwrap_or(defaults.width),
            request.height.unwrap_or(defaults.height),
        )));

        let initial = view.camera_snapshot();
        view.set_camera(
            request.yaw.unwrap_or(initial.yaw),
            request.pitch.unwrap_or(initial.pitch),
            request.scale.unwrap_or(initial.scale),
        );
        if let Some(name) = request.select.as_deref() {
            view.select(name);
        }
        // Finish any ray reveal so the recorded frame shows the end state.
        while view.is_animating() {
            view.tick(1_000.0);
        }

        let entries = view.layout();
        let mut surface = RecordingSurface::new();
        view.render(&mut surface);
        let ray_width = MarkerStyle::from_config(view.config()).ray_width;
        let ray_strokes = surface
            .commands
            .iter()
            .filter(|command| {
                matches!(command, DrawCommand::StrokePath { stroke, .. } if stroke.width == ray_width)
            })
            .count();

        LayoutReport {
            camera: view.camera_snapshot(),
            viewport: view.viewport(),
            selected: view.selected().map(str::to_string),
            total_cities: view.cities().len(),
            labels_shown: entries.iter().filter(|entry| entry.label_shown).count(),
            draw_commands: surface.commands.len(),
            ray_strokes,
            entries,
            metrics: view.metrics(),
        }
    }
}
