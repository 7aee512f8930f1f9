//! One interactive globe: the owner of every piece of mutable view state.
//!
//! Hosts translate their native events into [`InputEvent`]s, call
//! [`GlobeView::tick`] once per animation frame while
//! [`GlobeView::is_animating`] holds, and redraw through
//! [`GlobeView::render`] whenever a call reports a change.

use std::sync::Arc;

use crate::camera::{CameraSnapshot, CameraState};
use crate::data::{cities_or_fallback, Boundary, City};
use crate::geo::{Projection, Viewport};
use crate::interaction::{DragController, DragSettings, HoverTracker, HoverTransition};
use crate::layout::{compute_layout, LayoutEntry, LayoutParams};
use crate::prelude::{GeoPoint, GlobeConfig, GlobeResult, ScreenPoint};
use crate::render::{
    draw_globe, draw_markers, GlobePalette, MarkerHighlight, MarkerStyle, RayReveal, RenderSurface,
};
use crate::search;
use crate::telemetry::{LogManager, MetricsRecorder, ViewMetrics};

/// Host-agnostic input. Timestamps are milliseconds on any monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: ScreenPoint, time_ms: f64 },
    PointerMove { position: ScreenPoint, time_ms: f64 },
    PointerUp,
    PointerLeft,
    /// Multiplicative zoom, e.g. `1.1` per wheel notch.
    Wheel { factor: f64 },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Resize(Viewport),
}

pub struct GlobeView {
    cities: Arc<[City]>,
    boundaries: Arc<[Boundary]>,
    config: GlobeConfig,
    camera: CameraState,
    drag: DragController,
    hover: HoverTracker,
    reveal: RayReveal,
    selected: Option<String>,
    pointer: Option<ScreenPoint>,
    viewport: Viewport,
    layout_params: LayoutParams,
    marker_style: MarkerStyle,
    palette: GlobePalette,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl GlobeView {
    pub fn new(
        cities: impl Into<Arc<[City]>>,
        boundaries: impl Into<Arc<[Boundary]>>,
        config: GlobeConfig,
    ) -> Self {
        let cities = cities.into();
        let logger = LogManager::new("view");
        logger.record(&format!("globe view ready with {} cities", cities.len()));
        Self {
            cities,
            boundaries: boundaries.into(),
            camera: CameraState::from_config(&config),
            drag: DragController::new(DragSettings::from_config(&config)),
            hover: HoverTracker::new(config.marker_radius),
            reveal: RayReveal::default(),
            selected: None,
            pointer: None,
            viewport: Viewport::default(),
            layout_params: LayoutParams::from_config(&config),
            marker_style: MarkerStyle::from_config(&config),
            palette: GlobePalette::default(),
            metrics: MetricsRecorder::new(),
            logger,
            config,
        }
    }

    /// Builds a view from a feed result, substituting the built-in cities
    /// when the feed failed or was empty.
    pub fn from_feed(
        loaded: GlobeResult<Vec<City>>,
        boundaries: Vec<Boundary>,
        config: GlobeConfig,
    ) -> Self {
        let metrics = MetricsRecorder::new();
        let cities = cities_or_fallback(loaded, &metrics);
        let mut view = Self::new(cities, boundaries, config);
        view.metrics = metrics;
        view
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera_snapshot(&self) -> CameraSnapshot {
        self.camera.snapshot()
    }

    pub fn projection(&self) -> Projection {
        Projection::new(&self.camera.snapshot(), &self.viewport)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hover.hovered()
    }

    pub fn metrics(&self) -> ViewMetrics {
        self.metrics.snapshot()
    }

    /// Geographic point under the pointer, if it is over the globe.
    pub fn geo_at(&self, pointer: ScreenPoint) -> Option<GeoPoint> {
        self.projection().invert(pointer)
    }

    /// Places the camera directly, e.g. when restoring a view from a request.
    /// Values are clamped like any other camera input.
    pub fn set_camera(&mut self, yaw: f64, pitch: f64, scale: f64) -> bool {
        self.drag.cancel();
        self.change_camera(|camera| {
            camera.set_rotation(yaw, pitch);
            camera.zoom_to(scale);
        })
    }

    /// Applies one input event. Returns whether the view needs a redraw.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { position, time_ms } => {
                self.pointer = Some(position);
                self.drag.pointer_down(&self.camera, position, time_ms);
                false
            }
            InputEvent::PointerMove { position, time_ms } => {
                self.pointer = Some(position);
                let radius = self.projection().radius();
                let rotated = self
                    .drag
                    .pointer_move(&mut self.camera, radius, position, time_ms);
                let hover_changed = self.refresh_hover();
                rotated || hover_changed
            }
            InputEvent::PointerUp => {
                self.drag.pointer_up();
                false
            }
            InputEvent::PointerLeft => {
                self.pointer = None;
                self.refresh_hover()
            }
            InputEvent::Wheel { factor } => {
                self.change_camera(|camera| camera.zoom_by_factor(factor))
            }
            InputEvent::ZoomIn => {
                let step = self.config.zoom_step;
                self.change_camera(|camera| camera.zoom_by(step))
            }
            InputEvent::ZoomOut => {
                let step = self.config.zoom_step;
                self.change_camera(|camera| camera.zoom_by(-step))
            }
            InputEvent::ResetZoom => self.change_camera(CameraState::reset_zoom),
            InputEvent::Resize(viewport) => {
                if viewport == self.viewport {
                    return false;
                }
                self.viewport = viewport;
                self.refresh_hover();
                true
            }
        }
    }

    /// Advances the coast by one frame and the ray reveal by `elapsed_ms`.
    /// Returns whether anything visible changed.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        let coasted = self.drag.tick(&mut self.camera);
        if coasted {
            self.metrics.record_coast_tick();
            self.refresh_hover();
        }
        let revealed = self.reveal.advance(elapsed_ms);
        coasted || revealed
    }

    pub fn is_animating(&self) -> bool {
        self.drag.is_coasting() || self.reveal.is_animating()
    }

    /// Layout for the current camera, selection and viewport. Only
    /// [`GlobeView::render`] counts towards the layout metrics.
    pub fn layout(&self) -> Vec<LayoutEntry> {
        compute_layout(
            &self.cities,
            &self.camera.snapshot(),
            &self.viewport,
            self.selected.as_deref(),
            &self.layout_params,
        )
    }

    /// Paints the whole globe, back to front.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let projection = self.projection();
        draw_globe(
            surface,
            &projection,
            &self.viewport,
            &self.boundaries,
            &self.palette,
        );

        let layout = self.layout();
        self.metrics
            .record_layout(self.cities.len().saturating_sub(layout.len()));
        let highlight = MarkerHighlight {
            hovered: self.hover.hovered(),
            reveal: &self.reveal,
        };
        draw_markers(
            surface,
            &layout,
            &self.cities,
            &highlight,
            &self.marker_style,
        );
        self.logger
            .trace_frame(&format!("drew {} of {} cities", layout.len(), self.cities.len()));
    }

    pub fn search(&self, query: &str) -> Vec<&City> {
        search::search(
            &self.cities,
            query,
            self.config.search_limit,
            self.config.min_query_len,
        )
    }

    /// Recenters on the named city and makes it the selection. Unknown
    /// names leave the view untouched and return `false`.
    pub fn select(&mut self, name: &str) -> bool {
        let Some(city) = search::find_by_name(&self.cities, name) else {
            self.logger.warn(&format!("no city named {name:?}"));
            return false;
        };
        self.drag.cancel();
        search::select(&mut self.camera, city, self.config.focus_scale);
        self.selected = Some(city.name.clone());
        self.logger.record(&format!("selected {}", city.name));
        self.refresh_hover();
        self.retarget_rays();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.retarget_rays();
        true
    }

    fn change_camera(&mut self, apply: impl FnOnce(&mut CameraState)) -> bool {
        let before = self.camera.snapshot();
        apply(&mut self.camera);
        if self.camera.snapshot() == before {
            return false;
        }
        self.refresh_hover();
        true
    }

    fn refresh_hover(&mut self) -> bool {
        let layout = match self.pointer {
            Some(_) => self.layout(),
            None => Vec::new(),
        };
        let transition = self.hover.refresh(self.pointer, &layout);
        if transition == HoverTransition::Stay {
            return false;
        }
        self.retarget_rays();
        true
    }

    /// Rays follow the selection; the hovered city only gets them while
    /// nothing is selected.
    fn retarget_rays(&mut self) {
        let target = self
            .selected
            .clone()
            .or_else(|| self.hover.hovered().map(str::to_string));
        self.reveal.retarget(target.as_deref());
    }
}
