use crate::camera::CameraState;
use crate::prelude::{GlobeConfig, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSettings {
    /// Degrees of rotation per pixel, before dividing by the projection scale.
    pub sensitivity: f64,
    /// Velocity multiplier applied on every coast tick.
    pub decay: f64,
    /// Coasting stops once both velocity components fall below this.
    pub stop_threshold: f64,
    /// Nominal frame interval that velocity is normalized to.
    pub tick_ms: f64,
}

impl DragSettings {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            sensitivity: config.sensitivity,
            decay: config.decay,
            stop_threshold: config.stop_threshold,
            tick_ms: config.tick_ms,
        }
    }
}

impl Default for DragSettings {
    fn default() -> Self {
        Self::from_config(&GlobeConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Coasting,
}

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    start_yaw: f64,
    start_pitch: f64,
    start_pointer: ScreenPoint,
    last_pointer: ScreenPoint,
    last_time_ms: f64,
}

/// Pointer-driven rotation with post-release inertia.
///
/// The controller never reads a clock: event timestamps and coast ticks are
/// supplied by the caller, once per input event and once per animation frame.
#[derive(Debug, Clone)]
pub struct DragController {
    settings: DragSettings,
    phase: DragPhase,
    anchor: Option<DragAnchor>,
    velocity: [f64; 2],
}

impl DragController {
    pub fn new(settings: DragSettings) -> Self {
        Self {
            settings,
            phase: DragPhase::Idle,
            anchor: None,
            velocity: [0.0, 0.0],
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_coasting(&self) -> bool {
        self.phase == DragPhase::Coasting
    }

    /// Current (yaw, pitch) velocity in degrees per tick.
    pub fn velocity(&self) -> [f64; 2] {
        self.velocity
    }

    /// Starts a drag, discarding any inertia left from the previous one.
    pub fn pointer_down(&mut self, camera: &CameraState, pointer: ScreenPoint, time_ms: f64) {
        let snapshot = camera.snapshot();
        self.anchor = Some(DragAnchor {
            start_yaw: snapshot.yaw,
            start_pitch: snapshot.pitch,
            start_pointer: pointer,
            last_pointer: pointer,
            last_time_ms: time_ms,
        });
        self.velocity = [0.0, 0.0];
        self.phase = DragPhase::Dragging;
    }

    /// Rotates the camera to follow the pointer. `projection_scale` is the
    /// globe radius in pixels, so zooming in makes each pixel rotate less.
    pub fn pointer_move(
        &mut self,
        camera: &mut CameraState,
        projection_scale: f64,
        pointer: ScreenPoint,
        time_ms: f64,
    ) -> bool {
        if self.phase != DragPhase::Dragging || projection_scale <= 0.0 {
            return false;
        }
        let Some(anchor) = self.anchor.as_mut() else {
            return false;
        };

        let k = self.settings.sensitivity / projection_scale;
        let dx = f64::from(pointer.x - anchor.start_pointer.x);
        let dy = f64::from(pointer.y - anchor.start_pointer.y);
        camera.set_rotation(anchor.start_yaw + dx * k, anchor.start_pitch - dy * k);

        let dt = (time_ms - anchor.last_time_ms).max(1.0);
        let step_x = f64::from(pointer.x - anchor.last_pointer.x);
        let step_y = f64::from(pointer.y - anchor.last_pointer.y);
        self.velocity = [
            step_x * k / dt * self.settings.tick_ms,
            -step_y * k / dt * self.settings.tick_ms,
        ];

        anchor.last_pointer = pointer;
        anchor.last_time_ms = time_ms;
        true
    }

    /// Ends the drag; coasting starts when there is velocity left to spend.
    pub fn pointer_up(&mut self) -> DragPhase {
        if self.phase != DragPhase::Dragging {
            return self.phase;
        }
        self.anchor = None;
        self.phase = if self.above_threshold() {
            DragPhase::Coasting
        } else {
            self.velocity = [0.0, 0.0];
            DragPhase::Idle
        };
        self.phase
    }

    /// Stops any drag or coast immediately.
    pub fn cancel(&mut self) {
        self.anchor = None;
        self.velocity = [0.0, 0.0];
        self.phase = DragPhase::Idle;
    }

    /// Advances the coast by one frame. Returns whether the camera moved.
    pub fn tick(&mut self, camera: &mut CameraState) -> bool {
        if self.phase != DragPhase::Coasting {
            return false;
        }

        self.velocity = [
            self.velocity[0] * self.settings.decay,
            self.velocity[1] * self.settings.decay,
        ];
        if !self.above_threshold() {
            self.cancel();
            return false;
        }

        camera.rotate(self.velocity[0], self.velocity[1]);
        true
    }

    fn above_threshold(&self) -> bool {
        self.velocity[0].abs() >= self.settings.stop_threshold
            || self.velocity[1].abs() >= self.settings.stop_threshold
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_camera() -> CameraState {
        CameraState::default()
    }

    #[test]
    fn drag_rotation_scales_inversely_with_projection_scale() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(100.0, 100.0), 0.0);
        assert!(drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(140.0, 100.0), 16.0));
        assert!((camera.snapshot().yaw - 10.0).abs() < 1e-9);

        let mut zoomed = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&zoomed, ScreenPoint::new(100.0, 100.0), 0.0);
        drag.pointer_move(&mut zoomed, 600.0, ScreenPoint::new(140.0, 100.0), 16.0);
        assert!((zoomed.snapshot().yaw - 5.0).abs() < 1e-9);
    }

    #[test]
    fn dragging_down_tilts_pitch_negative_and_clamps() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(0.0, 0.0), 0.0);
        drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(0.0, 40.0), 16.0);
        assert!((camera.snapshot().pitch + 10.0).abs() < 1e-9);
        drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(0.0, 4000.0), 32.0);
        assert_eq!(camera.snapshot().pitch, -80.0);
    }

    #[test]
    fn velocity_is_normalized_to_the_tick_interval() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(0.0, 0.0), 0.0);
        drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(8.0, 0.0), 32.0);
        // 8 px * 0.25 deg/px over two ticks.
        assert!((drag.velocity()[0] - 1.0).abs() < 1e-9);
        assert_eq!(drag.velocity()[1], 0.0);
    }

    #[test]
    fn coasting_decays_and_then_stops() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(0.0, 0.0), 0.0);
        drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(10.0, 0.0), 16.0);
        assert_eq!(drag.pointer_up(), DragPhase::Coasting);

        let mut last_yaw = camera.snapshot().yaw;
        let mut last_speed = drag.velocity()[0].abs();
        let mut ticks = 0;
        while drag.tick(&mut camera) {
            ticks += 1;
            let yaw = camera.snapshot().yaw;
            let speed = drag.velocity()[0].abs();
            assert!(yaw != last_yaw, "rotation must keep changing while coasting");
            assert!(speed < last_speed, "speed must strictly decrease");
            last_yaw = yaw;
            last_speed = speed;
            assert!(ticks < 1_000, "coast never terminated");
        }
        assert!(ticks > 10);
        assert_eq!(drag.phase(), DragPhase::Idle);

        let settled = camera.snapshot();
        for _ in 0..5 {
            assert!(!drag.tick(&mut camera));
        }
        assert_eq!(camera.snapshot(), settled);
    }

    #[test]
    fn pointer_down_cancels_coast_immediately() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(0.0, 0.0), 0.0);
        drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(30.0, 0.0), 16.0);
        drag.pointer_up();
        assert!(drag.tick(&mut camera));

        drag.pointer_down(&camera, ScreenPoint::new(5.0, 5.0), 100.0);
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert_eq!(drag.velocity(), [0.0, 0.0]);
        let held = camera.snapshot();
        assert!(!drag.tick(&mut camera));
        assert_eq!(camera.snapshot(), held);
    }

    #[test]
    fn release_without_motion_goes_idle() {
        let camera = flat_camera();
        let mut drag = DragController::default();
        drag.pointer_down(&camera, ScreenPoint::new(0.0, 0.0), 0.0);
        assert_eq!(drag.pointer_up(), DragPhase::Idle);
    }

    #[test]
    fn moves_without_a_drag_are_ignored() {
        let mut camera = flat_camera();
        let mut drag = DragController::default();
        assert!(!drag.pointer_move(&mut camera, 300.0, ScreenPoint::new(50.0, 0.0), 0.0));
        assert_eq!(camera.snapshot().yaw, 0.0);
    }
}
