use crate::Message;
use globecore::geo::Viewport;
use globecore::render::{self, RenderSurface, TextLabel};
use globecore::{GlobeView, ScreenPoint};
use iced::{
    alignment, font, mouse,
    widget::canvas::{self, Action, Event, Frame, Geometry, Path, Stroke},
    Color, Font, Point, Rectangle, Renderer, Theme,
};

/// Pointer input in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasInput {
    Down(ScreenPoint),
    Move(ScreenPoint),
    Up,
    Left,
    /// Multiplicative zoom factor.
    Wheel(f64),
    Resize,
}

/// Zoom factor for one wheel step; pixel deltas count as 1/100 of a line.
pub fn wheel_factor(delta: mouse::ScrollDelta) -> f64 {
    let lines = match delta {
        mouse::ScrollDelta::Lines { y, .. } => f64::from(y),
        mouse::ScrollDelta::Pixels { y, .. } => f64::from(y) / 100.0,
    };
    1.1_f64.powf(lines)
}

fn to_color(color: render::Color) -> Color {
    Color {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

fn to_point(point: ScreenPoint) -> Point {
    Point::new(point.x, point.y)
}

fn to_stroke(stroke: render::Stroke) -> Stroke<'static> {
    Stroke::default()
        .with_width(stroke.width)
        .with_color(to_color(stroke.color))
}

fn polyline(points: &[ScreenPoint], closed: bool) -> Path {
    Path::new(|builder| {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            builder.move_to(to_point(*first));
        }
        for point in iter {
            builder.line_to(to_point(*point));
        }
        if closed {
            builder.close();
        }
    })
}

/// Draws globe primitives straight into an iced canvas frame.
pub struct FrameSurface<'a> {
    frame: &'a mut Frame,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self { frame }
    }
}

impl RenderSurface for FrameSurface<'_> {
    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: render::Color) {
        self.frame
            .fill(&Path::circle(to_point(center), radius), to_color(color));
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: render::Stroke) {
        self.frame
            .stroke(&Path::circle(to_point(center), radius), to_stroke(stroke));
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: render::Color) {
        if points.len() < 3 {
            return;
        }
        self.frame.fill(&polyline(points, true), to_color(color));
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: render::Stroke) {
        if points.len() < 2 {
            return;
        }
        self.frame.stroke(&polyline(points, false), to_stroke(stroke));
    }

    fn text(&mut self, label: TextLabel) {
        let font = if label.bold {
            Font {
                weight: font::Weight::Bold,
                ..Font::DEFAULT
            }
        } else {
            Font::DEFAULT
        };
        self.frame.fill_text(canvas::Text {
            content: label.content,
            position: to_point(label.position),
            color: to_color(label.color),
            size: label.size.into(),
            font,
            align_x: alignment::Horizontal::Center.into(),
            align_y: alignment::Vertical::Center.into(),
            ..canvas::Text::default()
        });
    }
}

#[derive(Debug, Default)]
pub struct PointerState {
    pressed: bool,
    inside: bool,
    size: Option<(f32, f32)>,
}

pub struct GlobeCanvas<'a> {
    pub view: &'a GlobeView,
}

fn viewport_of(bounds: Rectangle) -> Viewport {
    Viewport::new(bounds.width, bounds.height)
}

fn local(point: Point, bounds: Rectangle) -> ScreenPoint {
    ScreenPoint::new(point.x - bounds.x, point.y - bounds.y)
}

impl canvas::Program<Message> for GlobeCanvas<'_> {
    type State = PointerState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        let viewport = viewport_of(bounds);
        let publish = |input: CanvasInput| {
            Some(Action::publish(Message::Canvas { viewport, input }).and_capture())
        };

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.pressed = true;
                publish(CanvasInput::Down(ScreenPoint::new(position.x, position.y)))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) if state.pressed => {
                state.pressed = false;
                publish(CanvasInput::Up)
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if cursor.is_over(bounds) || state.pressed {
                    state.inside = true;
                    publish(CanvasInput::Move(local(*position, bounds)))
                } else if state.inside {
                    state.inside = false;
                    publish(CanvasInput::Left)
                } else {
                    None
                }
            }
            Event::Mouse(mouse::Event::CursorLeft) if state.inside && !state.pressed => {
                state.inside = false;
                publish(CanvasInput::Left)
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) if cursor.is_over(bounds) => {
                publish(CanvasInput::Wheel(wheel_factor(*delta)))
            }
            _ => {
                let size = (bounds.width, bounds.height);
                if state.size == Some(size) {
                    return None;
                }
                state.size = Some(size);
                Some(Action::publish(Message::Canvas {
                    viewport,
                    input: CanvasInput::Resize,
                }))
            }
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        self.view.render(&mut FrameSurface::new(&mut frame));
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.pressed {
            return mouse::Interaction::Grabbing;
        }
        let over_globe = cursor
            .position_in(bounds)
            .and_then(|p| self.view.geo_at(ScreenPoint::new(p.x, p.y)))
            .is_some();
        if over_globe {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_up_zooms_in() {
        let up = wheel_factor(mouse::ScrollDelta::Lines { x: 0.0, y: 1.0 });
        let down = wheel_factor(mouse::ScrollDelta::Lines { x: 0.0, y: -1.0 });
        assert!((up - 1.1).abs() < 1e-9);
        assert!((up * down - 1.0).abs() < 1e-9);
        let pixels = wheel_factor(mouse::ScrollDelta::Pixels { x: 0.0, y: 100.0 });
        assert!((pixels - 1.1).abs() < 1e-9);
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_color(render::Color::from_hex(0xff7700).with_alpha(0.5));
        assert_eq!(color.r, 1.0);
        assert_eq!(color.b, 0.0);
        assert_eq!(color.a, 0.5);
    }

    #[test]
    fn points_are_made_canvas_local() {
        let bounds = Rectangle {
            x: 300.0,
            y: 20.0,
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(
            local(Point::new(310.0, 25.0), bounds),
            ScreenPoint::new(10.0, 5.0)
        );
    }
}
