use crate::prelude::ScreenPoint;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: 1.0,
        }
    }

    /// `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub content: String,
    /// Anchor point; text is centered on it horizontally and vertically.
    pub position: ScreenPoint,
    pub size: f32,
    pub color: Color,
    pub bold: bool,
}

/// Drawing primitives the globe needs from its host.
///
/// Implementations draw immediately; the globe issues primitives back to
/// front, so later calls paint over earlier ones.
pub trait RenderSurface {
    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke);
    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color);
    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: Stroke);
    fn text(&mut self, label: TextLabel);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FillCircle {
        center: ScreenPoint,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: ScreenPoint,
        radius: f32,
        stroke: Stroke,
    },
    FillPolygon {
        points: Vec<ScreenPoint>,
        color: Color,
    },
    StrokePath {
        points: Vec<ScreenPoint>,
        stroke: Stroke,
    },
    Text(TextLabel),
}

/// Surface that keeps every primitive, for headless runs and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextLabel> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(label) => Some(label),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn fill_circle(&mut self, center: ScreenPoint, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: Stroke) {
        self.commands.push(DrawCommand::StrokePath {
            points: points.to_vec(),
            stroke,
        });
    }

    fn text(&mut self, label: TextLabel) {
        self.commands.push(DrawCommand::Text(label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode() {
        assert_eq!(Color::from_hex(0x00ff88).to_rgb8(), [0, 255, 136]);
        assert_eq!(Color::WHITE.with_alpha(2.0).a, 1.0);
    }

    #[test]
    fn recording_surface_keeps_order() {
        let mut surface = RecordingSurface::new();
        surface.fill_circle(ScreenPoint::new(1.0, 1.0), 2.0, Color::BLACK);
        surface.text(TextLabel {
            content: "x".into(),
            position: ScreenPoint::new(0.0, 0.0),
            size: 10.0,
            color: Color::WHITE,
            bold: false,
        });
        assert_eq!(surface.commands.len(), 2);
        assert!(matches!(surface.commands[0], DrawCommand::FillCircle { .. }));
        assert_eq!(surface.texts().count(), 1);
    }
}
