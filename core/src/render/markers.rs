use crate::data::{City, Dimension};
use crate::layout::LayoutEntry;
use crate::prelude::{GlobeConfig, ScreenPoint};
use crate::render::surface::{Color, RenderSurface, Stroke, TextLabel};
use crate::render::transition::RayReveal;

/// Marker fill at aggregate score 0 and at score 100.
const LIGHTEST: [f32; 3] = [255.0, 255.0, 100.0];
const DARKEST: [f32; 3] = [100.0, 100.0, 0.0];

/// Aggregate scores above this get a white numeral instead of black.
const LIGHT_TEXT_ABOVE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub ray_scale: f32,
    pub ray_width: f32,
    pub score_font: f32,
    pub label_font: f32,
    pub label_font_highlighted: f32,
    pub label_offset: f32,
}

impl MarkerStyle {
    pub fn from_config(config: &GlobeConfig) -> Self {
        Self {
            radius: config.marker_radius,
            ray_scale: config.ray_scale,
            ray_width: 6.0,
            score_font: 10.0,
            label_font: 11.0,
            label_font_highlighted: 14.0,
            label_offset: 25.0,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from_config(&GlobeConfig::default())
    }
}

/// Which marker is under the pointer and how far each ray set is revealed.
pub struct MarkerHighlight<'a> {
    pub hovered: Option<&'a str>,
    pub reveal: &'a RayReveal,
}

/// Disc color for an aggregate score, interpolated per channel.
pub fn marker_color(overall: f64) -> Color {
    let ratio = (overall / 100.0).clamp(0.0, 1.0) as f32;
    let channel = |i: usize| (LIGHTEST[i] + (DARKEST[i] - LIGHTEST[i]) * ratio).round() as u8;
    Color::from_rgb8(channel(0), channel(1), channel(2))
}

/// Ray length grows with the deficit: a score of 100 draws nothing.
pub fn ray_length(value: f64, ray_scale: f32) -> f32 {
    (((100.0 - value) / 100.0) as f32 * ray_scale).max(0.0)
}

pub fn ray_color(dimension: Dimension) -> Color {
    match dimension {
        Dimension::Planet => Color::from_hex(0x00ff88),
        Dimension::People => Color::from_hex(0x4d79ff),
        Dimension::Profit => Color::from_hex(0xffd700),
        Dimension::Progress => Color::from_hex(0xff7700),
    }
}

/// Unit direction of each ray in screen space (y grows downwards).
fn ray_direction(dimension: Dimension) -> (f32, f32) {
    match dimension {
        Dimension::Planet => (0.0, -1.0),
        Dimension::People => (-1.0, 0.0),
        Dimension::Profit => (1.0, 0.0),
        Dimension::Progress => (0.0, 1.0),
    }
}

/// Where the numeric label sits past the end of a ray.
fn ray_label_offset(dimension: Dimension) -> (f32, f32) {
    match dimension {
        Dimension::Planet => (0.0, -8.0),
        Dimension::People => (-10.0, 3.0),
        Dimension::Profit => (10.0, 3.0),
        Dimension::Progress => (0.0, 15.0),
    }
}

/// Draws every laid-out city. Highlighted markers go last so they sit on
/// top: first the hovered one, then the selected one.
pub fn draw_markers(
    surface: &mut dyn RenderSurface,
    layout: &[LayoutEntry],
    cities: &[City],
    highlight: &MarkerHighlight<'_>,
    style: &MarkerStyle,
) {
    let is_hovered = |entry: &LayoutEntry| highlight.hovered == Some(entry.name.as_str());
    let rank = |entry: &LayoutEntry| match (entry.selected, is_hovered(entry)) {
        (true, _) => 2,
        (false, true) => 1,
        _ => 0,
    };

    let mut order: Vec<&LayoutEntry> = layout.iter().collect();
    order.sort_by_key(|entry| rank(entry));

    for entry in order {
        let Some(city) = cities.get(entry.index) else {
            continue;
        };
        let progress = highlight.reveal.progress(&entry.name);
        if progress > 0.0 {
            draw_rays(surface, entry, city, progress, style);
        }
        draw_disc(surface, entry, city, style);
        if entry.label_shown {
            draw_name(surface, entry, is_hovered(entry), progress, style);
        }
    }
}

fn draw_disc(surface: &mut dyn RenderSurface, entry: &LayoutEntry, city: &City, style: &MarkerStyle) {
    let center = entry.position;
    surface.fill_circle(
        center,
        style.radius,
        marker_color(city.overall).with_alpha(entry.opacity),
    );
    surface.stroke_circle(
        center,
        style.radius,
        Stroke::new(Color::WHITE.with_alpha(entry.opacity), 1.0),
    );

    let numeral = if city.overall > LIGHT_TEXT_ABOVE {
        Color::WHITE
    } else {
        Color::BLACK
    };
    surface.text(TextLabel {
        content: format!("{}", city.overall.round() as i64),
        position: ScreenPoint::new(center.x, center.y + 1.0),
        size: style.score_font,
        color: numeral.with_alpha(entry.opacity),
        bold: true,
    });
}

fn draw_name(
    surface: &mut dyn RenderSurface,
    entry: &LayoutEntry,
    hovered: bool,
    progress: f32,
    style: &MarkerStyle,
) {
    let grow = if hovered { progress.max(0.0) } else { 0.0 };
    let size = style.label_font + (style.label_font_highlighted - style.label_font) * grow;
    surface.text(TextLabel {
        content: entry.name.clone(),
        position: ScreenPoint::new(entry.position.x, entry.position.y + style.label_offset),
        size,
        color: Color::WHITE.with_alpha(entry.opacity * 0.8),
        bold: false,
    });
}

fn draw_rays(
    surface: &mut dyn RenderSurface,
    entry: &LayoutEntry,
    city: &City,
    progress: f32,
    style: &MarkerStyle,
) {
    let origin = entry.position;
    let alpha = entry.opacity * progress;
    for dimension in Dimension::ALL {
        let value = city.metrics.get(dimension);
        let length = ray_length(value, style.ray_scale) * progress;
        let (dx, dy) = ray_direction(dimension);
        let end = ScreenPoint::new(origin.x + dx * length, origin.y + dy * length);
        let color = ray_color(dimension);

        surface.stroke_path(&[origin, end], Stroke::new(color.with_alpha(alpha), style.ray_width));

        let (ox, oy) = ray_label_offset(dimension);
        surface.text(TextLabel {
            content: format!("{}", value.round() as i64),
            position: ScreenPoint::new(end.x + ox, end.y + oy),
            size: style.score_font,
            color: color.with_alpha(alpha),
            bold: true,
        });
    }
}
