use crate::data::Boundary;
use crate::geo::{graticule, Projection, Viewport};
use crate::prelude::{GeoPoint, ScreenPoint};
use crate::render::surface::{Color, RenderSurface, Stroke};

const GRATICULE_STEP: u32 = 10;

/// Backdrop colors, painted back to front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobePalette {
    pub background: Color,
    pub ocean: Color,
    pub outline: Stroke,
    pub land: Color,
    pub border: Stroke,
    pub graticule: Stroke,
}

impl Default for GlobePalette {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x12122c),
            ocean: Color::from_hex(0x1c1c45),
            outline: Stroke::new(Color::BLACK, 1.0),
            land: Color::from_hex(0x12122c),
            border: Stroke::new(Color::from_hex(0x12122c), 1.0),
            graticule: Stroke::new(Color::from_hex(0x444444), 0.5),
        }
    }
}

/// Paints everything under the city markers: background, sphere, land
/// masses and the graticule.
pub fn draw_globe(
    surface: &mut dyn RenderSurface,
    projection: &Projection,
    viewport: &Viewport,
    boundaries: &[Boundary],
    palette: &GlobePalette,
) {
    let corners = [
        ScreenPoint::new(0.0, 0.0),
        ScreenPoint::new(viewport.width, 0.0),
        ScreenPoint::new(viewport.width, viewport.height),
        ScreenPoint::new(0.0, viewport.height),
    ];
    surface.fill_polygon(&corners, palette.background);

    let center = projection.center();
    let radius = projection.radius() as f32;
    surface.fill_circle(center, radius, palette.ocean);

    for ring in boundaries.iter().flat_map(|boundary| boundary.rings.iter()) {
        if let Some(points) = project_ring(projection, ring) {
            surface.fill_polygon(&points, palette.land);
            surface.stroke_path(&points, palette.border);
        }
    }

    for line in graticule(GRATICULE_STEP) {
        for run in projection.visible_runs(&line) {
            surface.stroke_path(&run, palette.graticule);
        }
    }

    surface.stroke_circle(center, radius, palette.outline);
}

/// Closed screen polygon for a ring, with far-side vertices pulled onto the
/// limb. Rings with no vertex on the near side are skipped.
fn project_ring(projection: &Projection, ring: &[GeoPoint]) -> Option<Vec<ScreenPoint>> {
    if ring.len() < 3 || !ring.iter().any(|point| projection.project(*point).is_some()) {
        return None;
    }
    let mut points: Vec<ScreenPoint> = ring
        .iter()
        .map(|point| projection.project_to_limb(*point))
        .collect();
    if points.first() != points.last() {
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
    }
    Some(points)
}
