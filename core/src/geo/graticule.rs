use crate::prelude::GeoPoint;

/// Latitude extent of the drawn graticule; lines stop short of the poles.
const GRATICULE_EXTENT: i32 = 80;

/// Sampling interval along each graticule line, in degrees.
const SAMPLE_STEP: i32 = 2;

/// Meridians and parallels every `step` degrees, sampled densely enough to
/// look smooth once projected.
pub fn graticule(step: u32) -> Vec<Vec<GeoPoint>> {
    let step = step.clamp(1, 90) as i32;
    let mut lines = Vec::new();

    for lon in (-180..180).filter(|lon| lon % step == 0) {
        let meridian = (-GRATICULE_EXTENT..=GRATICULE_EXTENT)
            .step_by(SAMPLE_STEP as usize)
            .map(|lat| GeoPoint::new(f64::from(lon), f64::from(lat)))
            .collect();
        lines.push(meridian);
    }

    for lat in (-GRATICULE_EXTENT..=GRATICULE_EXTENT).filter(|lat| lat % step == 0) {
        let parallel = (-180..=180)
            .step_by(SAMPLE_STEP as usize)
            .map(|lon| GeoPoint::new(f64::from(lon), f64::from(lat)))
            .collect();
        lines.push(parallel);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_degree_graticule_has_expected_lines() {
        let lines = graticule(10);
        // 36 meridians plus parallels from -80 to 80.
        assert_eq!(lines.len(), 36 + 17);
        assert!(lines.iter().all(|line| line.len() > 1));
    }

    #[test]
    fn parallels_close_around_the_globe() {
        let lines = graticule(30);
        let equator = lines
            .iter()
            .find(|line| line.iter().all(|p| p.lat == 0.0))
            .unwrap();
        assert_eq!(equator.first().unwrap().lon, -180.0);
        assert_eq!(equator.last().unwrap().lon, 180.0);
    }
}
