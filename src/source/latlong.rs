//! Reads an equirectangular (lat/long) pixmap as a spherical pixel source.

use std::f32::consts::PI;

use crate::color::Color;
use crate::coord::Coordinate;
use crate::pixmap::{PixMap, Wrap};
use crate::source::{RenderFlags, Source};

/// Samples an equirectangular source image: longitude maps across width
/// (wrapping) and latitude down height (clamped at the poles).
pub struct LatLongReader {
    pm: PixMap,
    width_scale: f32,
    height_scale: f32,
}

impl LatLongReader {
    pub fn new(pm: PixMap) -> Self {
        let width_scale = pm.width() as f32 / (2.0 * PI);
        let height_scale = pm.height() as f32 / PI;
        LatLongReader { pm, width_scale, height_scale }
    }
}

impl Source for LatLongReader {
    fn sample(&self, where_: Coordinate, flags: RenderFlags) -> Color {
        let (lat, lon) = where_.as_latlong_rad();
        let x = (lon + PI) * self.width_scale;
        let y = (PI / 2.0 - lat) * self.height_scale;

        if flags.fast {
            self.pm.sample_nearest(x.floor() as i64, y.floor() as i64, Wrap::Repeat, Wrap::Clamp)
        } else {
            self.pm.sample_bilinear(x, y, Wrap::Repeat, Wrap::Clamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_prime_meridian_samples_middle_row() {
        let mut pm = PixMap::new(4, 2);
        pm.set(2, 1, Color::new(0.3, 0.3, 0.3, 1.0));
        let reader = LatLongReader::new(pm);
        let c = reader.sample(Coordinate::from_latlong_rad(0.0, 0.0), RenderFlags { fast: true, jitter: false });
        assert_eq!(c, Color::new(0.3, 0.3, 0.3, 1.0));
    }

    #[test]
    fn longitude_wraps_across_the_seam() {
        // lon close to +pi maps to x just under width; nearest-pixel fast
        // sampling should wrap back to column 0, not clamp to the last column.
        let mut pm = PixMap::new(4, 2);
        pm.set(0, 0, Color::new(0.7, 0.0, 0.0, 1.0));
        let reader = LatLongReader::new(pm);
        let c = reader.sample(Coordinate::from_latlong_rad(0.6, PI), RenderFlags { fast: true, jitter: false });
        assert_eq!(c.r, 0.7);
    }
}
