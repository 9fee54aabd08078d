//! Equirectangular (plate carree) sink: output is `2*size` wide by `size`
//! tall, one texel per half a degree of longitude.

use crate::error::RenderError;
use crate::pixmap::PixMap;
use crate::sink::{gauss_table_for, render_latlong_projection, validate_and_allocate, Progress};
use crate::source::{RenderFlags, Source};

fn get_lat_long(x: f32, y: f32, size: f32) -> (f32, f32) {
    let lat = ((size - y) / size - 0.5) * std::f32::consts::PI;
    let lon = (x / size - 1.0) * std::f32::consts::PI;
    (lat, lon)
}

pub fn render_lat_long(
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<PixMap, RenderError> {
    let mut pm = validate_and_allocate(size * 2, size)?;
    let gauss = gauss_table_for(flags);
    let sizef = size as f32;

    let ok = render_latlong_projection(&mut pm, |x, y| get_lat_long(x, y, sizef), flags, &gauss, source, progress);

    if ok { Ok(pm) } else { Err(RenderError::Cancelled) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::coord::Coordinate;

    struct Solid(Color);
    impl Source for Solid {
        fn sample(&self, _where_: Coordinate, _flags: RenderFlags) -> Color {
            self.0
        }
    }

    #[test]
    fn output_has_expected_dimensions() {
        let source = Solid(Color::WHITE);
        let pm = render_lat_long(16, RenderFlags { fast: true, jitter: false }, &source, &mut |_n, _d| true).unwrap();
        assert_eq!(pm.width(), 32);
        assert_eq!(pm.height(), 16);
    }

    #[test]
    fn uniform_source_fills_uniformly() {
        let color = Color::new(0.3, 0.6, 0.9, 1.0);
        let source = Solid(color);
        let pm = render_lat_long(8, RenderFlags { fast: true, jitter: false }, &source, &mut |_n, _d| true).unwrap();
        for y in 0..pm.height() {
            for x in 0..pm.width() {
                let c = pm.get(x, y);
                assert!((c.r - color.r).abs() < 1e-4, "at ({x},{y}): {c:?}");
            }
        }
    }

    #[test]
    fn equator_prime_meridian_maps_to_image_center() {
        struct Spy;
        impl Source for Spy {
            fn sample(&self, where_: Coordinate, _flags: RenderFlags) -> Color {
                let (lat, lon) = where_.as_latlong_rad();
                Color::new(lat, lon, 0.0, 1.0)
            }
        }
        let pm = render_lat_long(32, RenderFlags { fast: true, jitter: false }, &Spy, &mut |_n, _d| true).unwrap();
        let c = pm.get(32, 16);
        assert!(c.r.abs() < 0.1, "expected near-equator lat, got {}", c.r);
        assert!(c.g.abs() < 0.1, "expected near-prime-meridian lon, got {}", c.g);
    }

    #[test]
    fn cancellation_returns_error() {
        let source = Solid(Color::WHITE);
        let result = render_lat_long(8, RenderFlags::default(), &source, &mut |_n, _d| false);
        assert!(result.is_err());
    }
}
