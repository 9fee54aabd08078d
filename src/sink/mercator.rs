//! Mercator sink: square output covering the latitude band reachable by the
//! projection before it blows up at the poles.

use crate::error::RenderError;
use crate::pixmap::PixMap;
use crate::sink::{gauss_table_for, render_latlong_projection, validate_and_allocate, Progress};
use crate::source::{RenderFlags, Source};

fn get_lat_long(x: f32, y: f32, size: f32) -> (f32, f32) {
    let adj_y = ((size * 1.5 - y) / size - 0.5) * std::f32::consts::PI;
    let lat = 2.0 * adj_y.exp().atan() - std::f32::consts::FRAC_PI_2;
    let lon = (x / size - 1.0) * std::f32::consts::PI;
    (lat, lon)
}

pub fn render_mercator(
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<PixMap, RenderError> {
    let mut pm = validate_and_allocate(size, size)?;
    let gauss = gauss_table_for(flags);
    let half_size = size as f32 / 2.0;

    let ok = render_latlong_projection(&mut pm, |x, y| get_lat_long(x, y, half_size), flags, &gauss, source, progress);

    if ok { Ok(pm) } else { Err(RenderError::Cancelled) }
}
