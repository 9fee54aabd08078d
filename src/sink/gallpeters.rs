//! Gall-Peters sink: equal-area cylindrical projection, `size` wide by a
//! height chosen so each texel covers equal surface area.

use crate::error::RenderError;
use crate::pixmap::PixMap;
use crate::sink::{gauss_table_for, render_latlong_projection, validate_and_allocate, Progress};
use crate::source::{RenderFlags, Source};

fn get_lat_long(x: f32, y: f32, width_f: f32, height_f: f32) -> (f32, f32) {
    let lat = (y * height_f + 1.0).clamp(-1.0, 1.0).asin();
    let lon = (x / width_f - 1.0) * std::f32::consts::PI;
    (lat, lon)
}

pub fn render_gall_peters(
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<PixMap, RenderError> {
    let height = (2.0 * size as f32 / std::f32::consts::PI).round() as usize;
    let mut pm = validate_and_allocate(size, height)?;
    let gauss = gauss_table_for(flags);

    let width_f = size as f32 / 2.0;
    let height_f = -2.0 / height as f32;

    let ok = render_latlong_projection(
        &mut pm,
        |x, y| get_lat_long(x, y, width_f, height_f),
        flags,
        &gauss,
        source,
        progress,
    );

    if ok { Ok(pm) } else { Err(RenderError::Cancelled) }
}
