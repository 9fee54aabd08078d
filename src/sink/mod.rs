//! Sinks: projection renderers that allocate an output pixmap and drive the
//! scheduler to fill it by sampling a [`Source`](crate::source::Source).

mod cube;
mod gallpeters;
mod latlong;
mod mercator;

pub use cube::{render_cube_cross, render_cube_vertical};
pub use gallpeters::render_gall_peters;
pub use latlong::render_lat_long;
pub use mercator::render_mercator;

use std::sync::Mutex;

use log::warn;

use crate::color::Color;
use crate::coord::Coordinate;
use crate::error::RenderError;
use crate::gauss::GaussTable;
use crate::pixmap::PixMap;
use crate::scheduler::schedule_render;
use crate::source::{RenderFlags, Source};

const SAMPLE_GRID_SIZE_FAST: usize = 3;
const SAMPLE_GRID_SIZE_HIGHQ: usize = 11;

/// Maximum output dimension this crate will attempt to allocate. Chosen far
/// above any legitimate planet-texture size; exists so a typo'd `--size`
/// fails with a clear error instead of an out-of-memory abort.
pub const MAX_DIMENSION: usize = 1 << 16;

pub fn gauss_table_for(flags: RenderFlags) -> GaussTable {
    GaussTable::build(if flags.fast { SAMPLE_GRID_SIZE_FAST } else { SAMPLE_GRID_SIZE_HIGHQ })
}

/// Validates a requested output size and allocates the backing pixmap, or
/// returns the error the facade reports through its error callback.
pub fn validate_and_allocate(width: usize, height: usize) -> Result<PixMap, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::OutputGeometryError("size must be non-zero".into()));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RenderError::OutputGeometryError(format!(
            "requested output {width}x{height} exceeds the maximum supported dimension of {MAX_DIMENSION}"
        )));
    }
    Ok(PixMap::new(width, height))
}

/// A progress/cancellation callback invoked on the calling thread between
/// completed lines. Returning `false` requests cancellation.
pub type Progress<'a> = dyn FnMut(usize, usize) -> bool + 'a;

/// Splits a rectangular sub-region of a pixmap into one row slot per line,
/// so the scheduler's line closure can claim its row under a brief lock and
/// then write to it without any lock held, while the borrow checker still
/// proves distinct lines never alias. Used directly with the full pixmap
/// for single-sub-render sinks, or per-face with `(xoff, yoff)` set to a
/// face's offset for cube sinks.
pub(crate) fn region_row_slots(
    pm: &mut PixMap,
    xoff: usize,
    yoff: usize,
    region_width: usize,
    region_height: usize,
) -> Mutex<Vec<Option<&mut [Color]>>> {
    let total_width = pm.width();
    let buf = pm.as_slice_mut();
    let (_, rest) = buf.split_at_mut(yoff * total_width);
    let (region_rows, _) = rest.split_at_mut(region_height * total_width);

    let slots = region_rows
        .chunks_mut(total_width)
        .map(|row| Some(&mut row[xoff..xoff + region_width]))
        .collect();
    Mutex::new(slots)
}

pub(crate) fn take_row<'a>(rows: &Mutex<Vec<Option<&'a mut [Color]>>>, idx: usize) -> &'a mut [Color] {
    rows.lock()
        .expect("row slot mutex poisoned")
        .get_mut(idx)
        .and_then(Option::take)
        .expect("scheduler must claim each line index exactly once")
}

/// Shared kernel for the three (lat, long)-space sinks (lat/long, Mercator,
/// Gall-Peters): each differs only in its `(x, y) -> (lat, lon)` mapping.
/// For every output pixel, samples a deterministic `g x g` grid spanning
/// the lat/long box covered by the pixel (+/- 0.5px), weighted by the
/// tensor product of the 1D Gaussian table.
pub(crate) fn render_latlong_projection(
    pm: &mut PixMap,
    coord_at: impl Fn(f32, f32) -> (f32, f32) + Sync,
    flags: RenderFlags,
    gauss: &GaussTable,
    source: &dyn Source,
    progress: &mut Progress,
) -> bool {
    let width = pm.width();
    let height = pm.height();
    let grid_size = gauss.len();
    let rows = region_row_slots(pm, 0, 0, width, height);

    let line_fn = |line_index: usize, _line_count: usize| -> bool {
        let row = take_row(&rows, line_index);
        let y = line_index as f32;

        for (x, pixel) in row.iter_mut().enumerate() {
            let xf = x as f32;
            let (lat_min, lon_min) = coord_at(xf, y);
            let (lat_max, lon_max) = coord_at(xf + 1.0, y + 1.0);

            let lat_step = (lat_max - lat_min) / (grid_size - 1) as f32;
            let lon_step = (lon_max - lon_min) / (grid_size - 1) as f32;

            let mut accum = Color::CLEAR;
            let mut total_weight = 0.0f32;
            let mut lat = lat_min;

            for sy in 0..grid_size {
                let mut lon = lon_min;
                let yw = gauss.weights()[sy];

                for sx in 0..grid_size {
                    let sample = source.sample(Coordinate::from_latlong_rad(lat, lon), flags);
                    let weight = yw * gauss.weights()[sx];

                    if sample.is_finite() {
                        accum = accum.add(sample.scale(weight));
                        total_weight += weight;
                    } else {
                        warn!("skipped non-finite sample at lat={lat} lon={lon}");
                    }

                    lon += lon_step;
                }
                lat += lat_step;
            }

            *pixel = if total_weight > 0.0 { accum.scale(1.0 / total_weight) } else { Color::CLEAR };
        }

        true
    };

    schedule_render(line_fn, height, 0, 1, progress)
}
