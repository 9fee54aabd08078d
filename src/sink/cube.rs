//! Cube-map sinks: six perspective faces, either stacked vertically or laid
//! out as a horizontal cross.

use log::warn;
use rand::Rng;

use crate::color::Color;
use crate::coord::{Coordinate, Vector};
use crate::error::RenderError;
use crate::gauss::GaussTable;
use crate::pixmap::PixMap;
use crate::scheduler::schedule_render;
use crate::sink::{gauss_table_for, region_row_slots, validate_and_allocate, Progress};
use crate::source::{face_basis, RenderFlags, Source};

const SAMPLE_WIDTH: f32 = 1.2;

struct FaceOffset {
    x: usize,
    y: usize,
}

fn vertical_offsets(size: usize) -> [FaceOffset; 6] {
    std::array::from_fn(|i| FaceOffset { x: 0, y: i * size })
}

fn cross_offsets(size: usize) -> [FaceOffset; 6] {
    let s = size;
    [
        FaceOffset { x: 2 * s, y: s },
        FaceOffset { x: 0, y: s },
        FaceOffset { x: s, y: 0 },
        FaceOffset { x: s, y: 2 * s },
        FaceOffset { x: s, y: s },
        FaceOffset { x: 3 * s, y: s },
    ]
}

pub fn render_cube_vertical(
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<PixMap, RenderError> {
    let mut pm = validate_and_allocate(size, size * 6)?;
    render_faces(&mut pm, size, &vertical_offsets(size), flags, source, progress)?;
    Ok(pm)
}

pub fn render_cube_cross(
    size: usize,
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<PixMap, RenderError> {
    let mut pm = validate_and_allocate(size * 4, size * 3)?;
    render_faces(&mut pm, size, &cross_offsets(size), flags, source, progress)?;
    Ok(pm)
}

fn render_faces(
    pm: &mut PixMap,
    size: usize,
    offsets: &[FaceOffset; 6],
    flags: RenderFlags,
    source: &dyn Source,
    progress: &mut Progress,
) -> Result<(), RenderError> {
    let gauss = gauss_table_for(flags);

    for (face_index, offset) in offsets.iter().enumerate() {
        let (out_v, down_v) = face_basis(face_index);
        let ok = render_face(
            pm, offset.x, offset.y, size, out_v, down_v, &gauss, flags, source, face_index, progress,
        );
        if !ok {
            return Err(RenderError::Cancelled);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_face(
    pm: &mut PixMap,
    xoff: usize,
    yoff: usize,
    size: usize,
    out_v: Vector,
    down_v: Vector,
    gauss: &GaussTable,
    flags: RenderFlags,
    source: &dyn Source,
    face_index: usize,
    progress: &mut Progress,
) -> bool {
    let right_v = out_v.cross(down_v);
    let scale = 2.0 / size as f32;
    let grid_size = gauss.len();
    let fdiff = (2.0 * SAMPLE_WIDTH / grid_size as f32) * scale;
    let jitter_half_width = SAMPLE_WIDTH * 0.5 * scale;

    let rows = region_row_slots(pm, xoff, yoff, size, size);

    let line_fn = |line_index: usize, _line_count: usize| -> bool {
        let row = super::take_row(&rows, line_index);
        let fy0 = line_index as f32;
        let mut rng = rand::thread_rng();

        for (x, pixel) in row.iter_mut().enumerate() {
            let fx0 = x as f32;
            let (fmin_x, fmin_y) = if flags.jitter {
                (fx0 * scale - 1.0, fy0 * scale - 1.0)
            } else {
                ((fx0 - SAMPLE_WIDTH) * scale - 1.0, (fy0 - SAMPLE_WIDTH) * scale - 1.0)
            };

            let mut accum = Color::CLEAR;
            let mut total_weight = 0.0f32;
            let mut fy = fmin_y;

            for sy in 0..grid_size {
                let mut fx = fmin_x;
                let yw = gauss.weights()[sy];

                for sx in 0..grid_size {
                    let (fx_s, fy_s) = if flags.jitter {
                        (
                            fmin_x + rand_f2(&mut rng) * SAMPLE_WIDTH * 0.5 * scale,
                            fmin_y + rand_f2(&mut rng) * SAMPLE_WIDTH * 0.5 * scale,
                        )
                    } else {
                        (fx, fy)
                    };

                    let coord_v = (right_v * fx_s + down_v * fy_s + out_v).normalized();
                    let sample = source.sample(Coordinate::from_vector(coord_v), flags);

                    let weight = if flags.jitter {
                        gauss.lookup_2d(fx_s, fmin_x, fy_s, fmin_y, jitter_half_width)
                    } else {
                        yw * gauss.weights()[sx]
                    };

                    if sample.is_finite() {
                        accum = accum.add(sample.scale(weight));
                        total_weight += weight;
                    } else {
                        warn!("skipped non-finite sample at direction {coord_v:?}");
                    }

                    fx += fdiff;
                }
                fy += fdiff;
            }

            *pixel = if total_weight > 0.0 { accum.scale(1.0 / total_weight) } else { Color::CLEAR };
        }

        true
    };

    schedule_render(line_fn, size, face_index, 6, progress)
}

fn rand_f2(rng: &mut impl Rng) -> f32 {
    rng.gen_range(-1.0f32..=1.0f32)
}
