use ndarray::{s, Array3};

use crate::consts::{ALIGN_PADDING_COLOR, COLOR_CHANNEL_COUNT};
use crate::frame::{Offset, Raster};

/// Translate a raster by an integer offset.
///
/// Output pixel `(x, y)` takes input pixel `(x - dx, y - dy)`; pixels whose
/// source falls outside the input are filled with [`ALIGN_PADDING_COLOR`].
pub fn shift_raster(raster: &Raster, offset: Offset) -> Raster {
    let (w, h) = raster.dimensions();
    let mut out = Array3::<u8>::zeros((h, w, COLOR_CHANNEL_COUNT));
    for (ch, &v) in ALIGN_PADDING_COLOR.iter().enumerate() {
        out.slice_mut(s![.., .., ch]).fill(v);
    }

    let Some((dst_x, src_x)) = shifted_span(w, offset.dx) else {
        return Raster::from_array_unchecked(out);
    };
    let Some((dst_y, src_y)) = shifted_span(h, offset.dy) else {
        return Raster::from_array_unchecked(out);
    };

    out.slice_mut(s![dst_y.0..dst_y.1, dst_x.0..dst_x.1, ..])
        .assign(&raster.data().slice(s![src_y.0..src_y.1, src_x.0..src_x.1, ..]));

    Raster::from_array_unchecked(out)
}

type Span = (usize, usize);

/// Destination and source spans along one axis for a shift of `d`, or `None`
/// when the shifted content leaves the frame entirely.
fn shifted_span(len: usize, d: i32) -> Option<(Span, Span)> {
    let len = len as i64;
    let d = d as i64;
    let dst_start = d.max(0);
    let dst_end = len.min(len + d);
    if dst_end <= dst_start {
        return None;
    }
    let dst = (dst_start as usize, dst_end as usize);
    let src = ((dst_start - d) as usize, (dst_end - d) as usize);
    Some((dst, src))
}
