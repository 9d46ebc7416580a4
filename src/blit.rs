//! Rectangular copy between pixel buffers, with target growth.
//!
//! [`blit`] copies an axis-aligned sub-rectangle of a source buffer into a
//! target buffer, enlarging the target when the copy would fall outside
//! its current bounds. [`blit_unchecked`] is the raw copy without
//! validation or growth.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// Per-axis min/max so that start <= end regardless of argument order.
fn normalize(a: (u32, u32), b: (u32, u32)) -> ((u32, u32), (u32, u32)) {
    ((a.0.min(b.0), a.1.min(b.1)), (a.0.max(b.0), a.1.max(b.1)))
}

/// Copy the source rectangle `[source_start, source_end)` into `target`
/// at `target_start`, mutating `target` in place.
///
/// The rectangle corners may be given in any order; each axis is
/// normalized independently. When the copy would extend past the target's
/// bounds, the target is grown first: a new zero-filled buffer sized to
/// the larger of the current and required extent on each axis, with the
/// existing content preserved at `(0, 0)`. The replacement is a single
/// assignment — callers never observe a partially-grown target.
///
/// # Errors
///
/// - [`Error::ChannelMismatch`] if the buffers disagree on channel count.
/// - [`Error::RegionOutOfBounds`] if the normalized rectangle exceeds the
///   source bounds on either axis.
pub fn blit(
    source: &PixelBuffer,
    source_start: (u32, u32),
    source_end: (u32, u32),
    target: &mut PixelBuffer,
    target_start: (u32, u32),
) -> Result<(), Error> {
    let (start, end) = normalize(source_start, source_end);

    if source.layout() != target.layout() {
        return Err(Error::ChannelMismatch {
            source: source.channels() as u8,
            target: target.channels() as u8,
        });
    }
    if end.0 > source.width() || end.1 > source.height() {
        return Err(Error::RegionOutOfBounds {
            width: source.width(),
            height: source.height(),
            x: end.0,
            y: end.1,
        });
    }

    let needed_w = u64::from(target_start.0) + u64::from(end.0 - start.0);
    let needed_h = u64::from(target_start.1) + u64::from(end.1 - start.1);
    if needed_w > u64::from(target.width()) || needed_h > u64::from(target.height()) {
        let new_w = needed_w.max(u64::from(target.width())) as u32;
        let new_h = needed_h.max(u64::from(target.height())) as u32;
        let mut grown = PixelBuffer::new(new_w, new_h, source.layout());
        blit_unchecked(
            target,
            (0, 0),
            (target.width(), target.height()),
            &mut grown,
            (0, 0),
        );
        debug!(
            "blit grew target from {}x{} to {new_w}x{new_h}",
            target.width(),
            target.height()
        );
        *target = grown;
    }

    blit_unchecked(source, start, end, target, target_start);
    Ok(())
}

/// Raw rectangle copy without validation or growth.
///
/// The rectangle corners are still normalized per axis. The caller must
/// ensure both buffers share a layout and that the source rectangle and
/// the destination region are in bounds: violations panic on slice
/// indexing or copy misaligned channels, but never touch memory outside
/// the buffers.
pub fn blit_unchecked(
    source: &PixelBuffer,
    source_start: (u32, u32),
    source_end: (u32, u32),
    target: &mut PixelBuffer,
    target_start: (u32, u32),
) {
    let (start, end) = normalize(source_start, source_end);
    let channels = source.channels();
    let seg = (end.0 - start.0) as usize * channels;
    if seg == 0 {
        return;
    }
    let sx = start.0 as usize * channels;
    let tx = target_start.0 as usize * channels;
    for y in start.1..end.1 {
        let ty = target_start.1 + (y - start.1);
        let src = &source.row(y)[sx..sx + seg];
        target.row_mut(ty)[tx..tx + seg].copy_from_slice(src);
    }
}
