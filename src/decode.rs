//! BMP decoding and header probing.
//!
//! Handles the uncompressed single-plane subset of the format: a 14-byte
//! file header, a 40-byte info header, and row-padded pixel data at the
//! offset the file header names. Stored rows are BGR(A)-ordered and padded
//! to 4-byte boundaries; a negative height field means the rows are stored
//! top-down and the decoder reverses them.
//!
//! Paletted 8-bpp files are read as raw 1-channel values; palette tables
//! are not resolved.

use alloc::vec;
use log::debug;

use crate::buffer::{ChannelLayout, PixelBuffer};
use crate::error::Error;

/// `BM`, read as a little-endian u16.
const BMP_MAGIC: u16 = 0x4D42;

/// Bytes appended to each stored row so that `width * channels + padding`
/// is a multiple of 4.
pub(crate) fn row_padding(width: u32, channels: u32) -> u32 {
    let pad = 4 - ((u64::from(width) * 8 * u64::from(channels)) % 32) / 8;
    if pad == 4 { 0 } else { pad as u32 }
}

// ---------------------------------------------------------------------------
// BmpInfo
// ---------------------------------------------------------------------------

/// Header facts from a cheap probe — no pixel work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct BmpInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels (absolute value of the stored field).
    pub height: u32,
    /// Channel layout implied by the bits-per-pixel field.
    pub layout: ChannelLayout,
    /// Whether the stored height was negative, i.e. rows are stored
    /// top-down instead of the format's usual bottom-up order.
    pub top_down: bool,
    /// File offset of the pixel data block.
    pub pixel_data_offset: u32,
    /// Padding bytes after each stored row.
    pub row_padding: u32,
}

impl BmpInfo {
    /// Total pixel count (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Unpadded pixel data size in bytes.
    #[inline]
    pub fn pixel_bytes(&self) -> u64 {
        self.pixel_count() * self.layout.channels() as u64
    }
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(n).ok_or(Error::TruncatedHeader)?;
        if end > self.data.len() {
            return Err(Error::TruncatedHeader);
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        self.take(n).map(|_| ())
    }

    fn read_u16(&mut self) -> Result<u16, Error> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> Result<i32, Error> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

fn parse_header(data: &[u8]) -> Result<BmpInfo, Error> {
    let mut cur = Cursor::new(data);
    if cur.read_u16()? != BMP_MAGIC {
        return Err(Error::NotBmp);
    }
    cur.skip(8)?; // file size + two reserved fields
    let raw_offset = cur.read_i32()?;
    cur.skip(4)?; // info header size, not validated
    let raw_width = cur.read_i32()?;
    let raw_height = cur.read_i32()?;
    let planes = cur.read_u16()?;
    if planes != 1 {
        return Err(Error::UnsupportedPlaneCount(planes));
    }
    let bits = cur.read_u16()?;
    let layout = ChannelLayout::from_bit_depth(bits).ok_or(Error::UnsupportedBitDepth(bits))?;
    if raw_width < 0 {
        return Err(Error::InvalidDimensions {
            width: raw_width,
            height: raw_height,
        });
    }
    // A negative offset can never be sought; same failure the pixel reads
    // would produce.
    let pixel_data_offset =
        u32::try_from(raw_offset).map_err(|_| Error::TruncatedPixelData)?;
    let width = raw_width as u32;
    Ok(BmpInfo {
        width,
        height: raw_height.unsigned_abs(),
        layout,
        top_down: raw_height < 0,
        pixel_data_offset,
        row_padding: row_padding(width, layout.channels() as u32),
    })
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Reusable decode configuration.
///
/// Plain data, `Clone`, no lifetimes — build once, decode many. The only
/// knob is a pixel-count cap applied after the header parse and before any
/// pixel allocation.
///
/// # Example
///
/// ```no_run
/// use zenbmp::Decoder;
///
/// let decoder = Decoder::new().with_max_pixels(100_000_000);
/// # let data: &[u8] = &[];
/// let image = decoder.decode(data)?;
/// # Ok::<(), zenbmp::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    max_pixels: Option<u64>,
}

impl Decoder {
    /// Default configuration: no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the decoded pixel count (`width * height`). Exceeding headers
    /// fail with [`Error::PixelLimitExceeded`] before any pixel work.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Probe the header without touching pixel data.
    ///
    /// O(header): works on an input truncated right after the info header.
    pub fn probe(&self, data: &[u8]) -> Result<BmpInfo, Error> {
        parse_header(data)
    }

    /// Decode a BMP byte stream into a [`PixelBuffer`].
    ///
    /// # Errors
    ///
    /// Any malformed header field or short pixel read fails with the
    /// matching [`Error`] variant; nothing is partially returned.
    pub fn decode(&self, data: &[u8]) -> Result<PixelBuffer, Error> {
        let info = parse_header(data)?;
        if let Some(max) = self.max_pixels {
            let actual = info.pixel_count();
            if actual > max {
                return Err(Error::PixelLimitExceeded { actual, max });
            }
        }
        let channels = info.layout.channels();
        let row_bytes = info.width as usize * channels;
        let total = usize::try_from(info.pixel_bytes()).map_err(|_| Error::InvalidDimensions {
            width: info.width as i32,
            height: info.height as i32,
        })?;

        let mut pixels = vec![0u8; total];
        let offset = info.pixel_data_offset as usize;
        let padding = info.row_padding as usize;
        if total > 0 {
            if padding == 0 {
                let end = offset.checked_add(total).ok_or(Error::TruncatedPixelData)?;
                if end > data.len() {
                    return Err(Error::TruncatedPixelData);
                }
                pixels.copy_from_slice(&data[offset..end]);
            } else {
                let mut pos = offset;
                for row in pixels.chunks_exact_mut(row_bytes) {
                    let end = pos.checked_add(row_bytes).ok_or(Error::TruncatedPixelData)?;
                    if end > data.len() {
                        return Err(Error::TruncatedPixelData);
                    }
                    row.copy_from_slice(&data[pos..end]);
                    // Padding after the final row may fall past the end of
                    // the input; it is never read.
                    pos = end.saturating_add(padding);
                }
            }
        }

        let mut image = PixelBuffer::from_vec(pixels, info.width, info.height, info.layout)?;
        // Stored BGR(A) -> RGB(A); no-op below 3 channels.
        image.swap_red_blue();
        if info.top_down {
            image = image.flip_vertical();
        }
        debug!(
            "decoded {}x{} {:?} bmp ({total} pixel bytes, {padding} padding)",
            info.width, info.height, info.layout
        );
        Ok(image)
    }
}

/// Decode with the default configuration.
pub fn decode(data: &[u8]) -> Result<PixelBuffer, Error> {
    Decoder::new().decode(data)
}
