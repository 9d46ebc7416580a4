//! BMP encoding.
//!
//! Emits the same uncompressed subset the decoder reads: 14-byte file
//! header, 40-byte info header, BGR(A)-ordered rows padded to 4-byte
//! boundaries. Rows are written in storage order with a positive height
//! field, so decode(encode(x)) reproduces x for every layout.

use alloc::vec::Vec;
use log::debug;

use crate::buffer::{ChannelLayout, PixelBuffer, swap_red_blue_in};
use crate::decode::row_padding;
use crate::error::Error;

/// File offset of the pixel data the encoder writes: 14-byte file header
/// plus 40-byte info header.
const PIXEL_DATA_OFFSET: u32 = 54;

/// Pixels per meter for 300 dpi, stored in both resolution fields.
const RESOLUTION_300_DPI: u32 = 11810;

/// Full encoded size in bytes: headers, pixels, and row padding.
fn encoded_file_size(width: u32, height: u32, layout: ChannelLayout) -> u64 {
    let padding = row_padding(width, layout.channels() as u32);
    u64::from(PIXEL_DATA_OFFSET)
        + u64::from(width) * u64::from(height) * layout.channels() as u64
        + u64::from(padding) * u64::from(height)
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Reusable encode configuration.
///
/// Plain data, `Clone`, no lifetimes. The only knob disables the 32-bit
/// file-size check: the BMP file header stores the total size in a u32, so
/// larger images are rejected unless the caller explicitly opts out (the
/// stored size field then holds the low 32 bits).
///
/// # Example
///
/// ```
/// use zenbmp::{ChannelLayout, Encoder, PixelBuffer};
///
/// let image = PixelBuffer::new(2, 2, ChannelLayout::Rgb);
/// let bytes = Encoder::new().encode(&image)?;
/// assert_eq!(&bytes[..2], b"BM");
/// # Ok::<(), zenbmp::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    ignore_size_limit: bool,
}

impl Encoder {
    /// Default configuration: size limit enforced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the 32-bit file-size check.
    pub fn with_ignore_size_limit(mut self, ignore: bool) -> Self {
        self.ignore_size_limit = ignore;
        self
    }

    /// Encode a [`PixelBuffer`] into a BMP byte stream.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::FileTooBig`] when the encoded size exceeds
    /// `u32::MAX` bytes and the size limit has not been disabled.
    pub fn encode(&self, image: &PixelBuffer) -> Result<Vec<u8>, Error> {
        let width = image.width();
        let height = image.height();
        let layout = image.layout();
        let channels = layout.channels();
        let padding = row_padding(width, channels as u32) as usize;

        let file_size = encoded_file_size(width, height, layout);
        if !self.ignore_size_limit && file_size > u64::from(u32::MAX) {
            return Err(Error::FileTooBig { bytes: file_size });
        }

        let mut out = Vec::with_capacity(file_size as usize);

        // File header.
        out.extend_from_slice(b"BM");
        put_u32(&mut out, file_size as u32);
        put_u32(&mut out, 0); // two reserved fields
        put_u32(&mut out, PIXEL_DATA_OFFSET);

        // Info header.
        put_u32(&mut out, 40);
        put_u32(&mut out, width);
        put_u32(&mut out, height);
        // Planes in the low 16 bits, bits-per-pixel in the high 16.
        put_u32(&mut out, 1 + 65536 * u32::from(layout.bit_depth()));
        put_u32(&mut out, 0); // compression: none
        put_u32(&mut out, 0); // compressed size
        put_u32(&mut out, RESOLUTION_300_DPI);
        put_u32(&mut out, RESOLUTION_300_DPI);
        put_u32(&mut out, 0); // palette colors used
        put_u32(&mut out, 0); // important colors

        // RGB(A) -> stored BGR(A); gray layouts copy through unswapped.
        let mut scratch = image.bytes().to_vec();
        swap_red_blue_in(&mut scratch, layout);

        let row_bytes = width as usize * channels;
        if padding == 0 {
            out.extend_from_slice(&scratch);
        } else {
            let zeroes = [0u8; 3];
            for row in scratch.chunks_exact(row_bytes) {
                out.extend_from_slice(row);
                out.extend_from_slice(&zeroes[..padding]);
            }
        }

        debug!(
            "encoded {width}x{height} {layout:?} bmp ({} bytes, {padding} padding)",
            out.len()
        );
        Ok(out)
    }

    /// Quantize float channel data (conceptually in `[0, 1]`) and encode.
    ///
    /// Values map through a truncating `(v * 255.0) as u8`; see
    /// [`PixelBuffer::from_float`].
    ///
    /// # Errors
    ///
    /// Fails when the slice length does not match the dimensions, or as
    /// [`encode`](Self::encode) does.
    pub fn encode_float(
        &self,
        data: &[f32],
        width: u32,
        height: u32,
        layout: ChannelLayout,
    ) -> Result<Vec<u8>, Error> {
        let image = PixelBuffer::from_float(data, width, height, layout)?;
        self.encode(&image)
    }
}

/// Encode with the default configuration.
pub fn encode(image: &PixelBuffer) -> Result<Vec<u8>, Error> {
    Encoder::new().encode(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use alloc::vec::Vec;

    fn u32_at(data: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
    }

    // --- Header layout ---

    #[test]
    fn header_fields_are_exact() {
        let image = PixelBuffer::new(2, 2, ChannelLayout::Rgb);
        let bytes = encode(&image).unwrap();
        // 2 rows of 6 pixel bytes + 2 padding bytes each.
        assert_eq!(bytes.len(), 54 + 16);
        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(u32_at(&bytes, 2), 70); // file size
        assert_eq!(u32_at(&bytes, 6), 0); // reserved
        assert_eq!(u32_at(&bytes, 10), 54); // pixel data offset
        assert_eq!(u32_at(&bytes, 14), 40); // info header size
        assert_eq!(u32_at(&bytes, 18), 2); // width
        assert_eq!(u32_at(&bytes, 22), 2); // height, stored positive
        assert_eq!(u32_at(&bytes, 26), 1 + 65536 * 24); // planes | bpp
        assert_eq!(u32_at(&bytes, 30), 0); // compression
        assert_eq!(u32_at(&bytes, 34), 0); // compressed size
        assert_eq!(u32_at(&bytes, 38), 11810); // horizontal resolution
        assert_eq!(u32_at(&bytes, 42), 11810); // vertical resolution
        assert_eq!(u32_at(&bytes, 46), 0); // palette colors
        assert_eq!(u32_at(&bytes, 50), 0); // important colors
    }

    #[test]
    fn packed_planes_and_depth_per_layout() {
        for (layout, bits) in [
            (ChannelLayout::Gray, 8u32),
            (ChannelLayout::GrayAlpha, 16),
            (ChannelLayout::Rgb, 24),
            (ChannelLayout::Rgba, 32),
        ] {
            let bytes = encode(&PixelBuffer::new(1, 1, layout)).unwrap();
            assert_eq!(u32_at(&bytes, 26), 1 + 65536 * bits);
        }
    }

    // --- Pixel section ---

    #[test]
    fn rows_are_padded_with_zeroes() {
        let image =
            PixelBuffer::from_vec(alloc::vec![1, 2, 3, 4, 5, 6], 1, 2, ChannelLayout::Rgb)
                .unwrap();
        let bytes = encode(&image).unwrap();
        // Row stride is 4: 3 pixel bytes + 1 zero.
        assert_eq!(&bytes[54..58], &[3, 2, 1, 0]);
        assert_eq!(&bytes[58..62], &[6, 5, 4, 0]);
    }

    #[test]
    fn unpadded_rows_are_written_contiguously() {
        let data: Vec<u8> = (1..=8).collect();
        let image = PixelBuffer::from_vec(data, 4, 2, ChannelLayout::Gray).unwrap();
        let bytes = encode(&image).unwrap();
        assert_eq!(bytes.len(), 54 + 8);
        assert_eq!(&bytes[54..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn rgba_keeps_alpha_in_place() {
        let image =
            PixelBuffer::from_vec(alloc::vec![10, 20, 30, 40], 1, 1, ChannelLayout::Rgba)
                .unwrap();
        let bytes = encode(&image).unwrap();
        // R=10 G=20 B=30 A=40 stored as B G R A.
        assert_eq!(&bytes[54..58], &[30, 20, 10, 40]);
    }

    #[test]
    fn source_image_is_not_mutated() {
        let data = alloc::vec![1u8, 2, 3];
        let image = PixelBuffer::from_vec(data.clone(), 1, 1, ChannelLayout::Rgb).unwrap();
        encode(&image).unwrap();
        assert_eq!(image.bytes(), &data[..]);
    }

    // --- Size limit ---

    #[test]
    fn file_size_formula() {
        // 54 + w*h*c + padding*h
        assert_eq!(encoded_file_size(2, 2, ChannelLayout::Rgb), 70);
        assert_eq!(encoded_file_size(4, 2, ChannelLayout::Gray), 62);
        assert_eq!(encoded_file_size(0, 0, ChannelLayout::Rgba), 54);
    }

    #[test]
    fn size_limit_detects_unaddressable_files() {
        // 65536 x 65536 RGBA = 16 GiB of pixels; no allocation needed to
        // see it cannot fit a u32 size field.
        let size = encoded_file_size(1 << 16, 1 << 16, ChannelLayout::Rgba);
        assert!(size > u64::from(u32::MAX));
        assert!(encoded_file_size(1 << 10, 1 << 10, ChannelLayout::Rgba) <= u64::from(u32::MAX));
    }

    // --- Round trips ---

    #[test]
    fn round_trips_every_layout() {
        for layout in [
            ChannelLayout::Gray,
            ChannelLayout::GrayAlpha,
            ChannelLayout::Rgb,
            ChannelLayout::Rgba,
        ] {
            // 3x3 exercises padding for the 1- and 3-channel layouts.
            let data: Vec<u8> = (0..3 * 3 * layout.channels() as u8)
                .map(|i| i.wrapping_mul(37).wrapping_add(11))
                .collect();
            let image = PixelBuffer::from_vec(data, 3, 3, layout).unwrap();
            let decoded = decode(&encode(&image).unwrap()).unwrap();
            assert_eq!(decoded, image, "layout {layout:?}");
        }
    }

    #[test]
    fn round_trips_unpadded_width() {
        let data: Vec<u8> = (0..4 * 2 * 3).collect();
        let image = PixelBuffer::from_vec(data, 4, 2, ChannelLayout::Rgb).unwrap();
        let decoded = decode(&encode(&image).unwrap()).unwrap();
        assert_eq!(decoded, image);
    }

    // --- Float input ---

    #[test]
    fn float_input_is_quantized() {
        let bytes = Encoder::new()
            .encode_float(&[1.0, 0.5, 0.0, 0.25], 2, 2, ChannelLayout::Gray)
            .unwrap();
        let image = decode(&bytes).unwrap();
        assert_eq!(image.bytes(), &[255, 127, 0, 63]);
    }

    #[test]
    fn float_length_mismatch_is_rejected() {
        let err = Encoder::new()
            .encode_float(&[0.0; 2], 2, 2, ChannelLayout::Gray)
            .unwrap_err();
        assert!(matches!(err, Error::Buffer(_)));
    }
}
