//! Dynamic-channel pixel buffer.
//!
//! [`PixelBuffer`] stores an image as a flat, tightly-packed byte vector:
//! row-major, top row first within storage, channels interleaved. The
//! channel count is a runtime property ([`ChannelLayout`]), which is what
//! the BMP bit-depth field dictates — typed pixel access is available
//! through the [`imgref`]/[`rgb`] conversions at the bottom of this module.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imgref::ImgVec;
use rgb::ComponentBytes;
use rgb::alt::GrayAlpha;
use rgb::{Gray, Rgb, Rgba};

// ---------------------------------------------------------------------------
// ChannelLayout
// ---------------------------------------------------------------------------

/// Channel layout (number and meaning of interleaved u8 channels).
///
/// The four layouts correspond to the four BMP bit depths this codec
/// handles: 8, 16, 24, and 32 bits per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum ChannelLayout {
    /// Single luminance channel.
    Gray = 1,
    /// Luminance + alpha.
    GrayAlpha = 2,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    Rgba = 4,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    #[inline]
    pub const fn channels(self) -> usize {
        self as usize
    }

    /// Whether this layout includes an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }

    /// Whether pixels of this layout carry red/blue bytes that BMP stores
    /// in swapped order. Gray and gray+alpha data has no color channels
    /// to reorder.
    #[inline]
    pub const fn swaps_red_blue(self) -> bool {
        self.channels() > 2
    }

    /// Layout for a raw channel count (1-4). Returns `None` otherwise.
    pub const fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Layout for a BMP bits-per-pixel value. Only 8, 16, 24, and 32 are
    /// representable; returns `None` for every other depth.
    pub const fn from_bit_depth(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray),
            16 => Some(Self::GrayAlpha),
            24 => Some(Self::Rgb),
            32 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// BMP bits-per-pixel value for this layout.
    #[inline]
    pub const fn bit_depth(self) -> u16 {
        self as u16 * 8
    }
}

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Errors from pixel buffer construction and conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// Provided data length does not match `width * height * channels`.
    SizeMismatch {
        /// Required byte length.
        expected: usize,
        /// Provided byte length.
        actual: usize,
    },
    /// A typed conversion was requested for a different layout.
    LayoutMismatch {
        /// Layout the conversion requires.
        expected: ChannelLayout,
        /// Layout the buffer actually has.
        actual: ChannelLayout,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "pixel data is {actual} bytes, expected {expected}")
            }
            Self::LayoutMismatch { expected, actual } => {
                write!(f, "buffer layout is {actual:?}, expected {expected:?}")
            }
        }
    }
}

impl core::error::Error for BufferError {}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// Owned, tightly-packed pixel buffer.
///
/// Invariant: the backing vec is exactly `width * height * channels` bytes
/// long after every operation completes. Pixel `(x, y)` channel `c` lives
/// at byte `(y * width + x) * channels + c`.
///
/// The backing vec can be recovered with [`into_vec`](Self::into_vec).
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    layout: ChannelLayout,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer for the given dimensions and layout.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Self {
        let total = width as usize * height as usize * layout.channels();
        Self {
            data: vec![0u8; total],
            width,
            height,
            layout,
        }
    }

    /// Wrap an existing byte vec as a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::SizeMismatch`] unless the vec is exactly
    /// `width * height * channels` bytes long.
    pub fn from_vec(
        data: Vec<u8>,
        width: u32,
        height: u32,
        layout: ChannelLayout,
    ) -> Result<Self, BufferError> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            layout,
        })
    }

    /// Quantize float channel data (conceptually in `[0, 1]`) to bytes.
    ///
    /// Each value maps through a truncating `(v * 255.0) as u8` — floor for
    /// in-range values, no rounding: `1.0` becomes `255`, `0.5` becomes
    /// `127`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::SizeMismatch`] unless the slice holds exactly
    /// `width * height * channels` values.
    pub fn from_float(
        data: &[f32],
        width: u32,
        height: u32,
        layout: ChannelLayout,
    ) -> Result<Self, BufferError> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let bytes = data.iter().map(|&v| (v * 255.0) as u8).collect();
        Ok(Self {
            data: bytes,
            width,
            height,
            layout,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// The full pixel data, rows packed back to back.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the full pixel data.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the backing vec.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32, channel: usize) -> usize {
        assert!(
            x < self.width && y < self.height && channel < self.channels(),
            "pixel ({x},{y}) channel {channel} out of bounds ({}x{}, {} channels)",
            self.width,
            self.height,
            self.channels()
        );
        (y as usize * self.width as usize + x as usize) * self.channels() + channel
    }

    /// Channel value of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `channel` is out of bounds.
    #[inline]
    pub fn value(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.data[self.index(x, y, channel)]
    }

    /// Set the channel value of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `channel` is out of bounds.
    #[inline]
    pub fn set_value(&mut self, x: u32, y: u32, channel: usize, value: u8) {
        let i = self.index(x, y, channel);
        self.data[i] = value;
    }

    /// Pixel bytes for row `y` (exactly `width * channels` bytes).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let len = self.width as usize * self.channels();
        let start = y as usize * len;
        &self.data[start..start + len]
    }

    /// Mutable pixel bytes for row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row index {y} out of bounds (height: {})",
            self.height
        );
        let len = self.width as usize * self.channels();
        let start = y as usize * len;
        &mut self.data[start..start + len]
    }

    /// Return a new buffer with the row order reversed (top row becomes
    /// bottom row). Dimensions and layout are unchanged; the result never
    /// aliases `self`.
    pub fn flip_vertical(&self) -> PixelBuffer {
        let row_len = self.width as usize * self.channels();
        let mut data = Vec::with_capacity(self.data.len());
        if row_len > 0 {
            for row in self.data.chunks_exact(row_len).rev() {
                data.extend_from_slice(row);
            }
        }
        Self {
            data,
            width: self.width,
            height: self.height,
            layout: self.layout,
        }
    }

    /// Swap the red and blue channel of every pixel in place.
    ///
    /// BMP stores color channels in BGR(A) order; applying this once after
    /// reading (or before writing) converts to RGB(A) and back. A no-op for
    /// [`Gray`](ChannelLayout::Gray) and
    /// [`GrayAlpha`](ChannelLayout::GrayAlpha) layouts, so applying it
    /// twice always restores the original bytes.
    pub fn swap_red_blue(&mut self) {
        swap_red_blue_in(&mut self.data, self.layout);
    }
}

/// In-place B↔R swap over raw interleaved pixel bytes.
pub(crate) fn swap_red_blue_in(data: &mut [u8], layout: ChannelLayout) {
    if !layout.swaps_red_blue() {
        return;
    }
    for pixel in data.chunks_exact_mut(layout.channels()) {
        pixel.swap(0, 2);
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelBuffer({}x{}, {:?})",
            self.width, self.height, self.layout
        )
    }
}

// ---------------------------------------------------------------------------
// ImgVec interop (typed pixels in, typed pixels out)
// ---------------------------------------------------------------------------

macro_rules! impl_from_imgvec {
    ($pixel:ty, $layout:expr) => {
        impl From<ImgVec<$pixel>> for PixelBuffer {
            fn from(img: ImgVec<$pixel>) -> Self {
                let (buf, w, h) = img.as_ref().to_contiguous_buf();
                PixelBuffer {
                    data: buf.as_bytes().to_vec(),
                    width: w as u32,
                    height: h as u32,
                    layout: $layout,
                }
            }
        }
    };
}

impl_from_imgvec!(Gray<u8>, ChannelLayout::Gray);
impl_from_imgvec!(GrayAlpha<u8>, ChannelLayout::GrayAlpha);
impl_from_imgvec!(Rgb<u8>, ChannelLayout::Rgb);
impl_from_imgvec!(Rgba<u8>, ChannelLayout::Rgba);

impl PixelBuffer {
    fn require_layout(&self, expected: ChannelLayout) -> Result<(), BufferError> {
        if self.layout != expected {
            return Err(BufferError::LayoutMismatch {
                expected,
                actual: self.layout,
            });
        }
        Ok(())
    }

    /// Convert to typed grayscale pixels, allocating a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LayoutMismatch`] unless the layout is
    /// [`Gray`](ChannelLayout::Gray).
    pub fn to_gray8(&self) -> Result<ImgVec<Gray<u8>>, BufferError> {
        self.require_layout(ChannelLayout::Gray)?;
        let pixels = self.data.iter().map(|&v| Gray::new(v)).collect();
        Ok(ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to typed gray+alpha pixels, allocating a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LayoutMismatch`] unless the layout is
    /// [`GrayAlpha`](ChannelLayout::GrayAlpha).
    pub fn to_gray_alpha8(&self) -> Result<ImgVec<GrayAlpha<u8>>, BufferError> {
        self.require_layout(ChannelLayout::GrayAlpha)?;
        let pixels = self
            .data
            .chunks_exact(2)
            .map(|c| GrayAlpha(c[0], c[1]))
            .collect();
        Ok(ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to typed RGB pixels, allocating a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LayoutMismatch`] unless the layout is
    /// [`Rgb`](ChannelLayout::Rgb).
    pub fn to_rgb8(&self) -> Result<ImgVec<Rgb<u8>>, BufferError> {
        self.require_layout(ChannelLayout::Rgb)?;
        let pixels = self
            .data
            .chunks_exact(3)
            .map(|c| Rgb {
                r: c[0],
                g: c[1],
                b: c[2],
            })
            .collect();
        Ok(ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to typed RGBA pixels, allocating a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LayoutMismatch`] unless the layout is
    /// [`Rgba`](ChannelLayout::Rgba).
    pub fn to_rgba8(&self) -> Result<ImgVec<Rgba<u8>>, BufferError> {
        self.require_layout(ChannelLayout::Rgba)?;
        let pixels = self
            .data
            .chunks_exact(4)
            .map(|c| Rgba {
                r: c[0],
                g: c[1],
                b: c[2],
                a: c[3],
            })
            .collect();
        Ok(ImgVec::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }
}
