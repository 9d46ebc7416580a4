//! Error type for decode, encode, and blit operations.

use core::fmt;

use crate::buffer::BufferError;

/// Errors from BMP decode/encode and blit operations.
///
/// Every malformed-input path maps to a distinct variant carrying the
/// observed values, so callers can both match programmatically and print
/// a useful diagnostic. All errors are fatal to the operation that raised
/// them; the codec never returns partial results.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input does not start with the `BM` magic tag.
    NotBmp,
    /// The input ended inside the file or info header.
    TruncatedHeader,
    /// The plane-count field held something other than 1.
    UnsupportedPlaneCount(u16),
    /// Bits-per-pixel other than 8, 16, 24, or 32.
    UnsupportedBitDepth(u16),
    /// The header declares a negative or overflowing image extent.
    InvalidDimensions {
        /// Raw width field.
        width: i32,
        /// Raw height field.
        height: i32,
    },
    /// The pixel block was shorter than the header promised, or the
    /// pixel-data offset points outside the input.
    TruncatedPixelData,
    /// Decoded pixel count exceeded the configured cap.
    PixelLimitExceeded {
        /// Pixel count the header declares.
        actual: u64,
        /// Configured maximum.
        max: u64,
    },
    /// Encoded file size does not fit the format's 32-bit size field.
    FileTooBig {
        /// Computed file size in bytes.
        bytes: u64,
    },
    /// Blit source and target disagree on channel count.
    ChannelMismatch {
        /// Source channel count.
        source: u8,
        /// Target channel count.
        target: u8,
    },
    /// Blit source rectangle exceeds the source image bounds.
    RegionOutOfBounds {
        /// Source image width.
        width: u32,
        /// Source image height.
        height: u32,
        /// Offending rectangle extent on the x axis.
        x: u32,
        /// Offending rectangle extent on the y axis.
        y: u32,
    },
    /// Pixel buffer construction or conversion failed.
    Buffer(BufferError),
    /// File could not be read or written.
    #[cfg(feature = "std")]
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBmp => write!(f, "not a BMP file"),
            Self::TruncatedHeader => write!(f, "truncated BMP header"),
            Self::UnsupportedPlaneCount(planes) => {
                write!(f, "number of bitplanes was {planes}, expected 1")
            }
            Self::UnsupportedBitDepth(bits) => {
                write!(
                    f,
                    "file is {bits} bpp, but this reader only supports 8, 16, 24, or 32 bpp"
                )
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid image dimensions {width}x{height}")
            }
            Self::TruncatedPixelData => write!(f, "error loading file"),
            Self::PixelLimitExceeded { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::FileTooBig { bytes } => {
                write!(f, "file too big for BMP format ({bytes} bytes)")
            }
            Self::ChannelMismatch { source, target } => {
                write!(
                    f,
                    "blit requires images with equal channel count ({source} != {target})"
                )
            }
            Self::RegionOutOfBounds {
                width,
                height,
                x,
                y,
            } => {
                write!(
                    f,
                    "blit source region out of bounds (w={width} h={height} x={x} y={y})"
                )
            }
            Self::Buffer(err) => write!(f, "{err}"),
            #[cfg(feature = "std")]
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Buffer(err) => Some(err),
            #[cfg(feature = "std")]
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        Self::Buffer(err)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ChannelLayout;
    use alloc::format;

    #[test]
    fn display_names_the_violation() {
        assert_eq!(format!("{}", Error::NotBmp), "not a BMP file");
        assert_eq!(format!("{}", Error::TruncatedPixelData), "error loading file");
        assert!(format!("{}", Error::UnsupportedBitDepth(12)).contains("12"));
        assert!(
            format!("{}", Error::FileTooBig { bytes: 1 << 33 })
                .contains("file too big for BMP format")
        );
        assert_eq!(
            format!(
                "{}",
                Error::PixelLimitExceeded {
                    actual: 200,
                    max: 100
                }
            ),
            "pixel count 200 exceeds limit 100"
        );
    }

    #[test]
    fn buffer_error_is_source_chained() {
        use core::error::Error as _;
        let err = Error::from(BufferError::LayoutMismatch {
            expected: ChannelLayout::Rgb,
            actual: ChannelLayout::Rgba,
        });
        assert!(err.source().is_some());
        assert!(matches!(err, Error::Buffer(_)));
    }
}
