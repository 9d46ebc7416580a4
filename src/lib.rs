//! Minimal BMP codec and pixel-buffer blit engine.
//!
//! A hand-rolled reader/writer for the uncompressed BMP subset used to
//! load and snapshot textures, plus the blit compositor that goes with it:
//!
//! - [`PixelBuffer`] / [`ChannelLayout`] — dynamic-channel pixel storage
//! - [`decode`] / [`Decoder`] / [`BmpInfo`] — decoding and header probing
//! - [`encode`] / [`Encoder`] — encoding with file-size-limit control
//! - [`blit`] / [`blit_unchecked`] — rectangular copy with target growth
//! - [`load`] / [`save`] — path convenience (`std` feature, on by default)
//!
//! Only uncompressed, single-plane, 8/16/24/32-bpp files are handled.
//! Paletted 8-bpp files are read as raw 1-channel values — palette tables
//! are not resolved.
//!
//! # Example
//!
//! ```
//! use zenbmp::{ChannelLayout, PixelBuffer, blit, decode, encode};
//!
//! let mut atlas = PixelBuffer::new(4, 4, ChannelLayout::Rgb);
//! let tile = PixelBuffer::from_float(&[1.0; 2 * 2 * 3], 2, 2, ChannelLayout::Rgb)?;
//! blit(&tile, (0, 0), (2, 2), &mut atlas, (2, 2))?;
//!
//! let bytes = encode(&atlas)?;
//! assert_eq!(decode(&bytes)?, atlas);
//! # Ok::<(), zenbmp::Error>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod blit;
mod buffer;
mod decode;
mod encode;
mod error;
#[cfg(feature = "std")]
mod file;

pub use blit::{blit, blit_unchecked};
pub use buffer::{BufferError, ChannelLayout, PixelBuffer};
pub use decode::{BmpInfo, Decoder, decode};
pub use encode::{Encoder, encode};
pub use error::Error;
#[cfg(feature = "std")]
pub use file::{load, load_with, save, save_with};

// Re-exports for typed pixel interop.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::alt::GrayAlpha;
pub use rgb::{Gray, Rgb, Rgba};
