//! Path-based load/save on top of the byte codec.
//!
//! Thin `std`-only convenience: read the whole file and decode, or encode
//! and write the whole file. Handles are scoped to each call and released
//! on every exit path.

use std::fs;
use std::path::Path;

use log::debug;

use crate::buffer::PixelBuffer;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::Error;

/// Read and decode a BMP file.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be read; otherwise any decode error.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, Error> {
    load_with(path, &Decoder::new())
}

/// Read and decode a BMP file with an explicit decoder configuration.
pub fn load_with<P: AsRef<Path>>(path: P, decoder: &Decoder) -> Result<PixelBuffer, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    decoder.decode(&bytes)
}

/// Encode and write a BMP file.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be written; otherwise any encode
/// error.
pub fn save<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> Result<(), Error> {
    save_with(path, &Encoder::new(), image)
}

/// Encode and write a BMP file with an explicit encoder configuration.
pub fn save_with<P: AsRef<Path>>(
    path: P,
    encoder: &Encoder,
    image: &PixelBuffer,
) -> Result<(), Error> {
    let path = path.as_ref();
    let bytes = encoder.encode(image)?;
    fs::write(path, &bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
