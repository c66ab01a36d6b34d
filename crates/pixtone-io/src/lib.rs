//! pixtone-io - BMP decoding and encoding
//!
//! The decoder accepts uncompressed 24-bit BMP files and produces
//! top-down RGB [`PixelBuffer`]s. The encoder writes the same format back
//! out, which is what round-trip tests rely on.
//!
//! - [`decode`] / [`encode`] work on in-memory bytes
//! - [`read_image`] / [`write_image`] work on file paths
//! - [`bmp::read_bmp`] / [`bmp::write_bmp`] work on any `Read` / `Write`

pub mod bmp;
mod error;

pub use bmp::{read_bmp, write_bmp};
pub use error::{IoError, IoResult};

use pixtone_core::PixelBuffer;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Decode an in-memory BMP file.
pub fn decode(bytes: &[u8]) -> IoResult<PixelBuffer> {
    read_bmp(bytes)
}

/// Encode a buffer as an in-memory 24-bit BMP file.
pub fn encode(pix: &PixelBuffer) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(54 + bmp::bmp_row_stride(pix.width()) * pix.height() as usize);
    write_bmp(pix, &mut out)?;
    Ok(out)
}

/// Read a BMP image from a file path.
///
/// # Errors
///
/// An unreadable file is [`IoError::Io`]; malformed contents produce the
/// same errors as [`read_bmp`].
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading image");
    let file = File::open(path)?;
    read_bmp(BufReader::new(file))
}

/// Write a buffer to a file path as a 24-bit BMP.
pub fn write_image<P: AsRef<Path>>(path: P, pix: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "writing image");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_bmp(pix, &mut writer)?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}
