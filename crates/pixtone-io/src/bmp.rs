//! BMP image format support
//!
//! Reads and writes uncompressed 24-bit Windows Bitmap (BMP) files.
//!
//! # Layout handled
//!
//! ```text
//! offset  size  field
//!      0     2  magic "BM"
//!      2     4  file size
//!     10     4  pixel data offset
//!     14     4  info header size (40, 108 or 124)
//!     18     4  width  (signed)
//!     22     4  height (signed, must be positive: bottom-up rows)
//!     26     2  planes (must be 1)
//!     28     2  bits per pixel (must be 24)
//!     30     4  compression (must be 0)
//! ```
//!
//! The pixel data offset stored in the file is authoritative; any bytes
//! between the end of the info header and that offset are skipped.

use crate::{IoError, IoResult};
use pixtone_core::{ChannelLayout, PixelBuffer, PixelBufferMut};
use std::io::{self, Read, Write};
use tracing::{debug, warn};

/// BMP magic number
const BMP_MAGIC: &[u8; 2] = b"BM";

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// The only supported bit depth
const BMP_BITS_PER_PIXEL: u16 = 24;

/// `BI_RGB`: no compression
const BMP_COMPRESSION_NONE: u32 = 0;

#[inline]
fn le_u16(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}

#[inline]
fn le_u32(b: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
}

#[inline]
fn le_i32(b: &[u8], off: usize) -> i32 {
    i32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
}

/// Bytes per stored row: 3 bytes per pixel, padded to a multiple of 4.
#[inline]
pub fn bmp_row_stride(width: u32) -> usize {
    (width as usize * 3).div_ceil(4) * 4
}

/// Fill `buf` from the reader, mapping a short read to a corrupt-header
/// error on `field` and anything else to an I/O error.
fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &'static str) -> IoResult<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            IoError::corrupt(field, "unexpected end of data")
        } else {
            IoError::Io(e)
        }
    })
}

/// Discard exactly `count` bytes from the reader.
fn skip_bytes<R: Read>(reader: &mut R, count: u64, field: &'static str) -> IoResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if skipped != count {
        return Err(IoError::corrupt(field, "unexpected end of data"));
    }
    Ok(())
}

/// Read a BMP image
///
/// Returns an RGB buffer, top row first, with no row padding.
///
/// # Errors
///
/// - [`IoError::InvalidFormat`] if the magic bytes are not `"BM"`
/// - [`IoError::CorruptHeader`] for non-positive size fields, a data offset
///   inside the headers, a geometry larger than the declared file size, or
///   data shorter than the geometry requires
/// - [`IoError::UnsupportedFormat`] for anything but uncompressed
///   single-plane 24-bit data
/// - [`IoError::Io`] if the underlying reader fails
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<PixelBuffer> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    match reader.read_exact(&mut file_header[..2]) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(IoError::InvalidFormat(
                "data too short to hold the BMP magic".to_string(),
            ));
        }
        Err(e) => return Err(IoError::Io(e)),
    }
    if &file_header[0..2] != BMP_MAGIC {
        return Err(IoError::InvalidFormat(format!(
            "not a BMP file: magic {:02x} {:02x}",
            file_header[0], file_header[1]
        )));
    }
    read_field(&mut reader, &mut file_header[2..], "file header")?;

    let file_size = le_i32(&file_header, 2);
    if file_size <= 0 {
        return Err(IoError::corrupt(
            "file size",
            format!("must be positive, got {file_size}"),
        ));
    }
    let pixel_offset = u64::from(le_u32(&file_header, 10));

    // Read info header (minimum 40 bytes)
    let mut info_header = [0u8; BMP_INFO_HEADER_SIZE as usize];
    read_field(&mut reader, &mut info_header, "info header")?;

    let header_size = le_u32(&info_header, 0);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP info header size: {header_size}"
        )));
    }

    let width = le_i32(&info_header, 4);
    if width <= 0 {
        return Err(IoError::corrupt(
            "width",
            format!("must be positive, got {width}"),
        ));
    }
    let height = le_i32(&info_header, 8);
    if height <= 0 {
        return Err(IoError::corrupt(
            "height",
            format!("must be positive, got {height}"),
        ));
    }

    let planes = le_u16(&info_header, 12);
    if planes != 1 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported number of planes: {planes}"
        )));
    }
    let bits_per_pixel = le_u16(&info_header, 14);
    if bits_per_pixel != BMP_BITS_PER_PIXEL {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {bits_per_pixel}"
        )));
    }
    let compression = le_u32(&info_header, 16);
    if compression != BMP_COMPRESSION_NONE {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {compression}"
        )));
    }

    let headers_end = BMP_FILE_HEADER_SIZE as u64 + u64::from(header_size);
    if pixel_offset < headers_end {
        return Err(IoError::corrupt(
            "pixel data offset",
            format!("{pixel_offset} points inside the {headers_end}-byte header"),
        ));
    }

    let width = width as u32;
    let height = height as u32;

    // The declared geometry must fit inside the declared file size
    let row_stride = bmp_row_stride(width);
    let data_len = (row_stride as u64)
        .checked_mul(u64::from(height))
        .ok_or_else(|| IoError::corrupt("height", format!("{width}x{height} overflows")))?;
    let available = (file_size as u64).saturating_sub(pixel_offset);
    if data_len > available {
        return Err(IoError::corrupt(
            "pixel data",
            format!("{width}x{height} needs {data_len} bytes, file size leaves {available}"),
        ));
    }

    if header_size > BMP_INFO_HEADER_SIZE {
        warn!(header_size, "extended BMP info header; extra fields ignored");
    }
    // Skip the rest of the info header, then any gap before the pixels
    skip_bytes(
        &mut reader,
        pixel_offset - BMP_FILE_HEADER_SIZE as u64 - u64::from(BMP_INFO_HEADER_SIZE),
        "pixel data offset",
    )?;

    debug!(width, height, pixel_offset, data_len, "decoding 24-bit BMP");

    // Read the pixel data before allocating the image
    let mut data = Vec::new();
    reader.by_ref().take(data_len).read_to_end(&mut data)?;
    if (data.len() as u64) < data_len {
        return Err(IoError::corrupt(
            "pixel data",
            format!("expected {data_len} bytes, got {}", data.len()),
        ));
    }

    let mut pix_mut = PixelBufferMut::new(width, height, ChannelLayout::Rgb)?;
    let row_bytes = width as usize * 3;

    // Rows are stored bottom-up
    for (row, src) in data.chunks_exact(row_stride).enumerate() {
        let y = height - 1 - row as u32;
        let dst = pix_mut.row_pixels_mut(y);
        for (out, bgr) in dst.chunks_exact_mut(3).zip(src[..row_bytes].chunks_exact(3)) {
            out[0] = bgr[2];
            out[1] = bgr[1];
            out[2] = bgr[0];
        }
    }

    Ok(pix_mut.into())
}

/// Write a BMP image
///
/// Always writes an uncompressed 24-bit, bottom-up file with a 40-byte info
/// header. Gray buffers are expanded to R = G = B. Buffer row padding is not
/// written; BMP rows get their own 4-byte padding.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] if the image is too large for the
/// 32-bit size fields, or [`IoError::Io`] if the writer fails.
pub fn write_bmp<W: Write>(pix: &PixelBuffer, mut writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let row_stride = bmp_row_stride(width);
    let pixel_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize;
    let pixel_data_size = row_stride as u64 * u64::from(height);
    let file_size = pixel_offset as u64 + pixel_data_size;
    if file_size > i32::MAX as u64 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(IoError::UnsupportedFormat(format!(
            "{width}x{height} image too large for BMP"
        )));
    }
    debug!(width, height, file_size, "encoding 24-bit BMP");

    // File header
    writer.write_all(BMP_MAGIC)?;
    writer.write_all(&(file_size as u32).to_le_bytes())?;
    writer.write_all(&[0u8; 4])?; // Reserved
    writer.write_all(&(pixel_offset as u32).to_le_bytes())?;

    // Info header
    writer.write_all(&BMP_INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&(width as i32).to_le_bytes())?;
    writer.write_all(&(height as i32).to_le_bytes())?; // Bottom-up
    writer.write_all(&1u16.to_le_bytes())?; // Planes
    writer.write_all(&BMP_BITS_PER_PIXEL.to_le_bytes())?;
    writer.write_all(&BMP_COMPRESSION_NONE.to_le_bytes())?;
    writer.write_all(&(pixel_data_size as u32).to_le_bytes())?;
    writer.write_all(&0i32.to_le_bytes())?; // X pixels per meter
    writer.write_all(&0i32.to_le_bytes())?; // Y pixels per meter
    writer.write_all(&0u32.to_le_bytes())?; // Colors used
    writer.write_all(&0u32.to_le_bytes())?; // Important colors

    let mut row_buffer = vec![0u8; row_stride];
    for row in 0..height {
        let y = height - 1 - row;
        let src = pix.row_pixels(y);
        match pix.layout() {
            ChannelLayout::Rgb => {
                for (bgr, rgb) in row_buffer.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
                    bgr[0] = rgb[2];
                    bgr[1] = rgb[1];
                    bgr[2] = rgb[0];
                }
            }
            ChannelLayout::Gray => {
                for (bgr, &v) in row_buffer.chunks_exact_mut(3).zip(src) {
                    bgr.fill(v);
                }
            }
        }
        writer.write_all(&row_buffer)?;
    }

    Ok(())
}
