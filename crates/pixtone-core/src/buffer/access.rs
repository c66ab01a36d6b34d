//! Per-sample access
//!
//! Bounds-checked getters return `Option`; bounds-checked setters return
//! `Result`. The `_unchecked` variants index directly and panic on
//! out-of-range coordinates, for use inside loops that already iterate
//! within the buffer geometry.

use super::{ChannelLayout, PixelBuffer, PixelBufferMut};
use crate::error::{Error, Result};

#[inline]
fn sample_offset(stride: usize, channels: usize, x: u32, y: u32, channel: usize) -> usize {
    y as usize * stride + x as usize * channels + channel
}

impl PixelBuffer {
    /// Get one sample, or `None` if out of bounds.
    pub fn get_sample(&self, x: u32, y: u32, channel: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() || channel >= self.channels() {
            return None;
        }
        Some(self.get_sample_unchecked(x, y, channel))
    }

    /// Get one sample without bounds checking on `x` and `channel`.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset is past the end of the data.
    #[inline]
    pub fn get_sample_unchecked(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.data()[sample_offset(self.stride(), self.channels(), x, y, channel)]
    }

    /// Get the (R, G, B) triple of an RGB pixel.
    ///
    /// Gray buffers report the luminance replicated on all three channels.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        match self.layout() {
            ChannelLayout::Rgb => Some((
                self.get_sample(x, y, 0)?,
                self.get_sample(x, y, 1)?,
                self.get_sample(x, y, 2)?,
            )),
            ChannelLayout::Gray => {
                let v = self.get_sample(x, y, 0)?;
                Some((v, v, v))
            }
        }
    }
}

impl PixelBufferMut {
    /// Get one sample, or `None` if out of bounds.
    pub fn get_sample(&self, x: u32, y: u32, channel: usize) -> Option<u8> {
        if x >= self.width() || y >= self.height() || channel >= self.channels() {
            return None;
        }
        Some(self.inner.data[sample_offset(self.stride(), self.channels(), x, y, channel)])
    }

    /// Set one sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for coordinates outside the image
    /// and [`Error::ChannelOutOfRange`] for a bad channel index.
    pub fn set_sample(&mut self, x: u32, y: u32, channel: usize, val: u8) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::InvalidArgument(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width(),
                self.height()
            )));
        }
        let channels = self.channels();
        if channel >= channels {
            return Err(Error::ChannelOutOfRange { channel, channels });
        }
        self.set_sample_unchecked(x, y, channel, val);
        Ok(())
    }

    /// Set one sample without bounds checking on `x` and `channel`.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset is past the end of the data.
    #[inline]
    pub fn set_sample_unchecked(&mut self, x: u32, y: u32, channel: usize, val: u8) {
        let idx = sample_offset(self.stride(), self.channels(), x, y, channel);
        self.inner.data[idx] = val;
    }

    /// Set all three samples of an RGB pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on a gray buffer or for coordinates
    /// outside the image.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.layout() != ChannelLayout::Rgb {
            return Err(Error::InvalidArgument(
                "set_rgb requires an RGB buffer".to_string(),
            ));
        }
        self.set_sample(x, y, 0, r)?;
        self.set_sample_unchecked(x, y, 1, g);
        self.set_sample_unchecked(x, y, 2, b);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_rgb() {
        let buf = PixelBuffer::new(3, 2, ChannelLayout::Rgb).unwrap();
        let mut pm = buf.try_into_mut().unwrap();
        pm.set_rgb(2, 1, 10, 20, 30).unwrap();
        let buf: PixelBuffer = pm.into();
        assert_eq!(buf.get_rgb(2, 1), Some((10, 20, 30)));
        assert_eq!(buf.get_rgb(0, 0), Some((0, 0, 0)));
        assert_eq!(buf.get_rgb(3, 0), None);
    }

    #[test]
    fn test_gray_get_rgb_replicates() {
        let buf = PixelBuffer::from_raw(1, 1, ChannelLayout::Gray, vec![42]).unwrap();
        assert_eq!(buf.get_rgb(0, 0), Some((42, 42, 42)));
    }

    #[test]
    fn test_set_sample_bounds() {
        let mut pm = PixelBuffer::new(2, 2, ChannelLayout::Gray).unwrap().to_mut();
        assert!(pm.set_sample(2, 0, 0, 1).is_err());
        assert!(matches!(
            pm.set_sample(0, 0, 1, 1),
            Err(Error::ChannelOutOfRange { .. })
        ));
        assert!(pm.set_rgb(0, 0, 1, 2, 3).is_err());
        pm.set_sample(1, 1, 0, 9).unwrap();
        assert_eq!(pm.get_sample(1, 1, 0), Some(9));
    }

    #[test]
    fn test_padded_offsets() {
        let buf = PixelBuffer::with_stride(1, 2, ChannelLayout::Rgb, 4).unwrap();
        let mut pm = buf.try_into_mut().unwrap();
        pm.set_rgb(0, 1, 1, 2, 3).unwrap();
        let buf: PixelBuffer = pm.into();
        assert_eq!(buf.data(), &[0, 0, 0, 0, 1, 2, 3, 0]);
    }
}
