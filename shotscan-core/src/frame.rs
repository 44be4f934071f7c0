//! Decoded frame buffers.

use image::RgbImage;

/// A decoded raster frame in packed RGB24 layout.
///
/// Frames are ephemeral: the segmenter inspects one at a time and only the
/// frames kept as scene boundaries outlive the decode loop.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps a packed RGB24 buffer. `data` must hold `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB24 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGB triple at (x, y). Callers must stay in bounds.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Converts into an [`image::RgbImage`], e.g. for PNG export.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn into_image(self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_lookup() {
        // 2x2 frame: red, green / blue, white
        let data = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        let frame = Frame::new(2, 2, data);
        assert_eq!(frame.pixel(0, 0), [255, 0, 0]);
        assert_eq!(frame.pixel(1, 0), [0, 255, 0]);
        assert_eq!(frame.pixel(0, 1), [0, 0, 255]);
        assert_eq!(frame.pixel(1, 1), [255, 255, 255]);
    }

    #[test]
    fn test_into_image_roundtrip() {
        let frame = Frame::new(2, 1, vec![10, 20, 30, 40, 50, 60]);
        let img = frame.into_image().expect("buffer matches dimensions");
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [40, 50, 60]);
    }
}
