use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use super::CameraError;

/// One captured still, tightly packed RGB24 at the stream's native size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl Frame {
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::Capture(format!(
                "invalid frame size {width}x{height}"
            )));
        }
        let expected = Self::byte_len(width, height);
        if rgb.len() != expected {
            return Err(CameraError::Capture(format!(
                "expected {expected} bytes for a {width}x{height} frame, got {}",
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn encode_png(self) -> Result<Vec<u8>, CameraError> {
        let (width, height) = (self.width, self.height);
        let image = RgbImage::from_raw(width, height, self.rgb).ok_or_else(|| {
            CameraError::Encode(format!("frame buffer does not match {width}x{height}"))
        })?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|err| CameraError::Encode(err.to_string()))?;
        Ok(out.into_inner())
    }
}
