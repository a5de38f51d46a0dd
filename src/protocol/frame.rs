//! Video frame codec and pixel conversion
//!
//! Downlink payload layout (after the transport's 4-byte length prefix):
//!
//! ```text
//! ┌──────────────────────┬────────────┬────────────┬──────────────────┐
//! │ Source name + NUL    │ Width (2B) │ Height(2B) │ BGR888 pixels    │
//! │ UTF-8, variable      │ Big-endian │ Big-endian │ width*height*3   │
//! └──────────────────────┴────────────┴────────────┴──────────────────┘
//! ```
//!
//! The camera delivers pixels in BGR channel order; they must be converted
//! before display (packed 0RGB for the window) or capture (RGB for JPEG).

use crate::error::{Error, Result};
use image::RgbImage;

/// Maximum accepted frame message size (room for 1280x720 BGR plus header)
pub const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

/// One decoded video frame from the downlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMessage {
    /// Source identifier announced by the robot (camera/host name)
    pub source: String,
    pub width: u16,
    pub height: u16,
    /// Raw pixels in BGR888 order, row-major
    pub pixels: Vec<u8>,
}

impl FrameMessage {
    /// Parse a frame message payload, validating header and pixel length
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let nul = payload
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::FrameDecode("missing source name terminator".to_string()))?;
        let source = std::str::from_utf8(&payload[..nul])
            .map_err(|_| Error::FrameDecode("source name is not valid UTF-8".to_string()))?
            .to_string();

        let rest = &payload[nul + 1..];
        if rest.len() < 4 {
            return Err(Error::FrameDecode("truncated dimension header".to_string()));
        }
        let width = u16::from_be_bytes([rest[0], rest[1]]);
        let height = u16::from_be_bytes([rest[2], rest[3]]);

        let pixels = &rest[4..];
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(Error::FrameDecode(format!(
                "pixel payload is {} bytes, expected {} for {}x{} BGR",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        Ok(Self {
            source,
            width,
            height,
            pixels: pixels.to_vec(),
        })
    }

    /// Serialize to the wire payload (length prefix is added by transport).
    ///
    /// Exact inverse of [`parse`](Self::parse); used by tests and by
    /// stream tooling standing in for the robot.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.source.len() + 5 + self.pixels.len());
        buf.extend_from_slice(self.source.as_bytes());
        buf.push(0);
        buf.extend_from_slice(&self.width.to_be_bytes());
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.extend_from_slice(&self.pixels);
        buf
    }

    /// Convert BGR888 to packed 0RGB u32 for the display sink
    pub fn to_argb(&self) -> Vec<u32> {
        let mut argb = Vec::with_capacity(self.width as usize * self.height as usize);
        for bgr in self.pixels.chunks_exact(3) {
            let (b, g, r) = (bgr[0] as u32, bgr[1] as u32, bgr[2] as u32);
            argb.push((r << 16) | (g << 8) | b);
        }
        argb
    }

    /// Convert BGR888 to an [`RgbImage`] for JPEG capture
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut rgb = Vec::with_capacity(self.pixels.len());
        for bgr in self.pixels.chunks_exact(3) {
            rgb.extend_from_slice(&[bgr[2], bgr[1], bgr[0]]);
        }
        RgbImage::from_raw(self.width as u32, self.height as u32, rgb)
            .expect("pixel length validated at parse time")
    }
}
