#![forbid(unsafe_code)]

//! Pixel buffer and the presentation boundary.
//!
//! [`PixelBuffer`] is a row-major RGBA byte grid: pixel `(x, y)` lives at
//! byte offset `(y * width + x) * 4` in R, G, B, A order. A [`Surface`] is the
//! external target that displays a finished buffer.

use crate::color::PackedRgba;

/// Row-major RGBA8 pixel grid, zero-initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer. Zero width or height is allowed.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            bytes: vec![0; len],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when `0 <= x < width` and `0 <= y < height`.
    #[inline]
    pub fn in_canvas(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Write one pixel.
    ///
    /// The caller guarantees `(x, y)` is inside the buffer; out-of-range
    /// coordinates panic on the slice index.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.bytes[offset..offset + 4].copy_from_slice(&[r, g, b, a]);
    }

    /// Write a packed color at `(x, y)`; same contract as [`Self::set_pixel`].
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: PackedRgba) {
        self.set_pixel(x, y, color.r(), color.g(), color.b(), color.a());
    }

    /// Read the color at `(x, y)`, or `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<PackedRgba> {
        if !self.in_canvas(x, y) {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.bytes[offset..offset + 4]);
        Some(PackedRgba::from_bytes(px))
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Reset every byte to zero.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Number of pixels whose bytes are not all zero.
    pub fn count_set(&self) -> usize {
        self.bytes
            .chunks_exact(4)
            .filter(|px| px.iter().any(|&b| b != 0))
            .count()
    }
}

/// External drawing target.
///
/// Dimensions must stay fixed for as long as a controller renders into it.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Commit a finished frame for display.
    fn present(&mut self, frame: &PixelBuffer);
}

/// In-memory surface that keeps the last presented frame.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    presents: u64,
    last: Option<PixelBuffer>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            presents: 0,
            last: None,
        }
    }

    /// How many frames have been presented.
    #[inline]
    pub fn present_count(&self) -> u64 {
        self.presents
    }

    /// The most recently presented frame.
    #[inline]
    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last.as_ref()
    }
}

impl Surface for HeadlessSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn present(&mut self, frame: &PixelBuffer) {
        self.presents += 1;
        match &mut self.last {
            Some(last) => last.clone_from(frame),
            None => self.last = Some(frame.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_canvas_edges() {
        for (w, h) in [(1, 1), (7, 3), (100, 100)] {
            let buf = PixelBuffer::new(w, h);
            assert!(buf.in_canvas(w as i32 - 1, h as i32 - 1));
            assert!(buf.in_canvas(0, 0));
            assert!(!buf.in_canvas(w as i32, 0));
            assert!(!buf.in_canvas(-1, 0));
            assert!(!buf.in_canvas(0, h as i32));
            assert!(!buf.in_canvas(0, -1));
        }
    }

    #[test]
    fn set_pixel_writes_row_major_rgba() {
        let mut buf = PixelBuffer::new(4, 3);
        buf.set_pixel(2, 1, 10, 20, 30, 255);
        let offset = (4 + 2) * 4;
        assert_eq!(&buf.as_bytes()[offset..offset + 4], &[10, 20, 30, 255]);
        assert_eq!(buf.count_set(), 1);
        assert_eq!(buf.get(2, 1), Some(PackedRgba::rgb(10, 20, 30)));
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let buf = PixelBuffer::new(5, 5);
        assert_eq!(buf.as_bytes().len(), 100);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.get(5, 0), None);
    }

    #[test]
    fn zero_sized_buffer() {
        let buf = PixelBuffer::new(0, 10);
        assert!(buf.as_bytes().is_empty());
        assert!(!buf.in_canvas(0, 0));
    }

    #[test]
    fn clear_resets() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set(1, 1, PackedRgba::WHITE);
        buf.clear();
        assert_eq!(buf.count_set(), 0);
    }

    #[test]
    fn headless_surface_keeps_last_frame() {
        let mut surface = HeadlessSurface::new(2, 2);
        let mut buf = PixelBuffer::new(2, 2);
        surface.present(&buf);
        buf.set(0, 0, PackedRgba::WHITE);
        surface.present(&buf);
        assert_eq!(surface.present_count(), 2);
        assert_eq!(surface.last_frame(), Some(&buf));
    }
}
