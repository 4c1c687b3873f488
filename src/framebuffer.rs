//!
//! The in-memory pixel store mirroring a display's GDDRAM
//!
//! # Buffer layout
//!
//! The buffer follows the SSD1306 page layout: `height / 8` pages of `width` bytes
//! each, where byte `(y / 8) * width + x` holds the 8-pixel column at `x` within
//! page `y / 8` and bit `y % 8` (bit 0 topmost) holds the pixel itself. This is the
//! byte order the display controller expects to receive into its GDDRAM, so
//! [`Framebuffer::data`] can be handed to a transport without any reshuffling.
//! A consequence of this layout is that `height` must be a multiple of 8.
//!

use crate::errors::{GraphicsError, SharedErrorSink};
use crate::font::CachedFont;

/// Number of pixels stacked into one buffer byte
pub(crate) const PAGE_HEIGHT: usize = 8;

/// Axis-aligned rotation of logical coordinates into the physical frame
///
/// Rotation here is the cheap 90°-multiple remapping of `(x, y)` addresses; it is
/// unrelated to the arbitrary-angle glyph rotation offered by
/// [`TextOption::RotateFont`](crate::text::TextOption::RotateFont).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    Deg0,
    /// Rotate by 90 degrees clockwise
    Deg90,
    /// Rotate by 180 degrees
    Deg180,
    /// Rotate by 270 degrees clockwise
    Deg270,
}

impl Rotation {
    /// Interpret an angle in degrees as an axis-aligned rotation
    ///
    /// Negative angles and angles beyond 360 are normalized first. Anything that is
    /// not a multiple of 90 degrees is treated as no rotation at all, mirroring how
    /// the display family treats unknown rotation flags.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }
}

/// A 1-bit-per-pixel framebuffer for a dot-matrix display
///
/// Created from explicit dimensions and a [`SharedErrorSink`]; all pixels start
/// cleared. Dropping the framebuffer releases the buffer, the lazily loaded font
/// and its reference to the sink.
#[derive(Debug)]
pub struct Framebuffer {
    width: u8,
    height: u8,
    buffer: Vec<u8>,
    err: SharedErrorSink,
    pub(crate) font: Option<CachedFont>,
}

impl Framebuffer {
    /// Create a new framebuffer with the specified dimensions
    ///
    /// Both dimensions must be greater than 0 and `height` must be a multiple of 8
    /// (see the module docs for why). Allocation failure of the backing buffer is
    /// reported as [`GraphicsError::Allocation`] instead of aborting.
    pub fn new(width: u8, height: u8, err: SharedErrorSink) -> Result<Self, GraphicsError> {
        if width == 0 || height == 0 {
            let e = GraphicsError::InvalidSize {
                width: width as usize,
                height: height as usize,
                details: "width and height must both be greater than 0",
            };
            err.record(&e);
            return Err(e);
        }
        if height as usize % PAGE_HEIGHT != 0 {
            let e = GraphicsError::InvalidSize {
                width: width as usize,
                height: height as usize,
                details: "height must be a multiple of 8 to map onto display pages",
            };
            err.record(&e);
            return Err(e);
        }

        let len = width as usize * height as usize / PAGE_HEIGHT;
        let mut buffer = Vec::new();
        if buffer.try_reserve_exact(len).is_err() {
            let e = GraphicsError::Allocation { bytes: len };
            err.record(&e);
            return Err(e);
        }
        buffer.resize(len, 0);

        tracing::debug!("created {}x{} framebuffer ({} bytes)", width, height, len);
        Ok(Self {
            width,
            height,
            buffer,
            err,
            font: None,
        })
    }

    /// Get the size of this framebuffer as `(width, height)` tuple
    pub fn get_size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// The raw page-ordered buffer bytes, ready to be pushed into GDDRAM by a transport
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes in the backing buffer (`width * height / 8`)
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer holds no bytes at all (never the case for a constructed frame)
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The error sink this framebuffer records failures into
    pub fn error_sink(&self) -> &SharedErrorSink {
        &self.err
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Byte index and bit mask addressing the physical pixel (x, y)
    ///
    /// Callers must have bounds-checked (x, y) already.
    fn buffer_index(&self, x: usize, y: usize) -> (usize, u8) {
        let byte = (y / PAGE_HEIGHT) * self.width as usize + x;
        let mask = 1u8 << (y % PAGE_HEIGHT);
        (byte, mask)
    }

    /// Map a logical coordinate into the physical frame under the given rotation
    ///
    /// Returns `None` when the coordinate is not addressable. For 90/270 degrees the
    /// logical frame has swapped dimensions, i.e. x is bounded by `height` and y by
    /// `width`.
    fn rotate(&self, x: usize, y: usize, rotation: Rotation) -> Option<(usize, usize)> {
        let (w, h) = self.get_size();
        match rotation {
            Rotation::Deg0 => (x < w && y < h).then_some((x, y)),
            Rotation::Deg90 => (x < h && y < w).then_some((w - 1 - y, x)),
            Rotation::Deg180 => (x < w && y < h).then_some((w - 1 - x, h - 1 - y)),
            Rotation::Deg270 => (x < h && y < w).then_some((y, h - 1 - x)),
        }
    }

    /// Set or clear the pixel at the logical position (x, y) under `rotation`
    ///
    /// The coordinate is expressed in the unrotated screen's frame and remapped into
    /// the buffer according to `rotation`. Out-of-range coordinates are rejected
    /// with [`GraphicsError::OutOfBounds`] (and recorded in the sink), not clamped.
    pub fn set_pixel_rotated(
        &mut self,
        x: usize,
        y: usize,
        on: bool,
        rotation: Rotation,
    ) -> Result<(), GraphicsError> {
        match self.rotate(x, y, rotation) {
            None => {
                let (width, height) = self.get_size();
                let e = GraphicsError::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                };
                self.err.record(&e);
                Err(e)
            }
            Some((px, py)) => {
                let (i, mask) = self.buffer_index(px, py);
                if on {
                    self.buffer[i] |= mask;
                } else {
                    self.buffer[i] &= !mask;
                }
                Ok(())
            }
        }
    }

    /// Set or clear the pixel at position (x, y)
    ///
    /// This is [`Framebuffer::set_pixel_rotated`] without rotation.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), GraphicsError> {
        self.set_pixel_rotated(x, y, on, Rotation::Deg0)
    }

    /// Flip the pixel at position (x, y) in a single read-modify-write
    ///
    /// Same bounds contract as [`Framebuffer::set_pixel`], but twice as fast as a
    /// get followed by a set.
    pub fn invert_pixel(&mut self, x: usize, y: usize) -> Result<(), GraphicsError> {
        match self.rotate(x, y, Rotation::Deg0) {
            None => {
                let (width, height) = self.get_size();
                let e = GraphicsError::OutOfBounds {
                    x,
                    y,
                    width,
                    height,
                };
                self.err.record(&e);
                Err(e)
            }
            Some((px, py)) => {
                let (i, mask) = self.buffer_index(px, py);
                self.buffer[i] ^= mask;
                Ok(())
            }
        }
    }

    /// Get the value of the pixel at position (x, y)
    ///
    /// Returns 0 for a cleared pixel, 1 for a set pixel and -1 when the coordinate
    /// lies outside the frame. The sentinel (instead of a `Result`) is a deliberate
    /// part of the contract: callers scan pixels in tight loops and want a ternary
    /// answer without unwrapping.
    pub fn get_pixel(&self, x: usize, y: usize) -> i8 {
        let (w, h) = self.get_size();
        if x >= w || y >= h {
            return -1;
        }
        let (i, mask) = self.buffer_index(x, y);
        (self.buffer[i] & mask != 0) as i8
    }

    /// Set a pixel under rotation, silently dropping out-of-range coordinates
    ///
    /// This is the clipping primitive used by the line, circle and glyph rasterizers,
    /// which must keep going past the screen edge without spamming the error sink.
    /// Returns whether the pixel was actually written.
    pub(crate) fn set_pixel_clipped(
        &mut self,
        x: i32,
        y: i32,
        on: bool,
        rotation: Rotation,
    ) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self.rotate(x as usize, y as usize, rotation) {
            None => false,
            Some((px, py)) => {
                let (i, mask) = self.buffer_index(px, py);
                if on {
                    self.buffer[i] |= mask;
                } else {
                    self.buffer[i] &= !mask;
                }
                true
            }
        }
    }

    /// Fill the frame with a brick wall test pattern
    ///
    /// Courses of 4 pixel high bricks separated by one pixel of mortar, with the
    /// vertical joints of every other course offset by half a brick. Exercises the
    /// pixel API end to end and gives a recognizable image on a first smoke test.
    pub fn draw_bricks(&mut self) {
        let (w, h) = self.get_size();
        for y in 0..h {
            let course = y / 4;
            let joint_offset = if course % 2 == 0 { 0 } else { 4 };
            for x in 0..w {
                let mortar = y % 4 == 0;
                let joint = (x + joint_offset) % 8 == 0;
                if mortar || joint {
                    let _ = self.set_pixel(x, y, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ErrorSink;
    use quickcheck::{quickcheck, TestResult};

    fn framebuffer(width: u8, height: u8) -> Framebuffer {
        Framebuffer::new(width, height, ErrorSink::new()).unwrap()
    }

    #[test]
    fn test_invalid_sizes_are_rejected() {
        let sink = ErrorSink::new();
        assert!(matches!(
            Framebuffer::new(0, 64, sink.clone()),
            Err(GraphicsError::InvalidSize { .. })
        ));
        assert!(matches!(
            Framebuffer::new(128, 0, sink.clone()),
            Err(GraphicsError::InvalidSize { .. })
        ));
        // height not divisible into whole pages
        assert!(matches!(
            Framebuffer::new(128, 63, sink.clone()),
            Err(GraphicsError::InvalidSize { .. })
        ));
        assert_eq!(sink.last().unwrap().code, 1);
    }

    #[test]
    fn test_new_framebuffer_is_cleared() {
        let fb = framebuffer(16, 16);
        assert_eq!(fb.len(), 16 * 16 / 8);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(fb.get_pixel(x, y), 0);
            }
        }
    }

    #[test]
    fn test_clear_resets_all_pixels() {
        let mut fb = framebuffer(16, 16);
        fb.draw_bricks();
        assert!(fb.data().iter().any(|b| *b != 0));
        fb.clear();
        assert!(fb.data().iter().all(|b| *b == 0));
    }

    quickcheck! {
        fn test_set_and_get_pixel(x: u8, y: u8) -> TestResult {
            let mut fb = framebuffer(128, 64);
            match fb.set_pixel(x as usize, y as usize, true) {
                Err(_) => TestResult::discard(),
                Ok(()) => {
                    if fb.get_pixel(x as usize, y as usize) != 1 {
                        return TestResult::failed();
                    }
                    fb.set_pixel(x as usize, y as usize, false).unwrap();
                    TestResult::from_bool(fb.get_pixel(x as usize, y as usize) == 0)
                }
            }
        }
    }

    quickcheck! {
        fn test_invert_twice_is_a_noop(x: u8, y: u8) -> TestResult {
            let mut fb = framebuffer(128, 64);
            let before = fb.get_pixel(x as usize, y as usize);
            match fb.invert_pixel(x as usize, y as usize) {
                Err(_) => TestResult::discard(),
                Ok(()) => {
                    if fb.get_pixel(x as usize, y as usize) != 1 - before {
                        return TestResult::failed();
                    }
                    fb.invert_pixel(x as usize, y as usize).unwrap();
                    TestResult::from_bool(fb.get_pixel(x as usize, y as usize) == before)
                }
            }
        }
    }

    #[test]
    fn test_get_pixel_sentinel_for_out_of_range() {
        let fb = framebuffer(128, 64);
        assert_eq!(fb.get_pixel(128, 0), -1);
        assert_eq!(fb.get_pixel(0, 64), -1);
        assert_eq!(fb.get_pixel(255, 255), -1);
    }

    #[test]
    fn test_set_pixel_out_of_range_fails_and_is_recorded() {
        let sink = ErrorSink::new();
        let mut fb = Framebuffer::new(128, 64, sink.clone()).unwrap();
        assert!(matches!(
            fb.set_pixel(128, 0, true),
            Err(GraphicsError::OutOfBounds { .. })
        ));
        assert!(matches!(
            fb.invert_pixel(0, 64),
            Err(GraphicsError::OutOfBounds { .. })
        ));
        assert_eq!(sink.last().unwrap().code, 2);
    }

    quickcheck! {
        fn test_rotation_90_round_trip(x: u8, y: u8) -> TestResult {
            let mut fb = framebuffer(128, 64);
            let (w, h) = fb.get_size();
            let (x, y) = (x as usize, y as usize);
            // logical frame under 90 degrees has swapped dimensions
            if x >= h || y >= w {
                return TestResult::discard();
            }
            fb.set_pixel_rotated(x, y, true, Rotation::Deg90).unwrap();
            TestResult::from_bool(fb.get_pixel(w - 1 - y, x) == 1)
        }
    }

    #[test]
    fn test_rotation_mappings() {
        let mut fb = framebuffer(16, 16);

        fb.set_pixel_rotated(2, 3, true, Rotation::Deg180).unwrap();
        assert_eq!(fb.get_pixel(13, 12), 1);

        fb.set_pixel_rotated(2, 3, true, Rotation::Deg270).unwrap();
        assert_eq!(fb.get_pixel(3, 13), 1);
    }

    #[test]
    fn test_rotation_0_matches_unrotated_set() {
        let mut a = framebuffer(32, 16);
        let mut b = framebuffer(32, 16);
        a.set_pixel(5, 6, true).unwrap();
        b.set_pixel_rotated(5, 6, true, Rotation::Deg0).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(0), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(180), Rotation::Deg180);
        assert_eq!(Rotation::from_degrees(270), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(360), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(-90), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(45), Rotation::Deg0);
    }

    #[test]
    fn test_page_layout_byte_mapping() {
        let mut fb = framebuffer(128, 64);
        // pixel (3, 10) lives in page 1, byte 1 * 128 + 3, bit 10 % 8
        fb.set_pixel(3, 10, true).unwrap();
        assert_eq!(fb.data()[128 + 3], 1 << 2);
    }

    #[test]
    fn test_sink_is_shared_between_framebuffers() {
        let sink = ErrorSink::new();
        let fb_a = Framebuffer::new(8, 8, sink.clone()).unwrap();
        let fb_b = Framebuffer::new(8, 8, sink.clone()).unwrap();
        // the sink plus both framebuffers hold a reference
        assert_eq!(std::sync::Arc::strong_count(&sink), 3);

        drop(fb_a);
        assert_eq!(std::sync::Arc::strong_count(&sink), 2);
        // remaining holders can still use the sink
        fb_b.error_sink().record(&GraphicsError::Allocation { bytes: 1 });
        assert_eq!(sink.last().unwrap().code, 3);

        drop(fb_b);
        assert_eq!(std::sync::Arc::strong_count(&sink), 1);
    }
}
