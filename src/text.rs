//!
//! Text layout on top of the framebuffer
//!
//! A string is laid out left to right from a pen position sitting on the text
//! baseline. Every glyph is rasterized by a [`GlyphSource`] and its coverage
//! pixels are blitted into the pixel store one by one, so the same clipping rules
//! apply as for lines and circles: pixels past the screen edge are dropped and
//! layout continues, with the pen advancing even for glyphs that fell entirely
//! off screen.
//!

use crate::errors::GraphicsError;
use crate::font::{CachedFont, FontFace, FontKey, GlyphSource, TtfFont};
use crate::framebuffer::{Framebuffer, Rotation};
use std::path::{Path, PathBuf};

/// Additional options accepted by [`Framebuffer::draw_text_extra`]
///
/// Options are applied in order; when the same option appears twice the later one
/// wins.
#[derive(Debug, Clone)]
pub enum TextOption {
    /// Use a custom font file instead of a built-in face
    FontFile(PathBuf),
    /// Rotate every glyph by the given angle in degrees around its pen position
    ///
    /// The angle is arbitrary (45, -30, ...) and applied as a real 2D rotation to
    /// each glyph pixel, unlike the axis-aligned fast path of [`Rotation`].
    RotateFont(i16),
    /// Rotate the pixel placement with the framebuffer's axis-aligned fast path
    ///
    /// Only multiples of 90 degrees have an effect; other angles fall back to no
    /// rotation (see [`Rotation::from_degrees`]).
    RotatePixel(i16),
}

impl Framebuffer {
    /// Draw `text` with a built-in face, starting at the pen position (x, y)
    ///
    /// (x, y) addresses the baseline of the first glyph. The face is loaded lazily
    /// at the given pixel size and cached until a different face or size is
    /// requested. Returns the number of characters that made it onto the screen
    /// (see [`Framebuffer::draw_text_with`] for the exact counting rule); a missing
    /// or corrupt font file fails with [`GraphicsError::FontLoad`].
    ///
    /// This is [`Framebuffer::draw_text_extra`] with an empty option list.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: u8,
        y: u8,
        face: FontFace,
        size: u8,
    ) -> Result<usize, GraphicsError> {
        self.draw_text_extra(text, x, y, face, size, &[])
    }

    /// Draw `text` like [`Framebuffer::draw_text`], honoring additional options
    pub fn draw_text_extra(
        &mut self,
        text: &str,
        x: u8,
        y: u8,
        face: FontFace,
        size: u8,
        options: &[TextOption],
    ) -> Result<usize, GraphicsError> {
        let mut font_path = face.path().to_path_buf();
        let mut glyph_rotation = 0i16;
        let mut anchor_rotation = Rotation::Deg0;
        for opt in options {
            match opt {
                TextOption::FontFile(path) => font_path = path.clone(),
                TextOption::RotateFont(degrees) => glyph_rotation = *degrees,
                TextOption::RotatePixel(degrees) => {
                    anchor_rotation = Rotation::from_degrees(*degrees as i32)
                }
            }
        }

        let font = self.take_font(&font_path, size)?;
        let rendered = self.draw_text_with(&font.font, text, x, y, glyph_rotation, anchor_rotation);
        self.font = Some(font);
        Ok(rendered)
    }

    /// Lay out and blit `text` using an explicit glyph source
    ///
    /// This is the layout core behind [`Framebuffer::draw_text`]; it is public so
    /// alternative font backends (or tests) can inject their own [`GlyphSource`]
    /// without going through the file-based loader.
    ///
    /// `glyph_rotation` rotates each glyph's pixels around the pen position by an
    /// arbitrary angle; `anchor_rotation` remaps the final pixel coordinates with
    /// the axis-aligned fast path. The returned count covers every character that
    /// contributed at least one on-screen pixel, plus empty-coverage glyphs (such
    /// as spaces) whose pen position lay inside the frame. Glyphs that fell
    /// entirely off screen contribute nothing but still advance the pen, so
    /// trailing text stays positioned correctly.
    pub fn draw_text_with(
        &mut self,
        font: &dyn GlyphSource,
        text: &str,
        x: u8,
        y: u8,
        glyph_rotation: i16,
        anchor_rotation: Rotation,
    ) -> usize {
        let mut pen_x = x as f32;
        let pen_y = y as f32;
        let (sin, cos) = (glyph_rotation as f32).to_radians().sin_cos();
        let mut rendered = 0;

        for c in text.chars() {
            let glyph = font.rasterize(c);
            let mut drew = false;

            for gy in 0..glyph.height {
                for gx in 0..glyph.width {
                    if !glyph.coverage[gy * glyph.width + gx] {
                        continue;
                    }
                    // glyph pixel relative to the pen position
                    let rel_x = (glyph.left + gx as i32) as f32;
                    let rel_y = (glyph.top + gy as i32) as f32;
                    let (rot_x, rot_y) = if glyph_rotation == 0 {
                        (rel_x, rel_y)
                    } else {
                        (rel_x * cos - rel_y * sin, rel_x * sin + rel_y * cos)
                    };
                    let px = (pen_x + rot_x).round() as i32;
                    let py = (pen_y + rot_y).round() as i32;
                    if self.set_pixel_clipped(px, py, true, anchor_rotation) {
                        drew = true;
                    }
                }
            }

            let pen_on_screen =
                pen_x >= 0.0 && (pen_x as usize) < self.get_size().0 && glyph.coverage.is_empty();
            if drew || pen_on_screen {
                rendered += 1;
            }
            pen_x += glyph.advance;
        }

        rendered
    }

    /// Reuse the cached font if it matches `path` and `size`, otherwise load anew
    ///
    /// The font is moved out of the framebuffer so layout can borrow it while
    /// mutating pixels; callers put it back when they are done.
    fn take_font(&mut self, path: &Path, size: u8) -> Result<CachedFont, GraphicsError> {
        let key = FontKey {
            path: path.to_path_buf(),
            size,
        };
        match self.font.take() {
            Some(cached) if cached.key == key => Ok(cached),
            _ => match TtfFont::load(path, size) {
                Ok(font) => Ok(CachedFont { key, font }),
                Err(e) => {
                    self.error_sink().record(&e);
                    Err(e)
                }
            },
        }
    }
}
