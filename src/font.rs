//!
//! Font face selection and glyph rasterization
//!
//! Text layout only depends on the [`GlyphSource`] capability: something that can
//! turn a character into a coverage bitmap plus an advance width. The concrete
//! backend shipped here is [`TtfFont`], a thin wrapper around [`ab_glyph`]; tests
//! and downstream users can substitute their own source through
//! [`Framebuffer::draw_text_with`](crate::framebuffer::Framebuffer::draw_text_with).
//!

use crate::errors::GraphicsError;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The built-in font faces, identified by their TrueType files on a Debian system
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum FontFace {
    /// Bitstream Vera Sans, the default face
    #[default]
    Vera,
    /// Bitstream Vera Sans Bold
    VeraBold,
    /// Bitstream Vera Sans Oblique
    VeraItalic,
    /// Bitstream Vera Sans Bold Oblique
    VeraBoldItalic,
    /// GNU FreeMono
    FreeMono,
    /// GNU FreeMono Bold
    FreeMonoBold,
    /// GNU FreeMono Oblique
    FreeMonoOblique,
    /// GNU FreeMono Bold Oblique
    FreeMonoBoldOblique,
}

impl FontFace {
    /// Path of the face's TrueType file on a Debian-based system
    pub fn path(&self) -> &'static Path {
        Path::new(match self {
            FontFace::Vera => "/usr/share/fonts/truetype/ttf-bitstream-vera/Vera.ttf",
            FontFace::VeraBold => "/usr/share/fonts/truetype/ttf-bitstream-vera/VeraBd.ttf",
            FontFace::VeraItalic => "/usr/share/fonts/truetype/ttf-bitstream-vera/VeraIt.ttf",
            FontFace::VeraBoldItalic => "/usr/share/fonts/truetype/ttf-bitstream-vera/VeraBI.ttf",
            FontFace::FreeMono => "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
            FontFace::FreeMonoBold => "/usr/share/fonts/truetype/freefont/FreeMonoBold.ttf",
            FontFace::FreeMonoOblique => "/usr/share/fonts/truetype/freefont/FreeMonoOblique.ttf",
            FontFace::FreeMonoBoldOblique => {
                "/usr/share/fonts/truetype/freefont/FreeMonoBoldOblique.ttf"
            }
        })
    }
}

impl FromStr for FontFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vera" => Ok(FontFace::Vera),
            "vera-bold" => Ok(FontFace::VeraBold),
            "vera-italic" => Ok(FontFace::VeraItalic),
            "vera-bolditalic" => Ok(FontFace::VeraBoldItalic),
            "freemono" => Ok(FontFace::FreeMono),
            "freemono-bold" => Ok(FontFace::FreeMonoBold),
            "freemono-oblique" => Ok(FontFace::FreeMonoOblique),
            "freemono-boldoblique" => Ok(FontFace::FreeMonoBoldOblique),
            other => Err(format!("unknown font face {:?}", other)),
        }
    }
}

/// A single glyph rasterized to a coverage bitmap
///
/// All offsets are relative to the pen position, with y pointing down and the pen
/// sitting on the text baseline. A glyph without visible outline (e.g. a space)
/// has an empty coverage mask but still carries an advance.
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Horizontal offset of the bitmap's left edge from the pen position
    pub left: i32,
    /// Vertical offset of the bitmap's top edge from the baseline (usually negative)
    pub top: i32,
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub height: usize,
    /// Row-major coverage mask; `true` means the pixel is inked
    pub coverage: Vec<bool>,
    /// Horizontal pen advance to the next glyph
    pub advance: f32,
}

impl RasterizedGlyph {
    /// A glyph with no visible pixels that only moves the pen
    pub fn empty(advance: f32) -> Self {
        Self {
            left: 0,
            top: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
            advance,
        }
    }
}

/// The capability the text layout engine requires from a font backend
pub trait GlyphSource {
    /// Rasterize a single character at the backend's configured size
    fn rasterize(&self, c: char) -> RasterizedGlyph;
}

/// Identifies a loaded face+size combination for cache invalidation
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct FontKey {
    pub path: PathBuf,
    pub size: u8,
}

/// The font a framebuffer currently holds loaded
///
/// Framebuffers keep one face+size alive at a time; drawing text with a different
/// combination reloads.
#[derive(Debug)]
pub(crate) struct CachedFont {
    pub key: FontKey,
    pub font: TtfFont,
}

/// A TrueType font loaded through [`ab_glyph`]
pub struct TtfFont {
    font: FontVec,
    scale: PxScale,
}

impl TtfFont {
    /// Load a font file and configure it for the given pixel size
    pub fn load(path: &Path, size: u8) -> Result<Self, GraphicsError> {
        tracing::debug!("loading font {} at {}px", path.display(), size);
        let data = std::fs::read(path).map_err(|e| GraphicsError::FontLoad {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| GraphicsError::FontLoad {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        Ok(Self {
            font,
            scale: PxScale::from(size as f32),
        })
    }
}

impl GlyphSource for TtfFont {
    fn rasterize(&self, c: char) -> RasterizedGlyph {
        let scaled = self.font.as_scaled(self.scale);
        let glyph_id = self.font.glyph_id(c);
        let advance = scaled.h_advance(glyph_id);

        let glyph = glyph_id.with_scale(self.scale);
        match self.font.outline_glyph(glyph) {
            None => RasterizedGlyph::empty(advance),
            Some(outlined) => {
                let bounds = outlined.px_bounds();
                let width = bounds.width() as usize;
                let height = bounds.height() as usize;
                let mut coverage = vec![false; width * height];
                outlined.draw(|gx, gy, c| {
                    let (gx, gy) = (gx as usize, gy as usize);
                    if c > 0.5 && gx < width && gy < height {
                        coverage[gy * width + gx] = true;
                    }
                });
                RasterizedGlyph {
                    left: bounds.min.x as i32,
                    top: bounds.min.y as i32,
                    width,
                    height,
                    coverage,
                    advance,
                }
            }
        }
    }
}

impl fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfFont").field("scale", &self.scale).finish()
    }
}
