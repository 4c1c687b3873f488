//!
//! Debug serializers rendering framebuffer content as text
//!
//! These helpers read the pixel store and never mutate it. They exist for
//! development and tests; the strings can be printed, logged or pushed onto the
//! error sink's diagnostic stream via
//! [`ErrorSink::write_diagnostic`](crate::errors::ErrorSink::write_diagnostic).
//!

use crate::framebuffer::Framebuffer;
use itertools::Itertools;

/// Characters that cannot stand in for a bit in a dump
///
/// The digits 0 and 1 read like bit values themselves and anything non-printable
/// would garble the grid, so those fall back to the defaults.
fn sanitize_bit_char(c: char, default: char) -> char {
    if c == '0' || c == '1' || !c.is_ascii_graphic() {
        default
    } else {
        c
    }
}

impl Framebuffer {
    /// Render the raw buffer bytes as a hex table, one display page per line
    ///
    /// This dumps the in-memory mirror, not the device's actual GDDRAM, but since
    /// transports write [`Framebuffer::data`] verbatim the two agree after an
    /// update.
    pub fn hexdump(&self) -> String {
        let (width, _) = self.get_size();
        self.data()
            .chunks(width)
            .enumerate()
            .map(|(page, bytes)| {
                let row = bytes.iter().map(|b| format!("{:02x}", b)).join(" ");
                format!("page {:2}: {}", page, row)
            })
            .join("\n")
    }

    /// Render the pixel grid as text, one character per pixel
    ///
    /// `zero` and `one` select the characters for cleared and set pixels; characters
    /// that are not printable or that collide with the digits 0/1 fall back to `.`
    /// and `|`. With `use_space` a space is inserted after every 8 pixel columns so
    /// byte boundaries stay visible.
    pub fn bitdump_custom(&self, zero: char, one: char, use_space: bool) -> String {
        let zero = sanitize_bit_char(zero, '.');
        let one = sanitize_bit_char(one, '|');
        let (w, h) = self.get_size();

        (0..h)
            .map(|y| {
                let mut line = String::with_capacity(w + w / 8);
                for x in 0..w {
                    if use_space && x > 0 && x % 8 == 0 {
                        line.push(' ');
                    }
                    line.push(if self.get_pixel(x, y) == 1 { one } else { zero });
                }
                line
            })
            .join("\n")
    }

    /// [`Framebuffer::bitdump_custom`] with default characters and byte spacing
    pub fn bitdump(&self) -> String {
        self.bitdump_custom('\0', '\0', true)
    }
}
