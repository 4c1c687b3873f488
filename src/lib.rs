#![deny(trivial_casts)]
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    missing_docs,
    missing_debug_implementations,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]

//!
//! Dotmatrix is a monochrome framebuffer engine for small 1-bit dot-matrix displays
//! (SSD1306-class OLED controllers and friends).
//!
//! The crate owns an in-memory mirror of the display's GDDRAM and provides raster
//! primitives on top of it: single pixel access with axis-aligned rotation, line and
//! circle drawing, and TrueType text layout. Pushing the finished buffer to actual
//! hardware is the job of an external transport (I2C/SPI) and is out of scope here;
//! the transport only ever consumes [`Framebuffer::data`].
//!

pub mod draw;
pub mod dump;
pub mod errors;
pub mod font;
pub mod framebuffer;
pub mod text;

pub use errors::{ErrorSink, GraphicsError, LastError, SharedErrorSink};
pub use font::FontFace;
pub use framebuffer::{Framebuffer, Rotation};
pub use text::TextOption;

/// Version of this library as specified in the cargo manifest
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
