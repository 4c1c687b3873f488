use clap::{ArgAction, Args, Parser, Subcommand};
use dotmatrix::FontFace;
use std::path::PathBuf;

/// Command-Line arguments as a well formatted struct, parsed using clap.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub(crate) struct CliOpts {
    #[command(subcommand)]
    pub command: Command,

    /// Increase program verbosity
    ///
    /// The default verbosity level is INFO.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, default_value = "0")]
    pub verbose: u8,

    /// Decrease program verbosity
    ///
    /// The default verbosity level is INFO.
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, default_value = "0")]
    pub quiet: u8,

    /// Width of the framebuffer in pixels
    #[arg(short = 'x', long = "width", default_value = "128")]
    pub width: u8,

    /// Height of the framebuffer in pixels (must be a multiple of 8)
    #[arg(short = 'y', long = "height", default_value = "64")]
    pub height: u8,

    /// Print the raw buffer bytes as hex pages instead of the pixel grid
    #[arg(long = "hex")]
    pub hex: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Fill the framebuffer with the brick wall test pattern
    Bricks,
    /// Draw a line between two points
    Line(LineOpts),
    /// Draw a circle
    Circle(CircleOpts),
    /// Draw a string of text
    Text(TextOpts),
    /// Scatter random pixels over the framebuffer
    Noise(NoiseOpts),
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LineOpts {
    /// Starting point as "x,y"
    #[arg(long = "from", default_value = "0,0")]
    pub from: Point,

    /// End point as "x,y"
    #[arg(long = "to", default_value = "127,63")]
    pub to: Point,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct CircleOpts {
    /// X coordinate of the center (may be negative or off-screen)
    #[arg(long = "xc", default_value = "64")]
    pub xc: i16,

    /// Y coordinate of the center (may be negative or off-screen)
    #[arg(long = "yc", default_value = "32")]
    pub yc: i16,

    /// Circle radius in pixels
    #[arg(short = 'r', long = "radius", default_value = "20")]
    pub radius: u16,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct TextOpts {
    /// The text to draw
    pub text: String,

    /// Pen position of the first glyph's baseline as "x,y"
    #[arg(long = "at", default_value = "0,32")]
    pub at: Point,

    /// Name of a built-in font face
    ///
    /// Possible values: vera[-bold|-italic|-bolditalic], freemono[-bold|-oblique|-boldoblique]
    #[arg(long = "face", default_value = "vera")]
    pub face: FontFace,

    /// Font size in pixels
    #[arg(short = 's', long = "size", default_value = "16")]
    pub size: u8,

    /// Use a custom font file instead of a built-in face
    #[arg(long = "font-file")]
    pub font_file: Option<PathBuf>,

    /// Rotate each glyph by this many degrees around its pen position
    #[arg(long = "rotate-font", default_value = "0")]
    pub rotate_font: i16,

    /// Rotate the pixel placement by a multiple of 90 degrees
    #[arg(long = "rotate-pixel", default_value = "0")]
    pub rotate_pixel: i16,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct NoiseOpts {
    /// How many random pixels to set
    #[arg(short = 'n', long = "count", default_value = "512")]
    pub count: usize,
}

/// A pixel coordinate parsed from the "x,y" form
#[derive(Debug, Copy, Clone)]
pub(crate) struct Point {
    pub x: u8,
    pub y: u8,
}

impl std::str::FromStr for Point {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("{:?} is not an x,y coordinate", s))?;
        Ok(Point {
            x: x.trim().parse().map_err(|e| format!("invalid x: {}", e))?,
            y: y.trim().parse().map_err(|e| format!("invalid y: {}", e))?,
        })
    }
}
