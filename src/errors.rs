//!
//! Error types and the shared error sink
//!
//! All fallible operations in this crate report their failure twice: once through
//! their return value and once by recording it into the [`ErrorSink`] that the
//! framebuffer was created with. The sink keeps only the most recent error and
//! echoes a formatted message onto a configurable diagnostic stream.
//!

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors produced by framebuffer and drawing operations
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// The requested framebuffer dimensions cannot be represented
    #[error("{width}x{height} is not a valid framebuffer size: {details}")]
    InvalidSize {
        width: usize,
        height: usize,
        details: &'static str,
    },

    /// A coordinate was addressed outside the framebuffer
    #[error("coordinates {x},{y} lie outside the {width}x{height} frame")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// The backing buffer could not be allocated
    #[error("could not allocate {bytes} bytes for the framebuffer")]
    Allocation { bytes: usize },

    /// A font face could not be loaded
    #[error("could not load font {path}: {details}")]
    FontLoad { path: String, details: String },
}

impl GraphicsError {
    /// A small numeric code identifying the error kind
    ///
    /// This is what gets stored as [`LastError::code`] when the error is recorded
    /// into an [`ErrorSink`].
    pub fn code(&self) -> i32 {
        match self {
            GraphicsError::InvalidSize { .. } => 1,
            GraphicsError::OutOfBounds { .. } => 2,
            GraphicsError::Allocation { .. } => 3,
            GraphicsError::FontLoad { .. } => 4,
        }
    }
}

/// The most recent error recorded into an [`ErrorSink`]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LastError {
    /// Numeric error code as produced by [`GraphicsError::code`]
    pub code: i32,
    /// Human readable error message
    pub message: String,
}

/// Handle through which an [`ErrorSink`] is shared between framebuffers and the caller
///
/// `Arc`'s atomic reference count implements the shared-ownership contract of the
/// sink: every holder increments on clone, decrements on drop and whichever drop
/// observes the count reaching zero frees the sink exactly once.
pub type SharedErrorSink = Arc<ErrorSink>;

/// A shared accumulator for the last error that occurred
///
/// One sink is typically shared between several framebuffers and the caller.
/// Recording an error overwrites the previously stored one and additionally writes
/// a formatted line onto the sink's diagnostic stream (stderr unless configured
/// otherwise).
pub struct ErrorSink {
    last: Mutex<Option<LastError>>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ErrorSink {
    /// Create a new sink that writes diagnostics to stderr
    pub fn new() -> SharedErrorSink {
        Self::with_output(Box::new(io::stderr()))
    }

    /// Create a new sink that writes diagnostics to the given stream
    pub fn with_output(out: Box<dyn Write + Send>) -> SharedErrorSink {
        Arc::new(Self {
            last: Mutex::new(None),
            out: Mutex::new(out),
        })
    }

    /// Record an error as the sink's last error and echo it onto the diagnostic stream
    pub fn record(&self, error: &GraphicsError) {
        let code = error.code();
        tracing::debug!("recording graphics error {}: {}", code, error);
        {
            let mut out = self.out.lock().unwrap();
            let _ = writeln!(out, "dotmatrix: error {}: {}", code, error);
        }
        *self.last.lock().unwrap() = Some(LastError {
            code,
            message: error.to_string(),
        });
    }

    /// Write arbitrary text onto the diagnostic stream
    ///
    /// Used by debug helpers that want their output to end up next to the error
    /// messages (e.g. when the stream is a log file instead of stderr).
    pub fn write_diagnostic(&self, text: &str) {
        let mut out = self.out.lock().unwrap();
        let _ = writeln!(out, "{}", text);
    }

    /// The most recently recorded error, if any
    pub fn last(&self) -> Option<LastError> {
        self.last.lock().unwrap().clone()
    }

    /// Forget any previously recorded error
    pub fn reset(&self) {
        *self.last.lock().unwrap() = None;
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink")
            .field("last", &self.last)
            .field("out", &"<dyn Write>")
            .finish()
    }
}
