//! Combined document writer
//!
//! Every included file becomes one block:
//!
//! ```text
//! ===== FILE START: src/main.rs =====
//!    1 | fn main() {}
//!    2 |
//! ===== FILE END: src/main.rs =====
//!
//! ```
//!
//! File bodies are copied byte for byte; nothing is re-encoded, so non UTF-8
//! content survives unchanged.

use std::io::{self, Write};
use std::path::Path;

/// Width of the right-aligned line number column
pub const LINE_NUMBER_WIDTH: usize = 4;

pub fn start_delimiter(relative: &Path) -> String {
    format!("===== FILE START: {} =====", relative.display())
}

pub fn end_delimiter(relative: &Path) -> String {
    format!("===== FILE END: {} =====", relative.display())
}

/// Appends file blocks to an output stream
pub struct CombinedWriter<W: Write> {
    inner: W,
}

impl<W: Write> CombinedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one file block and return the number of numbered lines emitted
    ///
    /// `content` is split on `\n` only, so a trailing newline yields a final
    /// empty line and `\r` stays part of the line it ends.
    pub fn write_file(&mut self, relative: &Path, content: &[u8]) -> io::Result<usize> {
        writeln!(self.inner, "{}", start_delimiter(relative))?;

        let mut lines = 0;
        for (idx, line) in content.split(|&b| b == b'\n').enumerate() {
            write!(self.inner, "{:>width$} | ", idx + 1, width = LINE_NUMBER_WIDTH)?;
            self.inner.write_all(line)?;
            self.inner.write_all(b"\n")?;
            lines += 1;
        }

        writeln!(self.inner, "{}", end_delimiter(relative))?;
        writeln!(self.inner)?;
        Ok(lines)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
