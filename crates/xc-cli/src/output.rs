//! Progressive terminal output for a streaming explanation
//!
//! Successive snapshots usually extend the previous explanation, so only the
//! new suffix is printed. A snapshot whose text is not an extension (the
//! unescape heuristic can rewrite the tail) is skipped; the final
//! authoritative values reconcile whatever the preview got wrong.

use std::io::{self, Write};

use xc_core::stream::ExplanationFields;

#[derive(Debug, Default)]
pub struct StreamPrinter {
    title_shown: bool,
    printed: String,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print whatever this snapshot adds over what is already on screen.
    pub fn update(&mut self, snapshot: &ExplanationFields) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if !self.title_shown && !snapshot.title.is_empty() {
            writeln!(stdout, "# {}\n", snapshot.title)?;
            self.title_shown = true;
        }
        if let Some(suffix) = snapshot.explanation.strip_prefix(&self.printed) {
            write!(stdout, "{suffix}")?;
            self.printed = snapshot.explanation.clone();
        }
        stdout.flush()
    }

    /// Print the final values, correcting the preview if it diverged.
    pub fn finish(&mut self, fields: &ExplanationFields) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if !self.title_shown && !fields.title.is_empty() {
            writeln!(stdout, "# {}\n", fields.title)?;
            self.title_shown = true;
        }
        if let Some(suffix) = fields.explanation.strip_prefix(&self.printed) {
            writeln!(stdout, "{suffix}")?;
        } else {
            // Preview diverged from the authoritative text; reprint in full.
            writeln!(stdout, "\n---\n{}", fields.explanation)?;
        }
        self.printed = fields.explanation.clone();
        stdout.flush()
    }
}
