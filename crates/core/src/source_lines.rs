//! Newline-terminated shader lines, exactly as submitted to the driver.
//!
//! A shader source is cut at every `'\n'`. Each line keeps its terminating
//! newline, so a source with N newlines yields N lines and the concatenation
//! of those lines is the text the driver compiles. Line numbers in compiler
//! diagnostics therefore match [`SourceLines::numbered`] one to one.
//!
//! Text after the last newline is not a line. It is kept aside as the
//! [`tail`](SourceLines::tail) and is not submitted.

/// Borrowed, newline-terminated lines of one shader source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
    tail: &'a str,
}

impl<'a> SourceLines<'a> {
    /// Splits `source` into newline-terminated lines.
    pub fn split(source: &'a str) -> Self {
        let mut lines: Vec<&'a str> = source.split_inclusive('\n').collect();
        let tail = if lines.last().is_some_and(|l| !l.ends_with('\n')) {
            lines.pop().unwrap_or_default()
        } else {
            ""
        };
        Self { lines, tail }
    }

    /// Number of lines, equal to the number of newline characters.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true when the source contains no newline at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line slices, each ending in `'\n'`.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Text after the last newline, which is not submitted.
    pub fn tail(&self) -> &'a str {
        self.tail
    }

    /// The text handed to the driver: every line, concatenated.
    pub fn submitted(&self) -> String {
        self.lines.concat()
    }

    /// Formats the lines with right-aligned 1-based line numbers, followed
    /// by the driver `log` when it is non-empty.
    pub fn numbered(&self, log: &str) -> String {
        let width = self.lines.len().max(1).to_string().len();

        let numbered = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let text = line.trim_end_matches('\n').trim_end_matches('\r');
                format!("{:>width$}: {text}", i + 1, width = width)
            })
            .collect::<Vec<_>>()
            .join("\n");

        match (numbered.is_empty(), log.is_empty()) {
            (true, true) => String::new(),
            (true, false) => log.to_string(),
            (false, true) => numbered,
            (false, false) => format!("{numbered}\n\n{log}"),
        }
    }
}
