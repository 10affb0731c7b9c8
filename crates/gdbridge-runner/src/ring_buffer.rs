//! Bounded line capture for supervised process output
//!
//! [`LineSplitter`] turns arbitrary byte chunks into complete lines, carrying a
//! partial trailing line over to the next chunk. [`LineRing`] keeps the most
//! recent lines up to a fixed count.

use std::collections::VecDeque;
use std::fmt;

/// A ring of lines that maintains a fixed maximum line count.
#[derive(Debug, Clone)]
pub struct LineRing {
    lines: VecDeque<String>,
    max_lines: usize,
    total_lines_written: usize,
}

impl LineRing {
    /// Create a new ring with the specified maximum number of lines
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
            total_lines_written: 0,
        }
    }

    /// Append a line of process output.
    ///
    /// Lines that are blank after trimming are skipped. Trailing whitespace
    /// (including a `\r` from CRLF output) is stripped. When full, the oldest
    /// line is dropped.
    pub fn push(&mut self, line: &str) {
        if line.trim().is_empty() || self.max_lines == 0 {
            return;
        }
        self.total_lines_written += 1;
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line.trim_end().to_string());
    }

    /// Snapshot of the retained lines, oldest first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the total number of lines accepted (including dropped ones)
    #[must_use]
    pub const fn total_lines_written(&self) -> usize {
        self.total_lines_written
    }

    /// Check if any lines were dropped
    #[must_use]
    pub const fn was_truncated(&self) -> bool {
        self.total_lines_written > self.max_lines
    }
}

impl fmt::Display for LineRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Splits a byte stream on `\n`, holding back an unterminated tail.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete[..complete.len() - 1]
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Flush the unterminated tail at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&tail).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ring_basic() {
        let mut ring = LineRing::new(10);
        ring.push("Godot Engine v4.4.1");
        ring.push("Vulkan 1.3");
        assert_eq!(ring.lines(), vec!["Godot Engine v4.4.1", "Vulkan 1.3"]);
        assert_eq!(ring.len(), 2);
        assert!(!ring.was_truncated());
    }

    #[test]
    fn test_line_ring_skips_blank_and_trims_end() {
        let mut ring = LineRing::new(10);
        ring.push("");
        ring.push("   ");
        ring.push("ready\r");
        ring.push("  indented  ");
        assert_eq!(ring.lines(), vec!["ready", "  indented"]);
        assert_eq!(ring.total_lines_written(), 2);
    }

    #[test]
    fn test_line_ring_drops_oldest() {
        let mut ring = LineRing::new(2);
        ring.push("one");
        ring.push("two");
        ring.push("three");
        assert_eq!(ring.lines(), vec!["two", "three"]);
        assert_eq!(ring.total_lines_written(), 3);
        assert!(ring.was_truncated());
    }

    #[test]
    fn test_line_ring_display() {
        let mut ring = LineRing::new(4);
        ring.push("a");
        ring.push("b");
        assert_eq!(ring.to_string(), "a\nb");
        assert_eq!(LineRing::new(4).to_string(), "");
    }

    #[test]
    fn test_splitter_two_chunks() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed(b"Line1\n"), vec!["Line1"]);
        assert_eq!(splitter.feed(b"Line2\n"), vec!["Line2"]);
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_splitter_carries_partial_line() {
        let mut splitter = LineSplitter::new();
        assert!(splitter.feed(b"Li").is_empty());
        assert_eq!(splitter.feed(b"ne1\nLine"), vec!["Line1"]);
        assert_eq!(splitter.feed(b"2\n\nLine3"), vec!["Line2", ""]);
        assert_eq!(splitter.finish(), Some("Line3".to_string()));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_splitter_multibyte_across_chunks() {
        let bytes = "héllo\n".as_bytes();
        let mut splitter = LineSplitter::new();
        assert!(splitter.feed(&bytes[..2]).is_empty());
        assert_eq!(splitter.feed(&bytes[2..]), vec!["héllo"]);
    }
}
