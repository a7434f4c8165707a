//! Byte spans into the original source buffer and a line index for turning
//! offsets into line/column positions.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open byte range `[start, end)` into the original buffer, plus the
/// position of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// 1-based line of `start`.
    pub line: usize,
    /// 0-based byte column of `start`.
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, index: &LineIndex) -> Self {
        let end = end.max(start);
        let (line, column) = index.position(start);
        Span { start, end, line, column }
    }

    /// A zero-width span at `offset`.
    pub fn empty(offset: usize, index: &LineIndex) -> Self {
        Self::new(offset, offset, index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// 1-based line of the last byte covered by the span (the start line for
    /// empty spans).
    pub fn end_line(&self, index: &LineIndex) -> usize {
        if self.is_empty() {
            self.line
        } else {
            index.position(self.end - 1).0
        }
    }
}

// ---------------------------------------------------------------------------
// Line index
// ---------------------------------------------------------------------------

/// Offsets of every line start in a buffer. Lines are split on `\n`; a
/// trailing `\r` is excluded from a line's content bounds.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(bytes: &[u8]) -> Self {
        let mut starts = vec![0];
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        // A trailing newline does not open a new line.
        if starts.len() > 1 && *starts.last().unwrap_or(&0) == bytes.len() {
            starts.pop();
        }
        LineIndex { starts, len: bytes.len() }
    }

    pub fn line_count(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.starts.len()
        }
    }

    pub fn text_len(&self) -> usize {
        self.len
    }

    /// 0-based line index containing `offset`. Offsets at or past the end map
    /// to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// (1-based line, 0-based byte column) of `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        (line + 1, offset.saturating_sub(self.starts[line]))
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len)
    }

    /// Content bounds of a 0-based line, excluding the line terminator.
    pub fn line_bounds(&self, line: usize, bytes: &[u8]) -> (usize, usize) {
        let start = self.line_start(line);
        let mut end = match self.starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.len,
        };
        if end > start && bytes.get(end - 1) == Some(&b'\n') {
            end -= 1;
        }
        if end > start && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_positions() {
        let src = b"ab\ncd\r\n\nef";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(0), (1, 0));
        assert_eq!(index.position(4), (2, 1));
        assert_eq!(index.position(8), (4, 0));
        assert_eq!(index.line_bounds(1, src), (3, 5), "CR should be excluded");
        assert_eq!(index.line_bounds(2, src), (7, 7));
    }

    #[test]
    fn test_trailing_newline_does_not_add_line() {
        let src = b"one\ntwo\n";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_bounds(1, src), (4, 7));
    }

    #[test]
    fn test_empty_buffer_has_no_lines() {
        let index = LineIndex::new(b"");
        assert_eq!(index.line_count(), 0);
        assert_eq!(index.position(0), (1, 0));
    }

    #[test]
    fn test_span_end_line() {
        let src = b"fn a(\n  x,\n) {}";
        let index = LineIndex::new(src);
        let span = Span::new(0, 13, &index);
        assert_eq!(span.line, 1);
        assert_eq!(span.end_line(&index), 3);
        assert!(span.contains_offset(12));
        assert!(!span.contains_offset(13));
    }
}
