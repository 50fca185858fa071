//! Line cursor with one line of lookahead.

/// A trimmed, non-blank source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line number in the original source (1-indexed).
    pub number: usize,
    /// Line content without surrounding whitespace.
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn is_comment(&self) -> bool {
        self.text.starts_with('#')
    }

    /// The text before the first `:`, trimmed, if the line has a colon.
    pub fn key_portion(&self) -> Option<&'a str> {
        self.text.split_once(':').map(|(key, _)| key.trim())
    }
}

/// Iterates over the meaningful lines of a source.
///
/// Blank lines never reach the parser: any run of them is only a separator.
#[derive(Debug)]
pub struct Cursor<'a> {
    lines: Vec<Line<'a>>,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        let lines = source
            .lines()
            .enumerate()
            .map(|(i, text)| Line {
                number: i + 1,
                text: text.trim(),
            })
            .filter(|line| !line.text.is_empty())
            .collect();

        Self { lines, position: 0 }
    }

    /// The next line, without consuming it.
    pub fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.position).copied()
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.peek()?;
        self.position += 1;
        Some(line)
    }
}
