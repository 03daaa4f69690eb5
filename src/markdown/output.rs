//! Line-oriented output buffer with indentation and quoting.

use textwrap::{Options, WordSeparator, WordSplitter, WrapAlgorithm};

/// Accumulates Markdown lines.
///
/// Every line is prefixed with the current indent followed by one `> ` per
/// quote level. After a list marker has been written the next line is
/// appended to the marker instead of starting a new, prefixed line.
///
/// Blank lines are deferred until the next line is written, so runs of them
/// collapse and none trail the output. A deferred blank line keeps the
/// outermost prefix requested, which separates consecutive quotes.
#[derive(Debug, Default)]
pub struct Output {
    body: String,
    /// Indentation of nested list content.
    pub indent: String,
    pub quote_level: usize,
    /// A list marker is waiting for the first line of its item.
    deindent_first: bool,
    /// Prefix of the blank line to write before the next line.
    pending_blank: Option<String>,
}

/// Indentation added per list nesting level.
pub const LIST_INDENT: &str = "    ";

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent plus quote markers.
    pub fn prefix(&self) -> String {
        format!("{}{}", self.indent, "> ".repeat(self.quote_level))
    }

    /// Write one line. Trailing whitespace is trimmed.
    pub fn line(&mut self, text: &str) {
        self.flush_blank();
        if self.deindent_first {
            self.deindent_first = false;
            self.body.push_str(text.trim_end());
        } else {
            let line = format!("{}{}", self.prefix(), text);
            self.body.push_str(line.trim_end());
        }
        self.body.push('\n');
    }

    /// Write several lines verbatim (no wrapping).
    pub fn lines(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// Request a blank line before whatever is written next.
    pub fn blank(&mut self) {
        if self.body.is_empty() || self.deindent_first {
            return;
        }
        let prefix = self.prefix().trim_end().to_string();
        match &self.pending_blank {
            Some(pending) if pending.len() <= prefix.len() => {}
            _ => self.pending_blank = Some(prefix),
        }
    }

    fn flush_blank(&mut self) {
        if let Some(prefix) = self.pending_blank.take() {
            self.body.push_str(&prefix);
            self.body.push('\n');
        }
    }

    /// Greedily word-wrap `text` to `width` columns, prefix included.
    pub fn wrapped(&mut self, text: &str, width: usize) {
        let prefix = self.prefix();
        let options = Options::new(width.max(prefix.len() + 1))
            .initial_indent(&prefix)
            .subsequent_indent(&prefix)
            .break_words(false)
            .word_separator(WordSeparator::AsciiSpace)
            .word_splitter(WordSplitter::NoHyphenation)
            .wrap_algorithm(WrapAlgorithm::FirstFit);

        let wrapped: Vec<String> = textwrap::wrap(text, &options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect();
        for line in wrapped {
            let text = line.strip_prefix(prefix.as_str()).unwrap_or(&line);
            self.line(text);
        }
    }

    /// Start a list item: write its marker and indent what follows.
    pub fn marker(&mut self, marker: &str) {
        self.close_marker();
        self.flush_blank();
        let prefix = self.prefix();
        self.body.push_str(&prefix);
        self.body.push_str(marker);
        self.deindent_first = true;
        self.indent.push_str(LIST_INDENT);
    }

    /// End a list item started with [`Output::marker`].
    pub fn end_item(&mut self) {
        self.close_marker();
        let len = self.indent.len().saturating_sub(LIST_INDENT.len());
        self.indent.truncate(len);
    }

    /// Terminate a marker line that got no content of its own.
    fn close_marker(&mut self) {
        if self.deindent_first {
            self.deindent_first = false;
            let trimmed = self.body.trim_end_matches(' ').len();
            self.body.truncate(trimmed);
            self.body.push('\n');
        }
    }

    /// The finished text. A blank line still pending is dropped.
    pub fn finish(mut self) -> String {
        self.close_marker();
        self.body
    }
}
