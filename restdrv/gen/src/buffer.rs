//! In-memory output buffer.
//!
//! Emitters append indented lines; nothing touches the filesystem until the
//! finished buffer is rendered once and handed to the output writer.

/// Spaces per indentation level.
const INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Line { depth: usize, text: String },
    Blank,
}

/// Append-only sequence of output lines.
///
/// ## Examples
///
/// ```
/// use restdrv_gen::buffer::EmissionBuffer;
///
/// let mut out = EmissionBuffer::new();
/// out.open("struct Foo {");
/// out.line("std::string bar_;");
/// out.close("};");
///
/// assert_eq!(out.render(), "struct Foo {\n    std::string bar_;\n};\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmissionBuffer {
    fragments: Vec<Fragment>,
    depth: usize,
}

impl EmissionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line at the current depth.
    pub fn line(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment::Line {
            depth: self.depth,
            text: text.into(),
        });
    }

    /// Appends a line and indents what follows.
    pub fn open(&mut self, text: impl Into<String>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedents, then appends a line. A blank right before it is dropped.
    pub fn close(&mut self, text: impl Into<String>) {
        if matches!(self.fragments.last(), Some(Fragment::Blank)) {
            self.fragments.pop();
        }
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Appends a line one level out from the current depth, without
    /// changing it. Used for `public:`-style labels.
    pub fn label(&mut self, text: impl Into<String>) {
        self.fragments.push(Fragment::Line {
            depth: self.depth.saturating_sub(1),
            text: text.into(),
        });
    }

    /// Appends a blank separator. Consecutive blanks and a leading blank
    /// collapse.
    pub fn blank(&mut self) {
        if matches!(self.fragments.last(), Some(Fragment::Line { .. })) {
            self.fragments.push(Fragment::Blank);
        }
    }

    /// Appends another buffer, re-based at the current depth.
    pub fn append(&mut self, other: EmissionBuffer) {
        for fragment in other.fragments {
            match fragment {
                Fragment::Line { depth, text } => self.fragments.push(Fragment::Line {
                    depth: depth + self.depth,
                    text,
                }),
                Fragment::Blank => self.blank(),
            }
        }
    }

    /// Current indentation level.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Renders all fragments, one per line, with a trailing newline.
    ///
    /// A trailing blank separator is dropped.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let end = match self.fragments.last() {
            Some(Fragment::Blank) => self.fragments.len() - 1,
            _ => self.fragments.len(),
        };
        for fragment in &self.fragments[..end] {
            match fragment {
                Fragment::Line { depth, text } if !text.is_empty() => {
                    out.push_str(&" ".repeat(depth * INDENT));
                    out.push_str(text);
                }
                Fragment::Line { .. } | Fragment::Blank => {}
            }
            out.push('\n');
        }
        out
    }
}
