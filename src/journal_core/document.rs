//! Structured entry content.
//!
//! An entry body is an ordered list of text runs, line breaks and time
//! markers. The persisted form is an HTML-bearing string; conversion to and
//! from that markup happens only at the edges (`to_markup` / `from_markup`),
//! so the editing rules below never have to reason about tags.

use std::fmt::Write as _;

const MARKER_CLASS: &str = "timestamp-separator";
const MARKER_LINE_CLASS: &str = "timestamp-line";
const MARKER_TEXT_CLASS: &str = "timestamp-text";

/// A non-editable inline time marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub label: String,
}

/// One element of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Marker(Marker),
}

impl Node {
    /// Line breaks and whitespace-only text carry no content.
    fn is_blank(&self) -> bool {
        match self {
            Node::Text(text) => text.trim().is_empty(),
            Node::LineBreak => true,
            Node::Marker(_) => false,
        }
    }
}

/// The body of a journal entry.
///
/// # Examples
///
/// ```
/// use daybook::journal_core::Document;
///
/// let mut doc = Document::new();
/// doc.push_text("morning pages");
/// doc.append_marker("09:10:00");
///
/// assert_eq!(doc.plain_text(), "morning pages09:10:00");
/// assert_eq!(Document::from_markup(&doc.to_markup()), doc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The text an editor would report for this document: text runs and
    /// marker labels concatenated, line breaks omitted.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Marker(marker) => out.push_str(&marker.label),
                Node::LineBreak => {}
            }
        }
        out
    }

    /// Length of [`plain_text`](Self::plain_text) in characters.
    pub fn text_len(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Text(text) => text.chars().count(),
                Node::Marker(marker) => marker.label.chars().count(),
                Node::LineBreak => 0,
            })
            .sum()
    }

    /// True if the document holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    pub fn marker_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Marker(_)))
            .count()
    }

    /// Appends text at the end. Embedded newlines become line breaks.
    pub fn push_text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.nodes.push(Node::LineBreak);
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            match self.nodes.last_mut() {
                Some(Node::Text(existing)) => existing.push_str(line),
                _ => self.nodes.push(Node::Text(line.to_string())),
            }
        }
    }

    pub fn push_line_break(&mut self) {
        self.nodes.push(Node::LineBreak);
    }

    /// Deletes the last line: a trailing line break, then the text run or
    /// marker before it. Returns false if there was nothing to delete.
    pub fn delete_last_line(&mut self) -> bool {
        let mut changed = false;
        if matches!(self.nodes.last(), Some(Node::LineBreak)) {
            self.nodes.pop();
            changed = true;
        }
        if matches!(self.nodes.last(), Some(Node::Text(_)) | Some(Node::Marker(_))) {
            self.nodes.pop();
            changed = true;
        }
        changed
    }

    /// Appends a time marker as two line breaks, the marker, and one line break.
    pub fn append_marker(&mut self, label: &str) {
        self.nodes.push(Node::LineBreak);
        self.nodes.push(Node::LineBreak);
        self.nodes.push(Node::Marker(Marker {
            label: label.to_string(),
        }));
        self.nodes.push(Node::LineBreak);
    }

    /// Removes the last marker if nothing but blank space follows it, along
    /// with the blank nodes after it and the two separator breaks before it. Earlier markers are
    /// never touched. Returns true if a marker was removed.
    pub fn remove_dangling_marker(&mut self) -> bool {
        let idx = match self
            .nodes
            .iter()
            .rposition(|node| matches!(node, Node::Marker(_)))
        {
            Some(idx) => idx,
            None => return false,
        };

        if self.nodes[idx + 1..].iter().any(|node| !node.is_blank()) {
            return false;
        }

        self.nodes.truncate(idx);
        // Only the two separator breaks go; a break ending the writer's own
        // line stays.
        let mut breaks = 0;
        while breaks < 2 {
            match self.nodes.last() {
                Some(Node::LineBreak) => breaks += 1,
                Some(node @ Node::Text(_)) if node.is_blank() => {}
                _ => break,
            }
            self.nodes.pop();
        }
        true
    }

    /// Serializes to the persisted markup form.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => escape_into(&mut out, text),
                Node::LineBreak => out.push_str("<br>"),
                Node::Marker(marker) => {
                    let _ = write!(
                        out,
                        "<div class=\"{}\" contenteditable=\"false\"><div class=\"{}\"></div><div class=\"{}\">",
                        MARKER_CLASS, MARKER_LINE_CLASS, MARKER_TEXT_CLASS
                    );
                    escape_into(&mut out, &marker.label);
                    out.push_str("</div></div>");
                }
            }
        }
        out
    }

    /// Parses persisted markup.
    ///
    /// Understands `<br>`, time markers, and `div`/`p` blocks as produced by
    /// rich-text editing surfaces. Other tags are dropped and their text kept.
    /// Plain text without any markup is accepted as-is.
    pub fn from_markup(markup: &str) -> Self {
        MarkupParser::new(markup).parse()
    }

    /// Plain text for export: breaks and blocks become newlines, runs of
    /// three or more newlines collapse to two, and the result is trimmed.
    pub fn to_export_text(&self) -> String {
        let mut raw = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => raw.push_str(text),
                Node::LineBreak => raw.push('\n'),
                Node::Marker(marker) => {
                    raw.push_str(&marker.label);
                    raw.push('\n');
                }
            }
        }
        collapse_newlines(&raw).trim().to_string()
    }

    /// Text for display in a terminal, with markers drawn as rules.
    pub fn to_display_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::LineBreak => out.push('\n'),
                Node::Marker(marker) => out.push_str(&display_marker(&marker.label)),
            }
        }
        out
    }
}

/// A marker as drawn in the terminal.
pub fn display_marker(label: &str) -> String {
    format!("──────── {} ────────", label)
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;
    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run > 2 {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(c);
    }
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

struct Tag<'a> {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: &'a str,
}

fn parse_tag(inner: &str) -> Tag<'_> {
    let (closing, body) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    Tag {
        name: body[..name_end].to_ascii_lowercase(),
        closing,
        self_closing,
        attrs: &body[name_end..],
    }
}

fn has_class(attrs: &str, class: &str) -> bool {
    let lower = attrs.to_ascii_lowercase();
    let Some(start) = lower.find("class=") else {
        return false;
    };
    let value = &attrs[start + "class=".len()..];
    let value = value.trim_start_matches(['"', '\'']);
    let end = value.find(['"', '\'']).unwrap_or(value.len());
    value[..end].split_whitespace().any(|c| c == class)
}

fn is_block(name: &str) -> bool {
    matches!(name, "div" | "p")
}

struct MarkupParser<'a> {
    rest: &'a str,
    doc: Document,
    block_closed: bool,
}

impl<'a> MarkupParser<'a> {
    fn new(markup: &'a str) -> Self {
        Self {
            rest: markup,
            doc: Document::new(),
            block_closed: false,
        }
    }

    fn parse(mut self) -> Document {
        while !self.rest.is_empty() {
            match self.rest.find('<') {
                Some(0) => self.parse_tag_at_start(),
                Some(pos) => {
                    let text = &self.rest[..pos];
                    self.rest = &self.rest[pos..];
                    self.push_text(text);
                }
                None => {
                    let text = self.rest;
                    self.rest = "";
                    self.push_text(text);
                }
            }
        }
        self.doc
    }

    fn push_text(&mut self, raw: &str) {
        let text = unescape(raw);
        if text.is_empty() {
            return;
        }
        if self.block_closed {
            self.doc.push_line_break();
            self.block_closed = false;
        }
        self.doc.push_text(&text);
    }

    fn push_node(&mut self, node: Node) {
        self.block_closed = false;
        self.doc.nodes.push(node);
    }

    fn parse_tag_at_start(&mut self) {
        let Some(end) = self.rest.find('>') else {
            // A stray '<' with no closing bracket is literal text.
            let text = self.rest;
            self.rest = "";
            self.push_text(text);
            return;
        };
        let tag = parse_tag(self.rest[1..end].trim());
        self.rest = &self.rest[end + 1..];

        match tag.name.as_str() {
            "br" if !tag.closing => self.push_node(Node::LineBreak),
            "div" if !tag.closing && has_class(tag.attrs, MARKER_CLASS) => {
                let label = self.take_marker_label();
                self.push_node(Node::Marker(Marker { label }));
            }
            name if is_block(name) && !tag.self_closing => {
                if tag.closing {
                    if matches!(self.doc.nodes.last(), Some(Node::Text(_))) {
                        self.block_closed = true;
                    }
                } else if matches!(self.doc.nodes.last(), Some(Node::Text(_))) {
                    self.push_node(Node::LineBreak);
                }
            }
            _ => {}
        }
    }

    /// Consumes the inside of a marker element up to its matching `</div>`
    /// and returns the text it contains.
    fn take_marker_label(&mut self) -> String {
        let mut depth = 1usize;
        let mut label = String::new();
        while depth > 0 && !self.rest.is_empty() {
            match self.rest.find('<') {
                Some(0) => {
                    let Some(end) = self.rest.find('>') else {
                        self.rest = "";
                        break;
                    };
                    let tag = parse_tag(self.rest[1..end].trim());
                    self.rest = &self.rest[end + 1..];
                    if tag.name == "div" && !tag.self_closing {
                        if tag.closing {
                            depth -= 1;
                        } else {
                            depth += 1;
                        }
                    }
                }
                Some(pos) => {
                    label.push_str(&unescape(&self.rest[..pos]));
                    self.rest = &self.rest[pos..];
                }
                None => {
                    label.push_str(&unescape(self.rest));
                    self.rest = "";
                }
            }
        }
        label.trim().to_string()
    }
}
