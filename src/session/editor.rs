//! The editing surface bound to one entry at a time.

use crate::journal_core::Document;
use tracing::debug;

/// A single content-changing interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Type a line of text followed by a line break.
    Line(String),
    /// Type text with no trailing line break.
    Text(String),
    /// Delete the last line.
    DeleteLine,
}

#[derive(Debug, Clone, Default)]
pub struct EditorSurface {
    date: String,
    document: Document,
    focused: bool,
}

impl EditorSurface {
    pub fn new(date: &str, document: Document) -> Self {
        Self {
            date: date.to_string(),
            document,
            focused: false,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Replaces the displayed content with a store update, unless the
    /// surface has focus, so in-progress typing is never clobbered.
    /// Returns true if the content was replaced.
    pub fn rehydrate(&mut self, date: &str, document: Document) -> bool {
        if self.focused {
            debug!("Editor focused, skipping refresh for {}", date);
            return false;
        }
        self.bind(date, document);
        true
    }

    /// Binds the surface to `date`, regardless of focus.
    pub fn bind(&mut self, date: &str, document: Document) {
        self.date = date.to_string();
        self.document = document;
    }

    /// Applies an edit. Returns false if it changed nothing.
    pub fn apply(&mut self, edit: &Edit) -> bool {
        match edit {
            Edit::Line(text) => {
                self.document.push_text(text);
                self.document.push_line_break();
                true
            }
            Edit::Text(text) => {
                if text.is_empty() {
                    return false;
                }
                self.document.push_text(text);
                true
            }
            Edit::DeleteLine => self.document.delete_last_line(),
        }
    }

    pub fn markup(&self) -> String {
        self.document.to_markup()
    }
}
