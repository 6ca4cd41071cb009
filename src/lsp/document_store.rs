//! Mirror of the text the client believes each open buffer contains.

use std::sync::Arc;

use dashmap::DashMap;
use ropey::{Rope, RopeSlice};
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};
use tracing::trace;

/// Concurrent `uri -> text` map.
///
/// Texts are stored behind `Arc` so a semantic-tokens request can hold a
/// snapshot without blocking writers; readers always see whole texts.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<String>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally replace the text stored for `uri`.
    pub fn put(&self, uri: Url, text: String) {
        self.documents.insert(uri, Arc::new(text));
    }

    pub fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.documents.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    /// Forget `uri`. Returns whether it was present.
    pub fn remove(&self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn clear(&self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Apply `didChange` content changes in order and return the new text.
    ///
    /// An unknown `uri` starts from empty text. The entry stays locked while
    /// the changes are applied, so concurrent readers observe either the old
    /// or the new text.
    pub fn apply_changes(&self, uri: &Url, changes: &[TextDocumentContentChangeEvent]) -> Arc<String> {
        let mut entry = self.documents.entry(uri.clone()).or_default();
        let updated = Arc::new(apply_content_changes(entry.value(), changes));
        *entry.value_mut() = Arc::clone(&updated);
        updated
    }
}

/// Splice content changes into `text`.
///
/// A change without a range replaces the whole text. Range positions are
/// zero-based lines and UTF-16 columns; positions past the end of a line or of
/// the document are clamped.
pub fn apply_content_changes(text: &str, changes: &[TextDocumentContentChangeEvent]) -> String {
    // Common case: the last full replacement wins and nothing follows it.
    if let Some(last) = changes.last() {
        if last.range.is_none() {
            return last.text.clone();
        }
    }

    let mut rope = Rope::from_str(text);
    for change in changes {
        match change.range {
            Some(range) => {
                let start = position_to_char(&rope, range.start);
                let end = position_to_char(&rope, range.end).max(start);
                trace!("Splicing chars {}..{} with {} bytes", start, end, change.text.len());
                rope.remove(start..end);
                rope.insert(start, &change.text);
            }
            None => rope = Rope::from_str(&change.text),
        }
    }
    rope.to_string()
}

/// Char index of an LSP position, clamped to the document.
fn position_to_char(rope: &Rope, position: Position) -> usize {
    let line_idx = position.line as usize;
    if line_idx >= rope.len_lines() {
        return rope.len_chars();
    }
    let line = rope.line(line_idx);
    let content_chars = line.len_chars() - line_break_len(line);
    let max_units = line.char_to_utf16_cu(content_chars);
    let units = (position.character as usize).min(max_units);
    rope.line_to_char(line_idx) + line.utf16_cu_to_char(units)
}

/// Number of chars taken by the line terminator at the end of `line`.
fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    match (len.checked_sub(2).map(|i| line.char(i)), len.checked_sub(1).map(|i| line.char(i))) {
        (Some('\r'), Some('\n')) => 2,
        (_, Some('\n' | '\r')) => 1,
        _ => 0,
    }
}
