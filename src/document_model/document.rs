use super::brackets::{self, BracketMatch};
use super::piece_table::{EditError, PieceTable};
use super::search_state::{SearchOptions, kmp_search};
use super::undo::{DEFAULT_MAX_SNAPSHOTS, UndoHistory};
use log::{debug, info, warn};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the plain-text file collaborator.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8 text", .path.display())]
    InvalidUtf8 { path: PathBuf },
    #[error("no file name")]
    NoFilename,
}

/// One open document: sole owner of its piece table and undo history.
#[derive(Debug, Clone)]
pub struct Document {
    table: PieceTable,
    history: UndoHistory,
    pub filename: Option<PathBuf>,
    modified: bool,
    /// Fingerprint of the text as last opened, loaded or saved.
    saved: u64,
}

fn fingerprint(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

impl Document {
    pub fn new() -> Self {
        Self::open("", DEFAULT_MAX_SNAPSHOTS)
    }

    pub fn open(text: &str, history_limit: usize) -> Self {
        Self {
            table: PieceTable::from_string(text.to_string()),
            history: UndoHistory::with_limit(history_limit),
            filename: None,
            modified: false,
            saved: fingerprint(text),
        }
    }

    pub fn from_file(path: PathBuf, history_limit: usize) -> Result<Self, DocumentError> {
        let text = read_text(&path)?;
        let mut doc = Self::open(&text, history_limit);
        doc.filename = Some(path);
        Ok(doc)
    }

    /// Replaces this document with the contents of `path`. On failure the
    /// current text, history and filename are left as they were.
    pub fn load(&mut self, path: &Path) -> Result<usize, DocumentError> {
        let text = read_text(path)?;
        self.replace_full_text(&text);
        self.history.clear();
        self.filename = Some(path.to_path_buf());
        self.mark_saved(&text);
        Ok(text.len())
    }

    /// Starts over with an empty, untitled document.
    pub fn reset(&mut self) {
        self.replace_full_text("");
        self.history.clear();
        self.filename = None;
        self.mark_saved("");
    }

    pub fn save(&mut self) -> Result<usize, DocumentError> {
        let path = self.filename.clone().ok_or(DocumentError::NoFilename)?;
        self.write_to(&path)
    }

    pub fn save_as(&mut self, path: PathBuf) -> Result<usize, DocumentError> {
        let bytes = self.write_to(&path)?;
        self.filename = Some(path);
        Ok(bytes)
    }

    fn write_to(&mut self, path: &Path) -> Result<usize, DocumentError> {
        let text = self.get_full_text();
        fs::write(path, &text).map_err(|source| {
            warn!("save to {} failed: {source}", path.display());
            DocumentError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.mark_saved(&text);
        info!("wrote {} bytes to {}", text.len(), path.display());
        Ok(text.len())
    }

    fn mark_saved(&mut self, text: &str) {
        self.saved = fingerprint(text);
        self.modified = false;
    }

    /// Modified means the text differs from what was last saved, so undoing
    /// back to the saved state clears the flag again.
    fn update_modified(&mut self, text: &str) {
        self.modified = fingerprint(text) != self.saved;
    }

    /// Ends the editing session, releasing both backing buffers and history.
    pub fn close(self) {
        debug!("closing {}", self.display_name());
    }

    pub fn display_name(&self) -> &str {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
    }

    pub fn title(&self) -> String {
        let marker = if self.modified { " [+]" } else { "" };
        format!("{}{marker} - piece-edit", self.display_name())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get_full_text(&self) -> String {
        self.table.materialize()
    }

    pub fn text_range(&self, start: usize, end: usize) -> Result<String, EditError> {
        self.table.materialize_range(start, end)
    }

    /// Rebuilds the piece table from `text`, as undo, redo and loading do.
    pub fn replace_full_text(&mut self, text: &str) {
        self.table = PieceTable::from_string(text.to_string());
    }

    /// Records one user-visible edit in the history.
    pub fn notify_edit(&mut self, before: &str, after: &str) {
        if before != after {
            self.update_modified(after);
        }
        self.history.push(before, after);
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.table.insert(offset, text)
    }

    pub fn delete(&mut self, offset: usize, length: usize) -> Result<(), EditError> {
        self.table.delete(offset, length)
    }

    /// Inserts `text` and records the change as one history entry.
    pub fn edit_insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        let before = self.get_full_text();
        self.table.insert(offset, text)?;
        let after = self.get_full_text();
        self.notify_edit(&before, &after);
        Ok(())
    }

    /// Deletes `length` bytes and records the change as one history entry.
    pub fn edit_delete(&mut self, offset: usize, length: usize) -> Result<(), EditError> {
        let before = self.get_full_text();
        self.table.delete(offset, length)?;
        let after = self.get_full_text();
        self.notify_edit(&before, &after);
        Ok(())
    }

    pub fn undo(&mut self) -> Option<String> {
        let text = self.history.undo()?;
        self.replace_full_text(&text);
        self.update_modified(&text);
        Some(text)
    }

    pub fn redo(&mut self) -> Option<String> {
        let text = self.history.redo()?;
        self.replace_full_text(&text);
        self.update_modified(&text);
        Some(text)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn find(&self, pattern: &str, options: SearchOptions) -> Vec<usize> {
        kmp_search(pattern, &self.get_full_text(), options)
    }

    pub fn match_bracket(&self, cursor: usize) -> Option<BracketMatch> {
        brackets::match_bracket(&self.get_full_text(), cursor)
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.table.char_at(offset)
    }

    pub fn char_before(&self, offset: usize) -> Option<char> {
        self.table.char_before(offset)
    }

    pub fn line_count(&mut self) -> usize {
        self.table.line_count()
    }

    pub fn line_range(&mut self, line: usize) -> Option<(usize, usize)> {
        self.table.line_range(line)
    }

    pub fn offset_to_position(&mut self, offset: usize) -> (usize, usize) {
        self.table.offset_to_position(offset)
    }

    pub fn position_to_offset(&mut self, line: usize, column: usize) -> usize {
        self.table.position_to_offset(line, column)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn read_text(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| {
        warn!("load of {} failed: {source}", path.display());
        DocumentError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let text = String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    info!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_edit_records_history() {
        let mut doc = Document::open("abc", 10);
        doc.edit_insert(3, "d").unwrap();
        doc.edit_delete(0, 1).unwrap();
        assert_eq!(doc.get_full_text(), "bcd");
        assert!(doc.is_modified());

        assert_eq!(doc.undo().as_deref(), Some("abcd"));
        assert_eq!(doc.get_full_text(), "abcd");
        assert_eq!(doc.undo().as_deref(), Some("abc"));
        assert_eq!(doc.undo(), None);
        assert_eq!(doc.redo().as_deref(), Some("abcd"));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_failed_edit_leaves_history_alone() {
        let mut doc = Document::open("abc", 10);
        assert!(doc.edit_insert(9, "x").is_err());
        assert!(doc.history().is_empty());
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_raw_edits_with_notify() {
        let mut doc = Document::new();
        let before = doc.get_full_text();
        doc.insert(0, "hello").unwrap();
        doc.delete(0, 1).unwrap();
        let after = doc.get_full_text();
        doc.notify_edit(&before, &after);
        assert_eq!(doc.history().len(), 2);
        assert_eq!(doc.undo().as_deref(), Some(""));
    }

    #[test]
    fn test_find_and_brackets() {
        let doc = Document::open("f(a(b)) f", 10);
        assert_eq!(doc.find("f", SearchOptions::default()), vec![0, 8]);
        let pair = doc.match_bracket(1).unwrap();
        assert_eq!((pair.open, pair.close), (1, 6));
    }

    #[test]
    fn test_title() {
        let mut doc = Document::new();
        assert_eq!(doc.title(), "Untitled - piece-edit");
        doc.edit_insert(0, "x").unwrap();
        assert_eq!(doc.title(), "Untitled [+] - piece-edit");
        doc.filename = Some(PathBuf::from("/tmp/notes.txt"));
        assert_eq!(doc.display_name(), "notes.txt");
    }

    #[test]
    fn test_load_and_save() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "line one\nline two").unwrap();

        let mut doc = Document::from_file(file.path().to_path_buf(), 10).unwrap();
        assert_eq!(doc.get_full_text(), "line one\nline two");
        assert!(!doc.is_modified());

        doc.edit_insert(0, "> ").unwrap();
        assert_eq!(doc.save().unwrap(), 19);
        assert!(!doc.is_modified());
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "> line one\nline two"
        );
    }

    #[test]
    fn test_failed_load_keeps_document() {
        let mut doc = Document::open("keep me", 10);
        doc.edit_insert(0, "!").unwrap();
        let missing = Path::new("/nonexistent/piece-edit/file.txt");
        assert!(matches!(doc.load(missing), Err(DocumentError::Io { .. })));
        assert_eq!(doc.get_full_text(), "!keep me");
        assert!(doc.can_undo());
        assert!(doc.filename.is_none());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x66, 0xff, 0xfe]).unwrap();
        let mut doc = Document::open("old", 10);
        assert!(matches!(
            doc.load(file.path()),
            Err(DocumentError::InvalidUtf8 { .. })
        ));
        assert_eq!(doc.get_full_text(), "old");
    }

    #[test]
    fn test_failed_save_stays_modified() {
        let mut doc = Document::new();
        doc.edit_insert(0, "text").unwrap();
        assert!(matches!(doc.save(), Err(DocumentError::NoFilename)));
        let bad = PathBuf::from("/nonexistent/piece-edit/out.txt");
        assert!(doc.save_as(bad).is_err());
        assert!(doc.is_modified());
        assert!(doc.filename.is_none());
    }

    #[test]
    fn test_reset() {
        let mut doc = Document::open("content", 10);
        doc.edit_insert(0, "x").unwrap();
        doc.reset();
        assert!(doc.is_empty());
        assert!(!doc.can_undo());
        assert_eq!(doc.display_name(), "Untitled");
    }

    #[test]
    fn test_undo_back_to_saved_text_clears_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::open("a", 10);
        doc.edit_insert(1, "b").unwrap();
        doc.save_as(dir.path().join("ab.txt")).unwrap();
        assert!(!doc.is_modified());

        doc.edit_insert(2, "c").unwrap();
        assert!(doc.is_modified());
        assert_eq!(doc.undo().as_deref(), Some("ab"));
        assert!(!doc.is_modified());
        assert_eq!(doc.title(), "ab.txt - piece-edit");

        // Further back than the save is a change again.
        assert_eq!(doc.undo().as_deref(), Some("a"));
        assert!(doc.is_modified());
        assert_eq!(doc.redo().as_deref(), Some("ab"));
        assert!(!doc.is_modified());
        assert_eq!(doc.redo().as_deref(), Some("abc"));
        assert!(doc.is_modified());
    }

    #[test]
    fn test_editing_back_to_opened_text_is_unmodified() {
        let mut doc = Document::open("x", 10);
        doc.edit_insert(1, "y").unwrap();
        doc.edit_delete(1, 1).unwrap();
        assert!(!doc.is_modified());
    }
}
