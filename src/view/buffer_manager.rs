use crate::document_model::{DEFAULT_MAX_SNAPSHOTS, Document, DocumentError};
use log::{debug, info};
use std::path::PathBuf;

/// Handle to a document owned by a [`BufferManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

/// An open document plus the shell's cursor into it.
#[derive(Debug)]
pub struct Buffer {
    pub id: DocumentId,
    pub document: Document,
    pub cursor: usize,
}

pub struct BufferManager {
    buffers: Vec<Buffer>,
    current_buffer: usize,
    next_id: u64,
    history_limit: usize,
}

impl BufferManager {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_MAX_SNAPSHOTS)
    }

    /// A manager holding one empty, untitled document.
    pub fn with_history_limit(history_limit: usize) -> Self {
        let mut manager = Self {
            buffers: Vec::new(),
            current_buffer: 0,
            next_id: 0,
            history_limit,
        };
        manager.open("");
        manager
    }

    /// Opens every file; names that do not exist yet become empty documents
    /// that will be created on save. Other read failures are returned.
    pub fn new_with_files(
        filenames: Vec<PathBuf>,
        history_limit: usize,
    ) -> Result<Self, DocumentError> {
        let mut manager = Self::with_history_limit(history_limit);
        if filenames.is_empty() {
            return Ok(manager);
        }

        manager.buffers.clear();
        for filename in filenames {
            let document = match Document::from_file(filename.clone(), history_limit) {
                Ok(doc) => doc,
                Err(DocumentError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    info!("{} does not exist yet, starting empty", filename.display());
                    let mut doc = Document::open("", history_limit);
                    doc.filename = Some(filename);
                    doc
                }
                Err(err) => return Err(err),
            };
            manager.push(document);
        }
        manager.current_buffer = 0;
        Ok(manager)
    }

    fn push(&mut self, document: Document) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        self.buffers.push(Buffer {
            id,
            document,
            cursor: 0,
        });
        self.current_buffer = self.buffers.len() - 1;
        debug!("opened buffer {id:?}");
        id
    }

    /// Opens `text` as a new document and makes it current.
    pub fn open(&mut self, text: &str) -> DocumentId {
        self.push(Document::open(text, self.history_limit))
    }

    /// Closes `id`. The last buffer is never removed; closing it leaves an
    /// empty untitled document in its place.
    pub fn close(&mut self, id: DocumentId) -> bool {
        let Some(index) = self.buffers.iter().position(|b| b.id == id) else {
            return false;
        };
        let buffer = self.buffers.remove(index);
        buffer.document.close();

        if self.buffers.is_empty() {
            self.open("");
        } else if self.current_buffer >= self.buffers.len() || self.current_buffer > index {
            self.current_buffer = self.current_buffer.saturating_sub(1);
        }
        true
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.buffers
            .iter()
            .find(|b| b.id == id)
            .map(|b| &b.document)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.buffers
            .iter_mut()
            .find(|b| b.id == id)
            .map(|b| &mut b.document)
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current_buffer]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current_buffer]
    }

    pub fn current_document(&self) -> &Document {
        &self.current().document
    }

    pub fn current_document_mut(&mut self) -> &mut Document {
        &mut self.current_mut().document
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter()
    }

    pub fn current_buffer_index(&self) -> usize {
        self.current_buffer
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn next_buffer(&mut self) {
        self.current_buffer = (self.current_buffer + 1) % self.buffers.len();
    }

    pub fn previous_buffer(&mut self) {
        let count = self.buffers.len();
        self.current_buffer = (self.current_buffer + count - 1) % count;
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_untitled_buffer() {
        let manager = BufferManager::new();
        assert_eq!(manager.buffer_count(), 1);
        assert_eq!(manager.current_document().display_name(), "Untitled");
    }

    #[test]
    fn test_documents_are_independent() {
        let mut manager = BufferManager::new();
        let a = manager.open("alpha");
        let b = manager.open("beta");

        manager.get_mut(a).unwrap().edit_insert(5, "!").unwrap();
        assert_eq!(manager.get(a).unwrap().get_full_text(), "alpha!");
        assert_eq!(manager.get(b).unwrap().get_full_text(), "beta");
        assert!(!manager.get(b).unwrap().can_undo());
        assert_eq!(manager.current().id, b);
    }

    #[test]
    fn test_close() {
        let mut manager = BufferManager::new();
        let first = manager.current().id;
        let second = manager.open("two");
        assert!(manager.close(second));
        assert!(!manager.close(second));
        assert_eq!(manager.current().id, first);

        assert!(manager.close(first));
        assert_eq!(manager.buffer_count(), 1);
        assert!(manager.current_document().is_empty());
        assert!(manager.get(first).is_none());
    }

    #[test]
    fn test_cycle_buffers() {
        let mut manager = BufferManager::new();
        manager.open("b");
        manager.open("c");
        assert_eq!(manager.current_buffer_index(), 2);
        manager.next_buffer();
        assert_eq!(manager.current_buffer_index(), 0);
        manager.previous_buffer();
        assert_eq!(manager.current_buffer_index(), 2);
    }

    #[test]
    fn test_missing_files_start_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let manager = BufferManager::new_with_files(vec![path.clone()], 10).unwrap();
        assert_eq!(manager.buffer_count(), 1);
        assert_eq!(manager.current_document().filename, Some(path));
        assert!(manager.current_document().is_empty());
    }
}
