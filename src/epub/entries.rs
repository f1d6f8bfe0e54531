//! The in-memory file set of an EPUB before it is zipped.

/// Content of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Text(String),
    Bytes(Vec<u8>),
}

impl EntryContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EntryContent::Text(text) => text.as_bytes(),
            EntryContent::Bytes(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EntryContent::Text(text) => Some(text),
            EntryContent::Bytes(_) => None,
        }
    }
}

/// A path inside the archive and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: EntryContent,
}

/// Ordered mapping of archive path → content.
///
/// Inserting an existing path replaces its content in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveEntries {
    entries: Vec<ArchiveEntry>,
}

impl ArchiveEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: EntryContent) {
        let path = path.into();
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(existing) => existing.content = content,
            None => self.entries.push(ArchiveEntry { path, content }),
        }
    }

    pub fn insert_text(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.insert(path, EntryContent::Text(text.into()));
    }

    pub fn insert_bytes(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.insert(path, EntryContent::Bytes(bytes));
    }

    pub fn get(&self, path: &str) -> Option<&EntryContent> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| &e.content)
    }

    /// Text content of an entry, if present and textual.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(EntryContent::as_text)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArchiveEntries {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
