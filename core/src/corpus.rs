use crate::error::{Result, SearchError};
use crate::index::DocMeta;
use crate::DocId;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An ordered document set plus a way to fetch each document's text.
pub trait Corpus {
    fn documents(&self) -> &[DocMeta];
    /// Full text of the document at position `doc_id` in `documents()`.
    fn read_text(&self, doc_id: DocId) -> io::Result<String>;
}

fn out_of_range(doc_id: DocId) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no document with id {doc_id}"))
}

/// Files with a given extension directly inside one directory, ordered by file name.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    docs: Vec<DocMeta>,
}

impl DirectoryCorpus {
    pub fn open<P: AsRef<Path>>(root: P, extension: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SearchError::Corpus {
                path: root.display().to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }
        let suffix = format!(".{}", extension.trim_start_matches('.'));
        let mut docs = Vec::new();
        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| SearchError::Corpus {
                path: root.display().to_string(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if !file_name.ends_with(&suffix) {
                continue;
            }
            docs.push(DocMeta {
                name: document_name(file_name).to_string(),
                path: Some(entry.path().to_path_buf()),
            });
        }
        tracing::debug!(root = %root.display(), num_docs = docs.len(), "listed corpus");
        Ok(Self { root, docs })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Corpus for DirectoryCorpus {
    fn documents(&self) -> &[DocMeta] {
        &self.docs
    }

    fn read_text(&self, doc_id: DocId) -> io::Result<String> {
        let path = self
            .docs
            .get(doc_id as usize)
            .and_then(|d| d.path.as_ref())
            .ok_or_else(|| out_of_range(doc_id))?;
        read_lossy(path)
    }
}

/// Read a whole file, replacing invalid UTF-8 with U+FFFD.
///
/// Only I/O failures are errors. The handle is dropped before returning, whatever the outcome.
pub fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// File name with its last extension removed; names like `.profile` are kept whole.
pub fn document_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    }
}

/// In-memory corpus. Entries without text fail to read.
#[derive(Debug, Clone, Default)]
pub struct MemoryCorpus {
    docs: Vec<DocMeta>,
    texts: Vec<Option<String>>,
}

impl MemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |c, (name, text)| c.with_text(name, text))
    }

    pub fn with_text(mut self, name: &str, text: &str) -> Self {
        self.docs.push(DocMeta::named(document_name(name)));
        self.texts.push(Some(text.to_string()));
        self
    }

    pub fn with_unreadable(mut self, name: &str) -> Self {
        self.docs.push(DocMeta::named(document_name(name)));
        self.texts.push(None);
        self
    }
}

impl Corpus for MemoryCorpus {
    fn documents(&self) -> &[DocMeta] {
        &self.docs
    }

    fn read_text(&self, doc_id: DocId) -> io::Result<String> {
        match self.texts.get(doc_id as usize) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(io::Error::new(io::ErrorKind::PermissionDenied, "document is unreadable")),
            None => Err(out_of_range(doc_id)),
        }
    }
}
