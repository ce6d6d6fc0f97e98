use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use lopdf::Document;

use crate::error::Result;

/// A raw block of text from one page of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// File name of the source document.
    pub document: String,
    /// 1-based page number.
    pub page_number: u32,
    /// Trimmed block text, in reading order.
    pub raw_text: String,
}

/// Produces the text blocks of a named document.
pub trait BlockSource {
    /// Returns `Ok(None)` when the document does not exist, otherwise its
    /// blocks in page order and reading order within a page.
    fn blocks(&self, document: &str) -> Result<Option<Vec<TextBlock>>>;
}

/// Split a page's text into blocks at blank lines.
///
/// Blocks are trimmed and empty blocks are dropped.
pub fn split_blocks(page_text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in page_text.lines() {
        if line.trim().is_empty() {
            flush_block(&mut current, &mut blocks);
        } else {
            current.push(line);
        }
    }
    flush_block(&mut current, &mut blocks);

    blocks
}

fn flush_block(lines: &mut Vec<&str>, blocks: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let block = lines.join("\n").trim().to_string();
    if !block.is_empty() {
        blocks.push(block);
    }
    lines.clear();
}

/// Reads PDF documents by file name from a directory.
#[derive(Debug, Clone)]
pub struct PdfDirectory {
    root: PathBuf,
}

impl PdfDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Extract every page's blocks from a PDF file.
    ///
    /// Pages whose text cannot be decoded are skipped with a warning.
    pub fn extract_file(path: &Path) -> Result<Vec<TextBlock>> {
        let document_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let doc = Document::load(path)?;
        let mut blocks = Vec::new();

        for page_number in doc.get_pages().into_keys() {
            let text = match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        document = %document_name,
                        page = page_number,
                        error = %e,
                        "skipping page without extractable text"
                    );
                    continue;
                }
            };

            blocks.extend(split_blocks(&text).into_iter().map(|raw_text| {
                TextBlock {
                    document: document_name.clone(),
                    page_number,
                    raw_text,
                }
            }));
        }

        tracing::debug!(
            document = %document_name,
            blocks = blocks.len(),
            "extracted text blocks"
        );
        Ok(blocks)
    }
}

impl BlockSource for PdfDirectory {
    fn blocks(&self, document: &str) -> Result<Option<Vec<TextBlock>>> {
        let path = self.root.join(document);
        if !path.is_file() {
            return Ok(None);
        }
        Self::extract_file(&path).map(Some)
    }
}

/// Pre-extracted blocks keyed by document name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlocks {
    documents: HashMap<String, Vec<TextBlock>>,
}

impl InMemoryBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document given as `(page_number, text)` pairs.
    pub fn insert<I, S>(&mut self, document: &str, pages: I)
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let blocks = pages
            .into_iter()
            .map(|(page_number, text)| TextBlock {
                document: document.to_string(),
                page_number,
                raw_text: text.into().trim().to_string(),
            })
            .collect();
        self.documents.insert(document.to_string(), blocks);
    }

    pub fn with_document<I, S>(mut self, document: &str, pages: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        self.insert(document, pages);
        self
    }
}

impl BlockSource for InMemoryBlocks {
    fn blocks(&self, document: &str) -> Result<Option<Vec<TextBlock>>> {
        Ok(self.documents.get(document).cloned())
    }
}
