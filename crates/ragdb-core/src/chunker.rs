//! Corpus chunking for seeding the vector store.
//!
//! Splits `.txt`/`.md` files under a data directory into paragraph chunks,
//! sub-splitting long paragraphs with word overlap so no chunk blows the
//! embedding context.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::DocumentChunk;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, overlap_percent: 0.2 }
    }
}

#[derive(Default)]
pub struct CorpusChunker {
    chunking_config: ChunkingConfig,
}

impl CorpusChunker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self {
        Self { chunking_config }
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = self.list_corpus_files(data_dir);
        if files.is_empty() {
            println!("No .txt/.md files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            println!(
                "Processing file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            let content = self.read_file_content(file_path)?;
            let doc_id = extract_doc_id(file_path);
            let chunks = self.chunk_content(&content, &doc_id, file_path)?;
            all_chunks.extend(chunks);
        }
        println!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    pub fn process_directory_limited(
        &self,
        data_dir: &Path,
        limit: usize,
    ) -> Result<Vec<DocumentChunk>> {
        let mut files = self.list_corpus_files(data_dir);
        if files.is_empty() {
            println!("No .txt/.md files found under {}.", data_dir.display());
            return Ok(vec![]);
        }
        if files.len() > limit {
            files.truncate(limit);
            println!("Limited to first {} files", limit);
        }
        let mut all_chunks = Vec::new();
        for file_path in &files {
            let content = self.read_file_content(file_path)?;
            let doc_id = extract_doc_id(file_path);
            all_chunks.extend(self.chunk_content(&content, &doc_id, file_path)?);
        }
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn chunk_content(
        &self,
        content: &str,
        doc_id: &str,
        file_path: &Path,
    ) -> Result<Vec<DocumentChunk>> {
        let source = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| doc_id.to_string());
        let paragraphs: Vec<&str> = content.split("\n\n").collect();
        let mut document_chunks = Vec::new();
        let mut chunk_index = 0;
        for paragraph in paragraphs {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let tokens = self.count_tokens(paragraph);
            if tokens <= self.chunking_config.max_tokens {
                document_chunks.push(self.make_chunk(
                    doc_id,
                    file_path,
                    &source,
                    paragraph.to_string(),
                    chunk_index,
                ));
                chunk_index += 1;
            } else {
                for sub_chunk in self.split_paragraph_with_overlap(paragraph) {
                    document_chunks.push(self.make_chunk(
                        doc_id, file_path, &source, sub_chunk, chunk_index,
                    ));
                    chunk_index += 1;
                }
            }
        }
        let total_chunks = document_chunks.len();
        for chunk in &mut document_chunks {
            chunk.total_chunks = total_chunks;
        }
        Ok(document_chunks)
    }

    fn make_chunk(
        &self,
        doc_id: &str,
        file_path: &Path,
        source: &str,
        content: String,
        chunk_index: usize,
    ) -> DocumentChunk {
        DocumentChunk {
            id: format!("{}:{}", doc_id, chunk_index),
            doc_id: doc_id.to_string(),
            doc_path: file_path.to_string_lossy().to_string(),
            source: source.to_string(),
            content,
            chunk_index,
            total_chunks: 0,
        }
    }

    fn count_tokens(&self, text: &str) -> usize {
        let word_count = text.split_whitespace().count();
        (word_count as f32 / 0.75) as usize
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = 300;
        let overlap_words = (words_per_chunk as f32 * self.chunking_config.overlap_percent) as usize;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_corpus_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            match path.extension().and_then(|s| s.to_str()) {
                Some("txt") | Some("md") => files.push(path.to_path_buf()),
                _ => {}
            }
        }
        files.sort();
        files
    }
}

fn extract_doc_id(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "doc".to_string())
}
