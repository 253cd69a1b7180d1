//! Plain-text corpus reader.
//!
//! The archive layout mirrors the source material: each immediate
//! subdirectory of the corpus root is one mission (`apollo11/`,
//! `challenger/`, ...) holding `.txt` files. Traversal is sorted so the
//! resulting document list is deterministic across runs. Files must
//! already be valid UTF-8; decoding legacy encodings is an upstream
//! concern and failures surface as errors here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::types::Document;

/// Read every mission directory under `root` into documents.
pub fn read_corpus(root: &Path) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    for mission_dir in sorted_entries(root)? {
        if !mission_dir.is_dir() {
            continue;
        }
        let mission = dir_name(&mission_dir);
        let mut mission_docs = 0usize;

        for file in sorted_entries(&mission_dir)? {
            if file.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            documents.push(read_document(&file, &mission)?);
            mission_docs += 1;
        }

        debug!(mission = %mission, documents = mission_docs, "Read mission directory");
    }

    info!(
        corpus = %root.display(),
        documents = documents.len(),
        "Corpus loaded"
    );
    Ok(documents)
}

/// Read a single `.txt` file into a document with mission metadata.
pub fn read_document(path: &Path, mission: &str) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    let source = format!("{}/{}", mission, file_name);
    let category = infer_category(&file_name);
    Ok(Document::new(text, source, mission, category))
}

/// Guess a document category from its file name.
fn infer_category(file_name: &str) -> &'static str {
    let lowered = file_name.to_lowercase();
    if lowered.contains("transcript") {
        "transcript"
    } else if lowered.contains("press") {
        "press_kit"
    } else if lowered.contains("report") {
        "report"
    } else if lowered.contains("summary") {
        "summary"
    } else {
        "document"
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}
