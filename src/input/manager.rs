//! Input manager for loading documents from disk

use crate::error::{PrepScoreError, Result};
use crate::input::file_detector::DocumentKind;
use crate::input::text_extractor::extract_text;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// A loaded document: raw bytes plus extracted text. Format detection needs
/// the bytes; everything downstream works on the text.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub bytes: Vec<u8>,
    pub text: String,
    pub mime: &'static str,
}

pub struct InputManager {
    cache: HashMap<String, LoadedDocument>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a document from disk, detect its type, and extract its text.
    ///
    /// The extension decides the type when recognized; otherwise the byte
    /// signature does. Anything else is an unsupported format.
    pub async fn load(&mut self, path: &Path) -> Result<LoadedDocument> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached document for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        let bytes = fs::read(path).await.map_err(PrepScoreError::Io)?;

        let mut kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(DocumentKind::from_extension)
            .unwrap_or(DocumentKind::Unknown);
        if kind == DocumentKind::Unknown {
            kind = DocumentKind::sniff(&bytes);
        }

        let mime = kind.mime().ok_or_else(|| {
            PrepScoreError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))
        })?;

        info!("Extracting text from {}: {}", mime, path.display());
        let text = extract_text(&bytes, mime)?;
        let document = LoadedDocument { bytes, text, mime };

        if self.enable_cache {
            self.cache.insert(path_str, document.clone());
        }

        Ok(document)
    }

    /// Read a plain-text companion file, such as a job description.
    pub async fn load_text(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await.map_err(PrepScoreError::Io)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
