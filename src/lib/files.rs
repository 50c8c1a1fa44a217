//! Local document validation and encoding for OCR uploads.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::errors::LocalDocumentError;

/// Extensions the OCR service accepts, with the MIME type sent on upload.
const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("pdf", "application/pdf"),
];
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

/// File types a backend can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptedTypes {
    /// Images and PDFs.
    Documents,
    /// PNG and JPEG only; vision models take inline images, not PDFs or TIFFs.
    Images,
}

impl AcceptedTypes {
    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            AcceptedTypes::Documents => DOCUMENT_TYPES,
            AcceptedTypes::Images => IMAGE_TYPES,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            AcceptedTypes::Documents => "png, jpg, jpeg, tif, tiff, or pdf",
            AcceptedTypes::Images => "png, jpg, or jpeg",
        }
    }
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A validated local document held in memory.
#[derive(Debug, Clone)]
pub struct LocalDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl LocalDocument {
    /// Validate `raw_path` and read it, refusing anything that would be rejected upstream.
    pub async fn load(
        raw_path: &str,
        max_bytes: u64,
        accepted: AcceptedTypes,
    ) -> Result<Self, LocalDocumentError> {
        if raw_path.trim().is_empty() {
            return Err(LocalDocumentError::MissingPath);
        }
        let path = PathBuf::from(raw_path);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LocalDocumentError::NotFound { path });
            }
            Err(source) => return Err(LocalDocumentError::Read { path, source }),
        };
        if !metadata.is_file() {
            return Err(LocalDocumentError::NotAFile { path });
        }
        if metadata.len() == 0 {
            return Err(LocalDocumentError::Empty { path });
        }
        if metadata.len() > max_bytes {
            return Err(too_large(metadata.len(), max_bytes));
        }

        let mime_type = mime_type_for(&path, accepted)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "uploaded_file".to_string());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| LocalDocumentError::Read {
                path: path.clone(),
                source,
            })?;
        // The file may have grown between stat and read.
        if bytes.len() as u64 > max_bytes {
            return Err(too_large(bytes.len() as u64, max_bytes));
        }

        Ok(Self {
            path,
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

/// Resolve the upload MIME type from the file extension.
pub fn mime_type_for(
    path: &Path,
    accepted: AcceptedTypes,
) -> Result<&'static str, LocalDocumentError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    accepted
        .table()
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .ok_or(LocalDocumentError::UnsupportedType {
            extension,
            expected: accepted.expected(),
        })
}

fn too_large(size: u64, limit: u64) -> LocalDocumentError {
    LocalDocumentError::TooLarge {
        size_mb: size as f64 / BYTES_PER_MB,
        limit_mb: limit as f64 / BYTES_PER_MB,
    }
}
