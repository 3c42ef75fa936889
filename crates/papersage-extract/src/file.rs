//! Text extraction for uploaded papers.

use std::path::Path;

use papersage_core::{Error, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Supported paper formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    PlainText,
    Pdf,
    Unknown,
}

impl FileType {
    /// Detect file type from extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" | "md" => Self::PlainText,
            "pdf" => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a MIME content type.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match essence.as_str() {
            "application/pdf" | "application/x-pdf" => Self::Pdf,
            "text/plain" | "text/markdown" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Resolve the type of an upload: extension first, then content type, then magic bytes.
    pub fn detect(filename: &str, content_type: Option<&str>, bytes: &[u8]) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let by_ext = Self::from_extension(ext);
        if by_ext != Self::Unknown {
            return by_ext;
        }
        if let Some(ct) = content_type {
            let by_ct = Self::from_content_type(ct);
            if by_ct != Self::Unknown {
                return by_ct;
            }
        }
        if bytes.starts_with(b"%PDF-") {
            Self::Pdf
        } else {
            Self::Unknown
        }
    }
}

/// A paper whose text has been extracted.
#[derive(Debug, Clone)]
pub struct ExtractedPaper {
    pub filename: String,
    /// Content fingerprint of the uploaded bytes.
    pub paper_id: String,
    pub text: String,
}

/// Short hex fingerprint (first 16 hex chars of SHA-256) of a paper's bytes.
pub fn paper_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut id = hex::encode(digest);
    id.truncate(16);
    id
}

/// Extract text from an in-memory upload.
pub fn extract_bytes(
    filename: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<ExtractedPaper> {
    if bytes.is_empty() {
        return Err(Error::Extraction(format!("{} is empty", filename)));
    }

    let text = match FileType::detect(filename, content_type, bytes) {
        FileType::Pdf => extract_pdf(filename, bytes)?,
        FileType::PlainText => decode_text(filename, bytes)?,
        FileType::Unknown => {
            return Err(Error::UnsupportedFile(format!(
                "{} is neither a PDF nor plain text",
                filename
            )));
        }
    };

    if text.trim().is_empty() {
        warn!("No text extracted from {}. It might be a scanned document.", filename);
    }
    debug!("Extracted {} chars from {}", text.len(), filename);

    Ok(ExtractedPaper {
        filename: filename.to_string(),
        paper_id: paper_fingerprint(bytes),
        text,
    })
}

/// Extract text from a file on disk.
pub fn extract_path(path: &Path) -> Result<ExtractedPaper> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    extract_bytes(filename, None, &bytes)
}

fn extract_pdf(filename: &str, bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed documents instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Extraction(format!(
            "failed to extract text from {}: {}",
            filename, e
        ))),
        Err(_) => Err(Error::Extraction(format!(
            "PDF parser aborted on {}",
            filename
        ))),
    }
}

fn decode_text(filename: &str, bytes: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(bytes);
    let control = text
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0c'))
        .count();
    if control > text.len() / 10 {
        return Err(Error::Extraction(format!("{} looks like binary data", filename)));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_file_type() {
        assert_eq!(FileType::detect("paper.PDF", None, b""), FileType::Pdf);
        assert_eq!(FileType::detect("notes.txt", None, b""), FileType::PlainText);
        assert_eq!(
            FileType::detect("upload", Some("application/pdf"), b""),
            FileType::Pdf
        );
        assert_eq!(
            FileType::detect("upload", Some("text/plain; charset=utf-8"), b""),
            FileType::PlainText
        );
        assert_eq!(FileType::detect("blob", None, b"%PDF-1.7 ..."), FileType::Pdf);
        assert_eq!(FileType::detect("blob.bin", None, b"\x00\x01"), FileType::Unknown);
    }

    #[test]
    fn test_extract_plain_text() {
        let paper = extract_bytes("paper.txt", None, b"Define electric flux.\n").unwrap();
        assert_eq!(paper.filename, "paper.txt");
        assert_eq!(paper.text, "Define electric flux.\n");
        assert_eq!(paper.paper_id.len(), 16);
    }

    #[test]
    fn test_corrupt_pdf_is_recoverable_error() {
        let result = extract_bytes("broken.pdf", None, b"%PDF-1.4 this is not really a pdf");
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_empty_and_unsupported() {
        assert!(matches!(
            extract_bytes("empty.pdf", None, b""),
            Err(Error::Extraction(_))
        ));
        assert!(matches!(
            extract_bytes("photo.png", Some("image/png"), b"\x89PNG\r\n"),
            Err(Error::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_fingerprint_is_content_based() {
        assert_eq!(paper_fingerprint(b"same"), paper_fingerprint(b"same"));
        assert_ne!(paper_fingerprint(b"same"), paper_fingerprint(b"other"));
    }

    #[test]
    fn test_extract_path() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Explain the working of a transformer.").unwrap();
        let paper = extract_path(file.path()).unwrap();
        assert!(paper.text.contains("transformer"));
    }
}
