//! PaperSage Extract — turns uploaded paper bytes into text.

pub mod file;

pub use file::{extract_bytes, extract_path, paper_fingerprint, ExtractedPaper, FileType};
