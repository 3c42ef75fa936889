//! Offline analysis of papers on disk — `papersage analyze <file>...`.

use std::path::{Path, PathBuf};

use papersage_analyze::{Analyzer, Document};
use papersage_core::{Error, Result};
use papersage_extract::extract_path;
use tracing::warn;

/// Parsed `analyze` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    pub files: Vec<PathBuf>,
    pub subject: Option<String>,
}

/// Parse the arguments following the `analyze` subcommand.
pub fn parse_analyze_args(args: &[String]) -> Result<AnalyzeArgs> {
    let mut files = Vec::new();
    let mut subject = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--subject" | "-s" => match iter.next() {
                Some(value) => subject = Some(value.clone()),
                None => return Err(Error::Config("--subject needs a value".into())),
            },
            flag if flag.starts_with("--") => {
                return Err(Error::Config(format!("unknown option {}", flag)));
            }
            path => files.push(PathBuf::from(path)),
        }
    }

    if files.is_empty() {
        return Err(Error::Config("no paper files given".into()));
    }
    Ok(AnalyzeArgs { files, subject })
}

/// Extract and analyze local files. Unreadable files are listed under
/// `skipped`, same as the HTTP endpoint.
pub fn analyze_files(
    analyzer: &Analyzer,
    files: &[PathBuf],
    subject: Option<&str>,
) -> Result<serde_json::Value> {
    let mut documents = Vec::new();
    let mut skipped = Vec::new();

    for path in files {
        match extract_path(path) {
            Ok(paper) => documents.push(Document::new(paper.filename, paper.text)),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                skipped.push(serde_json::json!({
                    "filename": display_name(path),
                    "error": e.to_string(),
                }));
            }
        }
    }

    let result = analyzer.analyze(&documents, subject)?;
    let mut value = serde_json::to_value(&result)?;
    if let Some(body) = value.as_object_mut() {
        body.insert("skipped".into(), serde_json::Value::Array(skipped));
    }
    Ok(value)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
