//! Paper analysis routes — upload papers, get topic predictions back.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use papersage_analyze::Document;
use papersage_core::{AnalysisSettings, Error};
use papersage_extract::{extract_bytes, ExtractedPaper};
use tracing::{debug, info, warn};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze", post(analyze_papers))
        .route("/results/{session_id}", get(get_results))
}

/// One uploaded file part.
struct Upload {
    filename: String,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Everything read from the multipart body.
#[derive(Default)]
struct AnalyzeForm {
    uploads: Vec<Upload>,
    subject: Option<String>,
    min_percent: Option<u32>,
}

fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "status": "error", "error": message })),
    )
}

async fn read_form(
    multipart: &mut Multipart,
    max_files: usize,
) -> Result<AnalyzeForm, String> {
    let mut form = AnalyzeForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Invalid multipart body: {}", e)),
        };

        let name = field.name().unwrap_or("").to_string();

        if let Some(filename) = field.file_name().map(str::to_string) {
            if form.uploads.len() >= max_files {
                return Err(format!("At most {} papers per request", max_files));
            }
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Read failed for {}: {}", filename, e))?;
            form.uploads.push(Upload {
                filename,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| format!("Read failed for field {}: {}", name, e))?;
        let value = value.trim();

        match name.as_str() {
            "subject" if !value.is_empty() => form.subject = Some(value.to_string()),
            "min_percent" if !value.is_empty() => {
                let percent: u32 = value
                    .parse()
                    .map_err(|_| format!("min_percent must be an integer, got {:?}", value))?;
                if percent > 100 {
                    return Err(format!("min_percent must be at most 100, got {}", percent));
                }
                form.min_percent = Some(percent);
            }
            _ => debug!("Ignoring form field {:?}", name),
        }
    }

    Ok(form)
}

/// POST /api/analyze — analyze uploaded papers (multipart).
///
/// A paper that cannot be extracted is reported under `skipped` and the
/// rest of the batch is still analyzed.
async fn analyze_papers(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_form(&mut multipart, state.config.max_files).await {
        Ok(form) => form,
        Err(message) => {
            warn!("Rejected analysis request: {}", message);
            return bad_request(message);
        }
    };

    let mut skipped = Vec::new();
    let mut pending = Vec::new();
    for upload in form.uploads {
        if upload.bytes.len() > state.config.max_upload_bytes {
            skipped.push(serde_json::json!({
                "filename": upload.filename,
                "error": format!(
                    "File exceeds the {} byte upload limit",
                    state.config.max_upload_bytes
                ),
            }));
            continue;
        }
        pending.push(upload);
    }

    // Extract concurrently on the blocking pool, then reduce in upload order.
    let filenames: Vec<String> = pending.iter().map(|u| u.filename.clone()).collect();
    let tasks = pending.into_iter().map(|upload| {
        tokio::task::spawn_blocking(move || {
            extract_bytes(
                &upload.filename,
                upload.content_type.as_deref(),
                &upload.bytes,
            )
        })
    });
    let extracted = futures::future::join_all(tasks).await;

    let mut papers: Vec<ExtractedPaper> = Vec::new();
    for (filename, joined) in filenames.into_iter().zip(extracted) {
        let error = match joined {
            Ok(Ok(paper)) => {
                papers.push(paper);
                continue;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("Extraction task failed: {}", e),
        };
        warn!("Skipping {}: {}", filename, error);
        skipped.push(serde_json::json!({
            "filename": filename,
            "error": error,
        }));
    }

    let analyzer = match form.min_percent {
        Some(min_percent) => state.analyzer.with_settings(AnalysisSettings {
            min_percent,
            ..state.analyzer.settings().clone()
        }),
        None => state.analyzer.clone(),
    };

    let documents: Vec<Document> = papers
        .iter()
        .map(|p| Document::new(p.filename.clone(), p.text.clone()))
        .collect();

    let result = match analyzer.analyze(&documents, form.subject.as_deref()) {
        Ok(result) => result,
        Err(e @ Error::UnknownSubject(_)) => return bad_request(e.to_string()),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "status": "error", "error": e.to_string() })),
            )
        }
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let mut response = serde_json::json!({
        "status": "success",
        "session_id": session_id,
        "analyzed_at": chrono::Utc::now().to_rfc3339(),
    });
    if let (Some(body), Ok(serde_json::Value::Object(fields))) =
        (response.as_object_mut(), serde_json::to_value(&result))
    {
        body.extend(fields);
        body.insert(
            "papers".into(),
            papers
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "filename": p.filename,
                        "paper_id": p.paper_id,
                        "characters": p.text.chars().count(),
                    })
                })
                .collect(),
        );
        body.insert("skipped".into(), serde_json::Value::Array(skipped));
    }

    info!(
        "Session {}: analyzed {} papers ({} skipped)",
        session_id,
        result.total_papers,
        response["skipped"].as_array().map(Vec::len).unwrap_or(0)
    );

    state.results.put(session_id, response.clone());

    (StatusCode::OK, Json(response))
}

/// GET /api/results/{session_id} — cached analysis response.
async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.results.get(&session_id) {
        Some(response) => (StatusCode::OK, Json(response)),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "status": "error",
                "error": format!("No results for session {}", session_id),
            })),
        ),
    }
}
