//! Audio analysis endpoint
//!
//! POST /api/analyze-audio: stage the upload, decode and extract features on
//! the blocking pool, select a diagnosis, persist and return it.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{DiagnosticResult, NewDiagnostic};
use crate::services::{analyze_file, select_diagnosis};
use crate::AppState;

/// Multipart field carrying the audio
pub const FILE_FIELD: &str = "file";

struct Upload {
    filename: Option<String>,
    bytes: Bytes,
}

/// Pull the `file` field out of the form, ignoring any others
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::BadRequest(format!("Missing multipart field '{}'", FILE_FIELD)))
}

/// POST /api/analyze-audio
pub async fn analyze_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<DiagnosticResult>> {
    let upload = read_upload(&mut multipart).await?;

    // A missing filename cannot carry an accepted extension
    let filename = upload.filename.ok_or(ApiError::UnsupportedFormat)?;

    let staged = state.stager.stage(&upload.bytes, &filename)?;
    tracing::info!(file = %filename, bytes = upload.bytes.len(), "Analyzing upload");

    // The staged file is dropped (and removed) inside the blocking task
    let analysis = tokio::task::spawn_blocking(move || {
        let features = analyze_file(staged.path());
        drop(staged);
        features
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {}", e)))?;

    let features = analysis.map_err(|e| {
        tracing::warn!(file = %filename, error = %e, "Decode failed");
        ApiError::DecodeFailed(format!("{:#}", e))
    })?;

    let diagnosis = select_diagnosis(features.as_ref(), &mut rand::thread_rng());

    let result = match db::diagnostics::save_result(&state.db, NewDiagnostic::new(filename, diagnosis)).await {
        Ok(result) => result,
        Err(e) => {
            state.record_error(format!("Failed to save diagnostic: {}", e)).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        id = %result.id,
        component = %result.component,
        diagnosis = %result.diagnosis,
        confidence = result.confidence_score,
        "Analysis complete"
    );

    Ok(Json(result))
}

/// GET /api/diagnostics/history
pub async fn diagnostic_history(State(state): State<AppState>) -> ApiResult<Json<Vec<DiagnosticResult>>> {
    let results = db::diagnostics::list_recent(&state.db, db::diagnostics::HISTORY_LIMIT).await?;
    Ok(Json(results))
}

/// Build analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-audio", post(analyze_audio))
        .route("/diagnostics/history", get(diagnostic_history))
}
